//! In-memory [`ViewSurface`] that records every call.
//!
//! Used by the tester and by tests; it keeps the attached cards in order and
//! applies patches so assertions can read the resulting view.
use std::collections::{HashMap, HashSet};

use crate::card::{CardPatch, CardView, ControlView};
use crate::constants::CARD_HOVER_CLASS;
use crate::view::{EmptyState, GridDecoration, Motion, Pose, ViewSurface, VisibilityOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Current state of one card in the headless view.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessCard {
    pub node: NodeId,
    pub product_id: String,
    pub classes: Vec<String>,
    pub name: String,
    pub description: String,
    pub image: String,
    pub alt_text: String,
    pub price_label: Option<String>,
    pub category_badge: Option<String>,
    pub quick_view: Option<ControlView>,
    pub primary: Option<ControlView>,
    pub clickable: bool,
    pub pose: Pose,
    pub hovered: bool,
    pub observed: bool,
}

impl HeadlessCard {
    fn from_view(node: NodeId, view: &CardView) -> Self {
        Self {
            node,
            product_id: view.product_id.clone(),
            classes: view.classes.to_vec(),
            name: view.name.clone(),
            description: view.description.clone(),
            image: view.image.clone(),
            alt_text: view.alt_text.clone(),
            price_label: view.price_label.clone(),
            category_badge: view.category_badge.clone(),
            quick_view: view.quick_view,
            primary: view.primary,
            clickable: view.clickable,
            pose: view.initial_pose,
            hovered: false,
            observed: false,
        }
    }

    fn apply(&mut self, patch: &CardPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(image) = &patch.image {
            self.image.clone_from(&image.src);
            self.alt_text.clone_from(&image.alt);
        }
        if let Some(price) = &patch.price_label {
            self.price_label = Some(price.clone());
        }
        if let Some(badge) = &patch.category_badge {
            self.category_badge = Some(badge.clone());
        }
        if let Some(classes) = &patch.classes {
            self.classes = classes.to_vec();
        }
        if let Some(primary) = patch.primary {
            self.primary = primary;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Decorated,
    Undecorated,
    Created { node: NodeId, product_id: String },
    Appended { node: NodeId },
    Inserted { node: NodeId, before: NodeId },
    Patched { node: NodeId, patch: CardPatch },
    Animated { node: NodeId, motion: Motion },
    Removed { node: NodeId, exit: Motion },
    Hover { node: NodeId, hovered: bool },
    Observed { node: NodeId },
    Unobserved { node: NodeId },
    Cleared,
    EmptyShown,
    EmptyHidden,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    containers: HashSet<String>,
    next_node: u32,
    detached: HashMap<NodeId, HeadlessCard>,
    cards: Vec<HeadlessCard>,
    decoration: Option<GridDecoration>,
    empty: Option<EmptyState>,
    events: Vec<SurfaceEvent>,
    clears: usize,
}

impl HeadlessSurface {
    /// A surface exposing one container.
    #[must_use]
    pub fn with_container(container_id: impl Into<String>) -> Self {
        let mut surface = Self::default();
        surface.containers.insert(container_id.into());
        surface
    }

    /// Product ids of attached cards, in view order.
    #[must_use]
    pub fn card_ids(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.product_id.as_str()).collect()
    }

    #[must_use]
    pub fn card(&self, product_id: &str) -> Option<&HeadlessCard> {
        self.cards.iter().find(|c| c.product_id == product_id)
    }

    #[must_use]
    pub fn cards(&self) -> &[HeadlessCard] {
        &self.cards
    }

    #[must_use]
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of full clears, i.e. full re-renders.
    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clears
    }

    #[must_use]
    pub const fn decoration(&self) -> Option<&GridDecoration> {
        self.decoration.as_ref()
    }

    #[must_use]
    pub const fn empty_state(&self) -> Option<&EmptyState> {
        self.empty.as_ref()
    }

    fn card_mut(&mut self, node: NodeId) -> Option<&mut HeadlessCard> {
        self.cards.iter_mut().find(|c| c.node == node)
    }
}

impl ViewSurface for HeadlessSurface {
    type Node = NodeId;

    fn resolve_container(&mut self, container_id: &str) -> bool {
        self.containers.contains(container_id)
    }

    fn decorate_container(&mut self, decoration: &GridDecoration) {
        self.decoration = Some(decoration.clone());
        self.events.push(SurfaceEvent::Decorated);
    }

    fn undecorate_container(&mut self, _decoration: &GridDecoration) {
        self.decoration = None;
        self.events.push(SurfaceEvent::Undecorated);
    }

    fn create_card(&mut self, view: &CardView) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        self.detached.insert(node, HeadlessCard::from_view(node, view));
        self.events.push(SurfaceEvent::Created {
            node,
            product_id: view.product_id.clone(),
        });
        node
    }

    fn append_card(&mut self, node: &NodeId) {
        if let Some(card) = self.detached.remove(node) {
            self.cards.push(card);
        }
        self.events.push(SurfaceEvent::Appended { node: *node });
    }

    fn insert_card_before(&mut self, node: &NodeId, anchor: &NodeId) {
        if let Some(card) = self.detached.remove(node) {
            match self.cards.iter().position(|c| c.node == *anchor) {
                Some(index) => self.cards.insert(index, card),
                None => self.cards.push(card),
            }
        }
        self.events.push(SurfaceEvent::Inserted {
            node: *node,
            before: *anchor,
        });
    }

    fn patch_card(&mut self, node: &NodeId, patch: &CardPatch) {
        if let Some(card) = self.card_mut(*node) {
            card.apply(patch);
        }
        self.events.push(SurfaceEvent::Patched {
            node: *node,
            patch: patch.clone(),
        });
    }

    fn animate_card(&mut self, node: &NodeId, motion: &Motion) {
        if let Some(card) = self.card_mut(*node) {
            card.pose = motion.to;
        }
        self.events.push(SurfaceEvent::Animated {
            node: *node,
            motion: *motion,
        });
    }

    fn remove_card(&mut self, node: &NodeId, exit: &Motion) {
        // No timers here: the exit transition completes immediately.
        self.cards.retain(|c| c.node != *node);
        self.events.push(SurfaceEvent::Removed {
            node: *node,
            exit: *exit,
        });
    }

    fn set_hover(&mut self, node: &NodeId, hovered: bool) {
        if let Some(card) = self.card_mut(*node) {
            card.hovered = hovered;
            card.classes.retain(|c| c != CARD_HOVER_CLASS);
            if hovered {
                card.classes.push(CARD_HOVER_CLASS.to_string());
            }
        }
        self.events.push(SurfaceEvent::Hover {
            node: *node,
            hovered,
        });
    }

    fn observe_entry(&mut self, node: &NodeId, _options: &VisibilityOptions) {
        if let Some(card) = self.card_mut(*node) {
            card.observed = true;
        }
        self.events.push(SurfaceEvent::Observed { node: *node });
    }

    fn unobserve(&mut self, node: &NodeId) {
        if let Some(card) = self.card_mut(*node) {
            card.observed = false;
        }
        self.events.push(SurfaceEvent::Unobserved { node: *node });
    }

    fn clear(&mut self) {
        self.cards.clear();
        self.detached.clear();
        self.empty = None;
        self.clears += 1;
        self.events.push(SurfaceEvent::Cleared);
    }

    fn show_empty_state(&mut self, empty: &EmptyState) {
        self.empty = Some(*empty);
        self.events.push(SurfaceEvent::EmptyShown);
    }

    fn hide_empty_state(&mut self) {
        self.empty = None;
        self.events.push(SurfaceEvent::EmptyHidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{BoundActions, render_card};
    use crate::product::{IdGenerator, ProductDraft, Theme};

    #[test]
    fn cards_attach_in_position_and_detach_on_remove() {
        let mut surface = HeadlessSurface::with_container("grid");
        assert!(surface.resolve_container("grid"));
        assert!(!surface.resolve_container("other"));

        let mut ids = IdGenerator::seeded(0);
        let nodes: Vec<NodeId> = ["a", "b"]
            .into_iter()
            .map(|id| {
                let product = ProductDraft::named(id).with_id(id).normalize(
                    Theme::Default,
                    &mut ids,
                    |_| false,
                );
                let node = surface.create_card(&render_card(&product, BoundActions::default()));
                surface.append_card(&node);
                node
            })
            .collect();
        assert_eq!(surface.card_ids(), ["a", "b"]);

        let product = ProductDraft::named("c").with_id("c").normalize(Theme::Default, &mut ids, |_| false);
        let late = surface.create_card(&render_card(&product, BoundActions::default()));
        surface.insert_card_before(&late, &nodes[1]);
        assert_eq!(surface.card_ids(), ["a", "c", "b"]);

        surface.remove_card(&nodes[0], &Motion::exit());
        assert_eq!(surface.card_ids(), ["c", "b"]);
        surface.clear();
        assert!(surface.cards().is_empty());
        assert_eq!(surface.clear_count(), 1);
    }
}
