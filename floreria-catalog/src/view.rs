//! Host view-attachment surface.
//!
//! The catalog engine never touches a DOM. Hosts implement [`ViewSurface`]
//! and the controller drives it through add / patch / remove / observe calls.
use smallvec::SmallVec;
use std::fmt;

use crate::card::{CardPatch, CardView};
use crate::constants::{
    EMPTY_STATE_HINT, EMPTY_STATE_ICON, EMPTY_STATE_TITLE, ENTRY_DURATION_MS, ENTRY_OFFSET_PX,
    EXIT_DURATION_MS, EXIT_OFFSET_PX, VISIBILITY_ROOT_MARGIN_PX, VISIBILITY_THRESHOLD,
};

/// Resting pose of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Transparent and shifted by [`ENTRY_OFFSET_PX`].
    Hidden,
    Visible,
    /// Fading out while being evicted.
    Leaving,
}

impl Pose {
    #[must_use]
    pub const fn offset_px(self) -> i32 {
        match self {
            Self::Hidden => ENTRY_OFFSET_PX,
            Self::Visible => 0,
            Self::Leaving => EXIT_OFFSET_PX,
        }
    }

    #[must_use]
    pub const fn opaque(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// A transition towards `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub to: Pose,
    pub duration_ms: u32,
    pub delay_ms: u32,
}

impl Motion {
    #[must_use]
    pub const fn entry(delay_ms: u32) -> Self {
        Self {
            to: Pose::Visible,
            duration_ms: ENTRY_DURATION_MS,
            delay_ms,
        }
    }

    #[must_use]
    pub const fn exit() -> Self {
        Self {
            to: Pose::Leaving,
            duration_ms: EXIT_DURATION_MS,
            delay_ms: 0,
        }
    }
}

/// Options for viewport-entry observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: f32,
    pub root_margin_px: u32,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            threshold: VISIBILITY_THRESHOLD,
            root_margin_px: VISIBILITY_ROOT_MARGIN_PX,
        }
    }
}

/// Classes and attributes applied to the grid container on mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDecoration {
    pub classes: SmallVec<[String; 2]>,
    pub column_template: Option<String>,
    pub role: &'static str,
    pub aria_label: &'static str,
}

/// Placeholder shown when nothing is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: &'static str,
    pub hint: &'static str,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            icon: EMPTY_STATE_ICON,
            title: EMPTY_STATE_TITLE,
            hint: EMPTY_STATE_HINT,
        }
    }
}

/// Primitives the host environment supplies to the catalog engine.
pub trait ViewSurface {
    /// Opaque handle to one rendered card.
    type Node: Clone + fmt::Debug;

    /// Locate the grid container. `false` means it does not exist.
    fn resolve_container(&mut self, container_id: &str) -> bool;

    fn decorate_container(&mut self, decoration: &GridDecoration);

    fn undecorate_container(&mut self, decoration: &GridDecoration);

    /// Build a detached card subtree from its description.
    fn create_card(&mut self, view: &CardView) -> Self::Node;

    /// Attach a card at the end of the grid.
    fn append_card(&mut self, node: &Self::Node);

    /// Attach a card immediately before the attached card `anchor`.
    fn insert_card_before(&mut self, node: &Self::Node, anchor: &Self::Node);

    fn patch_card(&mut self, node: &Self::Node, patch: &CardPatch);

    fn animate_card(&mut self, node: &Self::Node, motion: &Motion);

    /// Detach a card, playing `exit` first.
    fn remove_card(&mut self, node: &Self::Node, exit: &Motion);

    /// Toggle the hover lift (`product-card--hover`).
    fn set_hover(&mut self, node: &Self::Node, hovered: bool);

    /// Start reporting when `node` enters the viewport.
    fn observe_entry(&mut self, node: &Self::Node, options: &VisibilityOptions);

    fn unobserve(&mut self, node: &Self::Node);

    /// Drop every card from the container.
    fn clear(&mut self);

    fn show_empty_state(&mut self, empty: &EmptyState);

    fn hide_empty_state(&mut self);
}
