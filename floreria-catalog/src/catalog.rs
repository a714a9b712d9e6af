//! Catalog controller: source-of-truth product list plus synchronized view state.
//!
//! The controller owns the products, the active [`ViewQuery`] and an index
//! of rendered cards. Every mutation keeps the rendered cards equal to the
//! visible set; the visible set itself is never cached.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::card::{
    BoundActions, CardActions, CardControl, CardPatch, ClickOutcome, EntryState, dispatch_click,
    render_card,
};
use crate::config::{CatalogConfig, CatalogConfigError, GridOptions};
use crate::filter::{CategoryFilter, SearchTerm, ViewQuery};
use crate::product::{IdGenerator, Product, ProductDraft, ProductPatch, Theme};
use crate::view::{EmptyState, GridDecoration, Motion, ViewSurface, VisibilityOptions};

/// Reported once when a grid cannot attach to its host container.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountError {
    #[error("container with id {container_id:?} not found; grid will not render")]
    ContainerMissing { container_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Mounted,
    /// Container missing at mount; state is tracked but nothing renders.
    Detached,
    TornDown,
}

/// A card currently attached to the host view.
#[derive(Debug, Clone)]
pub struct RenderedCard<N> {
    pub node: N,
    pub entry: EntryState,
    pub hovered: bool,
    /// Position in the visible set when the card was rendered; drives the stagger.
    pub render_index: usize,
    /// Actions the card's controls were rendered for.
    pub bound: BoundActions,
}

/// Grid-level update event routed by [`CatalogController::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogUpdate {
    Add {
        data: ProductDraft,
    },
    Remove {
        #[serde(rename = "productId")]
        product_id: String,
    },
    Update {
        #[serde(rename = "productId")]
        product_id: String,
        data: ProductPatch,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_products: usize,
    pub filtered_products: usize,
    pub categories: usize,
    pub current_filter: Option<String>,
    pub current_search: String,
}

pub struct CatalogController<V: ViewSurface> {
    surface: V,
    container_id: String,
    theme: Theme,
    options: GridOptions,
    decoration: GridDecoration,
    products: Vec<Product>,
    query: ViewQuery,
    rendered: HashMap<String, RenderedCard<V::Node>>,
    actions: CardActions<V::Node>,
    product_actions: HashMap<String, CardActions<V::Node>>,
    ids: IdGenerator,
    mount: MountState,
    empty_shown: bool,
}

impl<V> CatalogController<V>
where
    V: ViewSurface,
    V::Node: 'static,
{
    /// Mount a grid with entropy-seeded id generation.
    pub fn mount(config: CatalogConfig, actions: CardActions<V::Node>, surface: V) -> Self {
        Self::mount_with_ids(config, actions, surface, IdGenerator::from_entropy())
    }

    /// Mount a grid: ingest products, attach to the container, render.
    ///
    /// A missing container is reported once and leaves the controller
    /// detached: every state operation still works, nothing is rendered.
    pub fn mount_with_ids(
        mut config: CatalogConfig,
        actions: CardActions<V::Node>,
        mut surface: V,
        mut ids: IdGenerator,
    ) -> Self {
        match config.validate() {
            Err(
                err @ (CatalogConfigError::AnimationDelayTooLarge { .. }
                | CatalogConfigError::BlankGridTemplate),
            ) => {
                log::warn!("{err}; continuing with default grid options");
                config.options = GridOptions::default();
            }
            Err(err) => log::warn!("{err}"),
            Ok(()) => {}
        }

        let mut products: Vec<Product> = Vec::with_capacity(config.products.len());
        let mut taken: HashSet<String> = HashSet::with_capacity(config.products.len());
        for draft in config.products.drain(..) {
            let product = draft.normalize(config.theme, &mut ids, |id| taken.contains(id));
            taken.insert(product.id.clone());
            products.push(product);
        }

        let mount = if surface.resolve_container(&config.container_id) {
            MountState::Mounted
        } else {
            let err = MountError::ContainerMissing {
                container_id: config.container_id.clone(),
            };
            log::error!("{err}");
            MountState::Detached
        };

        let mut controller = Self {
            decoration: config.decoration(),
            surface,
            container_id: config.container_id,
            theme: config.theme,
            options: config.options,
            products,
            query: ViewQuery::default(),
            rendered: HashMap::new(),
            actions,
            product_actions: HashMap::new(),
            ids,
            mount,
            empty_shown: false,
        };

        if controller.is_mounted() {
            controller.surface.decorate_container(&controller.decoration);
            controller.render();
            log::debug!(
                "grid {:?} mounted with {} products",
                controller.container_id,
                controller.products.len()
            );
        }
        controller
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mount == MountState::Mounted
    }

    #[must_use]
    pub const fn mount_state(&self) -> MountState {
        self.mount
    }

    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub const fn options(&self) -> &GridOptions {
        &self.options
    }

    #[must_use]
    pub const fn surface(&self) -> &V {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn query(&self) -> &ViewQuery {
        &self.query
    }

    #[must_use]
    pub fn empty_state_shown(&self) -> bool {
        self.empty_shown
    }

    /// Visible set, computed fresh from the current filter and search.
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        self.query.select(&self.products)
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn rendered_card(&self, id: &str) -> Option<&RenderedCard<V::Node>> {
        self.rendered.get(id)
    }

    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_products: self.products.len(),
            filtered_products: self.visible().len(),
            categories: self.categories().len(),
            current_filter: self.query.filter.label().map(str::to_string),
            current_search: self.query.search.as_str().to_string(),
        }
    }

    /// Set the category filter (`"all"` clears it) and re-render.
    pub fn set_filter(&mut self, filter: impl Into<CategoryFilter>) {
        self.query.filter = filter.into();
        log::debug!("filter set to {:?}", self.query.filter.label());
        self.render();
    }

    /// Set the search term (empty clears it) and re-render.
    pub fn set_search(&mut self, term: &str) {
        self.query.search = SearchTerm::new(term);
        log::debug!("search set to {term:?}");
        self.render();
    }

    /// Append a product and return its id.
    ///
    /// The card is rendered on its own, without a full re-render, when the
    /// product passes the active filter and search.
    pub fn add(&mut self, draft: ProductDraft) -> String {
        let product = {
            let products = &self.products;
            draft.normalize(self.theme, &mut self.ids, |id| {
                products.iter().any(|p| p.id == id)
            })
        };
        let id = product.id.clone();
        let admitted = self.query.admits(&product);
        self.products.push(product);

        if self.is_mounted() && admitted {
            self.attach_admitted(self.products.len() - 1);
            self.hide_empty_state();
        }
        id
    }

    /// Remove a product. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            log::debug!("remove: no product with id {id:?}");
        }
        self.product_actions.remove(id);
        self.evict_card(id);
        if self.visible().is_empty() {
            self.show_empty_state();
        }
    }

    /// Merge `patch` into a product. Unknown ids are ignored.
    ///
    /// A live card receives only the changed fields. If the change moves the
    /// product in or out of the visible set, its card is added or evicted.
    pub fn update(&mut self, id: &str, patch: &ProductPatch) {
        let Some(position) = self.products.iter().position(|p| p.id == id) else {
            log::debug!("update: no product with id {id:?}");
            return;
        };
        let changed = patch.apply_to(&mut self.products[position]);
        if changed.is_empty() || !self.is_mounted() {
            return;
        }

        let admitted = self.query.admits(&self.products[position]);
        match (self.rendered.contains_key(id), admitted) {
            (true, true) => {
                if let Some(card) = self.rendered.get(id)
                    && let Some(card_patch) =
                        CardPatch::for_changes(&self.products[position], &changed, card.bound)
                {
                    self.surface.patch_card(&card.node, &card_patch);
                }
            }
            (true, false) => {
                self.evict_card(id);
                if self.visible().is_empty() {
                    self.show_empty_state();
                }
            }
            (false, true) => {
                self.attach_admitted(position);
                self.hide_empty_state();
            }
            (false, false) => {}
        }
    }

    /// Route a grid update event.
    pub fn apply(&mut self, update: CatalogUpdate) {
        match update {
            CatalogUpdate::Add { data } => {
                self.add(data);
            }
            CatalogUpdate::Remove { product_id } => self.remove(&product_id),
            CatalogUpdate::Update { product_id, data } => self.update(&product_id, &data),
        }
    }

    /// Bind actions for one product on top of the grid-wide ones.
    ///
    /// Takes effect the next time that product's card is rendered; until then
    /// clicks only reach the controls the live card already shows.
    pub fn set_product_actions(&mut self, id: &str, actions: CardActions<V::Node>) {
        if self.product(id).is_none() {
            log::debug!("set_product_actions: no product with id {id:?}");
            return;
        }
        self.product_actions.insert(id.to_string(), actions);
    }

    /// Clear the grid and render every visible product.
    pub fn render(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.surface.clear();
        self.rendered.clear();
        self.empty_shown = false;

        let positions: Vec<usize> = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| self.query.admits(p))
            .map(|(position, _)| position)
            .collect();

        if positions.is_empty() {
            self.show_empty_state();
            return;
        }
        for (index, position) in positions.into_iter().enumerate() {
            self.render_card_at(position, index, None);
        }
        log::debug!("rendered {} cards", self.rendered.len());
    }

    /// Route a click on one card's control.
    ///
    /// Only controls the card was rendered with fire; anything else falls
    /// through to the card body. Returns `None` for ids without a live card.
    pub fn click(&self, id: &str, target: CardControl) -> Option<ClickOutcome> {
        let card = self.rendered.get(id)?;
        let product = self.products.iter().find(|p| p.id == id)?;
        let actions = self.actions_for(id).restricted_to(card.bound);
        Some(dispatch_click(&actions, product, &card.node, target))
    }

    /// Fire the contact hook for `product` outside its card, e.g. from a lightbox.
    ///
    /// The hook receives the product as given and the node of its live card.
    /// Returns `false` when the product has no live card or no contact hook.
    pub fn contact(&self, product: &Product) -> bool {
        let Some(card) = self.rendered.get(&product.id) else {
            log::debug!("contact: no live card for {:?}", product.id);
            return false;
        };
        let actions = self.actions_for(&product.id);
        match actions.callback(CardControl::Contact) {
            Some(callback) => {
                callback(product, &card.node);
                true
            }
            None => false,
        }
    }

    pub fn pointer_enter(&mut self, id: &str) {
        self.set_hover(id, true);
    }

    pub fn pointer_leave(&mut self, id: &str) {
        self.set_hover(id, false);
    }

    /// Host callback: the card for `id` entered the viewport.
    ///
    /// Plays the entry animation the first time and stops observing.
    /// Returns whether an animation started.
    pub fn card_entered_viewport(&mut self, id: &str) -> bool {
        let Some(card) = self.rendered.get_mut(id) else {
            return false;
        };
        if !card.entry.reveal() {
            return false;
        }
        let motion = Motion::entry(self.options.stagger_delay_ms(card.render_index));
        self.surface.animate_card(&card.node, &motion);
        self.surface.unobserve(&card.node);
        true
    }

    /// Release everything this controller created in the host view.
    pub fn teardown(&mut self) {
        if self.is_mounted() {
            for card in self.rendered.values() {
                self.surface.unobserve(&card.node);
            }
            self.surface.clear();
            self.surface.hide_empty_state();
            self.surface.undecorate_container(&self.decoration);
            log::debug!("grid {:?} torn down", self.container_id);
        }
        self.rendered.clear();
        self.empty_shown = false;
        self.mount = MountState::TornDown;
    }

    fn actions_for(&self, id: &str) -> CardActions<V::Node> {
        match self.product_actions.get(id) {
            Some(local) => self.actions.merged(local),
            None => self.actions.clone(),
        }
    }

    /// Render one newly admitted product in front of the next live card in
    /// catalog order, so the grid keeps matching the visible set.
    fn attach_admitted(&mut self, position: usize) {
        let render_index = self.products[..position]
            .iter()
            .filter(|p| self.query.admits(p))
            .count();
        let anchor = self.products[position + 1..]
            .iter()
            .find_map(|p| self.rendered.get(&p.id))
            .map(|card| card.node.clone());
        self.render_card_at(position, render_index, anchor.as_ref());
    }

    fn render_card_at(&mut self, position: usize, render_index: usize, anchor: Option<&V::Node>) {
        let product = &self.products[position];
        let bound = self.actions_for(&product.id).bound();
        let view = render_card(product, bound);
        let id = product.id.clone();

        let node = self.surface.create_card(&view);
        match anchor {
            Some(anchor) => self.surface.insert_card_before(&node, anchor),
            None => self.surface.append_card(&node),
        }
        let mut card = RenderedCard {
            node,
            entry: EntryState::Pending,
            hovered: false,
            render_index,
            bound,
        };
        if self.options.enable_lazy_loading {
            self.surface
                .observe_entry(&card.node, &VisibilityOptions::default());
        } else {
            card.entry.reveal();
            let motion = Motion::entry(self.options.stagger_delay_ms(render_index));
            self.surface.animate_card(&card.node, &motion);
        }
        self.rendered.insert(id, card);
    }

    fn evict_card(&mut self, id: &str) {
        if let Some(card) = self.rendered.remove(id)
            && self.is_mounted()
        {
            self.surface.unobserve(&card.node);
            self.surface.remove_card(&card.node, &Motion::exit());
        }
    }

    fn set_hover(&mut self, id: &str, hovered: bool) {
        if let Some(card) = self.rendered.get_mut(id)
            && card.hovered != hovered
        {
            card.hovered = hovered;
            self.surface.set_hover(&card.node, hovered);
        }
    }

    fn show_empty_state(&mut self) {
        if self.is_mounted() && !self.empty_shown {
            self.surface.show_empty_state(&EmptyState::default());
            self.empty_shown = true;
        }
    }

    fn hide_empty_state(&mut self) {
        if self.is_mounted() && self.empty_shown {
            self.surface.hide_empty_state();
            self.empty_shown = false;
        }
    }
}
