//! Gallery page: one catalog grid, one lightbox and the category filter bar.
//!
//! Both collaborators are injected; the gallery routes quick-view clicks from
//! the grid into the lightbox itself instead of through a shared global.
use crate::card::{CardActions, CardControl, ClickOutcome};
use crate::catalog::CatalogController;
use crate::constants::ALL_CATEGORIES;
use crate::data::FuneralCatalog;
use crate::modal::{KeyOutcome, ModalKey, ModalNavigator, Navigation, OverlayTarget};
use crate::product::Product;
use crate::view::ViewSurface;

pub const ALL_CATEGORIES_LABEL: &str = "Todos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub category: String,
    pub label: String,
    pub active: bool,
}

impl FilterButton {
    #[must_use]
    pub fn new(category: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            active: false,
        }
    }
}

/// "Todos" followed by one button per named category.
#[must_use]
pub fn filter_buttons(catalog: &FuneralCatalog) -> Vec<FilterButton> {
    std::iter::once(FilterButton::new(ALL_CATEGORIES, ALL_CATEGORIES_LABEL))
        .chain(
            catalog
                .category_names
                .iter()
                .map(|c| FilterButton::new(c.id.clone(), c.label.clone())),
        )
        .collect()
}

/// Grid actions for a gallery: a quick-view control that the gallery routes
/// into its lightbox, plus the caller's contact hook.
#[must_use]
pub fn gallery_actions<N: 'static>(
    on_contact: impl Fn(&Product, &N) + 'static,
) -> CardActions<N> {
    CardActions::new()
        .with_quick_view(|product: &Product, _node: &N| {
            log::debug!("quick view requested for {:?}", product.id);
        })
        .with_contact(on_contact)
}

pub struct Gallery<V: ViewSurface> {
    catalog: CatalogController<V>,
    modal: ModalNavigator,
    buttons: Vec<FilterButton>,
    active_filter: String,
}

impl<V> Gallery<V>
where
    V: ViewSurface,
    V::Node: 'static,
{
    /// Starts on the "all" filter.
    pub fn new(
        catalog: CatalogController<V>,
        modal: ModalNavigator,
        buttons: Vec<FilterButton>,
    ) -> Self {
        let mut gallery = Self {
            catalog,
            modal,
            buttons,
            active_filter: ALL_CATEGORIES.to_string(),
        };
        gallery.mark_active();
        log::info!("gallery ready: {:?}", gallery.catalog.stats());
        gallery
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogController<V> {
        &self.catalog
    }

    pub const fn catalog_mut(&mut self) -> &mut CatalogController<V> {
        &mut self.catalog
    }

    #[must_use]
    pub const fn modal(&self) -> &ModalNavigator {
        &self.modal
    }

    #[must_use]
    pub fn buttons(&self) -> &[FilterButton] {
        &self.buttons
    }

    #[must_use]
    pub fn active_filter(&self) -> &str {
        &self.active_filter
    }

    /// Activate a category filter on both the button bar and the grid.
    pub fn filter(&mut self, category: &str) {
        self.active_filter = category.to_string();
        self.mark_active();
        self.catalog.set_filter(category);
    }

    /// External deep link to a category. Only categories with a button apply.
    pub fn show_category(&mut self, category: &str) -> bool {
        if self.buttons.iter().any(|b| b.category == category) {
            self.filter(category);
            true
        } else {
            log::debug!("no filter button for category {category:?}");
            false
        }
    }

    /// Open the lightbox on `id` over the grid's current visible set.
    pub fn quick_view(&mut self, id: &str) -> Option<&Product> {
        let sequence: Vec<Product> = self.catalog.visible().into_iter().cloned().collect();
        self.modal.open(sequence, id)
    }

    /// Route a card click; a quick-view click opens the lightbox.
    pub fn click(&mut self, id: &str, target: CardControl) -> Option<ClickOutcome> {
        let outcome = self.catalog.click(id, target)?;
        if outcome.invoked == Some(CardControl::QuickView) {
            self.quick_view(id);
        }
        Some(outcome)
    }

    pub fn next(&mut self) -> Navigation {
        self.modal.next()
    }

    pub fn prev(&mut self) -> Navigation {
        self.modal.prev()
    }

    pub fn close(&mut self) -> bool {
        self.modal.close()
    }

    /// The lightbox contact button: fire the grid's contact hook for the
    /// product currently shown. The lightbox stays open.
    pub fn contact_current(&self) -> bool {
        self.modal
            .current()
            .is_some_and(|product| self.catalog.contact(product))
    }

    pub fn handle_key(&mut self, key: ModalKey) -> KeyOutcome {
        self.modal.handle_key(key)
    }

    pub fn overlay_click(&mut self, target: OverlayTarget) -> bool {
        self.modal.overlay_click(target)
    }

    /// Tear down the grid and close the lightbox.
    pub fn teardown(&mut self) {
        self.modal.close();
        self.catalog.teardown();
    }

    fn mark_active(&mut self) {
        for button in &mut self.buttons {
            button.active = button.category == self.active_filter;
        }
    }
}
