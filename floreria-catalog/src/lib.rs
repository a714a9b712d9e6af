//! Floreria Catalog Engine
//!
//! Platform-agnostic view-state logic for the Floreria storefront: a product
//! grid controller, a pure card renderer and a lightbox navigator.
//! Hosts attach it to a real view through [`ViewSurface`].

pub mod card;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod data;
pub mod filter;
pub mod gallery;
pub mod headless;
pub mod modal;
pub mod product;
pub mod view;

// Re-export commonly used types
pub use card::{
    BoundActions, CardActions, CardCallback, CardControl, CardPatch, CardView, ClickOutcome,
    ControlView, EntryState, PrimaryAction, Propagation, dispatch_click, render_card,
    select_primary_action,
};
pub use catalog::{
    CatalogController, CatalogStats, CatalogUpdate, MountError, MountState, RenderedCard,
};
pub use config::{CatalogConfig, CatalogConfigError, ConfigLoadError, GridColumns, GridOptions};
pub use data::{
    CatalogDataError, CategoryName, FuneralCatalog, ProductSeries, featured_products,
    funeral_catalog, products_from_json,
};
pub use filter::{CategoryFilter, SearchTerm, ViewQuery};
pub use gallery::{FilterButton, Gallery, filter_buttons, gallery_actions};
pub use headless::{HeadlessCard, HeadlessSurface, NodeId, SurfaceEvent};
pub use modal::{
    KeyOutcome, ModalKey, ModalNavigator, ModalSession, ModalState, ModalView, NavButtons,
    Navigation, OverlayTarget, nav_buttons,
};
pub use product::{
    ChangedFields, IdGenerator, Product, ProductDraft, ProductField, ProductPatch, Theme,
};
pub use view::{EmptyState, GridDecoration, Motion, Pose, ViewSurface, VisibilityOptions};
