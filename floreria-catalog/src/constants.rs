//! Shared constants for the catalog engine.

/// Filter sentinel that clears the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Substituted when an ingested product has no name.
pub const DEFAULT_PRODUCT_NAME: &str = "Producto sin nombre";
/// Substituted when an ingested product has no image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x300?text=Sin+Imagen";

pub const GENERATED_ID_PREFIX: &str = "product_";
pub const GENERATED_ID_LEN: usize = 9;
pub(crate) const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// Upper bound on redraws before the generator widens the token.
pub(crate) const ID_MAX_ATTEMPTS: usize = 16;

// Grid
pub const GRID_CLASS: &str = "product-grid";
pub const GRID_ROLE: &str = "grid";
pub const GRID_ARIA_LABEL: &str = "Productos disponibles";
pub const DEFAULT_ANIMATION_DELAY_MS: u32 = 100;
pub const MAX_ANIMATION_DELAY_MS: u32 = 5_000;

// Card
pub const CARD_CLASS: &str = "product-card";
pub const CARD_HOVER_CLASS: &str = "product-card--hover";
pub const QUICK_VIEW_LABEL: &str = "Vista Rápida";
pub const CONTACT_LABEL: &str = "Contactanos";
pub const PURCHASE_LABEL: &str = "COMPRAR";
pub const CONSULT_LABEL: &str = "CONSULTAR";
pub const PRICE_SYMBOL: &str = "$";

// Entry / exit motion
pub const ENTRY_OFFSET_PX: i32 = 20;
pub const ENTRY_DURATION_MS: u32 = 600;
pub const EXIT_OFFSET_PX: i32 = -20;
pub const EXIT_DURATION_MS: u32 = 300;
pub const VISIBILITY_THRESHOLD: f32 = 0.1;
pub const VISIBILITY_ROOT_MARGIN_PX: u32 = 50;

// Empty state
pub const EMPTY_STATE_ICON: &str = "🌸";
pub const EMPTY_STATE_TITLE: &str = "No se encontraron productos";
pub const EMPTY_STATE_HINT: &str = "Intenta con otros criterios de búsqueda";
