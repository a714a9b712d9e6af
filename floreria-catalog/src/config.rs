//! Grid configuration with serde defaults and validation.
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::{
    DEFAULT_ANIMATION_DELAY_MS, GRID_ARIA_LABEL, GRID_CLASS, GRID_ROLE, MAX_ANIMATION_DELAY_MS,
};
use crate::product::{ProductDraft, Theme};
use crate::view::GridDecoration;

/// Stagger steps after which later cards share the same entry delay.
const MAX_STAGGER_STEPS: u32 = 6;

/// Column layout of the grid container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GridColumns {
    /// Leave the stylesheet in charge.
    #[default]
    Auto,
    /// Explicit `grid-template-columns` value.
    Template(String),
}

impl From<String> for GridColumns {
    fn from(value: String) -> Self {
        if value.is_empty() || value == "auto" {
            Self::Auto
        } else {
            Self::Template(value)
        }
    }
}

impl From<GridColumns> for String {
    fn from(columns: GridColumns) -> Self {
        match columns {
            GridColumns::Auto => "auto".to_string(),
            GridColumns::Template(template) => template,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    /// Reveal cards on viewport entry instead of immediately.
    #[serde(default = "GridOptions::default_lazy_loading")]
    pub enable_lazy_loading: bool,
    /// Per-card stagger applied to entry animations.
    #[serde(default = "GridOptions::default_animation_delay_ms")]
    pub animation_delay_ms: u32,
    #[serde(default)]
    pub grid_columns: GridColumns,
}

impl GridOptions {
    const fn default_lazy_loading() -> bool {
        true
    }

    const fn default_animation_delay_ms() -> u32 {
        DEFAULT_ANIMATION_DELAY_MS
    }

    /// Entry delay for the card rendered at `index` within one render pass.
    #[must_use]
    pub fn stagger_delay_ms(&self, index: usize) -> u32 {
        let steps = u32::try_from(index).unwrap_or(u32::MAX).min(MAX_STAGGER_STEPS);
        steps.saturating_mul(self.animation_delay_ms)
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            enable_lazy_loading: Self::default_lazy_loading(),
            animation_delay_ms: Self::default_animation_delay_ms(),
            grid_columns: GridColumns::Auto,
        }
    }
}

/// Errors raised when grid configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogConfigError {
    #[error("container id must not be empty")]
    EmptyContainerId,
    #[error("animation delay must be at most {max}ms (got {value}ms)")]
    AnimationDelayTooLarge { value: u32, max: u32 },
    #[error("grid column template must not be blank")]
    BlankGridTemplate,
    #[error("product id {id:?} appears more than once")]
    DuplicateProductId { id: String },
}

/// Errors raised while loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to parse catalog config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog config: {0}")]
    Invalid(#[from] CatalogConfigError),
}

/// Everything a grid needs at mount time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub container_id: String,
    #[serde(default)]
    pub products: Vec<ProductDraft>,
    /// Theme applied to products that carry none.
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub options: GridOptions,
}

impl CatalogConfig {
    #[must_use]
    pub fn new(container_id: impl Into<String>, products: Vec<ProductDraft>) -> Self {
        Self {
            container_id: container_id.into(),
            products,
            theme: Theme::Default,
            options: GridOptions::default(),
        }
    }

    /// Storefront grid: default theme, meant for quick-view and cart hooks.
    #[must_use]
    pub fn flower_shop(container_id: impl Into<String>, products: Vec<ProductDraft>) -> Self {
        Self::new(container_id, products)
    }

    /// Funeral gallery grid: funeral theme, meant for quick-view and contact hooks.
    #[must_use]
    pub fn funeral_gallery(container_id: impl Into<String>, products: Vec<ProductDraft>) -> Self {
        Self::new(container_id, products).with_theme(Theme::Funeral)
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CatalogConfigError> {
        if self.container_id.trim().is_empty() {
            return Err(CatalogConfigError::EmptyContainerId);
        }
        if self.options.animation_delay_ms > MAX_ANIMATION_DELAY_MS {
            return Err(CatalogConfigError::AnimationDelayTooLarge {
                value: self.options.animation_delay_ms,
                max: MAX_ANIMATION_DELAY_MS,
            });
        }
        if let GridColumns::Template(template) = &self.options.grid_columns
            && template.trim().is_empty()
        {
            return Err(CatalogConfigError::BlankGridTemplate);
        }
        let mut seen = HashSet::new();
        for id in self
            .products
            .iter()
            .filter_map(|draft| draft.id.as_deref())
            .filter(|id| !id.is_empty())
        {
            if !seen.insert(id) {
                return Err(CatalogConfigError::DuplicateProductId { id: id.to_string() });
            }
        }
        Ok(())
    }

    /// Container decoration for this grid.
    #[must_use]
    pub fn decoration(&self) -> GridDecoration {
        GridDecoration {
            classes: smallvec![
                GRID_CLASS.to_string(),
                format!("{GRID_CLASS}--{}", self.theme.as_str()),
            ],
            column_template: match &self.options.grid_columns {
                GridColumns::Auto => None,
                GridColumns::Template(template) => Some(template.clone()),
            },
            role: GRID_ROLE,
            aria_label: GRID_ARIA_LABEL,
        }
    }
}
