//! Static product sources embedded at build time.
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::product::{ProductDraft, Theme};

const FEATURED_DATA: &str = include_str!("../data/featured.json");
const FUNERAL_DATA: &str = include_str!("../data/funeral.json");

#[derive(Debug, Error)]
pub enum CatalogDataError {
    #[error("failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("series {category:?} lists the same file twice: {file:?}")]
    DuplicateFile { category: String, file: String },
}

/// A run of products sharing a category, generated from image file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeries {
    pub category: String,
    pub id_prefix: String,
    pub name_base: String,
    pub description: String,
    pub image_dir: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default = "ProductSeries::default_theme")]
    pub theme: Theme,
}

impl ProductSeries {
    const fn default_theme() -> Theme {
        Theme::Funeral
    }

    /// One draft per file, numbered from 1. Names carry the number only when
    /// the series has more than one entry.
    #[must_use]
    pub fn generate(&self) -> Vec<ProductDraft> {
        let numbered = self.files.len() > 1;
        self.files
            .iter()
            .enumerate()
            .map(|(idx, file)| {
                let n = idx + 1;
                let name = if numbered {
                    format!("{} {n}", self.name_base)
                } else {
                    self.name_base.clone()
                };
                ProductDraft::named(name)
                    .with_id(format!("{}{n}", self.id_prefix))
                    .with_category(self.category.clone())
                    .with_description(self.description.clone())
                    .with_image(format!("{}{file}", self.image_dir))
                    .with_theme(self.theme)
            })
            .collect()
    }

    fn validate(&self) -> Result<(), CatalogDataError> {
        for (idx, file) in self.files.iter().enumerate() {
            if self.files[..idx].contains(file) {
                return Err(CatalogDataError::DuplicateFile {
                    category: self.category.clone(),
                    file: file.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryName {
    pub id: String,
    pub label: String,
}

/// Funeral gallery source: generated series, hand-written specials and
/// friendly category names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuneralCatalog {
    #[serde(default)]
    pub series: Vec<ProductSeries>,
    #[serde(default)]
    pub specials: Vec<ProductDraft>,
    #[serde(default)]
    pub category_names: Vec<CategoryName>,
}

impl FuneralCatalog {
    /// Parse a funeral catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a series repeats a file.
    pub fn from_json(json: &str) -> Result<Self, CatalogDataError> {
        let catalog: Self = serde_json::from_str(json)?;
        for series in &catalog.series {
            series.validate()?;
        }
        Ok(catalog)
    }

    /// Every series in order, followed by the specials.
    #[must_use]
    pub fn products(&self) -> Vec<ProductDraft> {
        self.series
            .iter()
            .flat_map(ProductSeries::generate)
            .chain(self.specials.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn display_name(&self, category: &str) -> Option<&str> {
        self.category_names
            .iter()
            .find(|c| c.id == category)
            .map(|c| c.label.as_str())
    }
}

/// Parse a plain product list.
///
/// # Errors
///
/// Returns an error if the JSON is malformed.
pub fn products_from_json(json: &str) -> Result<Vec<ProductDraft>, CatalogDataError> {
    Ok(serde_json::from_str(json)?)
}

/// Featured storefront products.
#[must_use]
pub fn featured_products() -> &'static [ProductDraft] {
    static FEATURED: OnceLock<Vec<ProductDraft>> = OnceLock::new();
    FEATURED.get_or_init(|| {
        products_from_json(FEATURED_DATA).unwrap_or_else(|err| {
            log::error!("embedded featured products unreadable: {err}");
            Vec::new()
        })
    })
}

/// Funeral gallery catalog.
#[must_use]
pub fn funeral_catalog() -> &'static FuneralCatalog {
    static FUNERAL: OnceLock<FuneralCatalog> = OnceLock::new();
    FUNERAL.get_or_init(|| {
        FuneralCatalog::from_json(FUNERAL_DATA).unwrap_or_else(|err| {
            log::error!("embedded funeral catalog unreadable: {err}");
            FuneralCatalog::default()
        })
    })
}
