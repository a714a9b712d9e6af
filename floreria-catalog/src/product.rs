//! Product records, ingestion defaults and partial updates.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::constants::{
    DEFAULT_PRODUCT_NAME, GENERATED_ID_LEN, GENERATED_ID_PREFIX, ID_ALPHABET, ID_MAX_ATTEMPTS,
    PLACEHOLDER_IMAGE_URL,
};

/// Visual theme of a card or grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Funeral,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Funeral => "funeral",
        }
    }
}

/// A normalized catalog entry. Every field a card needs is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Option<String>,
    pub category: Option<String>,
    pub theme: Theme,
    pub alt_text: String,
    /// Inline style declarations applied to the card root, keyed by property.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_styles: BTreeMap<String, String>,
}

/// Fields of a product that a partial update can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Description,
    Image,
    Price,
    Category,
    Theme,
    AltText,
}

pub type ChangedFields = SmallVec<[ProductField; 4]>;

/// Ingestion shape of a product: anything may be missing.
///
/// Missing or empty fields are replaced with documented defaults by
/// [`ProductDraft::normalize`]; ingestion never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub custom_styles: BTreeMap<String, String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ProductDraft {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }

    /// Normalize into a [`Product`].
    ///
    /// A missing id, or one for which `is_taken` returns true, is replaced by a
    /// fresh token from `ids`. `fallback_theme` applies when the draft has no
    /// theme of its own.
    pub fn normalize<F>(self, fallback_theme: Theme, ids: &mut IdGenerator, is_taken: F) -> Product
    where
        F: Fn(&str) -> bool,
    {
        let id = match present(self.id) {
            Some(id) if !is_taken(&id) => id,
            Some(id) => {
                let fresh = ids.generate(&is_taken);
                log::warn!("product id {id:?} already in catalog; reassigned to {fresh:?}");
                fresh
            }
            None => ids.generate(&is_taken),
        };

        let name = present(self.name).unwrap_or_else(|| {
            log::warn!("product {id:?} has no name; using {DEFAULT_PRODUCT_NAME:?}");
            DEFAULT_PRODUCT_NAME.to_string()
        });
        let image = present(self.image).unwrap_or_else(|| {
            log::debug!("product {id:?} has no image; using placeholder");
            PLACEHOLDER_IMAGE_URL.to_string()
        });
        let alt_text = present(self.alt_text).unwrap_or_else(|| name.clone());

        Product {
            id,
            name,
            description: self.description.unwrap_or_default(),
            image,
            price: present(self.price),
            category: present(self.category),
            theme: self.theme.unwrap_or(fallback_theme),
            alt_text,
            custom_styles: self.custom_styles,
        }
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: Some(product.name),
            description: Some(product.description),
            image: Some(product.image),
            price: product.price,
            category: product.category,
            theme: Some(product.theme),
            alt_text: Some(product.alt_text),
            custom_styles: product.custom_styles,
        }
    }
}

/// Partial update merged into an existing product. `id` is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

fn merge_text(slot: &mut String, value: Option<&String>) -> bool {
    match value {
        Some(value) if slot != value => {
            slot.clone_from(value);
            true
        }
        _ => false,
    }
}

fn merge_optional(slot: &mut Option<String>, value: Option<&String>) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(value) => {
            *slot = Some(value.clone());
            true
        }
        _ => false,
    }
}

impl ProductPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the present fields into `product`, returning which ones changed.
    pub fn apply_to(&self, product: &mut Product) -> ChangedFields {
        let mut changed = ChangedFields::new();
        if merge_text(&mut product.name, self.name.as_ref()) {
            changed.push(ProductField::Name);
        }
        if merge_text(&mut product.description, self.description.as_ref()) {
            changed.push(ProductField::Description);
        }
        if merge_text(&mut product.image, self.image.as_ref()) {
            changed.push(ProductField::Image);
        }
        if merge_optional(&mut product.price, self.price.as_ref()) {
            changed.push(ProductField::Price);
        }
        if merge_optional(&mut product.category, self.category.as_ref()) {
            changed.push(ProductField::Category);
        }
        if let Some(theme) = self.theme
            && theme != product.theme
        {
            product.theme = theme;
            changed.push(ProductField::Theme);
        }
        if merge_text(&mut product.alt_text, self.alt_text.as_ref()) {
            changed.push(ProductField::AltText);
        }
        changed
    }
}

/// Source of random product id tokens.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: ChaCha20Rng,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IdGenerator {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn token(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())]))
            .collect()
    }

    /// Draw a `product_` token that `is_taken` rejects for none of its attempts.
    pub fn generate<F>(&mut self, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let mut len = GENERATED_ID_LEN;
        loop {
            for _ in 0..ID_MAX_ATTEMPTS {
                let id = format!("{GENERATED_ID_PREFIX}{}", self.token(len));
                if !is_taken(&id) {
                    return id;
                }
            }
            len += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn normalize(draft: ProductDraft) -> Product {
        draft.normalize(Theme::Default, &mut IdGenerator::seeded(1), |_| false)
    }

    #[test]
    fn missing_fields_get_documented_defaults() {
        let product = normalize(ProductDraft::default());
        assert!(product.id.starts_with(GENERATED_ID_PREFIX));
        assert_eq!(product.id.len(), GENERATED_ID_PREFIX.len() + GENERATED_ID_LEN);
        assert_eq!(product.name, DEFAULT_PRODUCT_NAME);
        assert_eq!(product.description, "");
        assert_eq!(product.image, PLACEHOLDER_IMAGE_URL);
        assert_eq!(product.price, None);
        assert_eq!(product.category, None);
        assert_eq!(product.theme, Theme::Default);
        assert_eq!(product.alt_text, DEFAULT_PRODUCT_NAME);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let draft = ProductDraft {
            id: Some(String::new()),
            name: Some(String::new()),
            price: Some(String::new()),
            category: Some(String::new()),
            ..ProductDraft::default()
        };
        let product = normalize(draft);
        assert!(product.id.starts_with(GENERATED_ID_PREFIX));
        assert_eq!(product.name, DEFAULT_PRODUCT_NAME);
        assert!(product.price.is_none());
        assert!(product.category.is_none());
    }

    #[test]
    fn alt_text_falls_back_to_name_and_theme_to_grid() {
        let product = ProductDraft::named("Corona 3").normalize(
            Theme::Funeral,
            &mut IdGenerator::seeded(2),
            |_| false,
        );
        assert_eq!(product.alt_text, "Corona 3");
        assert_eq!(product.theme, Theme::Funeral);

        let own_theme = ProductDraft::named("Ramo")
            .with_theme(Theme::Default)
            .normalize(Theme::Funeral, &mut IdGenerator::seeded(2), |_| false);
        assert_eq!(own_theme.theme, Theme::Default);
    }

    #[test]
    fn colliding_id_is_reassigned() {
        let product = ProductDraft::named("Dup").with_id("a").normalize(
            Theme::Default,
            &mut IdGenerator::seeded(3),
            |id| id == "a",
        );
        assert_ne!(product.id, "a");
        assert!(product.id.starts_with(GENERATED_ID_PREFIX));
    }

    #[test]
    fn generator_never_returns_taken_ids() {
        let mut ids = IdGenerator::seeded(11);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let id = ids.generate(|candidate| seen.contains(candidate));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn generator_widens_token_when_every_draw_collides() {
        let mut ids = IdGenerator::seeded(5);
        let id = ids.generate(|candidate| {
            candidate.len() == GENERATED_ID_PREFIX.len() + GENERATED_ID_LEN
        });
        assert_eq!(id.len(), GENERATED_ID_PREFIX.len() + GENERATED_ID_LEN + 1);
    }

    #[test]
    fn seeded_generators_are_deterministic() {
        let a = IdGenerator::seeded(42).generate(|_| false);
        let b = IdGenerator::seeded(42).generate(|_| false);
        assert_eq!(a, b);
    }

    #[test]
    fn patch_reports_only_changed_fields() {
        let mut product = normalize(
            ProductDraft::named("Marion")
                .with_price("1,590")
                .with_category("ramos"),
        );
        let patch = ProductPatch {
            name: Some("Marion".into()),
            price: Some("1,690".into()),
            description: Some("Flores para toda ocasión".into()),
            ..ProductPatch::default()
        };
        let changed = patch.apply_to(&mut product);
        assert_eq!(
            changed.as_slice(),
            &[ProductField::Description, ProductField::Price]
        );
        assert_eq!(product.price.as_deref(), Some("1,690"));
        assert!(ProductPatch::default().apply_to(&mut product).is_empty());
    }

    #[test]
    fn draft_parses_camel_case_json() {
        let draft: ProductDraft = serde_json::from_str(
            r#"{"id":"ramo","name":"Ramo","altText":"Ramo rosa","theme":"funeral"}"#,
        )
        .unwrap();
        assert_eq!(draft.alt_text.as_deref(), Some("Ramo rosa"));
        assert_eq!(draft.theme, Some(Theme::Funeral));
    }
}
