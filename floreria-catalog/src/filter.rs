//! Category filter, search term and the visible-set predicate.
use serde::{Deserialize, Serialize};

use crate::constants::ALL_CATEGORIES;
use crate::product::Product;

/// Active category filter.
///
/// `Unset` and `All` admit every product; they differ only in what the
/// controller reports back through its stats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    Unset,
    All,
    Only(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn admits(&self, product: &Product) -> bool {
        match self {
            Self::Unset | Self::All => true,
            Self::Only(category) => product.category.as_deref() == Some(category.as_str()),
        }
    }

    /// The filter as last set by the caller, `None` when never set.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::All => Some(ALL_CATEGORIES),
            Self::Only(category) => Some(category),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(label: &str) -> Self {
        match label {
            "" => Self::Unset,
            ALL_CATEGORIES => Self::All,
            other => Self::Only(other.to_string()),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(label: Option<&str>) -> Self {
        label.map_or(Self::Unset, Self::from)
    }
}

/// Case-insensitive substring search over name, description and category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm {
    raw: String,
    needle: String,
}

impl SearchTerm {
    #[must_use]
    pub fn new(term: &str) -> Self {
        Self {
            raw: term.to_string(),
            needle: term.to_lowercase(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn admits(&self, product: &Product) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        product.name.to_lowercase().contains(&self.needle)
            || product.description.to_lowercase().contains(&self.needle)
            || product
                .category
                .as_ref()
                .is_some_and(|category| category.to_lowercase().contains(&self.needle))
    }
}

/// Filter and search together; a product is visible when both admit it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    pub filter: CategoryFilter,
    pub search: SearchTerm,
}

impl ViewQuery {
    #[must_use]
    pub fn admits(&self, product: &Product) -> bool {
        self.filter.admits(product) && self.search.admits(product)
    }

    /// Visible subset of `products` in source order.
    #[must_use]
    pub fn select<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.admits(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{IdGenerator, ProductDraft, Theme};

    fn product(id: &str, name: &str, description: &str, category: Option<&str>) -> Product {
        let mut draft = ProductDraft::named(name)
            .with_id(id)
            .with_description(description);
        draft.category = category.map(str::to_string);
        draft.normalize(Theme::Default, &mut IdGenerator::seeded(0), |_| false)
    }

    #[test]
    fn labels_map_to_filters() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(""), CategoryFilter::Unset);
        assert_eq!(CategoryFilter::from(None), CategoryFilter::Unset);
        assert_eq!(
            CategoryFilter::from(Some("coronas")),
            CategoryFilter::Only("coronas".into())
        );
        assert_eq!(CategoryFilter::All.label(), Some("all"));
        assert_eq!(CategoryFilter::Unset.label(), None);
    }

    #[test]
    fn category_filter_is_exact_match() {
        let corona = product("c", "Corona", "", Some("coronas"));
        let loose = product("l", "Suelto", "", None);
        let filter = CategoryFilter::from("coronas");
        assert!(filter.admits(&corona));
        assert!(!filter.admits(&loose));
        assert!(!CategoryFilter::from("Coronas").admits(&corona));
        assert!(CategoryFilter::All.admits(&loose));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let p = product("b", "Baby Girl", "Recién nacidos", Some("nacimiento"));
        assert!(SearchTerm::new("BABY").admits(&p));
        assert!(SearchTerm::new("recién").admits(&p));
        assert!(SearchTerm::new("Nacim").admits(&p));
        assert!(!SearchTerm::new("corona").admits(&p));
        assert!(SearchTerm::new("").admits(&p));
    }

    #[test]
    fn search_skips_missing_category() {
        let p = product("x", "Plain", "nothing", None);
        assert!(!SearchTerm::new("ramos").admits(&p));
    }

    #[test]
    fn select_preserves_source_order() {
        let products = vec![
            product("a", "Uno", "", Some("x")),
            product("b", "Dos", "", Some("y")),
            product("c", "Tres", "", Some("x")),
        ];
        let query = ViewQuery {
            filter: CategoryFilter::from("x"),
            search: SearchTerm::default(),
        };
        let ids: Vec<_> = query.select(&products).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
