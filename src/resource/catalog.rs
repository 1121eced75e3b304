use serde::{Deserialize, Serialize};

use super::Resource;

/// A product from the public catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub price: f64,
    /// Image reference.
    #[serde(default)]
    pub thumbnail: String,
    /// Category slug.
    pub category: String,
}

impl Resource for CatalogItem {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

/// Client-side category post-filter.
///
/// A blank filter keeps everything; otherwise the category tag must match
/// exactly.
pub fn filter_by_category(items: Vec<CatalogItem>, category: &str) -> Vec<CatalogItem> {
    if category.trim().is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, category: &str) -> CatalogItem {
        CatalogItem {
            id,
            title: format!("item {id}"),
            price: 9.99,
            thumbnail: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn filter_keeps_only_matching_category() {
        let items = vec![item(1, "a"), item(2, "b"), item(3, "b")];
        let filtered = filter_by_category(items, "b");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|i| i.category == "b"));
    }

    #[test]
    fn blank_filter_is_no_filter() {
        let items = vec![item(1, "a"), item(2, "b")];
        assert_eq!(filter_by_category(items.clone(), "").len(), 2);
        assert_eq!(filter_by_category(items, "   ").len(), 2);
    }

    #[test]
    fn filter_is_exact_match() {
        let items = vec![item(1, "beauty"), item(2, "Beauty")];
        let filtered = filter_by_category(items, "beauty");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn deserializes_upstream_product_ignoring_extra_fields() {
        let json = r#"{"id": 7, "title": "Lipstick", "price": 12.5, "thumbnail": "t.png",
                       "category": "beauty", "rating": 4.2, "stock": 3}"#;
        let parsed: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, 7);
        assert_eq!(parsed.category, "beauty");
    }
}
