use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Scratch origin used only to borrow `Url`'s form encoding.
const ADDRESS_ORIGIN: &str = "stockdesk://dashboard/";

/// Search text and category filter, as carried in the address bar.
///
/// Both default to the empty string. An empty or blank value means "no
/// filter", the same as the parameter being absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

impl QueryParams {
    pub fn new(q: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            category: category.into(),
        }
    }

    /// Search text, if a search should run.
    pub fn search(&self) -> Option<&str> {
        (!self.q.trim().is_empty()).then_some(self.q.as_str())
    }

    pub fn category_filter(&self) -> Option<&str> {
        (!self.category.trim().is_empty()).then_some(self.category.as_str())
    }

    pub fn is_filtered(&self) -> bool {
        self.search().is_some() || self.category_filter().is_some()
    }

    /// Parses `q=...&category=...`, with or without a leading `?`.
    ///
    /// Unknown keys are ignored; the last occurrence of a key wins.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();
        let Ok(mut url) = Url::parse(ADDRESS_ORIGIN) else {
            return params;
        };
        url.set_query(Some(query));
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "q" => params.q = value.into_owned(),
                "category" => params.category = value.into_owned(),
                _ => {}
            }
        }
        params
    }

    /// Encodes the non-empty parameters; empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        let Ok(mut url) = Url::parse(ADDRESS_ORIGIN) else {
            return String::new();
        };
        {
            let mut pairs = url.query_pairs_mut();
            if !self.q.is_empty() {
                pairs.append_pair("q", &self.q);
            }
            if !self.category.is_empty() {
                pairs.append_pair("category", &self.category);
            }
        }
        url.query().unwrap_or("").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_both_mean_no_filter() {
        let absent = QueryParams::from_query_str("");
        let empty = QueryParams::from_query_str("q=&category=");
        assert_eq!(absent, empty);
        assert!(!absent.is_filtered());
        assert!(QueryParams::new("   ", "").search().is_none());
    }

    #[test]
    fn parses_and_encodes_address_bar_query() {
        let params = QueryParams::from_query_str("?q=red+shoe&category=mens-shoes&page=3");
        assert_eq!(params.q, "red shoe");
        assert_eq!(params.category, "mens-shoes");

        let encoded = params.to_query_string();
        assert_eq!(QueryParams::from_query_str(&encoded), params);
    }

    #[test]
    fn to_query_string_omits_empty_values() {
        assert_eq!(QueryParams::default().to_query_string(), "");
        assert_eq!(QueryParams::new("", "beauty").to_query_string(), "category=beauty");
    }

    #[test]
    fn special_characters_are_percent_encoded() {
        let params = QueryParams::new("a&b=c", "");
        let encoded = params.to_query_string();
        assert!(!encoded.contains("a&b"));
        assert_eq!(QueryParams::from_query_str(&encoded).q, "a&b=c");
    }
}
