use serde::{Deserialize, Serialize};

/// Channels fetched per page. Matches the backend default.
pub const PAGE_SIZE: usize = 50;

/// The user's current category pick in the sidebar tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategorySelection {
    Country {
        id: i64,
        name: String,
        channel_count: usize,
    },
    SubCategory {
        id: i64,
        country_id: i64,
        country_name: String,
        name: String,
        channel_count: usize,
    },
}

impl CategorySelection {
    /// Breadcrumb text for the header badge.
    pub fn display_text(&self) -> String {
        match self {
            CategorySelection::Country {
                name,
                channel_count,
                ..
            } => format!("{} ({} channels)", name, channel_count),
            CategorySelection::SubCategory {
                country_name,
                name,
                channel_count,
                ..
            } => format!("{} > {} ({} channels)", country_name, name, channel_count),
        }
    }
}

/// Canonical filter/pagination descriptor for a channel fetch.
///
/// A sub-category filter always carries its owning country. Search and
/// category selection are mutually exclusive, enforced by the constructors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogQuery {
    pub country_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub search: Option<String>,
    pub page_size: usize,
}

impl CatalogQuery {
    /// Unfiltered query: all channels, page 1.
    pub fn all() -> Self {
        Self {
            country_id: None,
            sub_category_id: None,
            search: None,
            page_size: PAGE_SIZE,
        }
    }

    /// Derive the canonical query for a selection and search text.
    /// Non-empty search wins and drops the category filter entirely.
    pub fn derive(selection: Option<&CategorySelection>, search_text: &str) -> Self {
        let trimmed = search_text.trim();
        if !trimmed.is_empty() {
            return Self {
                country_id: None,
                sub_category_id: None,
                search: Some(trimmed.to_string()),
                page_size: PAGE_SIZE,
            };
        }
        match selection {
            Some(CategorySelection::Country { id, .. }) => Self {
                country_id: Some(*id),
                sub_category_id: None,
                search: None,
                page_size: PAGE_SIZE,
            },
            Some(CategorySelection::SubCategory { id, country_id, .. }) => Self {
                country_id: Some(*country_id),
                sub_category_id: Some(*id),
                search: None,
                page_size: PAGE_SIZE,
            },
            None => Self::all(),
        }
    }

    /// Two queries with equal filters represent the same browsing intent;
    /// page is pagination state, not part of the identity.
    pub fn same_filter(&self, other: &CatalogQuery) -> bool {
        self.country_id == other.country_id
            && self.sub_category_id == other.sub_category_id
            && self.search == other.search
    }

    pub fn is_search(&self) -> bool {
        self.search.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn de() -> CategorySelection {
        CategorySelection::Country {
            id: 7,
            name: "DE".to_string(),
            channel_count: 120,
        }
    }

    #[test]
    fn search_clears_category() {
        let q = CatalogQuery::derive(Some(&de()), "sport");
        assert_eq!(q.country_id, None);
        assert_eq!(q.sub_category_id, None);
        assert_eq!(q.search.as_deref(), Some("sport"));
    }

    #[test]
    fn sub_category_carries_owning_country() {
        let sel = CategorySelection::SubCategory {
            id: 42,
            country_id: 7,
            country_name: "Germany".to_string(),
            name: "News".to_string(),
            channel_count: 12,
        };
        let q = CatalogQuery::derive(Some(&sel), "");
        assert_eq!(q.country_id, Some(7));
        assert_eq!(q.sub_category_id, Some(42));
    }

    #[test]
    fn whitespace_search_is_no_search() {
        let q = CatalogQuery::derive(Some(&de()), "   ");
        assert_eq!(q.country_id, Some(7));
        assert_eq!(q.search, None);
    }

    #[test]
    fn same_filter_ignores_nothing_but_page() {
        let a = CatalogQuery::derive(Some(&de()), "");
        let b = CatalogQuery::derive(Some(&de()), "");
        assert!(a.same_filter(&b));
        let c = CatalogQuery::derive(None, "news");
        assert!(!a.same_filter(&c));
    }
}
