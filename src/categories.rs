use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::{Country, SubCategory};

/// Session-lived cache of the two-level category tree.
///
/// Countries are fetched once; sub-categories are fetched lazily on first
/// expansion and cached by country id for the rest of the session. Collapsing
/// never evicts. There is no invalidation; catalog staleness within a session
/// is acceptable.
pub struct CategoryTreeState {
    countries: Vec<Arc<Country>>,
    countries_loaded: bool,
    countries_loading: bool,
    countries_error: Option<String>,
    sub_categories: HashMap<i64, Vec<Arc<SubCategory>>>,
    subs_loading: HashSet<i64>,
    sub_errors: HashMap<i64, String>,
    expanded: HashSet<i64>,
}

impl Default for CategoryTreeState {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            countries_loaded: false,
            countries_loading: false,
            countries_error: None,
            sub_categories: HashMap::new(),
            subs_loading: HashSet::new(),
            sub_errors: HashMap::new(),
            expanded: HashSet::new(),
        }
    }
}

impl CategoryTreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the one-per-session country fetch. Returns `false` when the
    /// list is already loaded or a fetch is in flight.
    pub fn begin_countries(&mut self) -> bool {
        if self.countries_loaded || self.countries_loading {
            return false;
        }
        self.countries_loading = true;
        self.countries_error = None;
        true
    }

    /// Backend order is preserved; the list is not re-sorted.
    pub fn apply_countries(&mut self, countries: Vec<Country>) {
        self.countries = countries.into_iter().map(Arc::new).collect();
        self.countries_loaded = true;
        self.countries_loading = false;
        self.countries_error = None;
    }

    pub fn apply_countries_error(&mut self, message: String) {
        self.countries_loading = false;
        self.countries_error = Some(message);
    }

    /// Flip expansion for a country. Returns `true` when the caller must
    /// issue a sub-category fetch: expanding an uncached country with no
    /// fetch already in flight. Toggles on different countries are
    /// independent.
    pub fn toggle_expansion(&mut self, country_id: i64) -> bool {
        if self.expanded.contains(&country_id) {
            self.expanded.remove(&country_id);
            return false;
        }
        self.expanded.insert(country_id);
        if self.sub_categories.contains_key(&country_id)
            || self.subs_loading.contains(&country_id)
        {
            return false;
        }
        self.subs_loading.insert(country_id);
        self.sub_errors.remove(&country_id);
        true
    }

    pub fn apply_sub_categories(&mut self, country_id: i64, subs: Vec<SubCategory>) {
        self.sub_categories
            .insert(country_id, subs.into_iter().map(Arc::new).collect());
        self.subs_loading.remove(&country_id);
        self.sub_errors.remove(&country_id);
    }

    pub fn apply_sub_categories_error(&mut self, country_id: i64, message: String) {
        self.subs_loading.remove(&country_id);
        self.sub_errors.insert(country_id, message);
    }

    pub fn countries(&self) -> &[Arc<Country>] {
        &self.countries
    }

    pub fn country(&self, country_id: i64) -> Option<&Arc<Country>> {
        self.countries.iter().find(|c| c.id == country_id)
    }

    pub fn sub_categories(&self, country_id: i64) -> Option<&[Arc<SubCategory>]> {
        self.sub_categories.get(&country_id).map(|v| v.as_slice())
    }

    pub fn is_cached(&self, country_id: i64) -> bool {
        self.sub_categories.contains_key(&country_id)
    }

    pub fn is_expanded(&self, country_id: i64) -> bool {
        self.expanded.contains(&country_id)
    }

    pub fn is_loading_subs(&self, country_id: i64) -> bool {
        self.subs_loading.contains(&country_id)
    }

    pub fn countries_error(&self) -> Option<&str> {
        self.countries_error.as_deref()
    }

    pub fn sub_error(&self, country_id: i64) -> Option<&str> {
        self.sub_errors.get(&country_id).map(|s| s.as_str())
    }
}
