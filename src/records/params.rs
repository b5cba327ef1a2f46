//! Query parameters for record requests

use std::collections::BTreeMap;
use std::fmt::Display;

pub(crate) const PAGE: &str = "page";
pub(crate) const PER_PAGE: &str = "perPage";
pub(crate) const SKIP_TOTAL: &str = "skipTotal";
pub(crate) const FILTER: &str = "filter";
pub(crate) const FIELDS: &str = "fields";

/// Query parameters sent with a record request.
///
/// Keys are kept sorted so the encoded query is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary parameter, replacing any previous value
    pub fn set(mut self, key: &str, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub(crate) fn insert(&mut self, key: &str, value: impl Display) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// 1-based page number
    pub fn page(self, page: u32) -> Self {
        self.set(PAGE, page)
    }

    pub fn per_page(self, per_page: u32) -> Self {
        self.set(PER_PAGE, per_page)
    }

    /// e.g. `-created,title`
    pub fn sort(self, sort: &str) -> Self {
        self.set("sort", sort)
    }

    /// Filter expression, e.g. `title = 'hello'`
    pub fn filter(self, filter: &str) -> Self {
        self.set(FILTER, filter)
    }

    /// Comma-separated list of fields to return
    pub fn fields(self, fields: &str) -> Self {
        self.set(FIELDS, fields)
    }

    /// Comma-separated list of relations to expand
    pub fn expand(self, expand: &str) -> Self {
        self.set("expand", expand)
    }

    /// Skip the total-count computation of list responses
    pub fn skip_total(self, skip: bool) -> Self {
        self.set(SKIP_TOTAL, skip)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
