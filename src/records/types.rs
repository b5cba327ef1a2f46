//! Types for record responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record is passed through untouched; it always carries an `id`.
pub type Record = Value;

/// Paged list envelope.
///
/// `total_items` / `total_pages` are exposed raw: with `skipTotal` the
/// server reports a sentinel (`-1` on current versions, `0` on some older
/// ones) instead of a count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub items: Vec<Record>,
    /// Any other envelope field the server sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListResult {
    /// True when the server reported the negative "not computed" sentinel
    pub fn total_is_skipped(&self) -> bool {
        self.total_items < 0
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordId {
    pub id: String,
}
