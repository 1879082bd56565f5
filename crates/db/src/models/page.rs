//! Paginated list envelope and shared list query parameters.

use serde::{Deserialize, Serialize};

/// `{count, results}` returned by every list endpoint. `count` is the total
/// number of matching rows, not the length of `results`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Query parameters accepted by searchable list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
