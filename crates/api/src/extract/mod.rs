//! Request extractors that reject with the JSON error envelope.

pub mod json;
pub mod path;
pub mod query;

pub use json::AppJson;
pub use path::AppPath;
pub use query::AppQuery;
