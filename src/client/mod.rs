//! Client-side pieces of the composer: form state, its field cache, and the
//! HTTP client that submits a batch.

mod api;
mod compose;
mod field_store;

pub use api::ApiClient;
pub use compose::*;
pub use field_store::{FieldStore, FormField, InMemoryFieldStore};
