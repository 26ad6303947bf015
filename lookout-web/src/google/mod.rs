//! Google Programmable Search (Custom Search JSON API) integration.
//!
//! One GET per query against `customsearch/v1` with `q`, `cx`, and the API
//! key sent as the `key` query parameter.
pub mod client;
pub mod types;

pub use client::GoogleSearch;
