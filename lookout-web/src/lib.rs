//! Web search and result viewing utilities.
//!
//! - Query and result model (`query`, `results`)
//! - Search backend trait and the Google Programmable Search client (`search`, `google`)
//! - Console rendering of result sets (`render`)
//! - External terminal browser launcher (`viewer`)

pub mod google;
pub mod query;
pub mod render;
pub mod results;
pub mod search;
pub mod viewer;

pub use google::GoogleSearch;
pub use query::Query;
pub use results::{ResultSet, SearchResult};
pub use search::SearchBackend;
pub use viewer::{TerminalViewer, Viewer};
