use serde::Deserialize;

use crate::results::SearchResult;

/// Subset of the Custom Search JSON API response we consume.
///
/// `items` is absent (not empty) when a query has no hits.
#[derive(Debug, Clone, Deserialize)]
pub struct CseResponse {
    #[serde(default)]
    pub items: Option<Vec<CseItem>>,
    #[serde(default, rename = "searchInformation")]
    pub search_information: Option<SearchInformation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CseItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchInformation {
    #[serde(default, rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(default, rename = "searchTime")]
    pub search_time: Option<f64>,
}

impl From<CseItem> for SearchResult {
    fn from(item: CseItem) -> Self {
        SearchResult {
            title: item.title,
            link: item.link,
            snippet: item.snippet,
        }
    }
}
