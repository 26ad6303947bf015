/// One item returned by the search API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    /// Never empty.
    pub link: String,
    pub snippet: Option<String>,
}

/// Results of a single search, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    items: Vec<SearchResult>,
}

impl ResultSet {
    /// Build a set, dropping entries whose link is blank.
    pub fn new(items: impl IntoIterator<Item = SearchResult>) -> Self {
        let items = items
            .into_iter()
            .filter(|item| {
                let keep = !item.link.trim().is_empty();
                if !keep {
                    tracing::warn!(title = %item.title, "results.drop_empty_link");
                }
                keep
            })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a result by its displayed (1-based) number.
    pub fn numbered(&self, number: usize) -> Option<&SearchResult> {
        number.checked_sub(1).and_then(|idx| self.items.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.items.iter()
    }
}
