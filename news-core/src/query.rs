use crate::item::{Impact, NewsItem};

/// Read-only filter over a batch. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsQuery {
    pub limit: Option<usize>,
    pub offset: usize,
    pub impact: Option<Impact>,
    pub source: Option<String>,
    pub keyword: Option<String>,
    /// Case-insensitive substring of title or body.
    pub text: Option<String>,
}

impl NewsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, item: &NewsItem) -> bool {
        if self.impact.is_some_and(|impact| item.impact != impact) {
            return false;
        }
        if let Some(source) = &self.source {
            if !item.source.eq_ignore_ascii_case(source) {
                return false;
            }
        }
        if let Some(keyword) = &self.keyword {
            if !item.has_keyword(keyword) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if !item.title.to_lowercase().contains(&needle)
                && !item.body.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Filters in input order, then applies offset and limit.
    pub fn apply(&self, items: &[NewsItem]) -> Vec<NewsItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
