use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market effect a story is expected to have. Assigned when the story is written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impact::Positive => write!(f, "positive"),
            Impact::Negative => write!(f, "negative"),
            Impact::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Comic,
    Creator,
    Publisher,
    Option,
}

/// Tradable asset a story points at. Advisory only, nothing checks that the symbol exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    pub kind: EntityKind,
    pub symbol: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub source: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub impact: Impact,
    #[serde(default)]
    pub related_entity: Option<RelatedEntity>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl NewsItem {
    /// Copy of this item with only `published_at` moved to `at`.
    pub fn restamped(&self, at: DateTime<Utc>) -> Self {
        Self {
            published_at: at,
            ..self.clone()
        }
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

/// Newest first. Stable, so items sharing a timestamp keep their relative order.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
