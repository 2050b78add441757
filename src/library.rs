//! Library views over the topic collection: search, ordering, dashboard.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// Number of topics shown under "recent activity" on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently modified first.
    #[default]
    Recent,
    Name,
    /// Highest completion first.
    Progress,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recent => "recent",
            SortOrder::Name => "name",
            SortOrder::Progress => "progress",
        }
    }

    pub fn from_str(s: &str) -> Option<SortOrder> {
        match s.to_lowercase().as_str() {
            "recent" => Some(SortOrder::Recent),
            "name" => Some(SortOrder::Name),
            "progress" => Some(SortOrder::Progress),
            _ => None,
        }
    }
}

/// One row of the library listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCard {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub progress: f64,
    pub last_modified: DateTime<Utc>,
}

impl From<&Topic> for TopicCard {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            name: topic.name.clone(),
            category: topic.category.clone(),
            description: topic.description.clone(),
            progress: topic.progress(),
            last_modified: topic.last_modified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub topics: usize,
    pub insights: usize,
    pub perspective_shifts: usize,
}

pub fn matches(topic: &Topic, query: &str) -> bool {
    let q = query.to_lowercase();
    topic.name.to_lowercase().contains(&q)
        || topic.category.to_lowercase().contains(&q)
        || topic.description.to_lowercase().contains(&q)
}

pub fn filter<'a>(topics: &'a [Topic], query: &str) -> Vec<&'a Topic> {
    let query = query.trim();
    topics
        .iter()
        .filter(|t| query.is_empty() || matches(t, query))
        .collect()
}

fn by_recent(a: &Topic, b: &Topic) -> Ordering {
    b.last_modified.cmp(&a.last_modified)
}

pub fn sort(topics: &mut [&Topic], order: SortOrder) {
    match order {
        SortOrder::Recent => topics.sort_by(|a, b| by_recent(a, b)),
        SortOrder::Name => topics.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortOrder::Progress => {
            topics.sort_by(|a, b| b.progress().partial_cmp(&a.progress()).unwrap_or(Ordering::Equal))
        }
    }
}

/// Filtered and ordered cards, as the library view lists them.
pub fn listing(topics: &[Topic], query: &str, order: SortOrder) -> Vec<TopicCard> {
    let mut found = filter(topics, query);
    sort(&mut found, order);
    found.into_iter().map(TopicCard::from).collect()
}

pub fn dashboard(topics: &[Topic]) -> DashboardStats {
    DashboardStats {
        topics: topics.len(),
        insights: topics.iter().filter(|t| t.has_insights()).count(),
        perspective_shifts: topics.iter().filter(|t| t.has_both_perspectives()).count(),
    }
}

pub fn most_recent(topics: &[Topic]) -> Option<&Topic> {
    topics.iter().max_by_key(|t| t.last_modified)
}

pub fn recent_activity(topics: &[Topic], limit: usize) -> Vec<TopicCard> {
    let mut all: Vec<&Topic> = topics.iter().collect();
    all.sort_by(|a, b| by_recent(a, b));
    all.into_iter().take(limit).map(TopicCard::from).collect()
}
