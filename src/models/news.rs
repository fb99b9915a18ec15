use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub id: String,
    pub name: String,
}

/// Новость в формате, совместимом с NewsAPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub source: NewsSource,
    pub author: Option<String>,
    pub title: String,
    pub description: String,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    pub total_results: usize,
    pub articles: Vec<NewsItem>,
}

impl NewsApiResponse {
    pub fn ok(articles: Vec<NewsItem>) -> Self {
        Self {
            status: "ok".to_string(),
            total_results: articles.len(),
            articles,
        }
    }
}

// Постраничная обёртка; пока никем не заполняется
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub items: Vec<NewsItem>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}
