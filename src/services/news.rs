//! Новости кайтсерфинга из RSS-ленты IKSurfMag.

use chrono::{SecondsFormat, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    error::{BackendError, BackendResult},
    models::{NewsApiResponse, NewsItem, NewsSource},
};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(default, rename = "item")]
    items: Vec<RssItem>,
}

#[derive(Debug, Default, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    // quick-xml сравнивает только локальные имена: dc:creator, content:encoded, media:content
    creator: Option<String>,
    #[serde(rename = "encoded")]
    content_encoded: Option<String>,
    #[serde(default)]
    enclosure: Vec<MediaRef>,
    #[serde(default, rename = "content")]
    media_content: Vec<MediaRef>,
}

#[derive(Debug, Deserialize)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewsService {
    http_client: reqwest::Client,
    feed_url: String,
}

impl NewsService {
    pub fn new(http_client: reqwest::Client, feed_url: impl Into<String>) -> Self {
        Self {
            http_client,
            feed_url: feed_url.into(),
        }
    }

    pub async fn fetch_news(&self) -> BackendResult<NewsApiResponse> {
        debug!("Fetching news feed {}", self.feed_url);
        let response = self.http_client.get(&self.feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let xml = response.text().await?;
        let articles = parse_feed(&xml)?;
        info!("Loaded {} news articles", articles.len());
        Ok(NewsApiResponse::ok(articles))
    }
}

pub fn parse_feed(xml: &str) -> BackendResult<Vec<NewsItem>> {
    let rss: Rss = from_str(xml).map_err(|e| BackendError::Feed(e.to_string()))?;
    Ok(rss.channel.items.into_iter().map(to_news_item).collect())
}

fn to_news_item(item: RssItem) -> NewsItem {
    let url_to_image = item
        .enclosure
        .iter()
        .chain(item.media_content.iter())
        .find_map(|media| media.url.clone());

    let mut description = item.description.clone().unwrap_or_default();
    if description.is_empty() {
        if let Some(paragraph) = item.content_encoded.as_deref().and_then(first_paragraph) {
            description = strip_tags(paragraph);
        }
    }

    let content = item
        .content_encoded
        .filter(|content| !content.is_empty())
        .or(item.description)
        .unwrap_or_default();

    NewsItem {
        source: NewsSource {
            id: "iksurfmag".to_string(),
            name: "IKSurfMag".to_string(),
        },
        author: item.creator.filter(|author| !author.is_empty()),
        title: item
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        description,
        url: item.link.unwrap_or_default(),
        url_to_image,
        published_at: item
            .pub_date
            .filter(|date| !date.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        content,
    }
}

/// Содержимое первого `<p>...</p>` в HTML.
fn first_paragraph(html: &str) -> Option<&str> {
    let start = html.find("<p>")? + "<p>".len();
    let len = html[start..].find("</p>")?;
    let paragraph = &html[start..start + len];
    (!paragraph.is_empty()).then_some(paragraph)
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
