//! Short link entity and the paginated page wrapper.

use serde::{Deserialize, Serialize};
use url::Url;

/// A single shortened link.
///
/// Sourced read-only from the paginated `list-domain-links` call or the
/// single `get-link-info` call. Any of the optional fields can be absent in
/// either response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(with = "super::opaque_id")]
    pub id: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "shortURL")]
    pub short_url: Option<String>,
    #[serde(default, rename = "originalURL")]
    pub original_url: Option<String>,
}

impl Link {
    /// Human-readable path for breadcrumbs and list rows.
    ///
    /// Prefers `/path`, falls back to the path component of the short URL,
    /// and finally to `ID: <id>` when neither is known.
    pub fn display_path(&self) -> String {
        if let Some(path) = self.path.as_deref().filter(|p| !p.is_empty()) {
            return format!("/{}", path.trim_start_matches('/'));
        }
        if let Some(short_url) = self.short_url.as_deref() {
            if let Ok(parsed) = Url::parse(short_url) {
                return parsed.path().to_string();
            }
        }
        format!("ID: {}", self.id)
    }
}

/// One page of a domain's links, with the continuation token threaded
/// through for the next fetch.
///
/// `next_page_token` presence implies more pages exist; absence is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPage {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl LinkPage {
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}
