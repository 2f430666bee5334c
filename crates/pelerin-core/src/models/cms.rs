//! CMS key/value entries.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Kind of value a CMS entry holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CmsContentType {
    #[default]
    Text,
    Html,
    /// The value is an image URL
    Image,
}

impl FromStr for CmsContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(CmsContentType::Text),
            "html" => Ok(CmsContentType::Html),
            "image" => Ok(CmsContentType::Image),
            _ => Err(format!("Invalid content type: {s}")),
        }
    }
}

impl CmsContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmsContentType::Text => "text",
            CmsContentType::Html => "html",
            CmsContentType::Image => "image",
        }
    }
}

/// Flat site-wide content record addressed by key, e.g.
/// `footer_contact_email`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CmsEntry {
    pub key: String,
    pub content_type: CmsContentType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub updated_at: Timestamp,
}
