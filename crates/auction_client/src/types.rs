use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bid as carried on the wire, in the item detail and on the live
/// stream. The `time` field is an ISO-8601 string revived on parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidEventWire {
    pub user: String,
    pub bid: u32,
    #[serde(with = "crate::dates::iso")]
    pub time: DateTime<Utc>,
}

/// Search result row from `GET /auction/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: String,
    pub title: String,
    pub start_price: u32,
    #[serde(default)]
    pub current_bid: Option<u32>,
    #[serde(with = "crate::dates::iso")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "crate::dates::iso")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub carousels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub items: Vec<ItemSummary>,
    #[serde(default)]
    pub count: u64,
}

/// Item detail from `GET /auction/item/{itemID}`, with the embedded bid
/// history ordered newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_price: u32,
    #[serde(with = "crate::dates::iso")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "crate::dates::iso")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub carousels: Vec<String>,
    #[serde(default)]
    pub bid_records: Vec<BidEventWire>,
}

/// Body of `POST /auction/item`. Items are immutable once created; this is
/// a one-shot call answered with the new item id in `Location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionDraft {
    pub title: String,
    pub starting_price: u32,
    #[serde(with = "crate::dates::iso")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "crate::dates::iso")]
    pub end_time: DateTime<Utc>,
    pub description: String,
    pub carousels: Vec<String>,
}

/// Identity providers the backend can delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SsoProvider {
    Internal,
    Google,
    GitHub,
    Microsoft,
}

impl SsoProvider {
    /// Spelling used in URL paths and the `ssoProviders` map keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            SsoProvider::Internal => "Internal",
            SsoProvider::Google => "Google",
            SsoProvider::GitHub => "GitHub",
            SsoProvider::Microsoft => "Microsoft",
        }
    }
}

impl fmt::Display for SsoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which providers are linked to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderLinks {
    #[serde(rename = "Internal", default)]
    pub internal: bool,
    #[serde(rename = "Google", default)]
    pub google: bool,
    #[serde(rename = "GitHub", default)]
    pub github: bool,
    #[serde(rename = "Microsoft", default)]
    pub microsoft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub sso_providers: ProviderLinks,
}

/// Verdict of `DELETE /auth/sso/{provider}/link`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    Unlinked,
    /// 409: refusing to remove the last linked provider.
    LastProvider,
    /// 404: the provider is not supported.
    Unsupported,
}

/// Verdict of `PATCH /user/info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameOutcome {
    Updated,
    /// 400: the name was rejected.
    Invalid,
}
