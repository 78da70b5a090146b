use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

/// Numeric from/to filter; both bounds optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NumberRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
}

/// Date from/to filter, serialized as ISO-8601 strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateRange {
    #[serde(with = "crate::dates::iso_opt", skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(with = "crate::dates::iso_opt", skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Title,
    StartPrice,
    CurrentBid,
    StartTime,
    EndTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

/// Query for `GET /auction/items`, serialized in deep-object syntax
/// (`startPrice[from]=…&sort[key]=…`) by [`query_string`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_price: Option<NumberRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_bid: Option<NumberRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_ended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(rename = "lastItemID", skip_serializing_if = "Option::is_none")]
    pub last_item_id: Option<String>,
}

/// Deep-object query serialization: nested objects become bracketed key
/// paths, arrays index with `[0]`, nulls are dropped, values are
/// percent-encoded. Dates have already been rendered to ISO-8601 strings by
/// the serde layer.
pub fn serialize_deep_object(value: &Value) -> String {
    let mut parts = Vec::new();
    collect(value, "", &mut parts);
    parts.join("&")
}

/// Serializes a search query into its wire query string.
pub fn query_string(query: &SearchQuery) -> String {
    match serde_json::to_value(query) {
        Ok(value) => serialize_deep_object(&value),
        Err(_) => String::new(),
    }
}

fn collect(value: &Value, prefix: &str, parts: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, entry) in map {
                let key_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}[{key}]")
                };
                collect(entry, &key_prefix, parts);
            }
        }
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                collect(entry, &format!("{prefix}[{index}]"), parts);
            }
        }
        Value::String(raw) => parts.push(format!("{prefix}={}", encode(raw))),
        Value::Bool(flag) => parts.push(format!("{prefix}={flag}")),
        Value::Number(number) => parts.push(format!("{prefix}={number}")),
    }
}

fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
