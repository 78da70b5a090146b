use chrono::{DateTime, Utc};

use crate::dates::parse_iso;
use crate::query::{DateRange, NumberRange, SearchQuery, SortKey, SortOrder, SortSpec};

/// Typed getters over loosely-typed key/value query input, as produced by a
/// URL query string or form submission. Repeated keys keep their first
/// value.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    entries: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).map(str::to_string)
    }

    pub fn number(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key).and_then(parse_iso)
    }

    /// Assembles a search query from the conventional form keys
    /// (`title`, `startPrice[from]`, `sort[key]`, …). Checkbox-style
    /// `excludeEnded` accepts both `on` and `true`.
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            title: self.string("title"),
            start_price: number_range(self, "startPrice"),
            current_bid: number_range(self, "currentBid"),
            start_time: date_range(self, "startTime"),
            end_time: date_range(self, "endTime"),
            sort: sort_spec(self),
            exclude_ended: matches!(self.get("excludeEnded"), Some("on") | Some("true"))
                .then_some(true),
            size: None,
            last_item_id: None,
        }
    }
}

fn number_range(params: &SearchParams, key: &str) -> Option<NumberRange> {
    let range = NumberRange {
        from: params.number(&format!("{key}[from]")),
        to: params.number(&format!("{key}[to]")),
    };
    (range.from.is_some() || range.to.is_some()).then_some(range)
}

fn date_range(params: &SearchParams, key: &str) -> Option<DateRange> {
    let range = DateRange {
        from: params.date(&format!("{key}[from]")),
        to: params.date(&format!("{key}[to]")),
    };
    (range.from.is_some() || range.to.is_some()).then_some(range)
}

fn sort_spec(params: &SearchParams) -> Option<SortSpec> {
    let key = match params.get("sort[key]")? {
        "title" => SortKey::Title,
        "startPrice" => SortKey::StartPrice,
        "currentBid" => SortKey::CurrentBid,
        "startTime" => SortKey::StartTime,
        "endTime" => SortKey::EndTime,
        _ => return None,
    };
    let order = match params.get("sort[order]") {
        Some("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };
    Some(SortSpec { key, order })
}
