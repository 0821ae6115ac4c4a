use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::query::CatalogQuery;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Country {
    pub id: i64,
    pub name: String, // raw country code, e.g. "DE"
    pub display_name: String,
    pub channel_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub channel_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub stream_url: String,
    pub logo_url: Option<String>,
    pub tvg_id: Option<String>,
    pub tvg_name: Option<String>,
    #[serde(alias = "original_category")]
    pub category_name: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl Channel {
    /// Display name fallback chain: `name`, then `tvg_name`, then a placeholder.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match &self.tvg_name {
            Some(n) if !n.is_empty() => n,
            _ => "Unnamed Channel",
        }
    }

    pub fn category_label(&self) -> &str {
        match &self.category_name {
            Some(c) if !c.is_empty() => c,
            _ => "Uncategorized",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    #[serde(default)]
    pub pages: usize,
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CatalogStats {
    pub total_channels: usize,
    pub total_main_categories: usize,
    pub total_sub_categories: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchEntry {
    pub channel_id: i64,
    pub channel_name: Option<String>,
    pub watch_position: u64,
    #[serde(default, with = "naive_utc_timestamp")]
    pub last_watched_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub channel: Option<Channel>,
}

/// The backend serializes timestamps with `isoformat()` on a naive UTC
/// datetime, so the wire form carries no offset. Accept that form as well
/// as full RFC 3339.
mod naive_utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => ser.serialize_str(&ts.to_rfc3339()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(de)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(serde::de::Error::custom)?;
        Ok(Some(naive.and_utc()))
    }
}

// Response envelopes. The backend wraps every payload in a `success` flag.

#[derive(Debug, Deserialize)]
struct MainCategoriesResponse {
    success: bool,
    #[serde(default)]
    main_categories: Vec<Country>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubCategoriesResponse {
    success: bool,
    #[serde(default)]
    sub_categories: Vec<SubCategory>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    success: bool,
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    pagination: Pagination,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    success: bool,
    #[serde(default)]
    stats: CatalogStats,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WatchUpdateResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContinueWatchingResponse {
    success: bool,
    #[serde(default)]
    continue_watching: Vec<WatchEntry>,
    #[serde(default)]
    error: Option<String>,
}

fn envelope_error(error: Option<String>) -> anyhow::Error {
    anyhow::anyhow!(error.unwrap_or_else(|| "backend reported failure".to_string()))
}

/// English display names for the raw country codes the backend carries.
/// Unknown codes fall through to the backend-provided display name.
static COUNTRY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("DE", "Germany"),
        ("TR", "Turkey"),
        ("EU", "Europe"),
        ("FR", "France"),
        ("BG", "Bulgaria"),
        ("ALB", "Albania"),
        ("AL", "Albania"),
        ("NL", "Netherlands"),
        ("EN", "English"),
        ("ES", "Spain"),
        ("AR", "Arabic"),
        ("PL", "Poland"),
        ("PT", "Portugal"),
        ("US", "United States"),
        ("IT", "Italy"),
        ("GR", "Greece"),
        ("SV", "Sweden"),
        ("SE", "Sweden"),
        ("RU", "Russia"),
        ("UK", "United Kingdom"),
        ("RO", "Romania"),
        ("NORDIC", "Nordic"),
        ("EX", "Ex-Yugoslavia"),
        ("EX-YU", "Ex-Yugoslavia"),
        ("CH", "Switzerland"),
        ("AU", "Austria"),
        ("IR", "Iran"),
        ("BE", "Belgium"),
        ("HU", "Hungary"),
        ("IL", "Israel"),
        ("KU", "Kurdish"),
        ("NO", "Norway"),
        ("PT -BR", "Brazil"),
        ("DK", "Denmark"),
        ("CA", "Canada"),
        ("HR", "Croatia"),
        ("AZ", "Azerbaijan"),
        ("BIH", "Bosnia"),
        ("FIN", "Finland"),
        ("MK", "Macedonia"),
        ("XXX", "Adult"),
    ])
});

impl Country {
    pub fn friendly_name(&self) -> &str {
        match COUNTRY_NAMES.get(self.name.as_str()) {
            Some(name) => name,
            None if !self.display_name.is_empty() => &self.display_name,
            None => &self.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    pub base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent("iptv-viewer")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { base_url, client }
    }

    pub async fn get_main_categories(&self) -> Result<Vec<Country>, anyhow::Error> {
        let url = format!("{}/main-categories", self.base_url);
        let resp: MainCategoriesResponse = self.client.get(&url).send().await?.json().await?;
        if !resp.success {
            return Err(envelope_error(resp.error));
        }
        Ok(resp.main_categories)
    }

    pub async fn get_sub_categories(
        &self,
        country_id: i64,
    ) -> Result<Vec<SubCategory>, anyhow::Error> {
        let url = format!("{}/sub-categories/{}", self.base_url, country_id);
        let resp: SubCategoriesResponse = self.client.get(&url).send().await?.json().await?;
        if !resp.success {
            return Err(envelope_error(resp.error));
        }
        Ok(resp.sub_categories)
    }

    pub async fn get_channels(
        &self,
        query: &CatalogQuery,
        page: usize,
    ) -> Result<(Vec<Channel>, Pagination), anyhow::Error> {
        let url = format!("{}/channels", self.base_url);
        let mut req = self.client.get(&url).query(&[
            ("page", page.to_string()),
            ("per_page", query.page_size.to_string()),
        ]);
        if let Some(country_id) = query.country_id {
            req = req.query(&[("main_category_id", country_id.to_string())]);
        }
        if let Some(sub_id) = query.sub_category_id {
            req = req.query(&[("sub_category_id", sub_id.to_string())]);
        }
        if let Some(search) = &query.search {
            req = req.query(&[("search", search.as_str())]);
        }
        let resp: ChannelsResponse = req.send().await?.json().await?;
        if !resp.success {
            return Err(envelope_error(resp.error));
        }
        Ok((resp.channels, resp.pagination))
    }

    pub async fn get_status(&self) -> Result<CatalogStats, anyhow::Error> {
        let url = format!("{}/status", self.base_url);
        let resp: StatusResponse = self.client.get(&url).send().await?.json().await?;
        if !resp.success {
            return Err(envelope_error(resp.error));
        }
        Ok(resp.stats)
    }

    pub async fn update_watch_position(
        &self,
        session_id: &str,
        channel_id: i64,
        position: u64,
    ) -> Result<(), anyhow::Error> {
        let url = format!("{}/watch/update/{}", self.base_url, session_id);
        let body = serde_json::json!({
            "channel_id": channel_id,
            "watch_position": position,
        });
        let resp: WatchUpdateResponse =
            self.client.post(&url).json(&body).send().await?.json().await?;
        if !resp.success {
            return Err(envelope_error(resp.error));
        }
        Ok(())
    }

    pub async fn get_continue_watching(
        &self,
        session_id: &str,
    ) -> Result<Vec<WatchEntry>, anyhow::Error> {
        let url = format!("{}/watch/continue/{}", self.base_url, session_id);
        let resp: ContinueWatchingResponse = self.client.get(&url).send().await?.json().await?;
        if !resp.success {
            return Err(envelope_error(resp.error));
        }
        Ok(resp.continue_watching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_entry_parses_offsetless_backend_timestamp() {
        // Wire-exact shape: the backend's isoformat() carries no UTC offset.
        let raw = r#"{
            "channel_id": 5,
            "channel_name": "Channel 5",
            "watch_position": 130,
            "last_watched_at": "2026-08-31T10:15:30.123456",
            "channel": null
        }"#;
        let entry: WatchEntry = serde_json::from_str(raw).unwrap();
        let ts = entry.last_watched_at.unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-08-31T10:15:30.123456+00:00");
    }

    #[test]
    fn watch_entry_accepts_offset_and_missing_timestamps() {
        let with_offset = r#"{
            "channel_id": 5,
            "channel_name": null,
            "watch_position": 10,
            "last_watched_at": "2026-08-31T10:15:30+02:00"
        }"#;
        let entry: WatchEntry = serde_json::from_str(with_offset).unwrap();
        assert_eq!(
            entry.last_watched_at.unwrap().to_rfc3339(),
            "2026-08-31T08:15:30+00:00"
        );

        let without = r#"{
            "channel_id": 5,
            "channel_name": null,
            "watch_position": 10,
            "last_watched_at": null
        }"#;
        let entry: WatchEntry = serde_json::from_str(without).unwrap();
        assert!(entry.last_watched_at.is_none());
    }

    #[test]
    fn channel_display_name_falls_back_to_tvg_name() {
        let named = Channel {
            name: "Das Erste".to_string(),
            tvg_name: Some("ARD".to_string()),
            ..Default::default()
        };
        assert_eq!(named.display_name(), "Das Erste");

        let tvg_only = Channel {
            tvg_name: Some("ARD".to_string()),
            ..Default::default()
        };
        assert_eq!(tvg_only.display_name(), "ARD");

        let nameless = Channel::default();
        assert_eq!(nameless.display_name(), "Unnamed Channel");
    }

    #[test]
    fn adult_category_code_maps_to_display_name() {
        let adult = Country {
            id: 99,
            name: "XXX".to_string(),
            display_name: "XXX".to_string(),
            channel_count: 10,
        };
        assert_eq!(adult.friendly_name(), "Adult");
    }
}
