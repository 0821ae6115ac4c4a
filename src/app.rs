use std::sync::Arc;

use crate::api::{
    BackendClient, CatalogStats, Channel, Country, Pagination, SubCategory, WatchEntry,
};
use crate::catalog::{ChannelListState, FetchTag};
use crate::categories::CategoryTreeState;
use crate::config::AppConfig;
use crate::player::PlaybackController;
use crate::query::{CatalogQuery, CategorySelection};

/// Results of background work, delivered to the app over an mpsc channel
/// and applied on the event loop by `handlers::async_actions`.
#[derive(Debug, Clone)]
pub enum AsyncAction {
    CountriesLoaded(Vec<Country>),
    CountriesFailed(String),
    SubCategoriesLoaded(i64, Vec<SubCategory>),
    SubCategoriesFailed(i64, String),
    ChannelsLoaded(FetchTag, Vec<Channel>, Pagination),
    ChannelsFailed(FetchTag, String),
    StatusLoaded(CatalogStats),
    StatusFailed(String),
    ContinueWatchingLoaded(Vec<WatchEntry>),
    ContinueWatchingFailed(String),
    /// A watch-position write resolved. Tagged with the stream epoch it was
    /// scheduled under so a late resolution after a channel switch is
    /// discarded instead of touching the mirror.
    WatchPositionSaved(u64, i64, u64),
}

/// Process-wide viewer state. Initialized empty at session start; category
/// caches live for the session, playback/query state is replaced on
/// selection changes and cleared on teardown.
pub struct App {
    pub config: AppConfig,
    pub client: Option<BackendClient>,
    pub stats: Option<CatalogStats>,
    pub stats_error: Option<String>,
    pub continue_watching: Vec<WatchEntry>,
    pub selection: Option<CategorySelection>,
    pub search_text: String,
    pub categories: CategoryTreeState,
    pub catalog: ChannelListState,
    pub player: PlaybackController,
}

impl App {
    pub fn new() -> Self {
        let config = AppConfig::load().unwrap_or_default();
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let client = Some(BackendClient::new(config.api_base_url.clone()));
        Self {
            config,
            client,
            stats: None,
            stats_error: None,
            continue_watching: Vec::new(),
            selection: None,
            search_text: String::new(),
            categories: CategoryTreeState::new(),
            catalog: ChannelListState::new(),
            player: PlaybackController::new(),
        }
    }

    /// Current canonical query for the selection/search pair.
    pub fn current_query(&self) -> CatalogQuery {
        CatalogQuery::derive(self.selection.as_ref(), &self.search_text)
    }

    /// Select a country. Clears any active search and any sub-category
    /// filter, then starts a page-1 fetch for the new query.
    pub fn select_country(&mut self, country: &Country) -> Option<FetchTag> {
        self.search_text.clear();
        self.selection = Some(CategorySelection::Country {
            id: country.id,
            name: country.friendly_name().to_string(),
            channel_count: country.channel_count,
        });
        let query = self.current_query();
        self.catalog.begin_query(query)
    }

    /// Select a sub-category; the owning country rides along.
    pub fn select_sub_category(
        &mut self,
        country: &Country,
        sub: &SubCategory,
    ) -> Option<FetchTag> {
        self.search_text.clear();
        self.selection = Some(CategorySelection::SubCategory {
            id: sub.id,
            country_id: country.id,
            country_name: country.friendly_name().to_string(),
            name: sub.name.clone(),
            channel_count: sub.channel_count,
        });
        let query = self.current_query();
        self.catalog.begin_query(query)
    }

    /// Search and category are mutually exclusive filters: typing clears the
    /// selected category entirely and resets to page 1.
    pub fn set_search(&mut self, text: &str) -> Option<FetchTag> {
        self.search_text = text.to_string();
        if !self.search_text.trim().is_empty() {
            self.selection = None;
        }
        let query = self.current_query();
        self.catalog.begin_query(query)
    }

    /// Next page of the current query, if one is available and nothing is in
    /// flight. No-op otherwise.
    pub fn load_more(&mut self) -> Option<FetchTag> {
        self.catalog.begin_load_more()
    }

    /// Expand/collapse a country row; returns `true` when a sub-category
    /// fetch must be issued.
    pub fn toggle_country_expansion(&mut self, country_id: i64) -> bool {
        self.categories.toggle_expansion(country_id)
    }

    /// Start playback of a channel. Returns the new stream epoch for the
    /// driver to tag media events with.
    pub fn select_channel(&mut self, channel: Arc<Channel>) -> u64 {
        self.player.load_channel(channel)
    }

    /// Last persisted position for a channel, for resume-near-position.
    pub fn resume_position(&self, channel_id: i64) -> Option<u64> {
        self.continue_watching
            .iter()
            .find(|entry| entry.channel_id == channel_id)
            .map(|entry| entry.watch_position)
    }

    /// Optimistically reflect a confirmed watch-position write into the
    /// local continue-watching mirror.
    pub(crate) fn mirror_watch_position(&mut self, channel_id: i64, position: u64) {
        if let Some(entry) = self
            .continue_watching
            .iter_mut()
            .find(|entry| entry.channel_id == channel_id)
        {
            entry.watch_position = position;
            entry.last_watched_at = Some(chrono::Utc::now());
            return;
        }
        let channel = self
            .player
            .channel()
            .filter(|c| c.id == channel_id)
            .map(|c| (**c).clone());
        let channel_name = channel.as_ref().map(|c| c.display_name().to_string());
        self.continue_watching.push(WatchEntry {
            channel_id,
            channel_name,
            watch_position: position,
            last_watched_at: Some(chrono::Utc::now()),
            channel,
        });
    }

    /// Header badge text for the active filter.
    pub fn filter_display_text(&self) -> String {
        if !self.search_text.trim().is_empty() {
            return format!("Results for \"{}\"", self.search_text.trim());
        }
        match &self.selection {
            Some(selection) => selection.display_text(),
            None => "All Channels".to_string(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
