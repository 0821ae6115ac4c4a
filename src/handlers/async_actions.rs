//! Applies resolved background work to the app state.
//!
//! Every channel response carries the `FetchTag` of the fetch that produced
//! it; the catalog state drops tags from a superseded query. Watch-position
//! confirmations carry the stream epoch they were scheduled under and are
//! discarded after a channel switch.

use crate::app::{App, AsyncAction};
use crate::errors::{FetchTarget, ViewerError};

pub fn handle_async_action(app: &mut App, action: AsyncAction) {
    match action {
        AsyncAction::CountriesLoaded(countries) => {
            app.categories.apply_countries(countries);
        }
        AsyncAction::CountriesFailed(e) => {
            let err = ViewerError::FetchFailure(FetchTarget::Countries, e.clone());
            tracing::warn!(%err, "fetch failed");
            app.categories.apply_countries_error(e);
        }
        AsyncAction::SubCategoriesLoaded(country_id, subs) => {
            app.categories.apply_sub_categories(country_id, subs);
        }
        AsyncAction::SubCategoriesFailed(country_id, e) => {
            let err = ViewerError::FetchFailure(FetchTarget::SubCategories, e.clone());
            tracing::warn!(%err, country_id, "fetch failed");
            app.categories.apply_sub_categories_error(country_id, e);
        }
        AsyncAction::ChannelsLoaded(tag, channels, pagination) => {
            app.catalog.apply_page(&tag, channels, pagination);
        }
        AsyncAction::ChannelsFailed(tag, e) => {
            if app.catalog.apply_error(&tag, e.clone()) {
                let err = ViewerError::FetchFailure(FetchTarget::Channels, e);
                tracing::warn!(%err, "fetch failed");
            }
        }
        AsyncAction::StatusLoaded(stats) => {
            app.stats = Some(stats);
            app.stats_error = None;
        }
        AsyncAction::StatusFailed(e) => {
            let err = ViewerError::FetchFailure(FetchTarget::Status, e.clone());
            tracing::warn!(%err, "fetch failed");
            app.stats_error = Some(e);
        }
        AsyncAction::ContinueWatchingLoaded(entries) => {
            app.continue_watching = entries;
        }
        AsyncAction::ContinueWatchingFailed(e) => {
            let err = ViewerError::FetchFailure(FetchTarget::ContinueWatching, e);
            tracing::warn!(%err, "fetch failed");
        }
        AsyncAction::WatchPositionSaved(stream_epoch, channel_id, position) => {
            if stream_epoch != app.player.stream_epoch() {
                tracing::debug!(
                    channel_id,
                    "dropping watch-position confirmation for a replaced stream"
                );
                return;
            }
            app.mirror_watch_position(channel_id, position);
        }
    }
}
