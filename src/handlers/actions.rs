//! User-intent handlers: mutate app state through its entry points, then
//! spawn the backend calls the mutation asked for. Results come back as
//! `AsyncAction`s on the event loop.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{BackendClient, Channel, Country, SubCategory};
use crate::app::{App, AsyncAction};
use crate::catalog::FetchTag;
use crate::player::{MediaEvent, PositionReport};

/// Session startup: stats, continue-watching list, and the country tree.
pub fn startup(app: &mut App, tx: &mpsc::Sender<AsyncAction>) {
    let Some(client) = app.client.clone() else {
        return;
    };

    {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match client.get_status().await {
                Ok(stats) => {
                    let _ = tx.send(AsyncAction::StatusLoaded(stats)).await;
                }
                Err(e) => {
                    let _ = tx.send(AsyncAction::StatusFailed(e.to_string())).await;
                }
            }
        });
    }

    {
        let client = client.clone();
        let tx = tx.clone();
        let session_id = app.config.session_id.clone();
        tokio::spawn(async move {
            match client.get_continue_watching(&session_id).await {
                Ok(entries) => {
                    let _ = tx.send(AsyncAction::ContinueWatchingLoaded(entries)).await;
                }
                Err(e) => {
                    let _ = tx
                        .send(AsyncAction::ContinueWatchingFailed(e.to_string()))
                        .await;
                }
            }
        });
    }

    if app.categories.begin_countries() {
        let tx = tx.clone();
        tokio::spawn(async move {
            match client.get_main_categories().await {
                Ok(countries) => {
                    let _ = tx.send(AsyncAction::CountriesLoaded(countries)).await;
                }
                Err(e) => {
                    let _ = tx.send(AsyncAction::CountriesFailed(e.to_string())).await;
                }
            }
        });
    }

    // Unfiltered page 1 so the shell has content before any selection.
    let query = app.current_query();
    if let Some(tag) = app.catalog.begin_query(query) {
        spawn_channels_fetch(app, tx, tag);
    }
}

pub fn select_country(app: &mut App, tx: &mpsc::Sender<AsyncAction>, country: &Country) {
    if let Some(tag) = app.select_country(country) {
        spawn_channels_fetch(app, tx, tag);
    }
}

pub fn select_sub_category(
    app: &mut App,
    tx: &mpsc::Sender<AsyncAction>,
    country: &Country,
    sub: &SubCategory,
) {
    if let Some(tag) = app.select_sub_category(country, sub) {
        spawn_channels_fetch(app, tx, tag);
    }
}

pub fn set_search(app: &mut App, tx: &mpsc::Sender<AsyncAction>, text: &str) {
    if let Some(tag) = app.set_search(text) {
        spawn_channels_fetch(app, tx, tag);
    }
}

pub fn load_more(app: &mut App, tx: &mpsc::Sender<AsyncAction>) {
    if let Some(tag) = app.load_more() {
        spawn_channels_fetch(app, tx, tag);
    }
}

/// Expand/collapse a country row, fetching its sub-categories on first
/// expansion. Repeat expansions hit the cache and spawn nothing.
pub fn toggle_country_expansion(app: &mut App, tx: &mpsc::Sender<AsyncAction>, country_id: i64) {
    if !app.toggle_country_expansion(country_id) {
        return;
    }
    let Some(client) = app.client.clone() else {
        return;
    };
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.get_sub_categories(country_id).await {
            Ok(subs) => {
                let _ = tx
                    .send(AsyncAction::SubCategoriesLoaded(country_id, subs))
                    .await;
            }
            Err(e) => {
                let _ = tx
                    .send(AsyncAction::SubCategoriesFailed(country_id, e.to_string()))
                    .await;
            }
        }
    });
}

/// Start playing a channel. Returns the stream epoch the driver must tag the
/// new source's media events with.
pub fn select_channel(app: &mut App, channel: Arc<Channel>) -> u64 {
    app.select_channel(channel)
}

/// Feed one media event through the playback controller; if the tick crossed
/// a position boundary, fire the throttled persistence call.
pub fn handle_media_event(
    app: &mut App,
    tx: &mpsc::Sender<AsyncAction>,
    epoch: u64,
    event: MediaEvent,
) {
    if let Some(report) = app.player.handle_media_event(epoch, event) {
        report_position(app, tx, report);
    }
}

/// Fire-and-forget watch-position persistence. A failure is logged and
/// dropped; the next boundary re-attempts with fresher data.
pub fn report_position(app: &App, tx: &mpsc::Sender<AsyncAction>, report: PositionReport) {
    let Some(client) = app.client.clone() else {
        return;
    };
    let tx = tx.clone();
    let session_id = app.config.session_id.clone();
    tokio::spawn(async move {
        match client
            .update_watch_position(&session_id, report.channel_id, report.position)
            .await
        {
            Ok(()) => {
                let _ = tx
                    .send(AsyncAction::WatchPositionSaved(
                        report.stream_epoch,
                        report.channel_id,
                        report.position,
                    ))
                    .await;
            }
            Err(e) => {
                // Best-effort telemetry: logged, never retried, never shown.
                let err = crate::errors::ViewerError::PersistenceFailure(e.to_string());
                tracing::warn!(
                    %err,
                    channel_id = report.channel_id,
                    position = report.position,
                );
            }
        }
    });
}

fn spawn_channels_fetch(app: &App, tx: &mpsc::Sender<AsyncAction>, tag: FetchTag) {
    let Some(client) = app.client.clone() else {
        return;
    };
    let tx = tx.clone();
    tokio::spawn(async move {
        fetch_channels(client, tag, tx).await;
    });
}

async fn fetch_channels(client: BackendClient, tag: FetchTag, tx: mpsc::Sender<AsyncAction>) {
    match client.get_channels(&tag.query, tag.page).await {
        Ok((channels, pagination)) => {
            let _ = tx
                .send(AsyncAction::ChannelsLoaded(tag, channels, pagination))
                .await;
        }
        Err(e) => {
            let _ = tx.send(AsyncAction::ChannelsFailed(tag, e.to_string())).await;
        }
    }
}
