use iptv_viewer_lib::api::{Channel, Country, Pagination, SubCategory};
use iptv_viewer_lib::app::{App, AsyncAction};
use iptv_viewer_lib::config::AppConfig;
use iptv_viewer_lib::handlers::async_actions::handle_async_action;

fn test_app() -> App {
    App::with_config(AppConfig {
        api_base_url: "http://localhost:5000/api".to_string(),
        session_id: "test".to_string(),
    })
}

fn germany() -> Country {
    Country {
        id: 7,
        name: "DE".to_string(),
        display_name: "DE".to_string(),
        channel_count: 120,
    }
}

fn make_channels(start: i64, count: usize) -> Vec<Channel> {
    (0..count as i64)
        .map(|i| Channel {
            id: start + i,
            name: format!("Channel {}", start + i),
            stream_url: format!("http://example.com/{}.m3u8", start + i),
            ..Default::default()
        })
        .collect()
}

fn page(page: usize, total: usize, has_next: bool) -> Pagination {
    Pagination {
        page,
        per_page: 50,
        total,
        pages: total.div_ceil(50),
        has_next,
        has_prev: page > 1,
    }
}

#[test]
fn slow_stale_response_never_clobbers_new_selection() {
    let mut app = test_app();

    // User selects DE; that fetch will resolve slowly.
    let de_tag = app.select_country(&germany()).expect("fetch issued");

    // Before DE resolves the user searches, superseding the DE fetch.
    let sport_tag = app.set_search("sport").expect("fetch issued");
    assert_ne!(de_tag.epoch, sport_tag.epoch);

    // Search resolves first.
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(sport_tag, make_channels(1000, 8), page(1, 8, false)),
    );
    assert_eq!(app.catalog.channels().len(), 8);

    // The slow DE response finally arrives and must be dropped.
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(de_tag, make_channels(1, 50), page(1, 120, true)),
    );
    assert_eq!(app.catalog.channels().len(), 8);
    assert_eq!(app.catalog.channels()[0].id, 1000);
    assert_eq!(app.catalog.total(), 8);
}

#[test]
fn country_with_120_channels_pages_in_three_fetches() {
    let mut app = test_app();

    let tag1 = app.select_country(&germany()).expect("page 1 issued");
    assert_eq!(tag1.page, 1);
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(tag1, make_channels(1, 50), page(1, 120, true)),
    );
    assert_eq!(app.catalog.channels().len(), 50);
    assert!(app.catalog.has_next());

    let tag2 = app.load_more().expect("page 2 issued");
    assert_eq!(tag2.page, 2);
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(tag2, make_channels(51, 50), page(2, 120, true)),
    );
    assert_eq!(app.catalog.channels().len(), 100);

    let tag3 = app.load_more().expect("page 3 issued");
    assert_eq!(tag3.page, 3);
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(tag3, make_channels(101, 20), page(3, 120, false)),
    );
    assert_eq!(app.catalog.channels().len(), 120);
    assert!(!app.catalog.has_next());

    // Arrival order preserved across appends.
    assert_eq!(app.catalog.channels()[0].id, 1);
    assert_eq!(app.catalog.channels()[99].id, 100);
    assert_eq!(app.catalog.channels()[119].id, 120);

    // Past the last page, load_more is a no-op.
    assert!(app.load_more().is_none());
}

#[test]
fn load_more_is_noop_while_a_fetch_is_in_flight() {
    let mut app = test_app();

    let tag1 = app.select_country(&germany()).expect("page 1 issued");
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(tag1, make_channels(1, 50), page(1, 120, true)),
    );

    let tag2 = app.load_more().expect("page 2 issued");
    // Second call while page 2 is outstanding: no tag, no duplicate fetch.
    assert!(app.load_more().is_none());

    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(tag2, make_channels(51, 50), page(2, 120, true)),
    );
    assert_eq!(app.catalog.channels().len(), 100);
}

#[test]
fn reselecting_unchanged_filter_in_flight_is_suppressed() {
    let mut app = test_app();

    let first = app.select_country(&germany());
    assert!(first.is_some());
    let second = app.select_country(&germany());
    assert!(second.is_none());
}

#[test]
fn search_replaces_category_results_entirely() {
    let mut app = test_app();

    let de_tag = app.select_country(&germany()).expect("fetch issued");
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(de_tag, make_channels(1, 50), page(1, 120, true)),
    );
    assert_eq!(app.catalog.channels().len(), 50);

    let sport_tag = app.set_search("sport").expect("fetch issued");
    assert!(app.selection.is_none());
    assert!(app.catalog.query().is_search());
    // Old results stay visible until the new page resolves.
    assert_eq!(app.catalog.channels().len(), 50);

    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(sport_tag, make_channels(900, 12), page(1, 12, false)),
    );
    assert_eq!(app.catalog.channels().len(), 12);
    assert_eq!(app.catalog.channels()[0].id, 900);
}

#[test]
fn failed_fetch_surfaces_error_without_retry() {
    let mut app = test_app();

    let tag = app.select_country(&germany()).expect("fetch issued");
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsFailed(tag, "connection refused".to_string()),
    );
    assert!(app.catalog.channels().is_empty());
    assert_eq!(app.catalog.error(), Some("connection refused"));
    assert!(!app.catalog.is_loading());
}

#[test]
fn failed_load_more_keeps_already_loaded_pages() {
    let mut app = test_app();

    let tag1 = app.select_country(&germany()).expect("page 1 issued");
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(tag1, make_channels(1, 50), page(1, 120, true)),
    );

    let tag2 = app.load_more().expect("page 2 issued");
    handle_async_action(&mut app, AsyncAction::ChannelsFailed(tag2, "timeout".to_string()));

    // Page 1 stays on screen; only the error string surfaces.
    assert_eq!(app.catalog.channels().len(), 50);
    assert_eq!(app.catalog.error(), Some("timeout"));
    assert!(!app.catalog.is_loading());

    // The next page is still reachable after the failure.
    let retry = app.load_more().expect("retry issued");
    assert_eq!(retry.page, 2);
}

#[test]
fn stale_failure_does_not_clear_newer_query_results() {
    let mut app = test_app();

    let de_tag = app.select_country(&germany()).expect("fetch issued");

    let sub = SubCategory {
        id: 42,
        name: "News".to_string(),
        channel_count: 5,
    };
    let sub_tag = app
        .select_sub_category(&germany(), &sub)
        .expect("fetch issued");
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(sub_tag, make_channels(500, 5), page(1, 5, false)),
    );
    assert_eq!(app.catalog.channels().len(), 5);

    // The superseded DE fetch fails late; the failure is a designed no-op.
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsFailed(de_tag, "timeout".to_string()),
    );
    assert_eq!(app.catalog.channels().len(), 5);
    assert!(app.catalog.error().is_none());
}

#[test]
fn last_selection_wins_across_many_interleavings() {
    let mut app = test_app();

    let de_tag = app.select_country(&germany()).expect("fetch issued");
    let news_tag = app.set_search("news").expect("fetch issued");
    let sport_tag = app.set_search("sport").expect("fetch issued");

    // Resolve in scrambled order: sport (current), then news, then de.
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(sport_tag, make_channels(300, 3), page(1, 3, false)),
    );
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(news_tag, make_channels(200, 7), page(1, 7, false)),
    );
    handle_async_action(
        &mut app,
        AsyncAction::ChannelsLoaded(de_tag, make_channels(1, 50), page(1, 120, true)),
    );

    let ids: Vec<i64> = app.catalog.channels().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![300, 301, 302]);
}
