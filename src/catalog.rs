use std::sync::Arc;

use crate::api::{Channel, Pagination};
use crate::query::CatalogQuery;

/// Identity of one in-flight channel fetch.
///
/// Every fetch is tagged with the request epoch that spawned it. Responses
/// whose epoch no longer matches the list's current epoch are stale and must
/// be dropped, never merged. This is what keeps a slow page-1 response for an
/// old search from clobbering a newly selected category's results.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTag {
    pub epoch: u64,
    pub page: usize,
    pub query: CatalogQuery,
}

/// State of the displayed, paginated channel list.
///
/// Mutated only through `begin_*` / `apply_*`; the async layer holds a
/// `FetchTag` and hands results back through them.
pub struct ChannelListState {
    query: CatalogQuery,
    epoch: u64,
    channels: Vec<Arc<Channel>>,
    pagination: Option<Pagination>,
    pages_loaded: usize,
    loading: bool,
    error: Option<String>,
}

impl Default for ChannelListState {
    fn default() -> Self {
        Self {
            query: CatalogQuery::all(),
            epoch: 0,
            channels: Vec::new(),
            pagination: None,
            pages_loaded: 0,
            loading: false,
            error: None,
        }
    }
}

impl ChannelListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new query and start a page-1 fetch.
    ///
    /// Bumping the epoch logically cancels every fetch still in flight.
    /// Returns `None` when the same filter is already being fetched, so an
    /// unchanged context never issues two concurrent requests. Previously
    /// displayed channels stay visible until the new page resolves.
    pub fn begin_query(&mut self, query: CatalogQuery) -> Option<FetchTag> {
        if self.loading && query.same_filter(&self.query) {
            return None;
        }
        self.epoch += 1;
        self.query = query.clone();
        self.loading = true;
        self.error = None;
        Some(FetchTag {
            epoch: self.epoch,
            page: 1,
            query,
        })
    }

    /// Request the next page of the current query.
    ///
    /// A no-op (not an error) while a fetch is in flight or after the last
    /// page; the epoch is unchanged so the append still belongs to the same
    /// result set.
    pub fn begin_load_more(&mut self) -> Option<FetchTag> {
        if self.loading || !self.has_next() {
            return None;
        }
        self.loading = true;
        Some(FetchTag {
            epoch: self.epoch,
            page: self.pages_loaded + 1,
            query: self.query.clone(),
        })
    }

    /// Apply a resolved page. Returns `false` when the response was stale
    /// and dropped.
    pub fn apply_page(
        &mut self,
        tag: &FetchTag,
        channels: Vec<Channel>,
        pagination: Pagination,
    ) -> bool {
        if tag.epoch != self.epoch {
            tracing::debug!(
                tag_epoch = tag.epoch,
                current_epoch = self.epoch,
                "dropping stale channel page"
            );
            return false;
        }
        if tag.page == 1 {
            self.channels = channels.into_iter().map(Arc::new).collect();
            self.pages_loaded = 1;
        } else {
            // Out-of-order appends cannot happen with a single in-flight
            // fetch per epoch, but the tag check keeps it deterministic.
            if tag.page != self.pages_loaded + 1 {
                tracing::debug!(page = tag.page, "dropping out-of-order channel page");
                return false;
            }
            self.channels.extend(channels.into_iter().map(Arc::new));
            self.pages_loaded = tag.page;
        }
        self.pagination = Some(pagination);
        self.loading = false;
        self.error = None;
        true
    }

    /// Apply a failed fetch. A stale failure is dropped so it never clears
    /// the list belonging to a newer, still-valid query. A page-1 failure
    /// empties the list; a failed load-more keeps the pages already shown
    /// and only surfaces the error string.
    pub fn apply_error(&mut self, tag: &FetchTag, message: String) -> bool {
        if tag.epoch != self.epoch {
            tracing::debug!(tag_epoch = tag.epoch, "dropping stale channel fetch error");
            return false;
        }
        self.loading = false;
        if tag.page == 1 {
            self.channels.clear();
            self.pagination = None;
            self.pages_loaded = 0;
        }
        self.error = Some(message);
        true
    }

    pub fn channels(&self) -> &[Arc<Channel>] {
        &self.channels
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total(&self) -> usize {
        self.pagination.as_ref().map(|p| p.total).unwrap_or(0)
    }

    /// More pages available, derived from the last pagination response.
    pub fn has_next(&self) -> bool {
        self.pagination.as_ref().map(|p| p.has_next).unwrap_or(false)
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }
}
