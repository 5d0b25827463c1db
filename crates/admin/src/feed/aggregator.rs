//! Cursor walk that materializes one display page.
//!
//! Upstream only offers "the next batch after this cursor", never "page N".
//! [`load_page`] therefore walks the stream from the start, one batch at a
//! time, until the requested page is covered or the stream ends:
//!
//! ```text
//! Fetching(None, 0) ──ok──▶ covered?  ──yes──▶ Done
//!        ▲                     │no
//!        │                more pages? ──no──▶ Exhausted
//!        └────── next cursor ──┘yes
//!
//! any fetch error ──▶ Recovering ──good batch seen──▶ last reached page
//!                                └─nothing fetched──▶ Failed
//! ```
//!
//! All walk state lives in a [`CursorState`] created per call, so concurrent
//! requests never share a cursor.

use receipt_desk_core::{
    OrderRecord, PageInfo, UpstreamPageInfo, assemble, sort_by_display_id_desc, total_pages,
};
use tracing::instrument;

use super::{FeedBatch, FeedError, OrderFeed};

/// Which page to build and how to fetch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Records per displayed page.
    pub page_size: usize,
    /// Records requested per upstream call.
    pub batch_size: u32,
}

/// How the walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The requested page was fully reachable.
    Complete,
    /// Upstream ran out first; the page was clamped to the last real one.
    Exhausted,
    /// A later fetch failed; the page was clamped to the last one reached.
    Recovered,
}

/// An assembled page plus what the walk learned about the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPage {
    /// Records on this page, sorted by display id descending.
    pub orders: Vec<OrderRecord>,
    /// Pagination state.
    pub page_info: PageInfo,
    /// Size of the whole stream, known only when the walk reached its end.
    pub total_items: Option<usize>,
    /// Page count, known only when the walk reached the end of the stream.
    pub total_pages: Option<u32>,
    /// How the walk ended.
    pub outcome: WalkOutcome,
}

/// Per-request walk state.
#[derive(Debug, Default)]
struct CursorState {
    cursor: Option<String>,
    pages_fetched: u32,
    flat: Vec<OrderRecord>,
    last_page_info: UpstreamPageInfo,
}

impl CursorState {
    /// Fold a successful batch into the accumulated records.
    fn absorb(&mut self, batch: FeedBatch) {
        let FeedBatch {
            mut records,
            mut page_info,
        } = batch;

        if page_info.has_next_page && page_info.end_cursor.is_none() {
            tracing::warn!(
                pages_fetched = self.pages_fetched + 1,
                "Upstream reports more pages without a cursor; treating as end of stream"
            );
            page_info = UpstreamPageInfo::default();
        } else if page_info.has_next_page && page_info.end_cursor == self.cursor {
            tracing::warn!(
                cursor = ?self.cursor,
                "Upstream returned the same cursor again; treating as end of stream"
            );
            page_info = UpstreamPageInfo::default();
        }

        sort_by_display_id_desc(&mut records);
        self.flat.append(&mut records);
        self.pages_fetched += 1;
        self.last_page_info = page_info;
    }

    /// The last page that actually holds records, capped at `requested`.
    fn reachable_page(&self, requested: u32, page_size: usize) -> u32 {
        requested.min(total_pages(self.flat.len(), page_size))
    }

    fn finish(
        self,
        page: u32,
        page_size: usize,
        upstream: &UpstreamPageInfo,
        outcome: WalkOutcome,
    ) -> OrderPage {
        let (mut orders, page_info) = assemble(&self.flat, page, page_size, upstream);
        // A page can straddle two batches.
        sort_by_display_id_desc(&mut orders);
        let total_items = match outcome {
            WalkOutcome::Exhausted => Some(self.flat.len()),
            WalkOutcome::Complete if !self.last_page_info.has_next_page => Some(self.flat.len()),
            WalkOutcome::Complete | WalkOutcome::Recovered => None,
        };
        OrderPage {
            orders,
            page_info,
            total_items,
            total_pages: total_items.map(|n| total_pages(n, page_size)),
            outcome,
        }
    }
}

/// Walk `feed` from the start until `request.page` can be assembled.
///
/// Batches are fetched strictly in order and never twice. Each batch is
/// sorted by display id descending as it arrives, then appended to one flat
/// sequence that is cut into pages of `request.page_size`, so the upstream
/// batch size and the display page size need not match. The records of the
/// returned page are sorted again.
///
/// A page past the end of the stream is clamped to the last real page. A
/// failure after at least one good batch is logged and the walk falls back
/// to the last page it reached.
///
/// # Errors
///
/// Returns the fetch error when the very first batch fails; no partial data
/// is produced in that case.
#[instrument(skip(feed), fields(page = request.page, page_size = request.page_size))]
pub async fn load_page<F: OrderFeed>(
    feed: &F,
    request: &PageRequest,
) -> Result<OrderPage, FeedError> {
    let page = request.page.max(1);
    let page_size = request.page_size.max(1);
    let batch_size = request.batch_size.max(1);
    let needed = usize::try_from(page)
        .unwrap_or(usize::MAX)
        .saturating_mul(page_size);

    let mut state = CursorState::default();

    loop {
        let batch = match feed.fetch_batch(state.cursor.as_deref(), batch_size).await {
            Ok(batch) => batch,
            Err(e) if state.pages_fetched == 0 => {
                tracing::warn!(error = %e, "First upstream batch failed");
                return Err(e);
            }
            Err(e) => {
                let effective = state.reachable_page(page, page_size);
                tracing::warn!(
                    error = %e,
                    pages_fetched = state.pages_fetched,
                    records = state.flat.len(),
                    effective_page = effective,
                    "Upstream batch failed; falling back to last reached page"
                );
                return Ok(state.finish(
                    effective,
                    page_size,
                    &UpstreamPageInfo::default(),
                    WalkOutcome::Recovered,
                ));
            }
        };

        tracing::debug!(
            batch = state.pages_fetched + 1,
            cursor = ?state.cursor,
            records = batch.records.len(),
            has_next = batch.page_info.has_next_page,
            "Fetched upstream batch"
        );
        state.absorb(batch);

        if state.flat.len() >= needed {
            let upstream = state.last_page_info.clone();
            return Ok(state.finish(page, page_size, &upstream, WalkOutcome::Complete));
        }

        if !state.last_page_info.has_next_page {
            let effective = state.reachable_page(page, page_size);
            tracing::debug!(
                records = state.flat.len(),
                effective_page = effective,
                "Upstream exhausted before requested page"
            );
            return Ok(state.finish(
                effective,
                page_size,
                &UpstreamPageInfo::default(),
                WalkOutcome::Exhausted,
            ));
        }

        state.cursor = state.last_page_info.end_cursor.clone();
    }
}
