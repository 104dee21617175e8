use crate::core::pagination::{PageEnvelope, PageMeta, assemble};
use crate::core::query::{EchoedFilters, QueryRequest};
use crate::db::pool::DbPool;
use crate::db::queries::{count_entries, fetch_entries};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};

/// What the listing endpoint returns: the page plus the filter state that
/// actually produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub entries: PageEnvelope,
    pub filters: EchoedFilters,
}

pub struct ListingLogic;

impl ListingLogic {
    /// Count the filtered set, clamp the page against it, fetch one window.
    /// Store failures propagate unchanged.
    pub fn query(pool: &DbPool, request: &QueryRequest, path: &str) -> AppResult<PageEnvelope> {
        let store_query = request.store_query();

        let total = count_entries(&pool.conn, &store_query)?;
        let meta = PageMeta::compute(total, request.page, request.per_page);

        let items = if total == 0 {
            Vec::new()
        } else {
            fetch_entries(&pool.conn, &store_query, meta.per_page, meta.offset())?
        };

        Ok(assemble(items, meta, request, path))
    }

    pub fn respond(pool: &DbPool, request: &QueryRequest, path: &str) -> AppResult<ListingResponse> {
        Ok(ListingResponse {
            entries: Self::query(pool, request, path)?,
            filters: request.filters(),
        })
    }
}
