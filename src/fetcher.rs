//! Exhaustive draining of remote paged queries.

use crate::error::InventoryError;
use crate::inventory::{InventoryService, RemoteAdUnit, Statement};

/// Fetch every record matching `statement`, one page at a time.
///
/// The remote answers bounded pages plus a total count, so the offset
/// cursor is advanced until that total is exhausted. The first request
/// always runs before the termination check: the total is only known from
/// a fetched page, and a fresh page reports 0. An empty page ends the
/// drain regardless of the claimed total.
///
/// A remote failure aborts the whole fetch; no retries, no partial
/// results.
pub async fn fetch_all(
    service: &dyn InventoryService,
    mut statement: Statement,
) -> Result<Vec<RemoteAdUnit>, InventoryError> {
    let mut records = Vec::new();

    loop {
        let page = service.ad_units_by_statement(&statement).await?;
        let exhausted = page.results.is_empty();
        records.extend(page.results);
        statement.advance();

        if exhausted || statement.offset >= page.total_result_set_size {
            break;
        }
    }

    Ok(records)
}
