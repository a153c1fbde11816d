// ── Incremental paged fetch ──
//
// The controller lists alarms and events newest first. A scan walks pages
// until it meets the first record at or before the watermark, or until
// the controller runs out of records.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use notifly_api::Pagination;

use crate::model::Timestamped;

/// Records requested per page, and the step of the growing law.
pub const PAGE_SIZE: u32 = 20;

/// Upper bound on pages per scan, for controllers that ignore `_start`.
const MAX_PAGES: usize = 500;

/// How the page window moves between requests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PageGrowth {
    /// Every page holds `PAGE_SIZE` records.
    #[default]
    Fixed,
    /// Each page is `PAGE_SIZE` larger than the previous one.
    Growing,
}

/// Endless sequence of page windows: (0,20), (20,20), (40,20), ... for
/// fixed pages, (0,20), (20,40), (60,60), ... for growing ones.
#[derive(Debug, Clone)]
pub struct Cursor {
    growth: PageGrowth,
    start: u32,
    limit: u32,
}

impl Cursor {
    pub fn new(growth: PageGrowth) -> Self {
        Self {
            growth,
            start: 0,
            limit: 0,
        }
    }
}

impl Iterator for Cursor {
    type Item = Pagination;

    fn next(&mut self) -> Option<Pagination> {
        self.start = self.start.saturating_add(self.limit);
        self.limit = match self.growth {
            PageGrowth::Fixed => PAGE_SIZE,
            PageGrowth::Growing => self.limit.saturating_add(PAGE_SIZE),
        };
        Some(Pagination::new(self.start, self.limit))
    }
}

/// Collect every record strictly newer than `since`, in the order the
/// controller returned them.
///
/// `fetch_page` is called once per window. The first record at or before
/// `since` ends the scan, as does a page shorter than its window. Any
/// error aborts the scan and nothing collected so far is returned.
pub async fn collect_since<R, E, F, Fut>(
    mut fetch_page: F,
    since: DateTime<Utc>,
    growth: PageGrowth,
) -> Result<Vec<R>, E>
where
    R: Timestamped,
    F: FnMut(Pagination) -> Fut,
    Fut: Future<Output = Result<Vec<R>, E>>,
{
    let mut collected = Vec::new();

    for (requests, page) in Cursor::new(growth).enumerate() {
        if requests == MAX_PAGES {
            warn!(pages = MAX_PAGES, "page limit reached, stopping scan");
            break;
        }

        let records = fetch_page(page).await?;
        let returned = records.len();
        debug!(start = page.start, limit = page.limit, returned, "page fetched");

        for record in records {
            if record.occurred_at() <= since {
                return Ok(collected);
            }
            collected.push(record);
        }

        let full_page = usize::try_from(page.limit).is_ok_and(|limit| returned >= limit);
        if !full_page {
            break;
        }
    }

    Ok(collected)
}
