//! Offset pagination over a table.
//!
//! A page request is a 1-based page number and a page size. Both come from
//! clients and are clamped rather than rejected: pages below 1 become 1 and
//! sizes outside `1..=MAX_PAGE_SIZE` fall back to `DEFAULT_PAGE_SIZE`. A page
//! past the end is a normal, empty result.
//!
//! # Example
//!
//! ```no_run
//! use table_manager::{LinkStrategy, TableManager};
//!
//! # async fn demo(manager: TableManager) -> table_manager::Result<()> {
//! let page = manager.paginate("users", 2, 10).await?;
//! println!("page {} of {}", page.current_page(), page.total_pages());
//!
//! // Reusable paginator with a bounded link list
//! let paginator = manager
//!    .paginator("users", 25)
//!    .with_links(LinkStrategy::Window { radius: 2 });
//! let page = paginator.fetch(40).await?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::debug;

use crate::manager::TableManager;
use crate::value::Record;
use crate::Result;

/// Page size used when the requested one is out of range.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a single query may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page number to at least 1.
pub fn clamp_page(page: i64) -> i64 {
   page.max(1)
}

/// Keep `limit` when it is within `1..=MAX_PAGE_SIZE`, else use the default.
pub fn clamp_limit(limit: i64) -> i64 {
   if (1..=MAX_PAGE_SIZE).contains(&limit) {
      limit
   } else {
      DEFAULT_PAGE_SIZE
   }
}

/// Rows to skip before `page` (both arguments already clamped).
pub fn page_offset(page: i64, limit: i64) -> i64 {
   (page - 1).saturating_mul(limit)
}

/// `ceil(total / limit)`; zero rows means zero pages.
pub fn total_pages(total: u64, limit: u64) -> u64 {
   if limit == 0 {
      return 0;
   }
   total.div_ceil(limit)
}

/// Which page numbers to offer as navigation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStrategy {
   /// Every page, `1..=total_pages`. The list grows with the table.
   #[default]
   All,
   /// Pages within `radius` of the current page, clipped to the valid range.
   Window { radius: u64 },
}

impl LinkStrategy {
   pub fn links(self, current_page: u64, total_pages: u64) -> Vec<u64> {
      match self {
         LinkStrategy::All => (1..=total_pages).collect(),
         LinkStrategy::Window { radius } => {
            if total_pages == 0 {
               return Vec::new();
            }
            let center = current_page.clamp(1, total_pages);
            let start = center.saturating_sub(radius).max(1);
            let end = center.saturating_add(radius).min(total_pages);
            (start..=end).collect()
         }
      }
   }
}

/// One page of rows with navigation metadata.
///
/// Immutable once built; `has_next` and `has_prev` are always derived from
/// `current_page` and `total_pages` in [`PaginationResult::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult {
   data: Vec<Record>,
   links: Vec<u64>,
   total: u64,
   total_pages: u64,
   current_page: u64,
   has_next: bool,
   has_prev: bool,
}

impl PaginationResult {
   pub fn new(
      data: Vec<Record>,
      links: Vec<u64>,
      total: u64,
      total_pages: u64,
      current_page: u64,
   ) -> Self {
      Self {
         data,
         links,
         total,
         total_pages,
         current_page,
         has_next: current_page < total_pages,
         has_prev: current_page > 1,
      }
   }

   /// Rows of this page, in database return order.
   pub fn data(&self) -> &[Record] {
      &self.data
   }

   pub fn links(&self) -> &[u64] {
      &self.links
   }

   /// Rows in the whole table.
   pub fn total(&self) -> u64 {
      self.total
   }

   pub fn total_pages(&self) -> u64 {
      self.total_pages
   }

   pub fn current_page(&self) -> u64 {
      self.current_page
   }

   pub fn has_next(&self) -> bool {
      self.has_next
   }

   pub fn has_prev(&self) -> bool {
      self.has_prev
   }

   pub fn into_data(self) -> Vec<Record> {
      self.data
   }
}

/// Pages through one table with a fixed page size.
#[derive(Debug, Clone)]
pub struct Paginator {
   manager: TableManager,
   table: String,
   limit: i64,
   links: LinkStrategy,
}

impl Paginator {
   pub fn new(manager: TableManager, table: impl Into<String>, limit: i64) -> Self {
      Self {
         manager,
         table: table.into(),
         limit: clamp_limit(limit),
         links: LinkStrategy::default(),
      }
   }

   /// Replace the link strategy (default [`LinkStrategy::All`]).
   pub fn with_links(mut self, links: LinkStrategy) -> Self {
      self.links = links;
      self
   }

   pub fn table(&self) -> &str {
      &self.table
   }

   /// Effective page size after clamping.
   pub fn limit(&self) -> i64 {
      self.limit
   }

   /// Count the table, fetch the requested page and assemble the result.
   pub async fn fetch(&self, page: i64) -> Result<PaginationResult> {
      let page = clamp_page(page);

      let total = self.manager.count(&self.table).await?;
      let total_pages = total_pages(total, self.limit.unsigned_abs());
      let data = self.manager.fetch_page(&self.table, page, self.limit).await?;

      let current_page = page.unsigned_abs();
      let links = self.links.links(current_page, total_pages);

      debug!(
         table = %self.table,
         page = current_page,
         limit = self.limit,
         total,
         total_pages,
         rows = data.len(),
         "Paginated table"
      );

      Ok(PaginationResult::new(
         data,
         links,
         total,
         total_pages,
         current_page,
      ))
   }
}
