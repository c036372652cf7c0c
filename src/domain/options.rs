//! Filter, sort, and pagination options for list and search operations.
//!
//! These are derived values, not stored state: the executor hands them to
//! the wire codec, which turns them into the vendor's `offset`,
//! `ticket_count`, `order_by`, `order_type`, and `filters` parameters.

use serde::{Deserialize, Serialize};

use super::ticket::{Ticket, TicketPriority, TicketStatus};

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Sort key for list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Sort by creation time.
    CreatedAt,
    /// Sort by last update time.
    UpdatedAt,
    /// Sort by priority.
    Priority,
}

/// Sort direction for list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Pagination and sort options for list and search operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: u32,

    /// Requested page size; the vendor snaps this up to its fixed tiers
    /// (30, 50, 100).
    pub limit: u32,

    /// Sort key, if any.
    pub sort_by: Option<SortKey>,

    /// Sort direction, if any.
    pub sort_direction: Option<SortDirection>,

    /// Whether list responses should include ticket descriptions.
    pub include_description: bool,

    /// Whether list responses should include custom fields.
    pub include_custom_fields: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_direction: None,
            include_description: false,
            include_custom_fields: false,
        }
    }
}

impl ListOptions {
    /// Creates default options (page 1, default page size).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 1-based page number (clamped to at least 1).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the requested page size (clamped to at least 1).
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Sets the sort key.
    pub fn with_sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_by = Some(key);
        self.sort_direction = Some(direction);
        self
    }

    /// Includes ticket descriptions in list responses.
    pub fn with_description(mut self) -> Self {
        self.include_description = true;
        self
    }

    /// Includes custom fields in list responses.
    pub fn with_custom_fields(mut self) -> Self {
        self.include_custom_fields = true;
        self
    }
}

/// Filter predicates for searching tickets.
///
/// All fields are optional; an empty filter set omits the vendor's `filters`
/// parameter entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketFilters {
    /// Filter by requester email.
    pub requester_email: Option<String>,

    /// Filter by assignee email.
    pub assignee_email: Option<String>,

    /// Filter by status.
    pub status: Option<TicketStatus>,

    /// Filter by priority.
    pub priority: Option<TicketPriority>,
}

impl TicketFilters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by requester email.
    pub fn with_requester(mut self, email: impl Into<String>) -> Self {
        self.requester_email = Some(email.into());
        self
    }

    /// Filters by assignee email.
    pub fn with_assignee(mut self, email: impl Into<String>) -> Self {
        self.assignee_email = Some(email.into());
        self
    }

    /// Filters by status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by priority.
    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns true if no predicates are set.
    pub fn is_empty(&self) -> bool {
        self.requester_email.is_none()
            && self.assignee_email.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// One page of tickets from a list or search operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketPage {
    /// Tickets on this page, in vendor order.
    pub tickets: Vec<Ticket>,

    /// Total number of matching tickets across all pages.
    pub total: u64,

    /// Echoed 1-based page number.
    pub page: u32,

    /// Echoed page size.
    pub limit: u32,

    /// Total number of pages: ceil(total / limit).
    pub total_pages: u64,
}

impl TicketPage {
    /// Builds a page, computing `total_pages` from total and limit.
    pub fn new(tickets: Vec<Ticket>, total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit));
        Self {
            tickets,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_defaults() {
        let opts = ListOptions::new();
        assert_eq!(opts.page, 1);
        assert_eq!(opts.limit, DEFAULT_PAGE_SIZE);
        assert!(opts.sort_by.is_none());
    }

    #[test]
    fn test_list_options_clamps_page() {
        let opts = ListOptions::new().with_page(0);
        assert_eq!(opts.page, 1);
    }

    #[test]
    fn test_filters_empty_detection() {
        assert!(TicketFilters::new().is_empty());
        assert!(!TicketFilters::new().with_requester("a@b.com").is_empty());
        assert!(!TicketFilters::new()
            .with_priority(TicketPriority::High)
            .is_empty());
    }

    #[test]
    fn test_total_pages_exact_division() {
        let page = TicketPage::new(Vec::new(), 60, 1, 30);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = TicketPage::new(Vec::new(), 31, 1, 30);
        assert_eq!(page.total_pages, 2);

        let page = TicketPage::new(Vec::new(), 1, 1, 30);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_total_pages_empty() {
        let page = TicketPage::new(Vec::new(), 0, 1, 30);
        assert_eq!(page.total_pages, 0);
    }
}
