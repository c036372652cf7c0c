//! Ticket entities and lifecycle enums.
//!
//! Tickets are immutable value objects constructed by the wire codec from
//! vendor payloads, or built by callers (via [`NewTicket`] / [`TicketUpdate`])
//! on the way out. Missing vendor data is replaced with fixed sentinel values
//! rather than propagated as emptiness, so every successful mapping yields a
//! complete entity.

use serde::{Deserialize, Serialize};

use super::message::TicketMessage;

/// Sentinel ticket id used when the vendor omits both identifier fields.
pub const UNKNOWN_TICKET_ID: &str = "unknown";

/// Sentinel subject used when the vendor omits the subject.
pub const UNKNOWN_SUBJECT: &str = "Unknown Subject";

/// Normalized ticket status.
///
/// The vendor speaks lowercase strings on the wire; unrecognized values
/// map to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Ticket is open and awaiting action.
    Open,
    /// Ticket has been closed.
    Closed,
    /// Ticket is waiting on the requester or a third party.
    Pending,
    /// Ticket has been resolved but not yet closed.
    Resolved,
}

/// Normalized ticket priority.
///
/// The vendor speaks numeric codes on the wire (1/5/10/20); unrecognized
/// values map to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    /// Lowest priority.
    Low,
    /// Default priority.
    Medium,
    /// Elevated priority.
    High,
    /// Highest priority.
    Urgent,
}

/// A normalized helpdesk ticket.
///
/// The identifier is vendor-assigned and stable; it is always present after
/// any successful create/list/get, falling back to [`UNKNOWN_TICKET_ID`] only
/// when the vendor payload carried no identifier at all (a degraded mapping,
/// detectable by the sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Vendor-assigned ticket identifier.
    pub id: String,

    /// Subject/title of the ticket.
    pub subject: String,

    /// Description/body of the ticket.
    pub description: String,

    /// Current lifecycle status.
    pub status: TicketStatus,

    /// Priority level.
    pub priority: TicketPriority,

    /// Email address of the requester.
    pub requester_email: String,

    /// Email address of the assigned agent, if any.
    pub assignee_email: Option<String>,

    /// Creation timestamp, preserved verbatim in the vendor's format.
    pub created_at: Option<String>,

    /// Last-update timestamp, preserved verbatim in the vendor's format.
    pub updated_at: Option<String>,
}

impl Ticket {
    /// Returns true if the mapping that produced this ticket was degraded,
    /// i.e. the vendor payload carried no usable identifier.
    pub fn is_degraded(&self) -> bool {
        self.id == UNKNOWN_TICKET_ID
    }
}

/// A ticket together with its conversation and attachments.
///
/// Constructed only from a details call. The conversation is a separate
/// network round trip and stays empty unless that call is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// The ticket itself.
    pub ticket: Ticket,

    /// Ordered conversation messages (empty unless fetched separately).
    pub conversation: Vec<TicketMessage>,

    /// Attachments on the ticket itself.
    pub attachments: Vec<TicketAttachment>,
}

impl TicketDetails {
    /// Wraps a ticket with an empty conversation and attachment list.
    pub fn without_conversation(ticket: Ticket) -> Self {
        Self {
            ticket,
            conversation: Vec::new(),
            attachments: Vec::new(),
        }
    }
}

/// A file attached to a ticket or conversation message.
///
/// Always referenced from its owning entity, never standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketAttachment {
    /// Original filename.
    pub filename: String,

    /// Size in bytes.
    pub size: u64,

    /// MIME content type.
    pub content_type: String,

    /// Creation timestamp, preserved verbatim.
    pub created_at: Option<String>,

    /// URL the attachment bytes can be retrieved from.
    pub url: String,
}

/// Fields for creating a new ticket.
#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    /// Subject/title of the ticket.
    pub subject: String,

    /// Description/body of the ticket.
    pub description: String,

    /// Priority; the codec defaults to `Medium` (wire value 5) when unset.
    pub priority: Option<TicketPriority>,

    /// Email address of the requester.
    pub requester_email: String,
}

impl NewTicket {
    /// Creates a new ticket payload with the required fields.
    pub fn new(
        subject: impl Into<String>,
        description: impl Into<String>,
        requester_email: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            priority: None,
            requester_email: requester_email.into(),
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A partial ticket update; only supplied fields are sent to the vendor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketUpdate {
    /// New status, if changing.
    pub status: Option<TicketStatus>,

    /// New priority, if changing.
    pub priority: Option<TicketPriority>,

    /// New assignee email, if changing.
    pub assignee_email: Option<String>,
}

impl TicketUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the assignee email.
    pub fn with_assignee(mut self, email: impl Into<String>) -> Self {
        self.assignee_email = Some(email.into());
        self
    }

    /// Returns true if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.assignee_email.is_none()
    }
}

/// Structured result of a connectivity check.
///
/// The check is diagnostic reporting, not control flow, so the outcome is a
/// value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    /// Whether the backend was reachable with the configured credentials.
    pub success: bool,

    /// Human-readable classification of the outcome.
    pub message: String,
}

impl ConnectionCheck {
    /// Creates a successful check result.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates a failed check result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
