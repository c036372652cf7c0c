//! Wire codec for the Helprack REST dialect.
//!
//! This module is the only place the vendor's field layout is known. All
//! functions here are pure (no I/O) and total: absent or malformed fields
//! are handled by defaulting to fixed sentinel values, never by failing.
//! The untyped vendor shape (`serde_json::Value`) stops at this boundary;
//! everything leaving this module is a normalized domain entity.
//!
//! # Vendor quirks handled here
//!
//! - Enumerated values: priority is numeric on the wire (1/5/10/20), status
//!   is a lowercase string compared case-insensitively.
//! - Pagination: the API takes an `offset` plus a `ticket_count` that must
//!   be one of its fixed tiers (30/50/100); requested limits are snapped up.
//! - Filters: not individual query parameters but one JSON-encoded blob in
//!   a single `filters` parameter.
//! - Field names differ across endpoints for nominally the same entity, so
//!   identifier and email fields are coalesced across the known variants.

use serde_json::{json, Map, Value};

use crate::domain::{
    ListOptions, NewTicket, SortDirection, SortKey, Ticket, TicketAttachment, TicketFilters,
    TicketMessage, TicketNote, TicketPage, TicketPriority, TicketReply, TicketStatus,
    TicketUpdate, UNKNOWN_SUBJECT, UNKNOWN_TICKET_ID,
};

/// Wire value sent when the caller supplies no priority.
pub const DEFAULT_WIRE_PRIORITY: u8 = 5;

/// The vendor's fixed page-size tiers.
const TICKET_COUNT_TIERS: [u32; 3] = [30, 50, 100];

// ---------------------------------------------------------------------------
// Enumerated value tables
// ---------------------------------------------------------------------------

/// Maps a domain priority to the vendor's numeric code.
pub fn priority_to_wire(priority: TicketPriority) -> u8 {
    match priority {
        TicketPriority::Low => 1,
        TicketPriority::Medium => 5,
        TicketPriority::High => 10,
        TicketPriority::Urgent => 20,
    }
}

/// Maps a vendor numeric priority to the domain enum.
///
/// Unknown values map to `Medium`.
pub fn priority_from_wire(value: i64) -> TicketPriority {
    match value {
        1 => TicketPriority::Low,
        5 => TicketPriority::Medium,
        10 => TicketPriority::High,
        20 => TicketPriority::Urgent,
        _ => TicketPriority::Medium,
    }
}

/// Maps a domain status to the vendor's lowercase string.
pub fn status_to_wire(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "open",
        TicketStatus::Closed => "closed",
        TicketStatus::Pending => "pending",
        TicketStatus::Resolved => "resolved",
    }
}

/// Maps a vendor status string to the domain enum, case-insensitively.
///
/// Unrecognized values map to `Open`.
pub fn status_from_wire(value: &str) -> TicketStatus {
    match value.to_ascii_lowercase().as_str() {
        "open" => TicketStatus::Open,
        "closed" => TicketStatus::Closed,
        "pending" => TicketStatus::Pending,
        "resolved" => TicketStatus::Resolved,
        _ => TicketStatus::Open,
    }
}

// ---------------------------------------------------------------------------
// Pagination and sorting
// ---------------------------------------------------------------------------

/// Snaps a requested page size up to the nearest vendor tier.
pub fn snap_ticket_count(limit: u32) -> u32 {
    for tier in TICKET_COUNT_TIERS {
        if limit <= tier {
            return tier;
        }
    }
    TICKET_COUNT_TIERS[TICKET_COUNT_TIERS.len() - 1]
}

/// Derives the vendor `offset` from a 1-based page and the requested limit.
pub fn page_to_offset(page: u32, limit: u32) -> u32 {
    page.saturating_sub(1) * limit
}

/// Maps a domain sort key to the vendor `order_by` value.
pub fn sort_key_to_wire(key: SortKey) -> &'static str {
    match key {
        SortKey::CreatedAt => "created_time",
        SortKey::UpdatedAt => "updated_time",
        SortKey::Priority => "priority",
    }
}

/// Maps a domain sort direction to the vendor `order_type` value.
pub fn sort_direction_to_wire(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    }
}

/// Builds the query parameters for a list/search call.
///
/// Always emits `offset` and `ticket_count`; emits `order_by`/`order_type`
/// when sorting is requested, the inclusion flags when set, and the
/// JSON-encoded `filters` blob unless the filter set is empty.
pub fn list_query(options: &ListOptions, filters: &TicketFilters) -> Vec<(String, String)> {
    let mut params = vec![
        (
            "offset".to_string(),
            page_to_offset(options.page, options.limit).to_string(),
        ),
        (
            "ticket_count".to_string(),
            snap_ticket_count(options.limit).to_string(),
        ),
    ];

    if let Some(key) = options.sort_by {
        params.push(("order_by".to_string(), sort_key_to_wire(key).to_string()));
    }
    if let Some(direction) = options.sort_direction {
        params.push((
            "order_type".to_string(),
            sort_direction_to_wire(direction).to_string(),
        ));
    }
    if options.include_description {
        params.push(("include_description".to_string(), "1".to_string()));
    }
    if options.include_custom_fields {
        params.push(("include_custom_fields".to_string(), "1".to_string()));
    }
    if let Some(blob) = filters_to_wire(filters) {
        params.push(("filters".to_string(), blob));
    }

    params
}

/// Serializes a filter set into the vendor's single JSON-encoded `filters`
/// parameter.
///
/// Returns `None` for an empty filter set; the parameter is then omitted
/// entirely rather than sent as an empty object.
pub fn filters_to_wire(filters: &TicketFilters) -> Option<String> {
    if filters.is_empty() {
        return None;
    }

    let mut blob = Map::new();
    if let Some(email) = &filters.requester_email {
        blob.insert("contact".to_string(), json!([email]));
    }
    if let Some(email) = &filters.assignee_email {
        blob.insert("assigned".to_string(), json!([email]));
    }
    if let Some(status) = filters.status {
        blob.insert("status".to_string(), json!([status_to_wire(status)]));
    }
    if let Some(priority) = filters.priority {
        blob.insert("priority".to_string(), json!([priority_to_wire(priority)]));
    }

    // Map serialization cannot fail for string/number values.
    Some(Value::Object(blob).to_string())
}

// ---------------------------------------------------------------------------
// Entity mapping (vendor -> domain)
// ---------------------------------------------------------------------------

/// Reads the first present string among several vendor field names.
///
/// The vendor uses different names for the same field depending on which
/// endpoint produced the payload.
fn coalesce_str<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|f| value.get(*f).and_then(Value::as_str))
}

/// Reads a field that may arrive as either a string or a number, stringified.
fn coalesce_id(value: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|f| match value.get(*f) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Maps a vendor ticket payload to a domain `Ticket`.
///
/// Total: any missing field is replaced with its sentinel or default. A
/// payload missing both identifier fields yields id `"unknown"` and a
/// warning, never an error.
pub fn ticket_from_wire(value: &Value) -> Ticket {
    let id = coalesce_id(value, &["ticket_number", "id"]).unwrap_or_else(|| {
        tracing::warn!("vendor ticket payload carries no identifier, mapping degraded");
        UNKNOWN_TICKET_ID.to_string()
    });

    let subject = coalesce_str(value, &["subject"])
        .unwrap_or(UNKNOWN_SUBJECT)
        .to_string();

    let description = coalesce_str(value, &["description"])
        .unwrap_or_default()
        .to_string();

    let status = coalesce_str(value, &["status"])
        .map(status_from_wire)
        .unwrap_or(TicketStatus::Open);

    let priority = value
        .get("priority")
        .and_then(Value::as_i64)
        .map(priority_from_wire)
        .unwrap_or(TicketPriority::Medium);

    let requester_email = coalesce_str(value, &["contact_email", "requester_email"])
        .unwrap_or_default()
        .to_string();

    let assignee_email =
        coalesce_str(value, &["assigned_to", "agent_email"]).map(str::to_string);

    Ticket {
        id,
        subject,
        description,
        status,
        priority,
        requester_email,
        assignee_email,
        created_at: coalesce_str(value, &["created_at"]).map(str::to_string),
        updated_at: coalesce_str(value, &["updated_at"]).map(str::to_string),
    }
}

/// Maps a vendor attachment payload to a domain `TicketAttachment`.
pub fn attachment_from_wire(value: &Value) -> TicketAttachment {
    TicketAttachment {
        filename: coalesce_str(value, &["filename", "name"])
            .unwrap_or("unknown")
            .to_string(),
        size: value.get("size").and_then(Value::as_u64).unwrap_or(0),
        content_type: coalesce_str(value, &["content_type"])
            .unwrap_or("application/octet-stream")
            .to_string(),
        created_at: coalesce_str(value, &["created_at"]).map(str::to_string),
        url: coalesce_str(value, &["url", "attachment_url"])
            .unwrap_or_default()
            .to_string(),
    }
}

/// Maps a vendor message payload to a domain `TicketMessage`.
///
/// The parent ticket id may arrive as a number; it is stringified. The staff
/// flag defaults to false when absent.
pub fn message_from_wire(value: &Value) -> TicketMessage {
    let attachments = value
        .get("attachments")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(attachment_from_wire).collect())
        .unwrap_or_default();

    TicketMessage {
        id: coalesce_id(value, &["id"]).unwrap_or_else(|| UNKNOWN_TICKET_ID.to_string()),
        ticket_id: coalesce_id(value, &["ticket_id", "ticket_number"])
            .unwrap_or_else(|| UNKNOWN_TICKET_ID.to_string()),
        body: coalesce_str(value, &["body", "message"])
            .unwrap_or_default()
            .to_string(),
        sender_email: coalesce_str(value, &["sender_email", "from_email"])
            .unwrap_or_default()
            .to_string(),
        is_staff: value
            .get("is_staff")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at: coalesce_str(value, &["created_at"]).map(str::to_string),
        attachments,
    }
}

/// Maps a vendor list response to a domain `TicketPage`.
///
/// `total_count` falls back to `total`, then to the number of tickets on the
/// page; the caller's page/limit are echoed and `total_pages` computed.
pub fn page_from_wire(value: &Value, page: u32, limit: u32) -> TicketPage {
    let tickets: Vec<Ticket> = value
        .get("tickets")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(ticket_from_wire).collect())
        .unwrap_or_default();

    let total = ["total_count", "total"]
        .iter()
        .find_map(|f| value.get(*f).and_then(Value::as_u64))
        .unwrap_or(tickets.len() as u64);

    TicketPage::new(tickets, total, page, limit)
}

/// Maps a vendor conversation response to ordered domain messages.
pub fn conversation_from_wire(value: &Value) -> Vec<TicketMessage> {
    value
        .get("messages")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(message_from_wire).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Entity mapping (domain -> vendor)
// ---------------------------------------------------------------------------

/// Builds the vendor create-ticket body.
///
/// A missing priority defaults to wire value 5 (Medium).
pub fn new_ticket_to_wire(ticket: &NewTicket) -> Value {
    json!({
        "subject": ticket.subject,
        "description": ticket.description,
        "priority": ticket
            .priority
            .map(priority_to_wire)
            .unwrap_or(DEFAULT_WIRE_PRIORITY),
        "contact_email": ticket.requester_email,
    })
}

/// Builds the vendor update body from a partial update.
///
/// Only the fields actually supplied appear in the body.
pub fn update_to_wire(update: &TicketUpdate) -> Value {
    let mut body = Map::new();
    if let Some(status) = update.status {
        body.insert("status".to_string(), json!(status_to_wire(status)));
    }
    if let Some(priority) = update.priority {
        body.insert("priority".to_string(), json!(priority_to_wire(priority)));
    }
    if let Some(email) = &update.assignee_email {
        body.insert("assign_to".to_string(), json!(email));
    }
    Value::Object(body)
}

/// Builds the vendor reply body.
///
/// The notify and close flags are sent as 0/1 integers, a vendor quirk.
pub fn reply_to_wire(reply: &TicketReply) -> Value {
    json!({
        "message": reply.message,
        "cc": reply.cc_emails,
        "bcc": reply.bcc_emails,
        "agent_email": reply.agent_email,
        "from_email": reply.from_email,
        "notify": bool_to_wire(reply.notify_contact),
        "close_ticket": bool_to_wire(reply.close_after_reply),
    })
}

/// Builds the vendor note body. The private flag is sent as 0/1.
pub fn note_to_wire(note: &TicketNote) -> Value {
    json!({
        "note": note.body,
        "private": bool_to_wire(note.private),
        "agent_email": note.agent_email,
        "notify_emails": note.notify_emails,
    })
}

/// The vendor encodes booleans as 0/1 integers in mutation bodies.
fn bool_to_wire(flag: bool) -> u8 {
    u8::from(flag)
}
