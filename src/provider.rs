//! Provider-agnostic facade over concrete helpdesk clients.
//!
//! [`TicketProvider`] is the capability contract: exactly the normalized
//! operation set, domain entities in and out, no mapping of its own.
//! Callers depend on this trait rather than a concrete vendor client;
//! [`provider_for`] selects and constructs the one implementation registered
//! for a provider identifier.

use async_trait::async_trait;

use crate::config::Config;
use crate::domain::{
    AttachmentSource, ConnectionCheck, ListOptions, NewTicket, Ticket, TicketDetails,
    TicketFilters, TicketMessage, TicketNote, TicketPage, TicketPriority, TicketReply,
    TicketUpdate,
};
use crate::error::BridgeError;
use crate::helprack_client::HelprackClient;

/// Provider identifier for the Helprack backend.
pub const PROVIDER_HELPRACK: &str = "helprack";

/// The normalized ticket lifecycle capability set.
///
/// Implementations translate these operations to their vendor's dialect;
/// the contract here is entirely in terms of the domain model.
#[async_trait]
pub trait TicketProvider: Send + Sync {
    /// Creates a new ticket and returns it with its vendor-assigned id.
    async fn create_ticket(&self, new_ticket: &NewTicket) -> Result<Ticket, BridgeError>;

    /// Lists tickets raised by a requester.
    async fn list_tickets(
        &self,
        requester_email: &str,
        options: &ListOptions,
    ) -> Result<TicketPage, BridgeError>;

    /// Searches tickets by an arbitrary filter set.
    async fn search_tickets(
        &self,
        filters: &TicketFilters,
        options: &ListOptions,
    ) -> Result<TicketPage, BridgeError>;

    /// Gets a ticket's details; the conversation stays empty unless
    /// [`get_conversation`](Self::get_conversation) is invoked separately.
    async fn get_ticket(&self, ticket_id: &str) -> Result<TicketDetails, BridgeError>;

    /// Gets the ordered conversation for a ticket.
    async fn get_conversation(&self, ticket_id: &str)
        -> Result<Vec<TicketMessage>, BridgeError>;

    /// Posts a public reply.
    async fn reply(&self, ticket_id: &str, reply: &TicketReply) -> Result<(), BridgeError>;

    /// Posts a public reply with file attachments.
    async fn reply_with_attachments(
        &self,
        ticket_id: &str,
        reply: &TicketReply,
        files: &[AttachmentSource],
    ) -> Result<(), BridgeError>;

    /// Adds a note.
    async fn add_note(&self, ticket_id: &str, note: &TicketNote) -> Result<(), BridgeError>;

    /// Adds a note with file attachments.
    async fn add_note_with_attachments(
        &self,
        ticket_id: &str,
        note: &TicketNote,
        files: &[AttachmentSource],
    ) -> Result<(), BridgeError>;

    /// Assigns the ticket to an agent.
    async fn assign_ticket(
        &self,
        ticket_id: &str,
        assignee_email: &str,
    ) -> Result<Ticket, BridgeError>;

    /// Escalates the ticket by changing its priority.
    async fn escalate_ticket(
        &self,
        ticket_id: &str,
        priority: TicketPriority,
    ) -> Result<Ticket, BridgeError>;

    /// Applies a partial update (any subset of status, priority, assignee).
    async fn update_ticket(
        &self,
        ticket_id: &str,
        update: &TicketUpdate,
    ) -> Result<Ticket, BridgeError>;

    /// Closes the ticket.
    async fn close_ticket(&self, ticket_id: &str) -> Result<Ticket, BridgeError>;

    /// Reopens the ticket.
    async fn reopen_ticket(&self, ticket_id: &str) -> Result<Ticket, BridgeError>;

    /// Structured pre-flight connectivity check; never an `Err`.
    async fn verify_connection(&self) -> ConnectionCheck;
}

#[async_trait]
impl TicketProvider for HelprackClient {
    async fn create_ticket(&self, new_ticket: &NewTicket) -> Result<Ticket, BridgeError> {
        HelprackClient::create_ticket(self, new_ticket).await
    }

    async fn list_tickets(
        &self,
        requester_email: &str,
        options: &ListOptions,
    ) -> Result<TicketPage, BridgeError> {
        HelprackClient::list_tickets(self, requester_email, options).await
    }

    async fn search_tickets(
        &self,
        filters: &TicketFilters,
        options: &ListOptions,
    ) -> Result<TicketPage, BridgeError> {
        HelprackClient::search_tickets(self, filters, options).await
    }

    async fn get_ticket(&self, ticket_id: &str) -> Result<TicketDetails, BridgeError> {
        HelprackClient::get_ticket(self, ticket_id).await
    }

    async fn get_conversation(
        &self,
        ticket_id: &str,
    ) -> Result<Vec<TicketMessage>, BridgeError> {
        HelprackClient::get_conversation(self, ticket_id).await
    }

    async fn reply(&self, ticket_id: &str, reply: &TicketReply) -> Result<(), BridgeError> {
        HelprackClient::reply(self, ticket_id, reply).await
    }

    async fn reply_with_attachments(
        &self,
        ticket_id: &str,
        reply: &TicketReply,
        files: &[AttachmentSource],
    ) -> Result<(), BridgeError> {
        HelprackClient::reply_with_attachments(self, ticket_id, reply, files).await
    }

    async fn add_note(&self, ticket_id: &str, note: &TicketNote) -> Result<(), BridgeError> {
        HelprackClient::add_note(self, ticket_id, note).await
    }

    async fn add_note_with_attachments(
        &self,
        ticket_id: &str,
        note: &TicketNote,
        files: &[AttachmentSource],
    ) -> Result<(), BridgeError> {
        HelprackClient::add_note_with_attachments(self, ticket_id, note, files).await
    }

    async fn assign_ticket(
        &self,
        ticket_id: &str,
        assignee_email: &str,
    ) -> Result<Ticket, BridgeError> {
        HelprackClient::assign_ticket(self, ticket_id, assignee_email).await
    }

    async fn escalate_ticket(
        &self,
        ticket_id: &str,
        priority: TicketPriority,
    ) -> Result<Ticket, BridgeError> {
        HelprackClient::escalate_ticket(self, ticket_id, priority).await
    }

    async fn update_ticket(
        &self,
        ticket_id: &str,
        update: &TicketUpdate,
    ) -> Result<Ticket, BridgeError> {
        HelprackClient::update_ticket(self, ticket_id, update).await
    }

    async fn close_ticket(&self, ticket_id: &str) -> Result<Ticket, BridgeError> {
        HelprackClient::close_ticket(self, ticket_id).await
    }

    async fn reopen_ticket(&self, ticket_id: &str) -> Result<Ticket, BridgeError> {
        HelprackClient::reopen_ticket(self, ticket_id).await
    }

    async fn verify_connection(&self) -> ConnectionCheck {
        HelprackClient::verify_connection(self).await
    }
}

/// Constructs the concrete provider for an identifier.
///
/// # Errors
///
/// Returns `BridgeError::UnknownProvider` for an unrecognized identifier,
/// or the underlying construction error for a known one.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let provider = provider_for("helprack", &config)?;
/// let page = provider.list_tickets("user@example.com", &ListOptions::new()).await?;
/// ```
pub fn provider_for(
    provider_id: &str,
    config: &Config,
) -> Result<Box<dyn TicketProvider>, BridgeError> {
    match provider_id {
        PROVIDER_HELPRACK => Ok(Box::new(HelprackClient::new(config)?)),
        other => Err(BridgeError::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
impl std::fmt::Debug for dyn TicketProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TicketProvider")
    }
}
