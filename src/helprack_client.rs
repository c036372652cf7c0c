//! HTTP operation executor for the Helprack backend.
//!
//! This module provides `HelprackClient`, which realizes each logical ticket
//! operation as one or more HTTP calls: it selects the verb, endpoint, and
//! parameter placement, applies the wire codec from [`crate::wire`], and
//! implements the per-operation fallback policy for the vendor's undocumented
//! verb rejections.
//!
//! # Verb fallback
//!
//! The vendor documents uniform PUT semantics on `/tickets/update` for all
//! mutations, but in practice only ticket assignment also accepts POST. The
//! fallback is therefore encoded per operation: assignment retries an
//! identical body via POST after a 405; every other mutation surfaces the
//! 405 as a known limitation. A generic retry-any-verb policy would mask
//! genuine method-not-allowed failures.
//!
//! # Security
//!
//! The API key is sent verbatim in the `Authorization` header and is never
//! logged.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;
use crate::domain::{
    AttachmentSource, ConnectionCheck, ListOptions, NewTicket, Ticket, TicketDetails,
    TicketFilters, TicketMessage, TicketNote, TicketPage, TicketPriority, TicketReply,
    TicketUpdate,
};
use crate::error::BridgeError;
use crate::wire;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fixed versioned prefix all Helprack endpoints are rooted under.
const API_PREFIX: &str = "/api/v2";

/// Shared multipart field name for file parts.
const FILES_FIELD: &str = "files";

/// Outcome of a single vendor call, with the 405 rejection split out from
/// terminal failures so the verb-fallback policy is explicit and testable
/// rather than embedded in catch-style control flow.
enum CallOutcome<T> {
    /// The call succeeded.
    Success(T),
    /// The vendor rejected the verb with 405; a fallback may apply.
    MethodRejected(BridgeError),
    /// The call failed terminally.
    Failed(BridgeError),
}

impl<T> From<Result<T, BridgeError>> for CallOutcome<T> {
    fn from(result: Result<T, BridgeError>) -> Self {
        match result {
            Ok(value) => CallOutcome::Success(value),
            Err(e) if e.is_method_not_allowed() => CallOutcome::MethodRejected(e),
            Err(e) => CallOutcome::Failed(e),
        }
    }
}

/// HTTP client for the Helprack API.
///
/// Holds only immutable configuration fixed at construction; no per-call
/// state is retained, so a single instance is safe to share across
/// concurrent logical callers.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = HelprackClient::new(&config)?;
///
/// let page = client.list_tickets("user@example.com", &ListOptions::new()).await?;
/// ```
#[derive(Clone)]
pub struct HelprackClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL including the API prefix
    /// (e.g., `https://acme.helprack.com/api/v2`).
    base_url: String,

    /// API credential for the `Authorization` header.
    /// SECURITY: Never log this value!
    api_key: String,

    /// Enables request-level debug logging.
    verbose: bool,
}

impl HelprackClient {
    /// Creates a new Helprack client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::HttpClient` if the HTTP client fails to
    /// initialize.
    pub fn new(config: &Config) -> Result<Self, BridgeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(BridgeError::HttpClient)?;

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(&config.base_url),
            api_key: config.api_key.clone(),
            verbose: config.verbose,
        })
    }

    /// Normalizes the base URL to ensure it ends with the API prefix.
    fn normalize_base_url(url: &str) -> String {
        let url = url.trim_end_matches('/');
        if url.ends_with(API_PREFIX) {
            url.to_string()
        } else {
            format!("{}{}", url, API_PREFIX)
        }
    }

    /// Joins an endpoint suffix onto the prefixed base URL.
    ///
    /// Operations supply suffixes like `/tickets`; a path that already
    /// carries the prefix is used as-is.
    fn endpoint(&self, path: &str) -> String {
        if let Some(suffix) = path.strip_prefix(API_PREFIX) {
            format!("{}{}", self.base_url, suffix)
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Makes a JSON request to the Helprack API.
    ///
    /// Every request carries `Authorization: <key>` verbatim and
    /// `Content-Type: application/json`. Non-2xx responses become
    /// `BridgeError::HttpStatus` (or `MethodNotAllowed` for 405); failures
    /// with no response become `BridgeError::Http`.
    async fn send<Q>(
        &self,
        method: Method,
        path: &str,
        operation: &str,
        query: Option<&Q>,
        body: Option<&Value>,
    ) -> Result<Value, BridgeError>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path);

        if self.verbose {
            tracing::debug!(method = %method, url = %url, operation, "Helprack API request");
        }

        let mut req = self
            .http
            .request(method, &url)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json");

        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(BridgeError::Http)?;
        self.read_response(operation, response).await
    }

    /// Makes a multipart POST request to the Helprack API.
    ///
    /// reqwest supplies the `multipart/form-data` content type with its
    /// boundary; the JSON content type must not be forced here.
    async fn send_multipart(
        &self,
        path: &str,
        operation: &str,
        form: Form,
    ) -> Result<Value, BridgeError> {
        let url = self.endpoint(path);

        if self.verbose {
            tracing::debug!(url = %url, operation, "Helprack API multipart request");
        }

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(BridgeError::Http)?;

        self.read_response(operation, response).await
    }

    /// Checks the status and parses the response body.
    ///
    /// An unparseable success body degrades to `Value::Null` with a warning;
    /// the wire codec then maps it to a sentinel-valued entity rather than
    /// failing the operation.
    async fn read_response(
        &self,
        operation: &str,
        response: reqwest::Response,
    ) -> Result<Value, BridgeError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = BridgeError::excerpt_body(&body);

            if status == reqwest::StatusCode::METHOD_NOT_ALLOWED {
                return Err(BridgeError::method_not_allowed(operation, detail));
            }
            return Err(BridgeError::HttpStatus {
                status,
                body: detail,
            });
        }

        let body = response.text().await.map_err(BridgeError::Http)?;

        if self.verbose {
            tracing::trace!(body = %body, operation, "Helprack API response");
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    operation,
                    error = %e,
                    "Helprack returned a non-JSON success body, mapping will degrade"
                );
                Ok(Value::Null)
            }
        }
    }

    /// Unwraps the vendor's inconsistent response envelopes.
    ///
    /// Some endpoints wrap the ticket under a `ticket` key, others return it
    /// at the top level.
    fn ticket_from_response(value: &Value) -> Ticket {
        wire::ticket_from_wire(value.get("ticket").unwrap_or(value))
    }

    // ========================================================================
    // Read operations
    // ========================================================================

    /// Lists tickets raised by a requester, with pagination and sorting.
    ///
    /// The requester email travels in the vendor's JSON-encoded `filters`
    /// blob as `{"contact": [email]}`.
    pub async fn list_tickets(
        &self,
        requester_email: &str,
        options: &ListOptions,
    ) -> Result<TicketPage, BridgeError> {
        let filters = TicketFilters::new().with_requester(requester_email);
        self.search_tickets(&filters, options).await
    }

    /// Searches tickets by an arbitrary filter set.
    ///
    /// An empty filter set omits the `filters` parameter entirely.
    pub async fn search_tickets(
        &self,
        filters: &TicketFilters,
        options: &ListOptions,
    ) -> Result<TicketPage, BridgeError> {
        let query = wire::list_query(options, filters);
        let value = self
            .send(Method::GET, "/tickets", "search tickets", Some(&query), None)
            .await?;

        Ok(wire::page_from_wire(&value, options.page, options.limit))
    }

    /// Gets a single ticket's details.
    ///
    /// The conversation is a separate round trip and stays empty here; use
    /// [`get_conversation`](Self::get_conversation) or
    /// [`get_ticket_with_conversation`](Self::get_ticket_with_conversation)
    /// to populate it.
    pub async fn get_ticket(&self, ticket_id: &str) -> Result<TicketDetails, BridgeError> {
        let value = self
            .send(
                Method::GET,
                "/tickets/detail",
                "get ticket details",
                Some(&[("ticket_id", ticket_id)]),
                None,
            )
            .await?;

        let ticket = Self::ticket_from_response(&value);
        let attachments = value
            .get("attachments")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(wire::attachment_from_wire).collect())
            .unwrap_or_default();

        Ok(TicketDetails {
            ticket,
            conversation: Vec::new(),
            attachments,
        })
    }

    /// Gets the ordered conversation for a ticket.
    pub async fn get_conversation(
        &self,
        ticket_id: &str,
    ) -> Result<Vec<TicketMessage>, BridgeError> {
        let value = self
            .send(
                Method::GET,
                "/tickets/conversation",
                "get ticket conversation",
                Some(&[("ticket_id", ticket_id)]),
                None,
            )
            .await?;

        Ok(wire::conversation_from_wire(&value))
    }

    /// Gets ticket details with the conversation populated.
    ///
    /// This is a convenience method performing both round trips. A failure
    /// to fetch the conversation leaves it empty with a warning rather than
    /// failing the details that were already retrieved.
    pub async fn get_ticket_with_conversation(
        &self,
        ticket_id: &str,
    ) -> Result<TicketDetails, BridgeError> {
        let mut details = self.get_ticket(ticket_id).await?;

        match self.get_conversation(ticket_id).await {
            Ok(conversation) => details.conversation = conversation,
            Err(e) => {
                tracing::warn!(
                    ticket_id,
                    error = %e,
                    "Failed to fetch conversation, returning details without it"
                );
            }
        }

        Ok(details)
    }

    /// Tests connectivity to the Helprack backend.
    ///
    /// Issues a low-cost list call and classifies the outcome into a
    /// structured result. This is diagnostic reporting, not control flow,
    /// so it never returns an `Err`.
    pub async fn verify_connection(&self) -> ConnectionCheck {
        tracing::debug!("Verifying connection to Helprack backend");

        let options = ListOptions::new().with_limit(1);
        match self.search_tickets(&TicketFilters::new(), &options).await {
            Ok(page) => ConnectionCheck::ok(format!(
                "connected; backend reports {} tickets",
                page.total
            )),
            Err(e) if e.is_auth_failure() => ConnectionCheck::failed(
                "authentication rejected - verify the API key and that the \
                 subdomain in the base URL matches the account",
            ),
            Err(BridgeError::Http(e)) if e.is_connect() => ConnectionCheck::failed(
                "could not reach the host - the subdomain in the base URL is likely wrong",
            ),
            Err(e) => {
                ConnectionCheck::failed(format!("HTTP error during connectivity check: {}", e))
            }
        }
    }

    // ========================================================================
    // Write operations
    // ========================================================================

    /// Creates a new ticket.
    ///
    /// The create response is the authoritative source of the new ticket's
    /// identifier.
    pub async fn create_ticket(&self, new_ticket: &NewTicket) -> Result<Ticket, BridgeError> {
        let body = wire::new_ticket_to_wire(new_ticket);
        let value = self
            .send(
                Method::POST,
                "/tickets/create",
                "create ticket",
                None::<&[(&str, &str)]>,
                Some(&body),
            )
            .await?;

        Ok(Self::ticket_from_response(&value))
    }

    /// Posts a public reply to a ticket.
    ///
    /// The ticket id travels as a query parameter; the reply fields,
    /// including the 0/1 notify and close flags, travel in the body.
    pub async fn reply(&self, ticket_id: &str, reply: &TicketReply) -> Result<(), BridgeError> {
        let body = wire::reply_to_wire(reply);
        self.send(
            Method::POST,
            "/tickets/reply",
            "reply to ticket",
            Some(&[("ticket_id", ticket_id)]),
            Some(&body),
        )
        .await?;

        Ok(())
    }

    /// Posts a public reply with file attachments.
    ///
    /// Uses the vendor's distinct multipart reply endpoint: the ticket id
    /// and the JSON-encoded reply object are form fields, each file its own
    /// part under the shared `files` field. Unreadable local files are
    /// skipped with a warning, not fatal.
    pub async fn reply_with_attachments(
        &self,
        ticket_id: &str,
        reply: &TicketReply,
        files: &[AttachmentSource],
    ) -> Result<(), BridgeError> {
        let mut form = Form::new()
            .text("ticket_id", ticket_id.to_string())
            .text("reply", wire::reply_to_wire(reply).to_string());

        for part in self.attachment_parts(files).await {
            form = form.part(FILES_FIELD, part);
        }

        self.send_multipart("/tickets/reply/attachments", "reply with attachments", form)
            .await?;

        Ok(())
    }

    /// Adds a note to a ticket.
    pub async fn add_note(&self, ticket_id: &str, note: &TicketNote) -> Result<(), BridgeError> {
        let body = wire::note_to_wire(note);
        self.send(
            Method::POST,
            "/tickets/note",
            "add note",
            Some(&[("ticket_id", ticket_id)]),
            Some(&body),
        )
        .await?;

        Ok(())
    }

    /// Adds a note with file attachments.
    ///
    /// Same multipart layout as
    /// [`reply_with_attachments`](Self::reply_with_attachments); unreadable
    /// files are skipped with a warning.
    pub async fn add_note_with_attachments(
        &self,
        ticket_id: &str,
        note: &TicketNote,
        files: &[AttachmentSource],
    ) -> Result<(), BridgeError> {
        let mut form = Form::new()
            .text("ticket_id", ticket_id.to_string())
            .text("note", wire::note_to_wire(note).to_string());

        for part in self.attachment_parts(files).await {
            form = form.part(FILES_FIELD, part);
        }

        self.send_multipart("/tickets/note/attachments", "add note with attachments", form)
            .await?;

        Ok(())
    }

    /// Assigns a ticket to an agent.
    ///
    /// The documented PUT is rejected with 405 by some Helprack deployments;
    /// assignment is the one operation empirically known to also accept
    /// POST, so a 405 triggers exactly one retry with an identical body via
    /// POST. A second failure propagates the POST error, not the original
    /// PUT rejection.
    pub async fn assign_ticket(
        &self,
        ticket_id: &str,
        assignee_email: &str,
    ) -> Result<Ticket, BridgeError> {
        let body = json!({ "assign_to": assignee_email });
        let query = [("ticket_id", ticket_id)];

        let outcome: CallOutcome<Value> = self
            .send(
                Method::PUT,
                "/tickets/update",
                "assign ticket",
                Some(&query),
                Some(&body),
            )
            .await
            .into();

        match outcome {
            CallOutcome::Success(value) => Ok(Self::ticket_from_response(&value)),
            CallOutcome::MethodRejected(put_err) => {
                tracing::debug!(
                    ticket_id,
                    error = %put_err,
                    "PUT rejected with 405, retrying assignment via POST"
                );
                let value = self
                    .send(
                        Method::POST,
                        "/tickets/update",
                        "assign ticket",
                        Some(&query),
                        Some(&body),
                    )
                    .await?;
                Ok(Self::ticket_from_response(&value))
            }
            CallOutcome::Failed(e) => Err(e),
        }
    }

    /// Escalates a ticket by changing its priority.
    ///
    /// A 405 is surfaced as-is: only assignment has a known verb fallback.
    pub async fn escalate_ticket(
        &self,
        ticket_id: &str,
        priority: TicketPriority,
    ) -> Result<Ticket, BridgeError> {
        let body = json!({ "priority": wire::priority_to_wire(priority) });
        let value = self
            .send(
                Method::PUT,
                "/tickets/update",
                "escalate ticket",
                Some(&[("ticket_id", ticket_id)]),
                Some(&body),
            )
            .await?;

        Ok(Self::ticket_from_response(&value))
    }

    /// Applies a partial update (any subset of status, priority, assignee).
    ///
    /// Only the supplied fields are sent. A 405 is surfaced as-is.
    pub async fn update_ticket(
        &self,
        ticket_id: &str,
        update: &TicketUpdate,
    ) -> Result<Ticket, BridgeError> {
        let body = wire::update_to_wire(update);
        let value = self
            .send(
                Method::PUT,
                "/tickets/update",
                "update ticket",
                Some(&[("ticket_id", ticket_id)]),
                Some(&body),
            )
            .await?;

        Ok(Self::ticket_from_response(&value))
    }

    /// Closes a ticket.
    ///
    /// Status transitions accept no fallback verb; a 405 here is surfaced
    /// as a known limitation.
    pub async fn close_ticket(&self, ticket_id: &str) -> Result<Ticket, BridgeError> {
        self.set_status(ticket_id, "close ticket", "closed").await
    }

    /// Reopens a closed ticket. Same 405 posture as closing.
    pub async fn reopen_ticket(&self, ticket_id: &str) -> Result<Ticket, BridgeError> {
        self.set_status(ticket_id, "reopen ticket", "open").await
    }

    /// Status transition via the generic update endpoint.
    async fn set_status(
        &self,
        ticket_id: &str,
        operation: &str,
        wire_status: &str,
    ) -> Result<Ticket, BridgeError> {
        let body = json!({ "status": wire_status });
        let value = self
            .send(
                Method::PUT,
                "/tickets/update",
                operation,
                Some(&[("ticket_id", ticket_id)]),
                Some(&body),
            )
            .await?;

        Ok(Self::ticket_from_response(&value))
    }

    // ========================================================================
    // Multipart attachment assembly
    // ========================================================================

    /// Resolves attachment sources into multipart parts.
    ///
    /// Local files are fully read before the request is sent; a file that
    /// cannot be read is skipped with a warning and does not abort the
    /// remaining attachments or the request.
    async fn attachment_parts(&self, files: &[AttachmentSource]) -> Vec<Part> {
        let mut parts = Vec::with_capacity(files.len());

        for source in files {
            match source {
                AttachmentSource::LocalPath(path) => match tokio::fs::read(path).await {
                    Ok(bytes) => {
                        let filename = path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "attachment".to_string());
                        parts.push(Part::bytes(bytes).file_name(filename));
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Skipping unreadable attachment"
                        );
                    }
                },
                AttachmentSource::InMemory { filename, bytes } => {
                    parts.push(Part::bytes(bytes.clone()).file_name(filename.clone()));
                }
            }
        }

        parts
    }
}
