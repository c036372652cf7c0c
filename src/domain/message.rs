//! Conversation messages, outgoing replies and notes, attachment inputs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ticket::TicketAttachment;

/// A single message in a ticket's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMessage {
    /// Vendor-assigned message identifier.
    pub id: String,

    /// Identifier of the parent ticket.
    pub ticket_id: String,

    /// Message body (may contain HTML).
    pub body: String,

    /// Email address of the sender.
    pub sender_email: String,

    /// Whether the sender is a staff member/agent (false when the vendor
    /// omits the flag).
    pub is_staff: bool,

    /// Creation timestamp, preserved verbatim.
    pub created_at: Option<String>,

    /// Attachments on this message.
    pub attachments: Vec<TicketAttachment>,
}

/// An outgoing public reply to a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketReply {
    /// Reply body text.
    pub message: String,

    /// CC recipients.
    pub cc_emails: Vec<String>,

    /// BCC recipients.
    pub bcc_emails: Vec<String>,

    /// Agent the reply is sent as, if any.
    pub agent_email: Option<String>,

    /// From address override, if any.
    pub from_email: Option<String>,

    /// Whether the requester should be emailed about the reply.
    pub notify_contact: bool,

    /// Whether the ticket should be closed after the reply is posted.
    pub close_after_reply: bool,
}

impl TicketReply {
    /// Creates a reply with the given body and default flags
    /// (notify on, close off).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cc_emails: Vec::new(),
            bcc_emails: Vec::new(),
            agent_email: None,
            from_email: None,
            notify_contact: true,
            close_after_reply: false,
        }
    }

    /// Adds CC recipients.
    pub fn with_cc(mut self, emails: Vec<String>) -> Self {
        self.cc_emails = emails;
        self
    }

    /// Adds BCC recipients.
    pub fn with_bcc(mut self, emails: Vec<String>) -> Self {
        self.bcc_emails = emails;
        self
    }

    /// Sets the agent the reply is sent as.
    pub fn with_agent(mut self, email: impl Into<String>) -> Self {
        self.agent_email = Some(email.into());
        self
    }

    /// Sets the from address.
    pub fn with_from(mut self, email: impl Into<String>) -> Self {
        self.from_email = Some(email.into());
        self
    }

    /// Sets whether the requester is notified.
    pub fn with_notify_contact(mut self, notify: bool) -> Self {
        self.notify_contact = notify;
        self
    }

    /// Sets whether the ticket closes after the reply.
    pub fn with_close_after_reply(mut self, close: bool) -> Self {
        self.close_after_reply = close;
        self
    }
}

/// An outgoing internal note on a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketNote {
    /// Note body text.
    pub body: String,

    /// Whether the note is hidden from the requester.
    pub private: bool,

    /// Agent the note is recorded under, if any.
    pub agent_email: Option<String>,

    /// Additional addresses to notify about the note.
    pub notify_emails: Vec<String>,
}

impl TicketNote {
    /// Creates a private note with the given body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            private: true,
            agent_email: None,
            notify_emails: Vec::new(),
        }
    }

    /// Sets whether the note is hidden from the requester.
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Sets the agent the note is recorded under.
    pub fn with_agent(mut self, email: impl Into<String>) -> Self {
        self.agent_email = Some(email.into());
        self
    }

    /// Adds addresses to notify.
    pub fn with_notify(mut self, emails: Vec<String>) -> Self {
        self.notify_emails = emails;
        self
    }
}

/// Source of an outgoing attachment.
///
/// File inputs arrive either as a path to local storage or as bytes already
/// in memory; both resolve into one multipart part at the call boundary.
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    /// A file on local storage, read in full before the request is sent.
    LocalPath(PathBuf),

    /// In-memory file contents with an explicit filename.
    InMemory {
        /// Filename to present to the vendor.
        filename: String,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl AttachmentSource {
    /// Creates a local-path source.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        AttachmentSource::LocalPath(path.into())
    }

    /// Creates an in-memory source.
    pub fn in_memory(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        AttachmentSource::InMemory {
            filename: filename.into(),
            bytes,
        }
    }

    /// Returns the filename this source will present, when known without I/O.
    pub fn filename(&self) -> Option<String> {
        match self {
            AttachmentSource::LocalPath(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            AttachmentSource::InMemory { filename, .. } => Some(filename.clone()),
        }
    }
}
