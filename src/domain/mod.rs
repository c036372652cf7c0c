//! Normalized domain model for helpdesk entities.
//!
//! This module contains the provider-neutral value objects exposed by the
//! facade: tickets, conversation messages, attachments, and the filter,
//! sort, and pagination option types. Vendor wire shapes never appear here;
//! translation lives in [`crate::wire`].

mod message;
mod options;
mod ticket;

pub use message::*;
pub use options::*;
pub use ticket::*;
