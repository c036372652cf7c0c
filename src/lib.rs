//! # deskbridge
//!
//! deskbridge is a provider-agnostic client library for ticketing/helpdesk
//! backends. It exposes a normalized ticket lifecycle API - create, list,
//! search, respond, assign, escalate, update, close, reopen - and internally
//! translates to and from one concrete vendor's REST dialect (Helprack),
//! including the vendor's undocumented deviations from its own documentation.
//!
//! ## Features
//!
//! - **Normalized domain model**: stable, provider-neutral ticket, message,
//!   and attachment types; vendor wire shapes never leak past the codec
//! - **Total wire mapping**: malformed or partial vendor payloads degrade to
//!   sentinel-valued entities with a warning, never an error
//! - **Quirk routing**: the vendor's JSON-blob `filters` parameter, fixed
//!   page-size tiers, and the 405-on-PUT assignment fallback are handled in
//!   one place
//! - **Security**: the API credential is never logged
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`] - Construction parameters and environment loading
//! - [`error`] - Unified error taxonomy, including the 405 known-limitation class
//! - [`domain`] - Normalized entities and option types
//! - [`wire`] - Pure, total codec between domain values and the Helprack wire layout
//! - [`helprack_client`] - Operation executor for the Helprack backend
//! - [`provider`] - Capability trait and provider factory
//!
//! ## Example
//!
//! ```ignore
//! use deskbridge::config::Config;
//! use deskbridge::domain::{ListOptions, NewTicket, TicketPriority};
//! use deskbridge::provider::provider_for;
//!
//! async fn example() -> Result<(), deskbridge::error::BridgeError> {
//!     let config = Config::from_env()?;
//!     let helpdesk = provider_for("helprack", &config)?;
//!
//!     let ticket = helpdesk
//!         .create_ticket(
//!             &NewTicket::new("Printer down", "It makes noises", "user@example.com")
//!                 .with_priority(TicketPriority::High),
//!         )
//!         .await?;
//!
//!     let page = helpdesk
//!         .list_tickets("user@example.com", &ListOptions::new())
//!         .await?;
//!     println!("ticket #{} created, {} total", ticket.id, page.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod domain;
pub mod error;
pub mod helprack_client;
pub mod provider;
pub mod wire;

pub use config::Config;
pub use error::BridgeError;
pub use provider::{provider_for, TicketProvider};
