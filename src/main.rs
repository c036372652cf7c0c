//! deskbridge - manual smoke test against a live Helprack backend.
//!
//! This binary exercises the full normalized operation set against a real
//! instance. It is a diagnostic, not a scripted contract: every step is
//! best-effort, failures are logged and the run continues to the next
//! independent step, and a summary is reported at the end.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `DESKBRIDGE_BASE_URL`: Base URL of the Helprack instance
//! - `DESKBRIDGE_API_KEY`: API credential
//! - `DESKBRIDGE_TEST_REQUESTER`: Email the smoke ticket is raised for
//! - `DESKBRIDGE_ADMIN_EMAIL` (optional): Agent email for the assign step
//!
//! # Usage
//!
//! ```bash
//! deskbridge --verbose --log-to-file
//! ```

use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use deskbridge::config::Config;
use deskbridge::domain::{
    AttachmentSource, ListOptions, NewTicket, TicketFilters, TicketNote, TicketPriority,
    TicketReply, TicketStatus,
};
use deskbridge::provider::{provider_for, TicketProvider, PROVIDER_HELPRACK};

/// Command-line flags for the smoke run.
#[derive(Debug, Parser)]
#[command(name = "deskbridge", about = "Smoke-test a Helprack backend")]
struct Args {
    /// Enable verbose request logging.
    #[arg(short, long)]
    verbose: bool,

    /// Write a timestamped log file in addition to stderr output.
    #[arg(short = 'f', long)]
    log_to_file: bool,
}

/// Tracks pass/fail counts across the best-effort steps.
#[derive(Default)]
struct Summary {
    passed: u32,
    failed: u32,
}

impl Summary {
    /// Records a step outcome, logging and continuing on failure.
    fn record<T>(&mut self, step: &str, result: Result<T, deskbridge::BridgeError>) -> Option<T> {
        match result {
            Ok(value) => {
                tracing::info!(step, "step passed");
                self.passed += 1;
                Some(value)
            }
            Err(e) => {
                tracing::error!(step, error = %e, "step failed, continuing");
                self.failed += 1;
                None
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args)?;

    tracing::info!("deskbridge smoke test v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_verbose(args.verbose);

    let requester = std::env::var("DESKBRIDGE_TEST_REQUESTER")
        .context("DESKBRIDGE_TEST_REQUESTER must be set for the smoke test")?;
    let admin_email = std::env::var("DESKBRIDGE_ADMIN_EMAIL").ok();

    let helpdesk =
        provider_for(PROVIDER_HELPRACK, &config).context("Failed to construct provider")?;

    let mut summary = Summary::default();
    run_steps(helpdesk.as_ref(), &requester, admin_email.as_deref(), &mut summary).await;

    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        "smoke test finished"
    );

    Ok(())
}

/// Initializes stderr logging, plus a timestamped log file when requested.
fn init_logging(args: &Args) -> Result<()> {
    let default_level = if args.verbose {
        "deskbridge=debug"
    } else {
        "deskbridge=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if args.log_to_file {
        let filename = format!(
            "deskbridge-smoke-{}.log",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let file = std::fs::File::create(&filename)
            .with_context(|| format!("Failed to create log file {}", filename))?;
        eprintln!("logging to {}", filename);
        fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

/// Runs the smoke steps in order, continuing past individual failures.
async fn run_steps(
    helpdesk: &dyn TicketProvider,
    requester: &str,
    admin_email: Option<&str>,
    summary: &mut Summary,
) {
    let check = helpdesk.verify_connection().await;
    if check.success {
        tracing::info!(message = %check.message, "connectivity check passed");
        summary.passed += 1;
    } else {
        tracing::error!(message = %check.message, "connectivity check failed, continuing");
        summary.failed += 1;
    }

    let created = summary.record(
        "create ticket",
        helpdesk
            .create_ticket(
                &NewTicket::new(
                    "deskbridge smoke test",
                    "Created by the deskbridge smoke test; safe to close.",
                    requester,
                )
                .with_priority(TicketPriority::Medium),
            )
            .await,
    );

    summary.record(
        "list tickets",
        helpdesk.list_tickets(requester, &ListOptions::new()).await,
    );

    summary.record(
        "search tickets",
        helpdesk
            .search_tickets(
                &TicketFilters::new()
                    .with_requester(requester)
                    .with_status(TicketStatus::Open),
                &ListOptions::new(),
            )
            .await,
    );

    // The remaining steps need a ticket to act on.
    let Some(ticket) = created else {
        tracing::warn!("no ticket created, skipping per-ticket steps");
        return;
    };
    let id = ticket.id.as_str();

    summary.record("get ticket details", helpdesk.get_ticket(id).await);
    summary.record("get conversation", helpdesk.get_conversation(id).await);

    summary.record(
        "reply to ticket",
        helpdesk
            .reply(id, &TicketReply::new("Smoke test reply, please ignore."))
            .await,
    );

    summary.record(
        "reply with attachment",
        helpdesk
            .reply_with_attachments(
                id,
                &TicketReply::new("Smoke test reply with attachment."),
                &[AttachmentSource::in_memory(
                    "smoke.txt",
                    b"deskbridge smoke test attachment".to_vec(),
                )],
            )
            .await,
    );

    summary.record(
        "add note",
        helpdesk
            .add_note(id, &TicketNote::new("Smoke test note."))
            .await,
    );

    if let Some(admin) = admin_email {
        summary.record("assign ticket", helpdesk.assign_ticket(id, admin).await);
    } else {
        tracing::info!("DESKBRIDGE_ADMIN_EMAIL not set, skipping assign step");
    }

    summary.record(
        "escalate ticket",
        helpdesk.escalate_ticket(id, TicketPriority::High).await,
    );

    summary.record("close ticket", helpdesk.close_ticket(id).await);
    summary.record("reopen ticket", helpdesk.reopen_ticket(id).await);
    summary.record("close ticket again", helpdesk.close_ticket(id).await);
}
