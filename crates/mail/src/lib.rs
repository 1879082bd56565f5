//! Outgoing email for yamdb.
//!
//! The API only sees the [`Mailer`] trait. [`from_config`] picks a backend:
//! SMTP for real delivery, a directory of `.eml` files for local
//! development, or an in-memory outbox for tests.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod message;
pub mod smtp;

use std::sync::Arc;

pub use config::{MailBackend, MailConfig};
pub use error::MailError;
pub use file::FileMailer;
pub use memory::MemoryMailer;
pub use message::OutgoingEmail;
pub use smtp::SmtpMailer;

/// Something that can deliver an [`OutgoingEmail`].
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Build the mailer selected by `config.backend`.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    let mailer: Arc<dyn Mailer> = match config.backend {
        MailBackend::Smtp => Arc::new(SmtpMailer::new(config)?),
        MailBackend::File => Arc::new(FileMailer::new(config)?),
        MailBackend::Memory => Arc::new(MemoryMailer::default()),
    };
    tracing::info!(backend = ?config.backend, from = %config.from_address, "Mailer configured");
    Ok(mailer)
}
