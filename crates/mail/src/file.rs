//! Writes each email as an `.eml` file into a directory.

use std::path::PathBuf;

use lettre::{AsyncFileTransport, AsyncTransport, Tokio1Executor};

use crate::config::MailConfig;
use crate::error::MailError;
use crate::message::OutgoingEmail;
use crate::Mailer;

pub struct FileMailer {
    transport: AsyncFileTransport<Tokio1Executor>,
    dir: PathBuf,
    from_address: String,
}

impl FileMailer {
    /// Create the output directory if needed.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        std::fs::create_dir_all(&config.file_dir).map_err(|e| {
            MailError::Config(format!(
                "cannot create mail directory {}: {e}",
                config.file_dir.display()
            ))
        })?;
        Ok(Self {
            transport: AsyncFileTransport::new(&config.file_dir),
            dir: config.file_dir.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Mailer for FileMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = email.to_message(&self.from_address)?;
        let id = self.transport.send(message).await?;
        tracing::info!(
            to = %email.to,
            path = %self.dir.join(format!("{id}.eml")).display(),
            "Email written to file",
        );
        Ok(())
    }
}
