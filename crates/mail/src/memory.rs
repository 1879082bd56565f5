//! In-process outbox. Nothing leaves the process.

use std::sync::Mutex;

use crate::error::MailError;
use crate::message::OutgoingEmail;
use crate::Mailer;

#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<OutgoingEmail>>,
}

impl MemoryMailer {
    /// Every email sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recent email addressed to `to`.
    pub fn last_sent_to(&self, to: &str) -> Option<OutgoingEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .rev()
            .find(|email| email.to.eq_ignore_ascii_case(to))
            .cloned()
    }
}

#[async_trait::async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        // Reject what a real transport would reject.
        email.to_message("noreply@yamdb.local")?;
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(email.clone());
        tracing::debug!(to = %email.to, "Email captured in memory outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_mail() {
        let mailer = MemoryMailer::default();
        mailer
            .send(&OutgoingEmail::confirmation_code("bob", "b@x.com", "first"))
            .await
            .unwrap();
        mailer
            .send(&OutgoingEmail::confirmation_code("bob", "b@x.com", "second"))
            .await
            .unwrap();

        assert_eq!(mailer.sent().len(), 2);
        let last = mailer.last_sent_to("B@X.com").unwrap();
        assert_eq!(last.body.lines().last(), Some("second"));
        assert!(mailer.last_sent_to("nobody@x.com").is_none());
    }
}
