//! Message content and MIME assembly.

use lettre::message::header::ContentType;
use lettre::Message;

use crate::error::MailError;

/// A plain-text email ready to hand to a [`crate::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// The signup email carrying a confirmation code. The code is the last
    /// line of the body.
    pub fn confirmation_code(username: &str, to: &str, code: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "YaMDb confirmation code".to_string(),
            body: format!(
                "Hello, {username}!\n\n\
                 Exchange this code at /api/v1/auth/token to get your access token:\n\n\
                 {code}"
            ),
        }
    }

    /// Assemble the MIME message sent by the transport backends.
    pub fn to_message(&self, from: &str) -> Result<Message, MailError> {
        Message::builder()
            .from(from.parse()?)
            .to(self.to.parse()?)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}
