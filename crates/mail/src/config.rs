//! Mail backend selection and SMTP settings.

use std::path::PathBuf;
use std::str::FromStr;

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `MAIL_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@yamdb.local";

/// Default directory for the file backend.
const DEFAULT_FILE_DIR: &str = "sent_emails";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    Smtp,
    File,
    Memory,
}

impl FromStr for MailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailBackend::Smtp),
            "file" => Ok(MailBackend::File),
            "memory" => Ok(MailBackend::Memory),
            other => Err(format!(
                "Invalid MAIL_BACKEND '{other}'. Must be one of: smtp, file, memory"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// SMTP server hostname. Required for [`MailBackend::Smtp`].
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// Output directory for [`MailBackend::File`].
    pub file_dir: PathBuf,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::File,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_user: None,
            smtp_password: None,
            file_dir: PathBuf::from(DEFAULT_FILE_DIR),
        }
    }
}

impl MailConfig {
    /// In-memory outbox, for tests.
    pub fn memory() -> Self {
        Self {
            backend: MailBackend::Memory,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable         | Required | Default                                  |
    /// |------------------|----------|------------------------------------------|
    /// | `MAIL_BACKEND`   | no       | `smtp` if `SMTP_HOST` is set, else `file` |
    /// | `MAIL_FROM`      | no       | `noreply@yamdb.local`                    |
    /// | `MAIL_FILE_DIR`  | no       | `sent_emails`                            |
    /// | `SMTP_HOST`      | for smtp | --                                       |
    /// | `SMTP_PORT`      | no       | `587`                                    |
    /// | `SMTP_USER`      | no       | --                                       |
    /// | `SMTP_PASSWORD`  | no       | --                                       |
    pub fn from_env() -> Result<Self, String> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty());

        let backend = match std::env::var("MAIL_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) if smtp_host.is_some() => MailBackend::Smtp,
            Err(_) => MailBackend::File,
        };

        if backend == MailBackend::Smtp && smtp_host.is_none() {
            return Err("SMTP_HOST must be set when MAIL_BACKEND=smtp".to_string());
        }

        let defaults = Self::default();
        Ok(Self {
            backend,
            from_address: std::env::var("MAIL_FROM").unwrap_or(defaults.from_address),
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            file_dir: std::env::var("MAIL_FILE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
        })
    }
}
