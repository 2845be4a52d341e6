//! Newsletter delivery over SMTP
//!
//! Wraps the rendered HTML into a multipart message with a plain-text
//! fallback and sends it through an authenticated STARTTLS session. The
//! transport lives only for the duration of the send; any SMTP failure is
//! surfaced to the caller.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

/// SMTP submission port used for STARTTLS.
const SMTP_PORT: u16 = 587;

/// Plain-text part shown by clients that cannot display HTML.
const PLAIN_FALLBACK: &str = "Your email client does not support HTML.";

/// Errors that can occur while building or sending the email
#[derive(Debug, Error)]
pub enum MailerError {
    /// A sender or recipient address could not be parsed
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled
    #[error("Failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP session failed (connection, auth, or delivery)
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP mailer for the rendered newsletter.
pub struct Mailer {
    host: String,
    username: String,
    password: String,
    from: String,
}

impl Mailer {
    /// Creates a mailer for the given SMTP account.
    ///
    /// `from` is used both as the envelope sender and the From header.
    pub fn new(host: &str, username: &str, password: &str, from: &str) -> Self {
        Self {
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            from: from.to_string(),
        }
    }

    /// Sends the newsletter HTML to all recipients in one session.
    pub fn send(
        &self,
        subject: &str,
        html: &str,
        recipients: &[String],
    ) -> Result<(), MailerError> {
        let message = self.build_message(subject, html, recipients)?;

        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        let transport = SmtpTransport::starttls_relay(&self.host)?
            .port(SMTP_PORT)
            .credentials(credentials)
            .build();

        transport.send(&message)?;
        Ok(())
    }

    /// Assembles the multipart message: plain fallback plus HTML alternative.
    fn build_message(
        &self,
        subject: &str,
        html: &str,
        recipients: &[String],
    ) -> Result<Message, MailerError> {
        let from: Mailbox = self.from.parse()?;

        let mut builder = Message::builder().from(from).subject(subject);
        for recipient in recipients {
            builder = builder.to(recipient.parse()?);
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            PLAIN_FALLBACK.to_string(),
            html.to_string(),
        ))?;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Mailer {
        Mailer::new("smtp.example.org", "user", "secret", "news@example.org")
    }

    #[test]
    fn test_build_message_contains_both_parts() {
        let message = mailer()
            .build_message(
                "New on the server",
                "<p>hello</p>",
                &["a@example.org".to_string(), "b@example.org".to_string()],
            )
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: New on the server"));
        assert!(raw.contains("To: a@example.org, b@example.org"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("<p>hello</p>"));
        assert!(raw.contains(PLAIN_FALLBACK));
    }

    #[test]
    fn test_invalid_recipient_is_an_error() {
        let err = mailer()
            .build_message("s", "<p></p>", &["not an address".to_string()])
            .unwrap_err();
        assert!(matches!(err, MailerError::Address(_)));
    }
}
