//! Outgoing email

use donaton_di::abstraction;
use std::sync::Mutex;

/// Subject of the password reset email
pub const PASSWORD_RESET_SUBJECT: &str = "Restablecimiento de contraseña - DonatonUIS";

/// Sends email to users
pub trait EmailService: Send + Sync {
    /// Sends a message, returns `true` if it was accepted for delivery
    fn send_email(&self, to: &str, subject: &str, message: &str) -> bool;

    /// Sends the temporary password after a reset
    fn send_password_reset(&self, email: &str, new_password: &str) -> bool {
        let message = format!("Tu nueva contraseña temporal es: {new_password}");
        self.send_email(email, PASSWORD_RESET_SUBJECT, &message)
    }
}

/// A message accepted by the [`OutboxEmailService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
}

/// [`EmailService`] that records messages in an outbox instead of delivering them
#[derive(Debug)]
pub struct OutboxEmailService {
    sender: String,
    outbox: Mutex<Vec<EmailMessage>>,
}

impl OutboxEmailService {
    /// Creates an empty outbox that sends from the given address
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            outbox: Mutex::default(),
        }
    }

    /// Returns the messages sent so far, oldest first
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .expect("outbox lock poisoned")
            .clone()
    }
}

impl EmailService for OutboxEmailService {
    fn send_email(&self, to: &str, subject: &str, message: &str) -> bool {
        let to = to.trim();
        if !to.contains('@') {
            tracing::warn!("email to {to:?} rejected: invalid recipient");
            return false;
        }

        tracing::info!("email from {} to {to}: {subject}", self.sender);
        self.outbox
            .lock()
            .expect("outbox lock poisoned")
            .push(EmailMessage {
                from: self.sender.clone(),
                to: to.into(),
                subject: subject.into(),
                body: message.into(),
            });
        true
    }
}

abstraction!(dyn EmailService => OutboxEmailService);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_records_sent_email() {
        let email = OutboxEmailService::new("noreply@donatonuis.com");

        assert!(email.send_email(" ana@uis.edu.co ", "Hola", "Bienvenida"));

        assert_eq!(email.sent(), [EmailMessage {
            from: "noreply@donatonuis.com".into(),
            to: "ana@uis.edu.co".into(),
            subject: "Hola".into(),
            body: "Bienvenida".into(),
        }]);
    }

    #[test]
    fn it_sends_password_reset() {
        let email = OutboxEmailService::new("noreply@donatonuis.com");

        assert!(email.send_password_reset("ana@uis.edu.co", "Temp1234"));

        let sent = email.sent();
        assert_eq!(sent[0].subject, PASSWORD_RESET_SUBJECT);
        assert_eq!(sent[0].body, "Tu nueva contraseña temporal es: Temp1234");
    }

    #[test]
    fn it_rejects_invalid_recipient() {
        let email = OutboxEmailService::new("noreply@donatonuis.com");

        assert!(!email.send_email("ana", "Hola", "Bienvenida"));
        assert!(email.sent().is_empty());
    }
}
