//! Outbound email over SMTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use salonkit_common::config::SmtpConfig;
use salonkit_common::{AppError, AppResult};
use tracing::{info, warn};

/// Delivery attempts per message.
const MAX_SEND_ATTEMPTS: u32 = 3;

/// Fixed delay between attempts; no backoff.
const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// A message to deliver.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// One delivery attempt. Implemented over lettre SMTP in production and by
/// test doubles in unit tests.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, from: &str, message: &EmailMessage) -> AppResult<()>;
}

struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, from: &str, message: &EmailMessage) -> AppResult<()> {
        let mut builder = Message::builder()
            .from(from.parse().map_err(|_| {
                AppError::Email(format!("Invalid sender address: {from}"))
            })?)
            .to(message.to.parse().map_err(|_| {
                AppError::Email(format!("Invalid recipient address: {}", message.to))
            })?)
            .subject(&message.subject);
        builder = builder.date_now();

        let mail = match &message.html_body {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(
                    message.text_body.clone(),
                    html.clone(),
                ))
                .map_err(|e| AppError::Email(e.to_string()))?,
            None => builder
                .body(message.text_body.clone())
                .map_err(|e| AppError::Email(e.to_string()))?,
        };

        self.transport
            .send(mail)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;
        Ok(())
    }
}

/// Email service with a bounded retry around delivery.
#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    from_address: String,
    from_name: String,
    site_name: String,
}

impl EmailService {
    /// Build the production service from SMTP configuration.
    pub fn from_config(smtp: &SmtpConfig, site_name: impl Into<String>) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| AppError::Email(e.to_string()))?
            .port(smtp.port);

        if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let transport = builder.build();

        Ok(Self {
            transport: Arc::new(SmtpMailTransport { transport }),
            from_address: smtp.from_address.clone(),
            from_name: smtp.from_name.clone(),
            site_name: site_name.into(),
        })
    }

    /// Build the service over an arbitrary transport (tests).
    #[must_use]
    pub fn with_transport(
        transport: Arc<dyn MailTransport>,
        from_address: impl Into<String>,
        from_name: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            from_address: from_address.into(),
            from_name: from_name.into(),
            site_name: site_name.into(),
        }
    }

    /// Deliver a message, retrying up to three times with a fixed one-second
    /// delay between attempts.
    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let from = format!("{} <{}>", self.from_name, self.from_address);

        let mut last_error = None;
        for attempt in 1..=MAX_SEND_ATTEMPTS {
            match self.transport.deliver(&from, message).await {
                Ok(()) => {
                    info!(to = %message.to, attempt, "email delivered");
                    return Ok(());
                }
                Err(e) => {
                    warn!(to = %message.to, attempt, error = %e, "email delivery failed");
                    last_error = Some(e);
                    if attempt < MAX_SEND_ATTEMPTS {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::Email("Delivery failed".to_string())))
    }

    /// Send the order confirmation after checkout.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        salon_name: &str,
        order_id: &str,
        total_cents: i64,
    ) -> AppResult<()> {
        let total = format_eur(total_cents);
        let subject = format!("Your {} order is confirmed", self.site_name);
        let text = format!(
            "Thank you for your order!\n\n\
             Salon: {salon_name}\n\
             Order reference: {order_id}\n\
             Total: {total}\n\n\
             You can now continue with your website setup."
        );
        let html = self.wrap_html(&format!(
            "<p>Thank you for your order!</p>\
             <p><strong>Salon:</strong> {salon_name}<br>\
             <strong>Order reference:</strong> {order_id}<br>\
             <strong>Total:</strong> {total}</p>\
             <p>You can now continue with your website setup.</p>"
        ));

        self.send(&EmailMessage {
            to: to.to_string(),
            subject,
            text_body: text,
            html_body: Some(html),
        })
        .await
    }

    /// Send an admin reply to a contact message.
    pub async fn send_contact_reply(
        &self,
        to: &str,
        original_subject: Option<&str>,
        reply_body: &str,
    ) -> AppResult<()> {
        let subject = match original_subject {
            Some(s) => format!("Re: {s}"),
            None => format!("Re: your message to {}", self.site_name),
        };
        let html = self.wrap_html(&format!("<p>{}</p>", reply_body.replace('\n', "<br>")));

        self.send(&EmailMessage {
            to: to.to_string(),
            subject,
            text_body: reply_body.to_string(),
            html_body: Some(html),
        })
        .await
    }

    fn wrap_html(&self, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        a {{ color: #b8860b; }}
    </style>
</head>
<body>
    {}
    <hr style="margin-top: 40px; border: none; border-top: 1px solid #e9ecef;">
    <p style="font-size: 12px; color: #6c757d;">{}</p>
</body>
</html>"#,
            content, self.site_name
        )
    }
}

fn format_eur(cents: i64) -> String {
    format!("{}.{:02} €", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` attempts, then succeeds.
    struct FlakyTransport {
        failures: u32,
        attempts: AtomicU32,
    }

    #[async_trait]
    impl MailTransport for FlakyTransport {
        async fn deliver(&self, _from: &str, _message: &EmailMessage) -> AppResult<()> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.failures {
                Err(AppError::Email("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn service(transport: Arc<FlakyTransport>) -> EmailService {
        EmailService::with_transport(
            transport,
            "no-reply@salonkit.fr",
            "Salonkit",
            "Salonkit",
        )
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "marie@salon-lumiere.fr".to_string(),
            subject: "Hello".to_string(),
            text_body: "Hi".to_string(),
            html_body: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_succeeds_first_try() {
        let transport = Arc::new(FlakyTransport {
            failures: 0,
            attempts: AtomicU32::new(0),
        });

        service(transport.clone()).send(&message()).await.unwrap();
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_recovers_within_three_attempts() {
        let transport = Arc::new(FlakyTransport {
            failures: 2,
            attempts: AtomicU32::new(0),
        });

        service(transport.clone()).send(&message()).await.unwrap();
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_gives_up_after_three_failures() {
        let transport = Arc::new(FlakyTransport {
            failures: 3,
            attempts: AtomicU32::new(0),
        });

        let result = service(transport.clone()).send(&message()).await;
        assert!(matches!(result, Err(AppError::Email(_))));
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(49900), "499.00 €");
        assert_eq!(format_eur(1205), "12.05 €");
    }
}
