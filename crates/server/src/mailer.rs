//! Invitation mailer.
//!
//! Delivery is best effort: the invitation record exists whether or not
//! the email goes out, and the outcome is only reported back to the
//! caller as `email_sent`.

use serde::Serialize;

#[derive(Serialize)]
struct EmailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug)]
pub enum Mailer {
    Http {
        client: reqwest::Client,
        endpoint: String,
    },
    Disabled,
}

impl Mailer {
    pub fn http(endpoint: String) -> Self {
        Self::Http {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn disabled() -> Self {
        Self::Disabled
    }

    /// Posts the email to the configured endpoint. Returns whether
    /// delivery was accepted; failures are logged, never propagated.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> bool {
        let (client, endpoint) = match self {
            Self::Http { client, endpoint } => (client, endpoint),
            Self::Disabled => {
                tracing::debug!("mailer disabled, skipping email to {to}");
                return false;
            }
        };

        let body = EmailRequest { to, subject, html };
        match client.post(endpoint).json(&body).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!("email endpoint rejected message: {}", response.status());
                false
            }
            Err(err) => {
                tracing::warn!("email delivery failed: {err}");
                false
            }
        }
    }
}
