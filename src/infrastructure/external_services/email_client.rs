use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::email_sender::{EmailError, EmailMessage, EmailSender};
use crate::config::ServicesConfig;

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Delivers mail through a transactional email HTTP API.
pub struct HttpEmailSender {
    client: Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpEmailSender {
    pub fn new(
        url: String,
        api_key: Option<String>,
        from: String,
        timeout_secs: u64,
    ) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let mut request = self.client.post(&self.url).json(&SendRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmailError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected(format!("{}: {}", status, body)));
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Stand-in used when no email service is configured; writes the message to the log.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "Email delivery not configured; logging message instead"
        );
        Ok(())
    }
}

pub fn email_sender_from_config(
    config: &ServicesConfig,
) -> Result<std::sync::Arc<dyn EmailSender>, ReqwestError> {
    Ok(match &config.email_url {
        Some(url) => std::sync::Arc::new(HttpEmailSender::new(
            url.clone(),
            config.email_api_key.clone(),
            config.email_from.clone(),
            config.timeout_secs,
        )?),
        None => std::sync::Arc::new(LogEmailSender),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method},
    };

    fn message() -> EmailMessage {
        EmailMessage {
            to: "couple@example.com".to_string(),
            subject: "You're invited".to_string(),
            text: "Open the link".to_string(),
        }
    }

    #[tokio::test]
    async fn test_http_sender_posts_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer mail-key"))
            .and(body_json(json!({
                "from": "studio@example.com",
                "to": ["couple@example.com"],
                "subject": "You're invited",
                "text": "Open the link"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let sender = HttpEmailSender::new(
            mock_server.uri(),
            Some("mail-key".to_string()),
            "studio@example.com".to_string(),
            5,
        )
        .unwrap();
        sender.send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_sender_rejection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid recipient"))
            .mount(&mock_server)
            .await;

        let sender =
            HttpEmailSender::new(mock_server.uri(), None, "studio@example.com".to_string(), 5)
                .unwrap();
        let result = sender.send(&message()).await;
        assert!(matches!(result, Err(EmailError::Rejected(msg)) if msg.contains("invalid recipient")));
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        assert!(LogEmailSender.send(&message()).await.is_ok());
    }
}
