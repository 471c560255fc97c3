use std::time::Duration;

use crate::domain::ports::{EmailMessage, EmailService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpEmailService {
    client: Client,
    api_url: String,
    api_key: String,
    from_alias: String,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String, from_alias: String, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to build email client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            api_key,
            from_alias,
        })
    }
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from_alias: &'a str,
    to_addr: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    tag: &'a str,
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let payload = EmailPayload {
            from_alias: &self.from_alias,
            to_addr: &message.recipient,
            subject: &message.subject,
            html_body: &message.html_body,
            text_body: &message.text_body,
            tag: &message.tag,
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Email service connection error: {}", e);
                error!("{}", msg);
                AppError::EmailDelivery(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Email service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::EmailDelivery(msg));
        }

        Ok(())
    }
}
