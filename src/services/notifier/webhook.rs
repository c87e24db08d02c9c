use crate::config::NotifierConfig;
use crate::error::NotifyError;
use serde::Serialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    body: &'a str,
}

/// Posts `{title, body}` to a single endpoint. A delivery counts as sent only
/// when the JSON response carries `code == success_code`.
pub struct WebhookClient {
    http: reqwest::Client,
    url: Url,
    success_code: i64,
}

impl WebhookClient {
    pub fn new(url: Url, config: &NotifierConfig) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()?;
        Ok(Self::with_client(url, config.success_code, http))
    }

    pub fn with_client(url: Url, success_code: i64, http: reqwest::Client) -> Self {
        Self {
            http,
            url,
            success_code,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns whether the endpoint acknowledged the message.
    pub async fn deliver(&self, title: &str, body: &str) -> Result<bool, NotifyError> {
        let text = self
            .http
            .post(self.url.clone())
            .json(&WebhookPayload { title, body })
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: Value = serde_json::from_str(&text)?;
        let code = response.get("code").and_then(Value::as_i64);
        Ok(code == Some(self.success_code))
    }
}
