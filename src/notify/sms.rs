use thiserror::Error;

const BREVO_SMS_URL: &str = "https://api.brevo.com/v3/transactionalSMS/sms";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("Invalid phone number: {0:?}")]
    InvalidNumber(String),
    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("SMS provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },
}

/// Transactional SMS through Brevo. Without an API key every send is a
/// logged no-op.
#[derive(Clone)]
pub struct SmsClient {
    client: reqwest::Client,
    api_key: Option<String>,
    sender: String,
}

impl SmsClient {
    pub fn new(api_key: Option<String>, sender: &str) -> Self {
        if api_key.is_none() {
            tracing::info!("BREVO_API_KEY not set, SMS notifications disabled");
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
            sender: sender.to_string(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: None,
            sender: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn send_sms(&self, phone: &str, message: &str) -> Result<(), SmsError> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!("SMS disabled, skipping message to {phone}");
            return Ok(());
        };

        let recipient = normalize_phone(phone)?;
        let body = serde_json::json!({
            "type": "transactional",
            "sender": self.sender,
            "recipient": recipient,
            "content": message,
        });

        let response = self
            .client
            .post(BREVO_SMS_URL)
            .header("api-key", api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("SMS sent to {recipient}");
        Ok(())
    }
}

/// Digits only, country code included (`+1 (555) 010-2030` -> `15550102030`).
pub fn normalize_phone(phone: &str) -> Result<String, SmsError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 || digits.len() > 15 {
        return Err(SmsError::InvalidNumber(phone.to_string()));
    }
    Ok(digits)
}
