use std::time::Duration;

use octagon_core::error::AppError;
use octagon_core::traits::Fetcher;
use reqwest::Client;

pub const DEFAULT_USER_AGENT: &str = "Octagon/0.1 (fighter stats crawler)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP fetcher using reqwest.
///
/// One call is one GET. Connection failures, timeouts and non-2xx statuses
/// all come back as errors; retrying is left to the caller.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}
