use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::journal::TradeJournal;
use crate::models::TradeRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Journal served by another instance of the capture API (`/trades/`).
pub struct RemoteJournal {
    client: Client,
    base_url: String,
}

impl RemoteJournal {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn trades_url(&self) -> String {
        format!("{}/trades/", self.base_url)
    }
}

#[async_trait]
impl TradeJournal for RemoteJournal {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>> {
        let resp = self
            .client
            .get(self.trades_url())
            .send()
            .await
            .context("Failed to fetch trades")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Journal API error {}: {}", status, body);
        }

        resp.json().await.context("Failed to parse trades response")
    }

    async fn record_trade(&self, record: TradeRecord) -> Result<TradeRecord> {
        let resp = self
            .client
            .post(self.trades_url())
            .json(&record)
            .send()
            .await
            .context("Failed to post trade")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Journal API error {}: {}", status, body);
        }

        resp.json().await.context("Failed to parse trade response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_normalized() {
        assert_eq!(
            RemoteJournal::new("http://journal:8001/").trades_url(),
            "http://journal:8001/trades/"
        );
        assert_eq!(
            RemoteJournal::new("http://journal:8001").trades_url(),
            "http://journal:8001/trades/"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let journal = RemoteJournal::new("http://127.0.0.1:9");
        assert!(journal.fetch_trades().await.is_err());
    }
}
