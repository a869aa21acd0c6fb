use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::journal::TradeJournal;
use crate::models::TradeRecord;

/// Process-local journal. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryJournal {
    records: RwLock<Vec<TradeRecord>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TradeRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl TradeJournal for MemoryJournal {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn record_trade(&self, record: TradeRecord) -> Result<TradeRecord> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
