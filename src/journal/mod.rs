pub mod file;
pub mod memory;
pub mod remote;

pub use file::FileJournal;
pub use memory::MemoryJournal;
pub use remote::RemoteJournal;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, JournalBackend};
use crate::models::TradeRecord;

/// Source of raw trade records. `fetch_trades` returns a complete snapshot at
/// call time.
#[async_trait]
pub trait TradeJournal: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>>;
    async fn record_trade(&self, record: TradeRecord) -> Result<TradeRecord>;
}

pub fn from_config(cfg: &Config) -> Arc<dyn TradeJournal> {
    match cfg.journal_backend {
        JournalBackend::Memory => Arc::new(MemoryJournal::new()),
        JournalBackend::File => Arc::new(FileJournal::new(&cfg.journal_path)),
        JournalBackend::Remote => Arc::new(RemoteJournal::new(&cfg.journal_url)),
    }
}
