use anyhow::{Context, Result};

use trade_journal::analytics::AnalyticsEngine;
use trade_journal::config::Config;
use trade_journal::logging;
use trade_journal::models::TradeRecord;
use trade_journal::report;

fn main() -> Result<()> {
    let cfg = Config::from_env();

    logging::init_stderr(&cfg.log_level);

    // analyze <trades.json> [--json]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .context("usage: analyze <trades.json> [--json]")?;

    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let records: Vec<TradeRecord> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path))?;

    let engine = AnalyticsEngine::new(cfg.analysis.clone());
    let analysis = engine.analyze(&records)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        report::print_summary(&analysis, records.len(), cfg.analysis.top_factors);
    }

    Ok(())
}
