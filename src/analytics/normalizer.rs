use std::collections::BTreeSet;

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Direction, NormalizedTrade, TradeRecord};

/// Validate and canonicalize a batch of records, preserving input order.
/// Fails on the first invalid record, or on the record that pushes the
/// batch's gross P&L past the representable range.
pub fn normalize_all(records: &[TradeRecord]) -> AnalysisResult<Vec<NormalizedTrade>> {
    let mut gross = 0.0f64;
    let mut out = Vec::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        let trade = normalize(i, r)?;
        gross += trade.pnl.abs();
        if !gross.is_finite() {
            return Err(AnalysisError::validation(
                record_label(i, r),
                "pnl",
                "overflows the batch total",
            ));
        }
        out.push(trade);
    }
    Ok(out)
}

fn record_label(index: usize, record: &TradeRecord) -> String {
    match &record.id {
        Some(id) => format!("#{} ({})", index, id),
        None => format!("#{}", index),
    }
}

/// Validate one record. `index` is its position in the batch and is used to
/// name the record in errors when it carries no id.
pub fn normalize(index: usize, record: &TradeRecord) -> AnalysisResult<NormalizedTrade> {
    let label = record_label(index, record);

    let entry_time = record
        .entry_time
        .ok_or_else(|| AnalysisError::validation(&label, "entry_time", "is required"))?;

    let symbol = record
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AnalysisError::validation(&label, "symbol", "must be a non-empty string"))?
        .to_string();

    let entry_price = positive(&label, "entry_price", record.entry_price)?;
    let exit_price = positive(&label, "exit_price", record.exit_price)?;
    let position_size = positive(&label, "position_size", record.position_size)?;

    let direction: Direction = record
        .direction
        .as_deref()
        .ok_or_else(|| AnalysisError::validation(&label, "direction", "is required"))?
        .parse()
        .map_err(|e: String| AnalysisError::validation(&label, "direction", e))?;

    let conditions = canonical_conditions(&record.conditions);

    let pnl = (exit_price - entry_price) * position_size * direction.sign();
    if !pnl.is_finite() {
        return Err(AnalysisError::validation(&label, "pnl", "overflows"));
    }

    Ok(NormalizedTrade {
        entry_time,
        symbol,
        entry_price,
        exit_price,
        position_size,
        direction,
        conditions,
        notes: record.notes.clone(),
        pnl,
        is_win: pnl > 0.0,
    })
}

/// Trim, lower-case, drop empties, dedup. Output is sorted.
pub fn canonical_conditions(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn positive(label: &str, field: &'static str, value: Option<f64>) -> AnalysisResult<f64> {
    match value {
        None => Err(AnalysisError::validation(label, field, "is required")),
        Some(v) if !v.is_finite() || v <= 0.0 => Err(AnalysisError::validation(
            label,
            field,
            format!("must be a positive finite number, got {}", v),
        )),
        Some(v) => Ok(v),
    }
}
