use std::fmt::Write;

use crate::analytics::AnalysisReport;

/// Render an analysis run as the boxed console summary used by the CLI.
pub fn render(report: &AnalysisReport, total_trades: usize, top_factors: usize) -> String {
    let perf = &report.performance;
    let patterns = &report.patterns;
    let rule = "  ───────────────────────────────────";
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "=".repeat(70));
    let _ = writeln!(out, "  TRADE JOURNAL ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "  Trades:      {}", total_trades);
    let _ = writeln!(out);
    let _ = writeln!(out, "  PERFORMANCE");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "  Win Rate:    {:.1}%", perf.win_rate * 100.0);
    let _ = writeln!(out, "  Avg Win:     ${:.2}", perf.average_win);
    let _ = writeln!(out, "  Avg Loss:    ${:.2}", perf.average_loss);
    let _ = writeln!(out, "  Profit Factor: {:.2}", perf.profit_factor);

    if !perf.best_conditions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  BEST CONDITIONS");
        let _ = writeln!(out, "{}", rule);
        for (i, c) in perf.best_conditions.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {}", i + 1, c);
        }
    }

    if !patterns.important_factors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  IMPORTANT FACTORS");
        let _ = writeln!(out, "{}", rule);
        for f in patterns.important_factors.iter().take(top_factors) {
            let _ = writeln!(out, "  {:<24} {:.3}", f.factor, f.importance);
        }
    }

    if !patterns.success_patterns.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  SUCCESS PATTERNS");
        let _ = writeln!(out, "{}", rule);
        for p in &patterns.success_patterns {
            let _ = writeln!(out, "  {}", p);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  INSIGHTS");
    let _ = writeln!(out, "{}", rule);
    for line in &perf.pattern_insights {
        let _ = writeln!(out, "  - {}", line);
    }
    let _ = writeln!(out, "{}", "=".repeat(70));
    out
}

pub fn print_summary(report: &AnalysisReport, total_trades: usize, top_factors: usize) {
    print!("{}", render(report, total_trades, top_factors));
}
