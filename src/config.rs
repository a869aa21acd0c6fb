use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where trade records are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalBackend {
    Memory,
    File,
    Remote,
}

impl FromStr for JournalBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(JournalBackend::Memory),
            "file" => Ok(JournalBackend::File),
            "remote" => Ok(JournalBackend::Remote),
            other => Err(format!("unknown journal backend '{}'", other)),
        }
    }
}

/// Tunables for the analytics engine. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // Metrics
    pub min_condition_support: usize,
    pub top_conditions: usize,
    pub profit_factor_cap: f64,

    // Importance ranking
    pub min_trades_for_ranking: usize,
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub forest_min_samples_split: usize,
    /// Features tried per split. `None` means ceil(sqrt(vocabulary size)).
    pub forest_max_features: Option<usize>,
    pub forest_seed: u64,
    /// Total node budget across the whole ensemble.
    pub forest_max_nodes: usize,

    // Pattern mining
    pub pattern_max_combo: usize,
    pub pattern_min_support: usize,
    pub pattern_margin: f64,
    pub pattern_limit: usize,
    /// Upper bound on tag subsets enumerated per analysis.
    pub pattern_max_subsets: usize,

    // Insights
    pub top_factors: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_condition_support: 2,
            top_conditions: 5,
            profit_factor_cap: 1000.0,
            min_trades_for_ranking: 10,
            forest_trees: 100,
            forest_max_depth: 8,
            forest_min_samples_split: 2,
            forest_max_features: None,
            forest_seed: 42,
            forest_max_nodes: 200_000,
            pattern_max_combo: 2,
            pattern_min_support: 3,
            pattern_margin: 0.10,
            pattern_limit: 5,
            pattern_max_subsets: 100_000,
            top_factors: 5,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let d = Self::default();

        Self {
            min_condition_support: env_parse("MIN_CONDITION_SUPPORT", d.min_condition_support),
            top_conditions: env_parse("TOP_CONDITIONS", d.top_conditions),
            profit_factor_cap: env_non_negative("PROFIT_FACTOR_CAP", d.profit_factor_cap),
            min_trades_for_ranking: env_parse("MIN_TRADES_FOR_RANKING", d.min_trades_for_ranking),
            forest_trees: env_parse("FOREST_TREES", d.forest_trees).max(1),
            forest_max_depth: env_parse("FOREST_MAX_DEPTH", d.forest_max_depth).max(1),
            forest_min_samples_split: env_parse("FOREST_MIN_SAMPLES_SPLIT", d.forest_min_samples_split)
                .max(2),
            forest_max_features: std::env::var("FOREST_MAX_FEATURES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0),
            forest_seed: env_parse("FOREST_SEED", d.forest_seed),
            forest_max_nodes: env_parse("FOREST_MAX_NODES", d.forest_max_nodes),
            pattern_max_combo: env_parse("PATTERN_MAX_COMBO", d.pattern_max_combo).max(2),
            pattern_min_support: env_parse("PATTERN_MIN_SUPPORT", d.pattern_min_support).max(1),
            pattern_margin: env_non_negative("PATTERN_MARGIN", d.pattern_margin),
            pattern_limit: env_parse("PATTERN_LIMIT", d.pattern_limit),
            pattern_max_subsets: env_parse("PATTERN_MAX_SUBSETS", d.pattern_max_subsets),
            top_factors: env_parse("TOP_FACTORS", d.top_factors),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    pub server_host: String,
    pub server_port: u16,

    // Journal
    pub journal_backend: JournalBackend,
    pub journal_path: String,
    pub journal_url: String,

    // Logging
    pub log_level: String,

    pub analysis: AnalysisConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            server_host: env("SERVER_HOST", "0.0.0.0"),
            server_port: env_parse("SERVER_PORT", 8000),
            journal_backend: env("JOURNAL_BACKEND", "memory")
                .parse()
                .unwrap_or(JournalBackend::Memory),
            journal_path: env("JOURNAL_PATH", "data/trades.json"),
            journal_url: env("JOURNAL_URL", "http://localhost:8001"),
            log_level: env("LOG_LEVEL", "info"),
            analysis: AnalysisConfig::from_env(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Finite and non-negative, else the default.
fn env_non_negative(key: &str, default: f64) -> f64 {
    Some(env_parse(key, default))
        .filter(|v: &f64| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}
