pub mod analysis;
pub mod direction;
pub mod trade;

pub use analysis::{ImportantFactor, PatternAnalysis, PerformanceMetrics};
pub use direction::Direction;
pub use trade::{MarketCondition, NormalizedTrade, TradeRecord};
