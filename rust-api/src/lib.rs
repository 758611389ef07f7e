//! Courtside - NBA stats and odds dashboard
//!
//! This library provides:
//! - Quarter-Kelly stake sizing from a win probability and American or decimal odds
//! - Cross-bookmaker odds consensus (averages, ranges, best moneylines)
//! - Search, category filter, multi-key sort and paging for list views
//! - A typed client for the stats/odds backend
//! - A cancellable poller that only ever shows the newest response
//!
//! # Example
//!
//! ```
//! use courtside::core::kelly::{KellyCalculator, KellyInput, Odds};
//! use courtside::core::consensus::calculate_consensus;
//! use courtside::models::{BookmakerQuote, SpreadQuote};
//!
//! // Quarter-Kelly on a 55% pick at +110
//! let calc = KellyCalculator::new(1_000.0).unwrap();
//! let input = KellyInput::new(0.55, Odds::American(110)).unwrap();
//! let sizing = calc.calculate(&input).unwrap();
//! assert!(sizing.is_bet());
//! println!("Recommended stake: {:.2}", sizing.stake_amount);
//!
//! // Consensus across two books
//! let quote = |line| BookmakerQuote {
//!     spread: Some(SpreadQuote { line: Some(line), ..Default::default() }),
//!     ..Default::default()
//! };
//! let consensus = calculate_consensus(&[quote(-3.0), quote(-2.0)]);
//! assert_eq!(consensus.spread.average, Some(-2.5));
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod display;
pub mod models;
pub mod poll;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use client::{ApiClient, ClientConfig, ClientError};
pub use config::DashboardConfig;
pub use models::{BookmakerQuote, LiveOddsGame, Player, Team, TeamAnalysis};
pub use poll::{Poller, Snapshot};
