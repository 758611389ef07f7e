//! Client for the stats/odds backend
//!
//! # Example
//!
//! ```no_run
//! use courtside::client::{ApiClient, ClientConfig};
//! use courtside::core::calculate_consensus;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new(ClientConfig::default())?;
//!
//!     let odds = client.live_odds().await?;
//!     for game in &odds.games {
//!         let consensus = calculate_consensus(&game.bookmakers);
//!         println!("{} vs {}: {:?}", game.home_team, game.away_team, consensus.spread.average);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;

pub use api::{ApiClient, ClientConfig, ClientError, PlayerQuery};
