//! Core calculation modules

pub mod consensus;
pub mod kelly;
pub mod league;
pub mod listing;

// Re-export commonly used types
pub use consensus::{best_moneyline, calculate_consensus, BestMoneyline, MarketSummary, OddsConsensus};
pub use kelly::{
    american_to_decimal, calculate_kelly_fraction, BetSizing, KellyCalculator, KellyInput,
    KellyInputError, Odds, OddsFormat, QUARTER_KELLY,
};
pub use listing::{
    paginate, parse_ordering, CategoryFilter, ListError, ListQuery, Listable, Page, PageLinks,
    SortDirection, SortKey, ALL,
};
