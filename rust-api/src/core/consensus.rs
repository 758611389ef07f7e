//! Odds consensus across bookmakers
//!
//! Per market, averages the numeric values that books actually reported and
//! records the min/max spread of disagreement. A book that did not report a
//! field is left out of that aggregate; it is never counted as zero.

use serde::{Deserialize, Serialize};

use crate::models::BookmakerQuote;

/// Market whose values are being summarised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    SpreadLine,
    SpreadHome,
    SpreadAway,
    TotalLine,
    TotalOver,
    TotalUnder,
    MoneylineHome,
    MoneylineAway,
}

impl Market {
    /// Pull this market's value out of one quote, if present and finite
    pub fn value_of(&self, quote: &BookmakerQuote) -> Option<f64> {
        let value = match self {
            Market::SpreadLine => quote.spread.as_ref()?.line,
            Market::SpreadHome => quote.spread.as_ref()?.home,
            Market::SpreadAway => quote.spread.as_ref()?.away,
            Market::TotalLine => quote.total.as_ref()?.line,
            Market::TotalOver => quote.total.as_ref()?.over,
            Market::TotalUnder => quote.total.as_ref()?.under,
            Market::MoneylineHome => quote.moneyline.as_ref()?.home,
            Market::MoneylineAway => quote.moneyline.as_ref()?.away,
        }?;
        value.is_finite().then_some(value)
    }

    /// Lines display with one decimal, prices as whole numbers
    pub fn decimals(&self) -> usize {
        match self {
            Market::SpreadLine | Market::TotalLine => 1,
            _ => 0,
        }
    }
}

/// Lowest and highest reported value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Summary for a single market; `None` means no book reported it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub market: Market,
    pub average: Option<f64>,
    pub range: Option<ValueRange>,
    pub count: usize,
}

impl MarketSummary {
    /// Reduce the quotes for one market
    ///
    /// The average is a running mean so large finite inputs stay finite.
    pub fn from_quotes(market: Market, quotes: &[BookmakerQuote]) -> Self {
        let mut count = 0usize;
        let mut mean = 0.0;
        let mut range: Option<ValueRange> = None;

        for value in quotes.iter().filter_map(|q| market.value_of(q)) {
            count += 1;
            mean += (value - mean) / count as f64;
            range = Some(match range {
                Some(r) => ValueRange {
                    min: r.min.min(value),
                    max: r.max.max(value),
                },
                None => ValueRange {
                    min: value,
                    max: value,
                },
            });
        }

        let average = (count > 0).then_some(mean);

        Self {
            market,
            average,
            range,
            count,
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Consensus over every summarised market of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsConsensus {
    pub spread: MarketSummary,
    pub total: MarketSummary,
    pub moneyline_home: MarketSummary,
    pub moneyline_away: MarketSummary,
    pub spread_home: MarketSummary,
    pub spread_away: MarketSummary,
    pub total_over: MarketSummary,
    pub total_under: MarketSummary,
    pub bookmakers: usize,
}

/// Summarise a game's quotes; the input is only read
///
/// # Examples
/// ```
/// use courtside::core::consensus::calculate_consensus;
/// let consensus = calculate_consensus(&[]);
/// assert!(consensus.spread.average.is_none());
/// assert!(consensus.spread.range.is_none());
/// ```
pub fn calculate_consensus(quotes: &[BookmakerQuote]) -> OddsConsensus {
    OddsConsensus {
        spread: MarketSummary::from_quotes(Market::SpreadLine, quotes),
        total: MarketSummary::from_quotes(Market::TotalLine, quotes),
        moneyline_home: MarketSummary::from_quotes(Market::MoneylineHome, quotes),
        moneyline_away: MarketSummary::from_quotes(Market::MoneylineAway, quotes),
        spread_home: MarketSummary::from_quotes(Market::SpreadHome, quotes),
        spread_away: MarketSummary::from_quotes(Market::SpreadAway, quotes),
        total_over: MarketSummary::from_quotes(Market::TotalOver, quotes),
        total_under: MarketSummary::from_quotes(Market::TotalUnder, quotes),
        bookmakers: quotes.len(),
    }
}

/// Best available price at one book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPrice {
    pub bookmaker: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestMoneyline {
    pub home: Option<BestPrice>,
    pub away: Option<BestPrice>,
}

/// Highest American moneyline per side; the first book wins ties
pub fn best_moneyline(quotes: &[BookmakerQuote]) -> BestMoneyline {
    let best_for = |market: Market| {
        quotes
            .iter()
            .filter_map(|q| market.value_of(q).map(|price| (q, price)))
            .fold(None::<BestPrice>, |best, (q, price)| match best {
                Some(b) if b.price >= price => Some(b),
                _ => Some(BestPrice {
                    bookmaker: q.name.clone(),
                    price,
                }),
            })
    };

    BestMoneyline {
        home: best_for(Market::MoneylineHome),
        away: best_for(Market::MoneylineAway),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MoneylineQuote, SpreadQuote, TotalQuote};

    fn spread_quote(name: &str, line: Option<f64>) -> BookmakerQuote {
        BookmakerQuote {
            name: name.to_string(),
            spread: Some(SpreadQuote {
                line,
                home: Some(-110.0),
                away: Some(-110.0),
            }),
            ..Default::default()
        }
    }

    fn moneyline_quote(name: &str, home: f64, away: f64) -> BookmakerQuote {
        BookmakerQuote {
            name: name.to_string(),
            moneyline: Some(MoneylineQuote {
                home: Some(home),
                away: Some(away),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_spread_average_and_range() {
        let quotes = vec![
            spread_quote("DraftKings", Some(-2.5)),
            spread_quote("FanDuel", Some(-3.0)),
            spread_quote("BetMGM", Some(-2.0)),
        ];
        let consensus = calculate_consensus(&quotes);

        assert!((consensus.spread.average.unwrap() + 2.5).abs() < 1e-12);
        assert_eq!(
            consensus.spread.range,
            Some(ValueRange {
                min: -3.0,
                max: -2.0
            })
        );
        assert_eq!(consensus.spread.count, 3);
        assert_eq!(consensus.bookmakers, 3);
    }

    #[test]
    fn test_empty_quotes_have_no_data() {
        let consensus = calculate_consensus(&[]);
        for summary in [
            consensus.spread,
            consensus.total,
            consensus.moneyline_home,
            consensus.moneyline_away,
            consensus.spread_home,
            consensus.spread_away,
            consensus.total_over,
            consensus.total_under,
        ] {
            assert_eq!(summary.average, None);
            assert_eq!(summary.range, None);
            assert_eq!(summary.count, 0);
        }
    }

    #[test]
    fn test_missing_market_is_absent_not_zero() {
        // Spreads only, so totals must stay empty
        let quotes = vec![spread_quote("DraftKings", Some(-2.5))];
        let consensus = calculate_consensus(&quotes);

        assert_eq!(consensus.total.average, None);
        assert_eq!(consensus.total.range, None);
        assert!(!consensus.total.has_data());
        assert!(consensus.spread.has_data());
    }

    #[test]
    fn test_missing_field_excluded_from_average() {
        let quotes = vec![
            spread_quote("A", Some(-4.0)),
            spread_quote("B", None),
            spread_quote("C", Some(-2.0)),
        ];
        let summary = MarketSummary::from_quotes(Market::SpreadLine, &quotes);

        assert_eq!(summary.count, 2);
        assert!((summary.average.unwrap() + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_values_excluded() {
        let quotes = vec![spread_quote("A", Some(f64::NAN)), spread_quote("B", Some(-1.0))];
        let summary = MarketSummary::from_quotes(Market::SpreadLine, &quotes);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.average, Some(-1.0));
    }

    #[test]
    fn test_legitimate_zero_is_kept() {
        let quotes = vec![spread_quote("A", Some(0.0))];
        let summary = MarketSummary::from_quotes(Market::SpreadLine, &quotes);
        assert_eq!(summary.average, Some(0.0));
        assert_eq!(summary.range, Some(ValueRange { min: 0.0, max: 0.0 }));
    }

    #[test]
    fn test_totals_and_moneyline() {
        let quotes = vec![
            BookmakerQuote {
                name: "A".to_string(),
                total: Some(TotalQuote {
                    line: Some(225.5),
                    over: Some(-110.0),
                    under: Some(-110.0),
                }),
                moneyline: Some(MoneylineQuote {
                    home: Some(-120.0),
                    away: Some(100.0),
                }),
                spread: None,
            },
            BookmakerQuote {
                name: "B".to_string(),
                total: Some(TotalQuote {
                    line: Some(226.0),
                    over: None,
                    under: None,
                }),
                moneyline: Some(MoneylineQuote {
                    home: Some(-115.0),
                    away: None,
                }),
                spread: None,
            },
        ];
        let consensus = calculate_consensus(&quotes);

        assert!((consensus.total.average.unwrap() - 225.75).abs() < 1e-12);
        assert!((consensus.moneyline_home.average.unwrap() + 117.5).abs() < 1e-12);
        assert_eq!(consensus.moneyline_away.count, 1);
        assert_eq!(consensus.spread.average, None);
    }

    #[test]
    fn test_spread_and_total_prices() {
        let quotes = vec![
            BookmakerQuote {
                name: "A".to_string(),
                spread: Some(SpreadQuote {
                    line: Some(-3.5),
                    home: Some(-110.0),
                    away: Some(-110.0),
                }),
                total: Some(TotalQuote {
                    line: Some(224.5),
                    over: Some(-105.0),
                    under: Some(-115.0),
                }),
                moneyline: None,
            },
            BookmakerQuote {
                name: "B".to_string(),
                spread: Some(SpreadQuote {
                    line: Some(-3.5),
                    home: Some(-120.0),
                    away: Some(100.0),
                }),
                total: Some(TotalQuote {
                    line: Some(225.0),
                    over: None,
                    under: Some(-105.0),
                }),
                moneyline: None,
            },
        ];
        let consensus = calculate_consensus(&quotes);

        assert_eq!(consensus.spread_home.average, Some(-115.0));
        assert_eq!(
            consensus.spread_away.range,
            Some(ValueRange {
                min: -110.0,
                max: 100.0
            })
        );
        assert_eq!(consensus.total_over.count, 1);
        assert_eq!(consensus.total_over.average, Some(-105.0));
        assert_eq!(consensus.total_under.average, Some(-110.0));
    }

    #[test]
    fn test_huge_lines_average_stays_finite() {
        let quotes = vec![spread_quote("A", Some(1e308)), spread_quote("B", Some(1e308))];
        let summary = MarketSummary::from_quotes(Market::SpreadLine, &quotes);

        let average = summary.average.unwrap();
        assert!(average.is_finite());
        assert_eq!(average, 1e308);
    }

    #[test]
    fn test_input_not_mutated() {
        let quotes = vec![spread_quote("A", Some(-2.5)), spread_quote("B", Some(-3.5))];
        let before = quotes.clone();
        let _ = calculate_consensus(&quotes);
        assert_eq!(quotes, before);
    }

    #[test]
    fn test_best_moneyline() {
        let quotes = vec![
            moneyline_quote("DraftKings", -120.0, 100.0),
            moneyline_quote("FanDuel", -115.0, -105.0),
            moneyline_quote("Caesars", -115.0, 102.0),
        ];
        let best = best_moneyline(&quotes);

        let home = best.home.unwrap();
        assert_eq!(home.bookmaker, "FanDuel");
        assert_eq!(home.price, -115.0);
        let away = best.away.unwrap();
        assert_eq!(away.bookmaker, "Caesars");
        assert_eq!(away.price, 102.0);
    }

    #[test]
    fn test_best_moneyline_empty() {
        let best = best_moneyline(&[spread_quote("A", Some(-1.0))]);
        assert!(best.home.is_none());
        assert!(best.away.is_none());
    }

    #[test]
    fn test_market_decimals() {
        assert_eq!(Market::SpreadLine.decimals(), 1);
        assert_eq!(Market::MoneylineHome.decimals(), 0);
        assert_eq!(Market::TotalOver.decimals(), 0);
        assert_eq!(Market::SpreadAway.decimals(), 0);
    }
}
