//! Kelly Criterion Stake Sizing
//!
//! Fraction of bankroll to stake on a single bet, based on an estimated win
//! probability and the offered price.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = decimal - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!
//! A positive f* is always scaled by [`QUARTER_KELLY`]. A non-positive f* is a
//! "do not bet" recommendation with a zero stake, not an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed fractional-Kelly multiplier applied to every positive stake.
pub const QUARTER_KELLY: f64 = 0.25;

/// Reasons the calculator declines to produce a result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KellyInputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Probability must be strictly between 0 and 1, got {0}")]
    ProbabilityOutOfRange(f64),

    #[error("American odds must be a nonzero integer, got {0}")]
    InvalidAmericanOdds(String),

    #[error("Decimal odds must be greater than 1.0, got {0}")]
    InvalidDecimalOdds(f64),

    #[error("Bankroll must be a finite, non-negative amount, got {0}")]
    InvalidBankroll(f64),
}

/// Price notation accepted by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    #[default]
    American,
    Decimal,
}

impl std::str::FromStr for OddsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "american" | "us" => Ok(OddsFormat::American),
            "decimal" | "eu" => Ok(OddsFormat::Decimal),
            other => Err(format!("unknown odds format '{}'", other)),
        }
    }
}

/// Offered price, in either notation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "lowercase")]
pub enum Odds {
    /// Signed American price, e.g. +150 or -110
    American(i32),
    /// Decimal price including stake, e.g. 2.5
    Decimal(f64),
}

impl Odds {
    /// Parse a price typed by the user in the given notation.
    ///
    /// American prices accept a leading `+`. Whole-number decimals such as
    /// `"-110.0"` are accepted as American as long as they have no fraction.
    pub fn parse(text: &str, format: OddsFormat) -> Result<Self, KellyInputError> {
        let trimmed = text.trim();
        let value = parse_number(trimmed)?;

        let odds = match format {
            OddsFormat::American => {
                if value.fract() != 0.0 || value.abs() > i32::MAX as f64 {
                    return Err(KellyInputError::InvalidAmericanOdds(trimmed.to_string()));
                }
                Odds::American(value as i32)
            }
            OddsFormat::Decimal => Odds::Decimal(value),
        };

        odds.validate()?;
        Ok(odds)
    }

    /// Check the price is usable for sizing
    pub fn validate(&self) -> Result<(), KellyInputError> {
        match *self {
            Odds::American(0) => Err(KellyInputError::InvalidAmericanOdds("0".to_string())),
            Odds::American(_) => Ok(()),
            Odds::Decimal(d) if d.is_finite() && d > 1.0 => Ok(()),
            Odds::Decimal(d) => Err(KellyInputError::InvalidDecimalOdds(d)),
        }
    }

    /// Convert to decimal odds
    ///
    /// # Examples
    /// ```
    /// use courtside::core::kelly::Odds;
    /// assert_eq!(Odds::American(150).to_decimal().unwrap(), 2.5);
    /// assert!((Odds::American(-110).to_decimal().unwrap() - 1.909).abs() < 0.001);
    /// ```
    pub fn to_decimal(&self) -> Result<f64, KellyInputError> {
        self.validate()?;
        Ok(match *self {
            Odds::American(a) => american_to_decimal(a),
            Odds::Decimal(d) => d,
        })
    }

    /// Break-even probability implied by the price (no vig removal)
    pub fn implied_probability(&self) -> Result<f64, KellyInputError> {
        Ok(1.0 / self.to_decimal()?)
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Odds::American(a) if *a > 0 => write!(f, "+{}", a),
            Odds::American(a) => write!(f, "{}", a),
            Odds::Decimal(d) => write!(f, "{:.2}", d),
        }
    }
}

/// Convert a nonzero American price to decimal odds.
///
/// Callers must reject zero beforehand; [`Odds::to_decimal`] does.
pub fn american_to_decimal(american: i32) -> f64 {
    let a = american as f64;
    if a > 0.0 {
        a / 100.0 + 1.0
    } else {
        100.0 / a.abs() + 1.0
    }
}

/// Convert decimal odds (> 1.0) to the nearest American price
pub fn decimal_to_american(decimal: f64) -> Option<i32> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return None;
    }
    let american = if decimal >= 2.0 {
        (decimal - 1.0) * 100.0
    } else {
        -100.0 / (decimal - 1.0)
    };
    Some(american.round() as i32)
}

/// Raw (full) Kelly fraction for a win probability and decimal odds
///
/// Can be negative when the bet has negative expectation.
///
/// # Examples
/// ```
/// use courtside::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.6, 2.0);
/// assert!((kelly - 0.2).abs() < 1e-12);
/// ```
pub fn calculate_kelly_fraction(probability: f64, decimal_odds: f64) -> f64 {
    let b = decimal_odds - 1.0;
    if b <= 0.0 {
        return 0.0;
    }
    let q = 1.0 - probability;
    (b * probability - q) / b
}

/// Validated calculator input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KellyInput {
    pub probability: f64,
    pub odds: Odds,
}

impl KellyInput {
    pub fn new(probability: f64, odds: Odds) -> Result<Self, KellyInputError> {
        validate_probability(probability)?;
        odds.validate()?;
        Ok(Self { probability, odds })
    }

    /// Build from raw text fields, e.g. a form or query string
    pub fn parse(
        probability: &str,
        odds: &str,
        format: OddsFormat,
    ) -> Result<Self, KellyInputError> {
        let probability = parse_number(probability.trim())?;
        let odds = Odds::parse(odds, format)?;
        Self::new(probability, odds)
    }
}

/// What the sizing says to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Bet,
    /// Raw Kelly fraction was zero or negative
    NegativeExpectation,
}

/// Stake sizing recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetSizing {
    pub probability: f64,
    pub decimal_odds: f64,
    pub expected_value: f64,
    pub edge: f64,           // EV - 1
    pub kelly_fraction: f64, // Full Kelly, may be negative
    pub stake_fraction: f64, // After QUARTER_KELLY, never negative
    pub stake_amount: f64,
    pub percentage: f64,
    pub recommendation: Recommendation,
}

impl BetSizing {
    pub fn is_bet(&self) -> bool {
        self.recommendation == Recommendation::Bet
    }
}

/// Quarter-Kelly calculator bound to a caller-supplied bankroll
#[derive(Debug, Clone)]
pub struct KellyCalculator {
    bankroll: f64,
}

impl KellyCalculator {
    pub fn new(bankroll: f64) -> Result<Self, KellyInputError> {
        if !bankroll.is_finite() || bankroll < 0.0 {
            return Err(KellyInputError::InvalidBankroll(bankroll));
        }
        Ok(Self { bankroll })
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    /// Size a single validated bet
    pub fn calculate(&self, input: &KellyInput) -> Result<BetSizing, KellyInputError> {
        validate_probability(input.probability)?;
        let decimal = input.odds.to_decimal()?;
        let p = input.probability;

        let kelly = calculate_kelly_fraction(p, decimal);
        let ev = p * decimal;

        let (stake_fraction, recommendation) = if kelly > 0.0 {
            (kelly * QUARTER_KELLY, Recommendation::Bet)
        } else {
            (0.0, Recommendation::NegativeExpectation)
        };

        Ok(BetSizing {
            probability: p,
            decimal_odds: decimal,
            expected_value: ev,
            edge: ev - 1.0,
            kelly_fraction: kelly,
            stake_fraction,
            stake_amount: stake_fraction * self.bankroll,
            percentage: stake_fraction * 100.0,
            recommendation,
        })
    }

    /// Size a bet from raw text, returning `None` for any invalid input
    pub fn try_calculate(&self, probability: &str, odds: &str, format: OddsFormat) -> Option<BetSizing> {
        let input = KellyInput::parse(probability, odds, format).ok()?;
        self.calculate(&input).ok()
    }
}

fn validate_probability(probability: f64) -> Result<(), KellyInputError> {
    if probability.is_finite() && probability > 0.0 && probability < 1.0 {
        Ok(())
    } else {
        Err(KellyInputError::ProbabilityOutOfRange(probability))
    }
}

fn parse_number(text: &str) -> Result<f64, KellyInputError> {
    let stripped = text.strip_prefix('+').unwrap_or(text);
    match stripped.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(KellyInputError::NotANumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_to_decimal_positive() {
        assert!((american_to_decimal(150) - 2.5).abs() < 1e-12);
        assert!((american_to_decimal(100) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_american_to_decimal_negative() {
        assert!((american_to_decimal(-110) - 1.909_09).abs() < 0.001);
        assert!((american_to_decimal(-200) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_decimal_to_american() {
        assert_eq!(decimal_to_american(2.5), Some(150));
        assert_eq!(decimal_to_american(1.5), Some(-200));
        assert_eq!(decimal_to_american(1.0), None);
        assert_eq!(decimal_to_american(f64::NAN), None);
    }

    #[test]
    fn test_zero_american_odds_rejected() {
        assert!(Odds::American(0).to_decimal().is_err());
    }

    #[test]
    fn test_decimal_odds_must_exceed_one() {
        assert!(Odds::Decimal(1.0).validate().is_err());
        assert!(Odds::Decimal(0.5).validate().is_err());
        assert!(Odds::Decimal(f64::INFINITY).validate().is_err());
        assert!(Odds::Decimal(1.01).validate().is_ok());
    }

    #[test]
    fn test_kelly_fraction_positive_ev() {
        // b = 1, p = 0.6 -> f = (0.6 - 0.4) / 1 = 0.2
        let kelly = calculate_kelly_fraction(0.6, 2.0);
        assert!((kelly - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_kelly_fraction_negative_ev() {
        let kelly = calculate_kelly_fraction(0.4, 2.0);
        assert!(kelly < 0.0);
    }

    #[test]
    fn test_calculate_applies_quarter_kelly() {
        let calc = KellyCalculator::new(1_000.0).unwrap();
        let input = KellyInput::new(0.6, Odds::Decimal(2.0)).unwrap();
        let sizing = calc.calculate(&input).unwrap();

        assert!(sizing.is_bet());
        assert!((sizing.kelly_fraction - 0.2).abs() < 1e-12);
        assert!((sizing.stake_fraction - 0.05).abs() < 1e-12);
        assert!((sizing.stake_amount - 50.0).abs() < 1e-9);
        assert!((sizing.percentage - 5.0).abs() < 1e-9);
        assert!((sizing.expected_value - 1.2).abs() < 1e-12);
        assert!((sizing.edge - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_stake_is_quarter_of_raw_for_many_inputs() {
        let calc = KellyCalculator::new(500.0).unwrap();
        for (p, american) in [(0.55, -110), (0.45, 150), (0.3, 300), (0.7, -150)] {
            let input = KellyInput::new(p, Odds::American(american)).unwrap();
            let sizing = calc.calculate(&input).unwrap();
            if sizing.kelly_fraction > 0.0 {
                assert!((sizing.stake_fraction - 0.25 * sizing.kelly_fraction).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_negative_expectation_is_zero_stake() {
        let calc = KellyCalculator::new(1_000.0).unwrap();
        // -110 needs ~52.4% to break even
        let input = KellyInput::new(0.5, Odds::American(-110)).unwrap();
        let sizing = calc.calculate(&input).unwrap();

        assert_eq!(sizing.recommendation, Recommendation::NegativeExpectation);
        assert_eq!(sizing.stake_fraction, 0.0);
        assert_eq!(sizing.stake_amount, 0.0);
        assert_eq!(sizing.percentage, 0.0);
        assert!(sizing.kelly_fraction < 0.0);
    }

    #[test]
    fn test_break_even_is_negative_expectation() {
        let calc = KellyCalculator::new(1_000.0).unwrap();
        let input = KellyInput::new(0.5, Odds::Decimal(2.0)).unwrap();
        let sizing = calc.calculate(&input).unwrap();
        assert_eq!(sizing.recommendation, Recommendation::NegativeExpectation);
        assert_eq!(sizing.stake_fraction, 0.0);
    }

    #[test]
    fn test_probability_bounds_exclusive() {
        assert!(KellyInput::new(0.0, Odds::Decimal(2.0)).is_err());
        assert!(KellyInput::new(1.0, Odds::Decimal(2.0)).is_err());
        assert!(KellyInput::new(f64::NAN, Odds::Decimal(2.0)).is_err());
        assert!(KellyInput::new(0.001, Odds::Decimal(2.0)).is_ok());
    }

    #[test]
    fn test_parse_american_with_plus_sign() {
        let input = KellyInput::parse("0.45", "+150", OddsFormat::American).unwrap();
        assert_eq!(input.odds, Odds::American(150));
    }

    #[test]
    fn test_parse_rejects_fractional_american() {
        let err = Odds::parse("-110.5", OddsFormat::American).unwrap_err();
        assert!(matches!(err, KellyInputError::InvalidAmericanOdds(_)));
    }

    #[test]
    fn test_parse_non_numeric_declines() {
        let err = KellyInput::parse("abc", "2.0", OddsFormat::Decimal).unwrap_err();
        assert!(matches!(err, KellyInputError::NotANumber(_)));

        let err = KellyInput::parse("0.5", "NaN", OddsFormat::Decimal).unwrap_err();
        assert!(matches!(err, KellyInputError::NotANumber(_)));
    }

    #[test]
    fn test_try_calculate_returns_none_on_bad_input() {
        let calc = KellyCalculator::new(100.0).unwrap();
        assert!(calc.try_calculate("1.5", "+150", OddsFormat::American).is_none());
        assert!(calc.try_calculate("", "+150", OddsFormat::American).is_none());
        assert!(calc.try_calculate("0.5", "0", OddsFormat::American).is_none());
        assert!(calc.try_calculate("0.5", "+150", OddsFormat::American).is_some());
    }

    #[test]
    fn test_invalid_bankroll() {
        assert!(KellyCalculator::new(-1.0).is_err());
        assert!(KellyCalculator::new(f64::NAN).is_err());
        assert!(KellyCalculator::new(0.0).is_ok());
    }

    #[test]
    fn test_implied_probability() {
        let p = Odds::American(100).implied_probability().unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_odds_display() {
        assert_eq!(Odds::American(150).to_string(), "+150");
        assert_eq!(Odds::American(-110).to_string(), "-110");
        assert_eq!(Odds::Decimal(2.5).to_string(), "2.50");
    }

    #[test]
    fn test_odds_format_from_str() {
        assert_eq!("American".parse::<OddsFormat>(), Ok(OddsFormat::American));
        assert_eq!("decimal".parse::<OddsFormat>(), Ok(OddsFormat::Decimal));
        assert!("fractional".parse::<OddsFormat>().is_err());
    }
}
