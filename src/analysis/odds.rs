/// American-odds conversions and Kelly sizing.
///
/// An American line is a signed integer price:
///   negative → favourite, risk |line| to win 100
///   positive → underdog, risk 100 to win line
///
/// Decimal odds are the total return per unit staked on a win:
///   line < 0 → 1 + 100 / |line|
///   line > 0 → 1 + line / 100
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// A non-zero American-odds line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmericanLine(i32);

impl AmericanLine {
    /// Wrap a raw line. Zero has no defined odds and is rejected.
    pub fn new(line: i32) -> Result<Self> {
        if line == 0 {
            return Err(AnalysisError::ZeroLine);
        }
        Ok(AmericanLine(line))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn decimal_odds(self) -> f64 {
        decimal_odds(self)
    }

    pub fn category(self) -> LineCategory {
        line_category(self)
    }
}

/// Line-range bucket used for per-range stats and line-aware bet sizing.
///
/// Lines strictly between −110 and +110 fall into `BigUnderdog`. Reports
/// downstream already group near-even lines that way, so the bucket
/// boundaries stay as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCategory {
    HeavyFavorite,
    Favorite,
    SlightUnderdog,
    BigUnderdog,
}

impl LineCategory {
    /// All buckets in report order.
    pub const ALL: [LineCategory; 4] = [
        LineCategory::HeavyFavorite,
        LineCategory::Favorite,
        LineCategory::SlightUnderdog,
        LineCategory::BigUnderdog,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LineCategory::HeavyFavorite => "heavy_favorite",
            LineCategory::Favorite => "favorite",
            LineCategory::SlightUnderdog => "slight_underdog",
            LineCategory::BigUnderdog => "big_underdog",
        }
    }

    /// Human-readable range label shown next to the bucket.
    pub fn range_label(self) -> &'static str {
        match self {
            LineCategory::HeavyFavorite => "≤ -200",
            LineCategory::Favorite => "-199 to -110",
            LineCategory::SlightUnderdog => "+110 to +199",
            LineCategory::BigUnderdog => "≥ +200",
        }
    }
}

/// Decimal odds for a line; always strictly greater than 1.
pub fn decimal_odds(line: AmericanLine) -> f64 {
    let l = line.value() as f64;
    if l < 0.0 {
        1.0 + 100.0 / l.abs()
    } else {
        1.0 + l / 100.0
    }
}

/// Break-even win probability implied by the line (no vig removal).
pub fn implied_probability(line: AmericanLine) -> f64 {
    1.0 / decimal_odds(line)
}

/// Net profit of a winning bet of `stake` at `line`.
pub fn profit_on_win(stake: f64, line: AmericanLine) -> f64 {
    stake * (decimal_odds(line) - 1.0)
}

pub fn line_category(line: AmericanLine) -> LineCategory {
    match line.value() {
        l if l <= -200 => LineCategory::HeavyFavorite,
        -199..=-110 => LineCategory::Favorite,
        110..=199 => LineCategory::SlightUnderdog,
        _ => LineCategory::BigUnderdog,
    }
}

/// Full-Kelly stake fraction.
///
///   f* = (b·p − q) / b
/// where
///   b = net odds (decimal_odds − 1)
///   p = probability of winning
///   q = 1 − p
///
/// The result is not clamped: a negative value means the bet has no edge.
/// Returns `0.0` when `b` is not positive.
pub fn kelly_fraction(win_prob: f64, decimal_odds: f64) -> f64 {
    let b = decimal_odds - 1.0;
    if b <= 0.0 {
        return 0.0;
    }
    let p = win_prob;
    let q = 1.0 - p;
    (b * p - q) / b
}
