//! Currency codes and display formatting for monetary amounts.
//!
//! Amounts are always `rust_decimal::Decimal`; floats never touch money.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Indonesian Rupiah
    #[default]
    Idr,
    /// Euro
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Returns the display symbol, including any trailing space.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Idr => "Rp ",
            Self::Eur => "€ ",
            Self::Sgd => "S$",
            Self::Jpy => "¥",
        }
    }

    /// Number of fraction digits shown.
    #[must_use]
    pub const fn minor_digits(self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }

    /// Returns the (grouping, decimal) separators.
    const fn separators(self) -> (char, char) {
        match self {
            Self::Idr | Self::Eur => ('.', ','),
            Self::Usd | Self::Sgd | Self::Jpy => (',', '.'),
        }
    }

    /// Formats an amount for display, e.g. `Rp 1.250.000,00` or `$1,250.00`.
    #[must_use]
    pub fn format(self, amount: Decimal) -> String {
        let digits = self.minor_digits();
        let rounded = amount
            .abs()
            .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
        let plain = format!("{rounded:.prec$}", prec = digits as usize);
        let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
        let (group_sep, decimal_sep) = self.separators();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(ch);
        }

        let sign = if amount.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        if fraction.is_empty() {
            format!("{sign}{}{grouped}", self.symbol())
        } else {
            format!("{sign}{}{grouped}{decimal_sep}{fraction}", self.symbol())
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Idr => write!(f, "IDR"),
            Self::Eur => write!(f, "EUR"),
            Self::Sgd => write!(f, "SGD"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "IDR" => Ok(Self::Idr),
            "EUR" => Ok(Self::Eur),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
