//! Product price as submitted through the form.

use core::str::FromStr;

/// Maximum number of fractional digits accepted.
pub const MAX_DECIMAL_PLACES: usize = 2;

/// Maximum number of significant digits accepted (integer + fractional).
pub const MAX_DIGITS: usize = 10;

/// A strictly positive price, held in the smallest currency unit (cents).
///
/// The remote catalog exchanges prices as JSON numbers; conversion to and from
/// `f64` only happens at that boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price {
    cents: u64,
}

/// Why a submitted price string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    Empty,
    NotANumber,
    NotPositive,
    TooManyDecimalPlaces,
    TooManyDigits,
    TooManyWholeDigits,
}

impl PriceError {
    /// Message shown next to the price field.
    pub fn message(self) -> String {
        match self {
            PriceError::Empty => "This field is required.".to_string(),
            PriceError::NotANumber => "Enter a number.".to_string(),
            PriceError::NotPositive => "Ensure this value is greater than zero.".to_string(),
            PriceError::TooManyDecimalPlaces => format!(
                "Ensure that there are no more than {MAX_DECIMAL_PLACES} decimal places."
            ),
            PriceError::TooManyDigits => {
                format!("Ensure that there are no more than {MAX_DIGITS} digits in total.")
            }
            PriceError::TooManyWholeDigits => format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                MAX_DIGITS - MAX_DECIMAL_PLACES
            ),
        }
    }
}

impl Price {
    /// Returns `None` for zero.
    pub fn from_cents(cents: u64) -> Option<Self> {
        (cents > 0).then_some(Self { cents })
    }

    pub fn cents(self) -> u64 {
        self.cents
    }

    /// Value sent to the remote catalog.
    pub fn as_f64(self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Read a price reported by the remote catalog, rounding to whole cents.
    pub fn from_remote(value: f64) -> Option<Self> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents > u64::MAX as f64 {
            return None;
        }
        Self::from_cents(cents as u64)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(PriceError::NotANumber);
        }

        let whole = whole.trim_start_matches('0');
        let whole_value = parse_digits(whole);
        let fraction_value = parse_digits(fraction);

        if negative && (whole_value > 0 || fraction_value > 0) {
            return Err(PriceError::NotPositive);
        }
        if fraction.len() > MAX_DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimalPlaces);
        }
        if whole.len() + fraction.len() > MAX_DIGITS {
            return Err(PriceError::TooManyDigits);
        }
        if whole.len() > MAX_DIGITS - MAX_DECIMAL_PLACES {
            return Err(PriceError::TooManyWholeDigits);
        }

        let scale = 10u64.pow((MAX_DECIMAL_PLACES - fraction.len()) as u32);
        let cents = whole_value * 100 + fraction_value * scale;
        Price::from_cents(cents).ok_or(PriceError::NotPositive)
    }
}

// Callers bound the length first, so the value always fits.
fn parse_digits(digits: &str) -> u64 {
    digits
        .bytes()
        .take(MAX_DIGITS)
        .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}
