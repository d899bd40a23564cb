//! Identifiers assigned by the remote catalog service.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::InvalidId;

/// Identifier of a product in the remote catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

/// Identifier of a category in the remote catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

macro_rules! impl_remote_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        // Strictly positive: the remote service never hands out zero or
        // negative ids.
        impl FromStr for $t {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(InvalidId {
                        kind: $name,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

impl_remote_id!(ProductId, "product id");
impl_remote_id!(CategoryId, "category id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_with_surrounding_whitespace() {
        assert_eq!(" 42 ".parse::<ProductId>(), Ok(ProductId::new(42)));
        assert_eq!("7".parse::<CategoryId>().map(CategoryId::get), Ok(7));
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for raw in ["0", "-3", "abc", "", "4.5"] {
            let err = raw.parse::<ProductId>().unwrap_err();
            assert_eq!(err.kind, "product id");
            assert_eq!(err.value, raw);
        }
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&CategoryId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
