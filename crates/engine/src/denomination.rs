//! Cash denominations sold through the catalog.
//!
//! A handful of jan codes stand for physical bills and coins. Paying cash
//! into the shop is recorded as "buying" one of them, so they live in the
//! catalog next to the goods, but they are payment instruments and never
//! run out: their stock is a fixed sentinel instead of a derived count.

use serde::{Deserialize, Serialize};

/// Stock shown for denominations that take a single slot at the counter.
pub const LARGE_DENOMINATION_STOCK: i64 = 1;
/// Stock shown for denominations kept in rolls.
pub const SMALL_DENOMINATION_STOCK: i64 = 4;

/// Catalog category the import feed uses for cash denominations.
pub const CHARGE_CATEGORY: &str = "charge";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denomination {
    Yen1000,
    Yen500,
    Yen100,
    Yen50,
    Yen10,
}

impl Denomination {
    pub const ALL: [Denomination; 5] = [
        Denomination::Yen1000,
        Denomination::Yen500,
        Denomination::Yen100,
        Denomination::Yen50,
        Denomination::Yen10,
    ];

    /// Jan code of the denomination in the catalog.
    #[must_use]
    pub const fn jan(self) -> &'static str {
        match self {
            Denomination::Yen1000 => "1000yen",
            Denomination::Yen500 => "500yen",
            Denomination::Yen100 => "100yen",
            Denomination::Yen50 => "50yen",
            Denomination::Yen10 => "10yen",
        }
    }

    /// Resolve a jan code. Matching is exact.
    #[must_use]
    pub fn from_jan(jan: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.jan() == jan)
    }

    #[must_use]
    pub fn is_currency(jan: &str) -> bool {
        Self::from_jan(jan).is_some()
    }

    /// Fixed stock level reported for this denomination.
    #[must_use]
    pub const fn stock_sentinel(self) -> i64 {
        match self {
            Denomination::Yen1000 | Denomination::Yen500 | Denomination::Yen50 => {
                LARGE_DENOMINATION_STOCK
            }
            Denomination::Yen100 | Denomination::Yen10 => SMALL_DENOMINATION_STOCK,
        }
    }

    pub(crate) fn jans() -> Vec<String> {
        Self::ALL.iter().map(|d| d.jan().to_string()).collect()
    }
}
