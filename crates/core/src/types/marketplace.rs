//! Supported marketplace vocabulary.

use serde::{Deserialize, Serialize};

/// Error returned when a marketplace string is not part of the vocabulary.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown marketplace: {0}")]
pub struct MarketplaceError(pub String);

/// A marketplace a store can sell on.
///
/// The set is closed: integration tokens, product listings, and message
/// provenance all reference one of these variants, stored in its
/// snake_case wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "marketplace", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Marketplace {
    Ozon,
    Wildberries,
    YandexMarket,
    SberMegaMarket,
    AliExpress,
}

impl Marketplace {
    /// All supported marketplaces, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Ozon,
        Self::Wildberries,
        Self::YandexMarket,
        Self::SberMegaMarket,
        Self::AliExpress,
    ];

    /// Case- and punctuation-insensitive lookup for externally supplied
    /// names, e.g. `"Yandex.Market"` or `"WILDBERRIES"`.
    ///
    /// Ingestion paths use this so provenance survives sloppy spellings;
    /// admin paths parse strictly via [`FromStr`](std::str::FromStr).
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let compact: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match compact.as_str() {
            "ozon" => Some(Self::Ozon),
            "wildberries" => Some(Self::Wildberries),
            "yandexmarket" => Some(Self::YandexMarket),
            "sbermegamarket" => Some(Self::SberMegaMarket),
            "aliexpress" => Some(Self::AliExpress),
            _ => None,
        }
    }
}

impl std::fmt::Display for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ozon => write!(f, "ozon"),
            Self::Wildberries => write!(f, "wildberries"),
            Self::YandexMarket => write!(f, "yandex_market"),
            Self::SberMegaMarket => write!(f, "sber_mega_market"),
            Self::AliExpress => write!(f, "ali_express"),
        }
    }
}

impl std::str::FromStr for Marketplace {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ozon" => Ok(Self::Ozon),
            "wildberries" => Ok(Self::Wildberries),
            "yandex_market" => Ok(Self::YandexMarket),
            "sber_mega_market" => Ok(Self::SberMegaMarket),
            "ali_express" => Ok(Self::AliExpress),
            _ => Err(MarketplaceError(s.to_owned())),
        }
    }
}
