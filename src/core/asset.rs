//! The fixed set of assets a simulation can run against

use crate::core::request::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    #[default]
    Bitcoin,
    Ethereum,
    Solana,
}

impl Asset {
    pub const ALL: [Asset; 3] = [Asset::Bitcoin, Asset::Ethereum, Asset::Solana];

    /// Identifier used by the price API.
    pub fn api_id(&self) -> &'static str {
        match self {
            Asset::Bitcoin => "bitcoin",
            Asset::Ethereum => "ethereum",
            Asset::Solana => "solana",
        }
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            Asset::Bitcoin => "BTC",
            Asset::Ethereum => "ETH",
            Asset::Solana => "SOL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Asset::Bitcoin => "Bitcoin",
            Asset::Ethereum => "Ethereum",
            Asset::Solana => "Solana",
        }
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Asset {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Asset::ALL
            .into_iter()
            .find(|asset| {
                wanted == asset.api_id() || wanted == asset.ticker().to_lowercase()
            })
            .ok_or_else(|| RequestError::UnknownAsset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_names_and_tickers() {
        assert_eq!("bitcoin".parse::<Asset>().unwrap(), Asset::Bitcoin);
        assert_eq!("Ethereum".parse::<Asset>().unwrap(), Asset::Ethereum);
        assert_eq!("SOL".parse::<Asset>().unwrap(), Asset::Solana);
        assert_eq!(" btc ".parse::<Asset>().unwrap(), Asset::Bitcoin);
    }

    #[test]
    fn rejects_unknown_assets() {
        let err = "dogecoin".parse::<Asset>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown asset: dogecoin (expected one of bitcoin, ethereum, solana)"
        );
    }

    #[test]
    fn maps_to_api_ids() {
        let ids: Vec<_> = Asset::ALL.iter().map(Asset::api_id).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "solana"]);
        assert_eq!(Asset::Solana.to_string(), "Solana");
    }

    #[test]
    fn deserializes_lowercase_ids() {
        let asset: Asset = serde_yaml::from_str("ethereum").unwrap();
        assert_eq!(asset, Asset::Ethereum);
    }
}
