//! Fair-price analysis types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purchase venue, used to scale the fair-price estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseChannel {
    WholesaleMarket,
    StreetShop,
    MallCounter,
    Livestream,
}

impl PurchaseChannel {
    /// Human-readable label, used verbatim in the analysis prompt
    pub fn label(&self) -> &'static str {
        match self {
            PurchaseChannel::WholesaleMarket => "wholesale market",
            PurchaseChannel::StreetShop => "street shop",
            PurchaseChannel::MallCounter => "mall counter",
            PurchaseChannel::Livestream => "livestream sale",
        }
    }
}

impl fmt::Display for PurchaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PurchaseChannel {
    type Err = wardrobe_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wholesale_market" => Ok(PurchaseChannel::WholesaleMarket),
            "street_shop" => Ok(PurchaseChannel::StreetShop),
            "mall_counter" => Ok(PurchaseChannel::MallCounter),
            "livestream" => Ok(PurchaseChannel::Livestream),
            other => Err(wardrobe_common::Error::InvalidInput(format!(
                "Unknown purchase channel: {}",
                other
            ))),
        }
    }
}

/// Fair-price analysis result from the remote model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairPriceEstimate {
    /// Fabric composition, read from the care tag when provided
    pub material: String,
    /// Estimated base manufacturing cost
    pub base_cost: f64,
    /// Suggested purchase range, e.g. "150-200"
    pub fair_price_range: String,
    /// One-line bargaining suggestion
    pub haggle_tip: String,
    /// True when a low-cost synthetic fabric carries a premium price
    #[serde(default)]
    pub is_rip_off: bool,
}
