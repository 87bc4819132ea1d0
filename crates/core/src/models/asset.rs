use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a holding tracked for net worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    /// Cash and bank balances
    Cash,
    /// Funds sitting on a brokerage / exchange account
    Brokerage,
    Crypto,
    Stock,
    /// Real estate, vehicles, collectibles
    Property,
    Other,
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetCategory::Cash => write!(f, "Cash"),
            AssetCategory::Brokerage => write!(f, "Brokerage"),
            AssetCategory::Crypto => write!(f, "Crypto"),
            AssetCategory::Stock => write!(f, "Stock"),
            AssetCategory::Property => write!(f, "Property"),
            AssetCategory::Other => write!(f, "Other"),
        }
    }
}

/// A portfolio holding with its current value in the journal currency.
///
/// Values may be negative (loans, margin debt); they still count towards
/// net worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAsset {
    pub id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub value: f64,
}

impl PortfolioAsset {
    pub fn new(name: impl Into<String>, category: AssetCategory, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            value,
        }
    }
}
