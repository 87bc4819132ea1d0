use serde::{Deserialize, Serialize};

use super::asset::PortfolioAsset;
use super::settings::JournalSettings;
use super::trade::Trade;

/// The main data container. Everything in here gets serialized and saved
/// to the journal file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    /// Live and backtested trades, sorted by `opened_at`
    pub trades: Vec<Trade>,

    /// Holdings that make up net worth
    pub assets: Vec<PortfolioAsset>,

    pub settings: JournalSettings,
}
