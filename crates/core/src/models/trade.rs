use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Side of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Parse the journal's direction labels. Anything other than the exact
    /// `"Long"` / `"Short"` labels yields `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Long" => Some(Direction::Long),
            "Short" => Some(Direction::Short),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

/// Lifecycle state of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
    Cancelled,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "Open"),
            TradeStatus::Closed => write!(f, "Closed"),
            TradeStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Where a trade record came from: a real position or a backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeSource {
    #[default]
    Live,
    Backtest,
}

impl std::fmt::Display for TradeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSource::Live => write!(f, "Live"),
            TradeSource::Backtest => write!(f, "Backtest"),
        }
    }
}

/// A single journal entry.
///
/// Price levels are optional: a trade may be logged before its stop-loss or
/// take-profit is planned. Only `entry_price`, `sl_price`, `tp_price` and
/// `direction` feed the risk:reward computation; the rest is payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: Uuid,

    /// Instrument ticker, uppercased (e.g., "EURUSD", "BTCUSDT")
    pub symbol: String,

    pub direction: Option<Direction>,

    pub entry_price: Option<f64>,

    pub sl_price: Option<f64>,

    pub tp_price: Option<f64>,

    pub quantity: f64,

    /// Realized profit/loss in account currency. `None` while open.
    pub pnl: Option<f64>,

    pub status: TradeStatus,

    pub source: TradeSource,

    pub opened_at: NaiveDate,

    pub notes: Option<String>,
}

impl Trade {
    pub fn new(symbol: impl Into<String>, direction: Direction, quantity: f64, opened_at: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into().to_uppercase(),
            direction: Some(direction),
            entry_price: None,
            sl_price: None,
            tp_price: None,
            quantity,
            pnl: None,
            status: TradeStatus::Open,
            source: TradeSource::Live,
            opened_at,
            notes: None,
        }
    }

    /// Set the planned entry, stop-loss and take-profit levels.
    pub fn with_levels(mut self, entry: f64, stop_loss: f64, take_profit: f64) -> Self {
        self.entry_price = Some(entry);
        self.sl_price = Some(stop_loss);
        self.tp_price = Some(take_profit);
        self
    }

    pub fn with_source(mut self, source: TradeSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Mark the trade closed with its realized P&L.
    pub fn close(&mut self, pnl: f64) {
        self.status = TradeStatus::Closed;
        self.pnl = Some(pnl);
    }
}

// ── Import records ──────────────────────────────────────────────────

/// A trade as it arrives from an external JSON export.
///
/// Field names follow the journal's wire format (`entryPrice`, `slPrice`,
/// `tpPrice`, `direction`). Decoding never fails on a bad price or an
/// unknown direction label: those fields just come out as `None`, and the
/// risk:reward computation treats the trade as incomplete.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub symbol: String,

    #[serde(default, deserialize_with = "lenient_direction")]
    pub direction: Option<Direction>,

    #[serde(default, deserialize_with = "lenient_price")]
    pub entry_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_price")]
    pub sl_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_price")]
    pub tp_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_price")]
    pub quantity: Option<f64>,

    #[serde(default, deserialize_with = "lenient_price")]
    pub pnl: Option<f64>,

    #[serde(default)]
    pub status: Option<TradeStatus>,

    #[serde(default)]
    pub source: Option<TradeSource>,

    #[serde(default)]
    pub opened_at: Option<NaiveDate>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl TradeRecord {
    /// Convert into a journal trade. Missing dates fall back to `today`,
    /// a missing id gets a fresh one.
    pub fn into_trade(self, today: NaiveDate) -> Trade {
        Trade {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            symbol: self.symbol.to_uppercase(),
            direction: self.direction,
            entry_price: self.entry_price,
            sl_price: self.sl_price,
            tp_price: self.tp_price,
            quantity: self.quantity.unwrap_or(0.0),
            pnl: self.pnl,
            status: self.status.unwrap_or_default(),
            source: self.source.unwrap_or_default(),
            opened_at: self.opened_at.unwrap_or(today),
            notes: self.notes,
        }
    }
}

/// Raw JSON shapes accepted for a numeric field.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Flag(bool),
    Text(String),
    Other(serde_json::Value),
}

/// Accepts numbers, numeric strings and booleans (`true` is 1, `false` is 0,
/// which the risk:reward check then treats as missing). Anything else,
/// including non-finite values, becomes `None` rather than a decode error.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    let value = match raw {
        Some(RawNumber::Number(n)) => Some(n),
        Some(RawNumber::Flag(b)) => Some(if b { 1.0 } else { 0.0 }),
        Some(RawNumber::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(RawNumber::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// Unknown direction labels decode to `None` instead of failing the record.
fn lenient_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(Direction::parse))
}
