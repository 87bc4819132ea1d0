pub mod analytics;
pub mod asset;
pub mod http;
pub mod journal;
pub mod settings;
pub mod trade;
