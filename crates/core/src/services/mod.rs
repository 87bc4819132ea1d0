pub mod cache_manager;
pub mod journal_service;
pub mod metrics_service;
