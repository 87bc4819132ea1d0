// ═══════════════════════════════════════════════════════════════════
// Model Tests — trades, import records, requests/responses, settings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use trading_journal_core::errors::CoreError;
use trading_journal_core::models::http::{CacheKey, Method, Request, RequestMode, Response};
use trading_journal_core::models::settings::{CacheSettings, JournalSettings};
use trading_journal_core::models::trade::{
    Direction, Trade, TradeRecord, TradeSource, TradeStatus,
};
use trading_journal_core::services::metrics_service::trade_rrr;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Trade
// ═══════════════════════════════════════════════════════════════════

mod trade {
    use super::*;

    #[test]
    fn new_trade_defaults() {
        let t = Trade::new("btcusdt", Direction::Long, 0.5, today());
        assert_eq!(t.symbol, "BTCUSDT");
        assert_eq!(t.direction, Some(Direction::Long));
        assert_eq!(t.status, TradeStatus::Open);
        assert_eq!(t.source, TradeSource::Live);
        assert!(t.entry_price.is_none());
        assert!(t.pnl.is_none());
    }

    #[test]
    fn close_sets_status_and_pnl() {
        let mut t = Trade::new("ES", Direction::Short, 1.0, today());
        t.close(-125.5);
        assert_eq!(t.status, TradeStatus::Closed);
        assert_eq!(t.pnl, Some(-125.5));
    }

    #[test]
    fn direction_parse_is_exact() {
        assert_eq!(Direction::parse("Long"), Some(Direction::Long));
        assert_eq!(Direction::parse("Short"), Some(Direction::Short));
        assert_eq!(Direction::parse("long"), None);
        assert_eq!(Direction::parse(""), None);
    }

    #[test]
    fn json_uses_camel_case() {
        let t = Trade::new("EURUSD", Direction::Long, 1.0, today()).with_levels(1.1, 1.09, 1.12);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"entryPrice\":1.1"));
        assert!(json.contains("\"slPrice\""));
        assert!(json.contains("\"tpPrice\""));
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn display_labels() {
        assert_eq!(Direction::Short.to_string(), "Short");
        assert_eq!(TradeStatus::Cancelled.to_string(), "Cancelled");
        assert_eq!(TradeSource::Backtest.to_string(), "Backtest");
    }
}

// ═══════════════════════════════════════════════════════════════════
// TradeRecord — lenient import decoding
// ═══════════════════════════════════════════════════════════════════

mod trade_record {
    use super::*;

    fn decode(json: &str) -> Trade {
        serde_json::from_str::<TradeRecord>(json).unwrap().into_trade(today())
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let t = decode(r#"{"symbol":"eurusd","direction":"Long","entryPrice":"100","slPrice":"90","tpPrice":"120","quantity":"2"}"#);
        assert_eq!(t.symbol, "EURUSD");
        assert_eq!(t.entry_price, Some(100.0));
        assert_eq!(t.quantity, 2.0);
        assert_eq!(trade_rrr(&t), Some(2.0));
    }

    #[test]
    fn garbage_prices_become_missing() {
        let t = decode(r#"{"symbol":"X","direction":"Long","entryPrice":"abc","slPrice":{},"tpPrice":[1]}"#);
        assert_eq!(t.entry_price, None);
        assert_eq!(t.sl_price, None);
        assert_eq!(t.tp_price, None);
        assert_eq!(trade_rrr(&t), None);
    }

    #[test]
    fn booleans_coerce_to_one_and_zero() {
        let t = decode(r#"{"symbol":"X","direction":"Long","entryPrice":true,"slPrice":false,"tpPrice":3,"quantity":true}"#);
        assert_eq!(t.entry_price, Some(1.0));
        assert_eq!(t.sl_price, Some(0.0));
        assert_eq!(t.quantity, 1.0);
        // A zero stop counts as missing.
        assert_eq!(trade_rrr(&t), None);
    }

    #[test]
    fn null_and_absent_fields() {
        let t = decode(r#"{"symbol":"X","entryPrice":null}"#);
        assert_eq!(t.entry_price, None);
        assert_eq!(t.direction, None);
        assert_eq!(t.status, TradeStatus::Open);
        assert_eq!(t.source, TradeSource::Live);
        assert_eq!(t.opened_at, today());
    }

    #[test]
    fn unknown_direction_is_none() {
        let t = decode(r#"{"symbol":"X","direction":"Sideways","entryPrice":100,"slPrice":110,"tpPrice":80}"#);
        assert_eq!(t.direction, None);
        // No direction → no directional check.
        assert_eq!(trade_rrr(&t), Some(2.0));
    }

    #[test]
    fn explicit_fields_are_kept() {
        let t = decode(
            r#"{"id":"6f1c1d52-8c5e-4f3a-9d0e-6a1b2c3d4e5f","symbol":"NQ","direction":"Short",
                "pnl":-40,"status":"Closed","source":"Backtest","openedAt":"2024-12-31","notes":"news"}"#,
        );
        assert_eq!(t.id.to_string(), "6f1c1d52-8c5e-4f3a-9d0e-6a1b2c3d4e5f");
        assert_eq!(t.pnl, Some(-40.0));
        assert_eq!(t.status, TradeStatus::Closed);
        assert_eq!(t.source, TradeSource::Backtest);
        assert_eq!(t.opened_at, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(t.notes.as_deref(), Some("news"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Request / Response
// ═══════════════════════════════════════════════════════════════════

mod http {
    use super::*;

    #[test]
    fn path_of_relative_url() {
        assert_eq!(Request::get("/api/trades?limit=5").path(), "/api/trades");
        assert_eq!(Request::get("/index.html#top").path(), "/index.html");
        assert_eq!(Request::get("/").path(), "/");
    }

    #[test]
    fn path_of_absolute_url() {
        assert_eq!(Request::get("https://journal.test/api/x?y=1").path(), "/api/x");
        assert_eq!(Request::get("https://journal.test").path(), "/");
    }

    #[test]
    fn navigate_mode() {
        let req = Request::navigate("/dashboard");
        assert_eq!(req.mode, RequestMode::Navigate);
        assert!(req.is_navigation());
        assert!(!Request::get("/dashboard").is_navigation());
    }

    #[test]
    fn cache_key_is_method_and_url() {
        let key = Request::get("/a.js").cache_key();
        assert_eq!(key, CacheKey::get("/a.js"));
        assert_ne!(key, Request::new(Method::Head, "/a.js").cache_key());
        assert_eq!(key.to_string(), "GET /a.js");
    }

    #[test]
    fn cache_key_ignores_fragment() {
        assert_eq!(Request::get("/app.css#x").cache_key(), CacheKey::get("/app.css"));
        assert_eq!(
            Request::get("https://journal.test/a.js?v=2#top").cache_key(),
            CacheKey::get("https://journal.test/a.js?v=2")
        );
    }

    #[test]
    fn method_parse() {
        assert_eq!(Method::parse("get"), Method::Get);
        assert_eq!(Method::parse("DELETE"), Method::Delete);
        assert_eq!(Method::parse("purge"), Method::Other("PURGE".into()));
        assert_eq!(Method::Other("PURGE".into()).as_str(), "PURGE");
    }

    #[test]
    fn response_helpers() {
        let r = Response::ok("{\"a\":1}").with_header("Content-Type", "application/json");
        assert!(r.is_success());
        assert_eq!(r.header("content-type"), Some("application/json"));
        assert_eq!(r.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(r.json::<serde_json::Value>().unwrap()["a"], 1);
        assert!(!Response::new(304, "").is_success());
        assert!(!Response::new(503, "Offline").is_success());
        assert!(Response::new(204, "").is_success());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn journal_defaults() {
        assert_eq!(JournalSettings::default().default_currency, "USD");
    }

    #[test]
    fn cache_defaults() {
        let s = CacheSettings::default();
        assert_eq!(s.static_partition(), "trading-journal-static-v1");
        assert_eq!(s.runtime_partition(), "trading-journal-runtime-v1");
        assert_eq!(s.api_prefix, "/api/");
        assert_eq!(s.root_document, "/");
        assert!(s.manifest.contains(&"/".to_string()));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults() {
        let s = CacheSettings::from_json(r#"{"version":"v7","manifest":["/","/app.js"]}"#).unwrap();
        assert_eq!(s.static_partition(), "trading-journal-static-v7");
        assert_eq!(s.manifest, vec!["/".to_string(), "/app.js".to_string()]);
        assert_eq!(s.api_prefix, "/api/");
    }

    #[test]
    fn from_json_rejects_bad_values() {
        assert!(matches!(
            CacheSettings::from_json(r#"{"version":"  "}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            CacheSettings::from_json(r#"{"api_prefix":"api/"}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            CacheSettings::from_json("not json"),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn resolve_with_and_without_origin() {
        let mut s = CacheSettings::default();
        assert_eq!(s.resolve("/icon.png"), "/icon.png");
        s.origin = Some("https://journal.test/".into());
        assert_eq!(s.resolve("/icon.png"), "https://journal.test/icon.png");
        assert_eq!(s.resolve("https://cdn.test/x.js"), "https://cdn.test/x.js");
    }
}
