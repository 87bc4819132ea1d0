use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::http::{CacheKey, Method, Request, Response};
use crate::models::settings::CacheSettings;
use crate::network::traits::Fetcher;
use crate::storage::cache_storage::CacheStorage;

/// Status used for every synthesized offline response.
pub const OFFLINE_STATUS: u16 = 503;

/// What the host runtime should do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// Not handled: the host sends the request as if there were no cache.
    PassThrough,
    /// Answer the request with this response.
    Respond(Response),
}

impl InterceptOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            InterceptOutcome::PassThrough => None,
            InterceptOutcome::Respond(r) => Some(r),
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            InterceptOutcome::PassThrough => None,
            InterceptOutcome::Respond(r) => Some(r),
        }
    }
}

/// Result of pre-caching the static manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Manifest URLs now in the static partition
    pub cached: Vec<String>,
    /// Manifest URLs that could not be fetched, with the reason
    pub failed: Vec<(String, String)>,
}

/// Result of activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    /// Partitions dropped because they belong to another cache version
    pub removed: Vec<String>,
}

/// Lifecycle hooks the host runtime drives: install once, activate once,
/// then intercept every outgoing request.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    async fn on_install(&self) -> InstallReport;

    async fn on_activate(&self) -> ActivationReport;

    /// Never fails: network errors are turned into cached or synthesized
    /// responses.
    async fn on_intercept(&self, request: Request) -> InterceptOutcome;
}

/// Offline-first request handler.
///
/// Routing:
/// - non-GET → pass through;
/// - API paths → network only, 503 JSON when offline;
/// - everything else → cache first with background revalidation, falling
///   back to the network and then to the app shell / a 503 "Offline".
///
/// Two partitions: the static one is filled at install time and never
/// written afterwards; the runtime one collects every 2xx static response
/// seen since. Lookups check runtime first so a revalidated copy shadows
/// the install-time one.
pub struct OfflineCacheManager {
    settings: CacheSettings,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    controlling: AtomicBool,
}

impl std::fmt::Debug for OfflineCacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineCacheManager")
            .field("static_partition", &self.settings.static_partition())
            .field("runtime_partition", &self.settings.runtime_partition())
            .field("fetcher", &self.fetcher.name())
            .field("controlling", &self.is_controlling())
            .finish()
    }
}

impl OfflineCacheManager {
    pub fn new(
        settings: CacheSettings,
        storage: Arc<CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            settings,
            storage,
            fetcher,
            controlling: AtomicBool::new(false),
        })
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    /// Whether activation has claimed the open clients.
    pub fn is_controlling(&self) -> bool {
        self.controlling.load(Ordering::Acquire)
    }

    /// Whether `request` targets the always-fresh API namespace.
    pub fn is_api_request(&self, request: &Request) -> bool {
        request.path().starts_with(&self.settings.api_prefix)
    }

    // ── Routes ──────────────────────────────────────────────────────

    async fn handle_api(&self, request: &Request) -> Response {
        match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "API request failed, answering offline");
                offline_api_response()
            }
        }
    }

    async fn handle_static(&self, request: &Request) -> Response {
        let key = request.cache_key();
        let static_partition = self.settings.static_partition();
        let runtime_partition = self.settings.runtime_partition();

        let cached = self
            .storage
            .match_in(&[runtime_partition.as_str(), static_partition.as_str()], &key)
            .await;

        if let Some(cached) = cached {
            tracing::debug!(key = %key, "cache hit, revalidating in background");
            self.spawn_revalidation(request.clone(), key, runtime_partition);
            return cached;
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.storage
                        .put(&runtime_partition, key, response.clone())
                        .await;
                }
                response
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "static fetch failed with no cached copy");
                self.offline_fallback(request).await
            }
        }
    }

    /// Refresh the runtime copy of `key` without blocking the caller.
    /// At most one attempt; failures leave the cached copy untouched.
    /// Outside a Tokio runtime there is nowhere to run the refresh, so it
    /// is skipped and the cached copy is served as-is.
    fn spawn_revalidation(&self, request: Request, key: CacheKey, partition: String) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(key = %key, "no Tokio runtime, skipping revalidation");
            return;
        };
        let fetcher = Arc::clone(&self.fetcher);
        let storage = Arc::clone(&self.storage);

        handle.spawn(async move {
            match fetcher.fetch(&request).await {
                Ok(fresh) if fresh.is_success() => {
                    storage.put(&partition, key, fresh).await;
                }
                Ok(fresh) => {
                    tracing::debug!(key = %key, status = fresh.status, "revalidation returned non-success, keeping cached copy");
                }
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "revalidation failed, keeping cached copy");
                }
            }
        });
    }

    async fn offline_fallback(&self, request: &Request) -> Response {
        if request.is_navigation() {
            let shell_key = CacheKey::get(self.settings.resolve(&self.settings.root_document));
            let static_partition = self.settings.static_partition();
            let runtime_partition = self.settings.runtime_partition();
            if let Some(shell) = self
                .storage
                .match_in(&[static_partition.as_str(), runtime_partition.as_str()], &shell_key)
                .await
            {
                return shell;
            }
            tracing::warn!(url = %request.url, "navigation failed and no app shell is cached");
        }
        offline_static_response()
    }
}

#[async_trait]
impl LifecycleHandler for OfflineCacheManager {
    /// Fetch every manifest entry into the static partition. Entries that
    /// fail are logged and skipped.
    async fn on_install(&self) -> InstallReport {
        let partition = self.settings.static_partition();
        self.storage.open(&partition).await;

        let mut report = InstallReport::default();
        for path in &self.settings.manifest {
            let url = self.settings.resolve(path);
            let request = Request::get(url.clone());

            let failure = match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    self.storage
                        .put(&partition, request.cache_key(), response)
                        .await;
                    report.cached.push(url);
                    continue;
                }
                Ok(response) => format!("status {}", response.status),
                Err(e) => e.to_string(),
            };

            tracing::warn!(url = %url, reason = %failure, "failed to pre-cache manifest entry");
            report.failed.push((url, failure));
        }

        tracing::info!(
            partition = %partition,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "static cache installed"
        );
        report
    }

    /// Drop partitions from other versions, then take control of clients.
    async fn on_activate(&self) -> ActivationReport {
        let keep = [
            self.settings.static_partition(),
            self.settings.runtime_partition(),
        ];

        let mut report = ActivationReport::default();
        for name in self.storage.partition_names().await {
            if keep.contains(&name) {
                continue;
            }
            if self.storage.delete(&name).await {
                tracing::info!(partition = %name, "deleted stale cache partition");
                report.removed.push(name);
            }
        }

        self.controlling.store(true, Ordering::Release);
        report
    }

    async fn on_intercept(&self, request: Request) -> InterceptOutcome {
        if request.method != Method::Get {
            return InterceptOutcome::PassThrough;
        }

        let response = if self.is_api_request(&request) {
            self.handle_api(&request).await
        } else {
            self.handle_static(&request).await
        };
        InterceptOutcome::Respond(response)
    }
}

/// `503` JSON answer for API calls made while offline.
pub fn offline_api_response() -> Response {
    let body = json!({
        "error": "Offline",
        "message": "No internet connection",
    });
    Response::new(OFFLINE_STATUS, body.to_string())
        .with_header("Content-Type", "application/json")
}

/// `503` plain-text answer for static resources that are neither cached
/// nor reachable.
pub fn offline_static_response() -> Response {
    Response::new(OFFLINE_STATUS, "Offline").with_header("Content-Type", "text/plain")
}
