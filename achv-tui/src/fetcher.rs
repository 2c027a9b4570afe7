//! Cache-first progress lookups.

use crate::api_client::{ApiClientError, ProgressBackend};
use achv_core::{Identity, LookupPayload, ProgressTree};
use achv_storage::{CacheBackend, CacheStore};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The backend answered with an `error` payload for this identity.
    #[error("{0}")]
    NotFound(String),
    /// The request failed or the response could not be understood.
    #[error(transparent)]
    Transport(#[from] ApiClientError),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Resolves progress trees, consulting the cache before the backend.
///
/// Only trees are cached. Error payloads and transport failures go straight
/// back to the caller.
pub struct ProgressFetcher<C: CacheBackend> {
    backend: Arc<dyn ProgressBackend>,
    cache: CacheStore<C>,
}

impl<C: CacheBackend> ProgressFetcher<C> {
    pub fn new(backend: Arc<dyn ProgressBackend>, cache: CacheStore<C>) -> Self {
        Self { backend, cache }
    }

    pub fn backend(&self) -> &Arc<dyn ProgressBackend> {
        &self.backend
    }

    pub fn cache(&self) -> &CacheStore<C> {
        &self.cache
    }

    pub async fn fetch(&self, identity: &Identity) -> Result<ProgressTree, FetchError> {
        let key = identity.cache_key();
        match self.cache.get(&key) {
            Some(LookupPayload::Tree(tree)) => {
                tracing::debug!(identity = %identity, "Serving progress from cache");
                return Ok(tree);
            }
            Some(LookupPayload::Error(payload)) => {
                tracing::warn!(
                    identity = %identity,
                    error = %payload.error,
                    "Ignoring cached error payload"
                );
            }
            None => {}
        }

        tracing::info!(identity = %identity, "Requesting progress from backend");
        match self.backend.lookup(identity).await {
            Ok(LookupPayload::Tree(tree)) => {
                self.cache.put(&key, LookupPayload::Tree(tree.clone()));
                Ok(tree)
            }
            Ok(LookupPayload::Error(payload)) => {
                tracing::info!(identity = %identity, error = %payload.error, "Backend reported lookup error");
                Err(FetchError::NotFound(payload.error))
            }
            Err(err) => {
                tracing::error!(identity = %identity, error = %err, "Progress request failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use achv_core::{ErrorPayload, ParentInfo, Realm, Region};
    use achv_storage::{InMemoryCacheBackend, ManualClock, PROGRESS_TTL};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted responses and counts lookups.
    struct ScriptedBackend {
        responses: Mutex<Vec<Result<LookupPayload, ApiClientError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<LookupPayload, ApiClientError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProgressBackend for ScriptedBackend {
        async fn lookup(&self, _identity: &Identity) -> Result<LookupPayload, ApiClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(ApiClientError::InvalidResponse("script exhausted".to_string()));
            }
            responses.remove(0)
        }

        async fn realms(&self, _region: Region) -> Result<Vec<Realm>, ApiClientError> {
            Ok(Vec::new())
        }
    }

    fn identity() -> Identity {
        Identity::new("us", "Area-52", "Thrall").unwrap()
    }

    fn tree(name: &str) -> ProgressTree {
        ProgressTree {
            parent: ParentInfo {
                id: Some(19458),
                name: name.to_string(),
                ..ParentInfo::default()
            },
            character: "thrall".to_string(),
            server: "area-52".to_string(),
            server_name: None,
            steps: Vec::new(),
        }
    }

    fn not_found() -> LookupPayload {
        LookupPayload::Error(ErrorPayload {
            error: "Character not found".to_string(),
        })
    }

    fn fetcher(
        backend: Arc<ScriptedBackend>,
    ) -> (ProgressFetcher<InMemoryCacheBackend>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = CacheStore::with_clock(InMemoryCacheBackend::new(), clock.clone());
        (ProgressFetcher::new(backend, cache), clock)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_backend() {
        let backend = ScriptedBackend::new(Vec::new());
        let (fetcher, _) = fetcher(backend.clone());
        fetcher
            .cache()
            .put(&identity().cache_key(), LookupPayload::Tree(tree("cached")));

        let result = fetcher.fetch(&identity()).await.unwrap();
        assert_eq!(result, tree("cached"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_calls_once_and_caches_tree() {
        let backend = ScriptedBackend::new(vec![Ok(LookupPayload::Tree(tree("fresh")))]);
        let (fetcher, _) = fetcher(backend.clone());

        assert_eq!(fetcher.fetch(&identity()).await.unwrap(), tree("fresh"));
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            fetcher.cache().get(&identity().cache_key()),
            Some(LookupPayload::Tree(tree("fresh")))
        );

        let again = Identity::new("US", " area-52 ", "THRALL").unwrap();
        assert_eq!(fetcher.fetch(&again).await.unwrap(), tree("fresh"));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_status_is_not_found_and_not_cached() {
        let response = crate::api_client::decode_body::<LookupPayload>(
            404,
            r#"{"error":"Character not found"}"#,
        );
        let backend = ScriptedBackend::new(vec![response]);
        let (fetcher, _) = fetcher(backend.clone());

        let err = fetcher.fetch(&identity()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Character not found");
        assert_eq!(fetcher.cache().get(&identity().cache_key()), None);
        assert_eq!(fetcher.cache().stats().hits, 0);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_error_payload_is_not_cached() {
        let backend = ScriptedBackend::new(vec![
            Ok(not_found()),
            Ok(LookupPayload::Tree(tree("later"))),
        ]);
        let (fetcher, _) = fetcher(backend.clone());

        let err = fetcher.fetch(&identity()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Character not found");
        assert_eq!(fetcher.cache().get(&identity().cache_key()), None);

        assert_eq!(fetcher.fetch(&identity()).await.unwrap(), tree("later"));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates_distinctly() {
        let backend = ScriptedBackend::new(vec![Err(ApiClientError::Status {
            status: 503,
            message: "maintenance".to_string(),
        })]);
        let (fetcher, _) = fetcher(backend);

        let err = fetcher.fetch(&identity()).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport(ApiClientError::Status { status: 503, .. })
        ));
        assert_eq!(fetcher.cache().get(&identity().cache_key()), None);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_refetch() {
        let backend = ScriptedBackend::new(vec![
            Ok(LookupPayload::Tree(tree("first"))),
            Ok(LookupPayload::Tree(tree("second"))),
        ]);
        let (fetcher, clock) = fetcher(backend.clone());

        fetcher.fetch(&identity()).await.unwrap();
        clock.advance(PROGRESS_TTL - Duration::from_secs(1));
        assert_eq!(fetcher.fetch(&identity()).await.unwrap(), tree("first"));
        assert_eq!(backend.calls(), 1);

        clock.advance(Duration::from_secs(1));
        assert_eq!(fetcher.fetch(&identity()).await.unwrap(), tree("second"));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_error_payload_counts_as_miss() {
        let backend = ScriptedBackend::new(vec![Ok(LookupPayload::Tree(tree("real")))]);
        let (fetcher, _) = fetcher(backend.clone());
        fetcher.cache().put(&identity().cache_key(), not_found());

        assert_eq!(fetcher.fetch(&identity()).await.unwrap(), tree("real"));
        assert_eq!(backend.calls(), 1);
    }
}
