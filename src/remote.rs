//! Reactive quint store with lazy, single-flight loading of datasets from the web.
//!
//! Datasets are loaded when first queried via
//! [`get_reactive_from_remote`](RemoteQuintStore::get_reactive_from_remote) and are not
//! refreshed automatically afterwards: call
//! [`load_from_remote`](RemoteQuintStore::load_from_remote) to re-load one. Whenever a
//! dataset is (re-)loaded, every reactive result depending on it is updated in place.
//!
//! At most one load per dataset is in flight. A caller that finds a load already running
//! does not wait for it; it gets whatever the store holds right now, and its reactive
//! result fills in once the running load completes.
//!
//! Loading must run inside a tokio runtime with the time driver enabled (for the load
//! timeout) and a blocking pool (for parsing). `#[tokio::main]` and `#[tokio::test]`
//! provide both.

use log::{debug, error, info};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LoaderConfig;
use crate::error::{QuintError, ReactiveLoadError, Result};
use crate::http_client::{HttpFetcher, ResourceFetcher};
use crate::parser::{DatasetParser, OxigraphParser};
use crate::quint::ReactiveResult;
use crate::reactive::ReactiveQuintStore;
use crate::store::{strip_fragment, StoreHandle};

/// Reactive quint store that fetches missing datasets.
///
/// All methods take `&self`, so one instance can serve concurrently polled futures. The
/// store state is locked only for synchronous sections, never across a fetch or parse.
pub struct RemoteQuintStore {
    store: Mutex<ReactiveQuintStore>,
    config: RwLock<LoaderConfig>,
    loading: Mutex<HashSet<String>>,
    fetcher: Arc<dyn ResourceFetcher>,
    parser: Arc<dyn DatasetParser>,
}

impl RemoteQuintStore {
    /// Store fetching over HTTP and parsing with oxigraph
    pub fn new() -> Self {
        Self::with_collaborators(Arc::new(HttpFetcher::new()), Arc::new(OxigraphParser::new()))
    }

    pub fn with_collaborators(
        fetcher: Arc<dyn ResourceFetcher>,
        parser: Arc<dyn DatasetParser>,
    ) -> Self {
        Self {
            store: Mutex::new(ReactiveQuintStore::new()),
            config: RwLock::new(LoaderConfig::default()),
            loading: Mutex::new(HashSet::new()),
            fetcher,
            parser,
        }
    }

    /// Replace the loader configuration
    pub fn set_config(&self, config: LoaderConfig) -> &Self {
        *self.config.write() = config;
        self
    }

    pub fn config(&self) -> LoaderConfig {
        self.config.read().clone()
    }

    /// Get the live result of a quint query, loading `dataset` first if it is not present.
    ///
    /// If loading fails, the error carries the (possibly empty) reactive result for the
    /// same query, which stays live for later loads.
    pub async fn get_reactive_from_remote(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
    ) -> std::result::Result<ReactiveResult, ReactiveLoadError> {
        if let Some(uri) = dataset {
            if !self.has(uri) {
                if let Err(e) = self.load_from_remote(uri).await {
                    let result = self.get_reactive(subject, predicate, object, graph, dataset);
                    return Err(ReactiveLoadError::new(result, e));
                }
            }
        }
        Ok(self.get_reactive(subject, predicate, object, graph, dataset))
    }

    /// Fetch and parse `dataset`, then install it and refresh dependent results.
    ///
    /// Returns immediately if a load of the same dataset is already in flight.
    pub async fn load_from_remote(&self, dataset: &str) -> Result<&Self> {
        let dataset = strip_fragment(dataset);
        let Some(_in_flight) = InFlight::acquire(&self.loading, dataset) else {
            debug!("Dataset {} is already loading, skipping", dataset);
            return Ok(self);
        };

        let config = self.config();
        let load = async {
            let resource = self.fetcher.fetch_text(dataset, &config).await?;
            self.parser.parse_into_store(&resource, dataset, &config).await
        };
        let loaded = if config.timeout_secs == 0 {
            load.await
        } else {
            tokio::time::timeout(Duration::from_secs(config.timeout_secs), load)
                .await
                .unwrap_or_else(|_| {
                    Err(QuintError::Timeout {
                        uri: dataset.to_string(),
                        secs: config.timeout_secs,
                    })
                })
        };

        match loaded {
            Ok(handle) => {
                self.update(dataset, handle);
                info!("Loaded dataset {}", dataset);
                Ok(self)
            }
            Err(e) => {
                error!("Failed to update dataset {}: {}", dataset, e);
                Err(e)
            }
        }
    }

    /// Whether a load of `dataset` is currently in flight
    pub fn is_loading(&self, dataset: &str) -> bool {
        self.loading.lock().contains(strip_fragment(dataset))
    }

    pub fn get_reactive(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
    ) -> ReactiveResult {
        self.store.lock().get_reactive(subject, predicate, object, graph, dataset)
    }

    pub fn update(&self, dataset: &str, store: StoreHandle) -> &Self {
        self.store.lock().update(dataset, store);
        self
    }

    pub fn has(&self, dataset: &str) -> bool {
        self.store.lock().has(dataset)
    }

    pub fn clear(&self) -> &Self {
        self.store.lock().clear();
        self
    }

    pub fn query_count(&self) -> usize {
        self.store.lock().query_count()
    }
}

impl Default for RemoteQuintStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks a dataset as loading for as long as it lives.
///
/// Dropping it releases the mark, also when the loading future is cancelled.
struct InFlight<'a> {
    loading: &'a Mutex<HashSet<String>>,
    dataset: String,
}

impl<'a> InFlight<'a> {
    fn acquire(loading: &'a Mutex<HashSet<String>>, dataset: &str) -> Option<Self> {
        if loading.lock().insert(dataset.to_owned()) {
            Some(Self { loading, dataset: dataset.to_owned() })
        } else {
            None
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.loading.lock().remove(&self.dataset);
    }
}
