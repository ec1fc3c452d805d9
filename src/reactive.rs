//! Reactive query cache over a [`QuintStore`].
//!
//! Query results obtained via [`ReactiveQuintStore::get_reactive`] are deduplicated per
//! query signature and refreshed in place whenever the dataset they depend on is updated.

use indexmap::IndexMap;
use log::debug;

use crate::quint::{QuintQuery, ReactiveResult};
use crate::store::{strip_fragment, QuintStore, StoreHandle};

/// Registry key under which queries are cached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    /// Queries restricted to one dataset (fragment-stripped URI)
    Dataset(String),
    /// Queries without a dataset restriction, spanning all datasets
    Wildcard,
}

impl RegistryKey {
    fn for_dataset(dataset: Option<&str>) -> Self {
        match dataset {
            Some(dataset) => RegistryKey::Dataset(strip_fragment(dataset).to_owned()),
            None => RegistryKey::Wildcard,
        }
    }
}

/// A QuintStore whose query results stay up to date.
///
/// Every distinct query ever issued stays registered until [`clear`](Self::clear); there
/// is no eviction.
#[derive(Default)]
pub struct ReactiveQuintStore {
    store: QuintStore,
    queries: IndexMap<RegistryKey, Vec<QuintQuery>>,
}

impl ReactiveQuintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the live result of a quint query.
    ///
    /// A query seen before returns the very same buffer without re-running it; call
    /// [`update`](Self::update) to force a refresh.
    pub fn get_reactive(
        &mut self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
    ) -> ReactiveResult {
        let dataset = dataset.map(strip_fragment);
        let key = RegistryKey::for_dataset(dataset);
        let queries = self.queries.entry(key).or_default();

        if let Some(known) = queries
            .iter()
            .find(|q| q.matches_signature(subject, predicate, object, graph, dataset))
        {
            debug!("Reactive cache hit for dataset {:?}", dataset);
            return known.result().clone();
        }

        debug!("Reactive cache miss for dataset {:?}", dataset);
        let quints = self.store.match_quints(subject, predicate, object, graph, dataset);
        let query = QuintQuery::with_result(subject, predicate, object, graph, dataset, quints);
        let result = query.result().clone();
        queries.push(query);
        result
    }

    /// Install a new store for `dataset` and refresh every affected query result in place.
    ///
    /// Affected are the queries on this dataset and all queries spanning every dataset.
    pub fn update(&mut self, dataset: &str, store: StoreHandle) -> &mut Self {
        let dataset = strip_fragment(dataset);
        self.store.update(dataset, store);

        let key = RegistryKey::Dataset(dataset.to_owned());
        self.queries.entry(key.clone()).or_default();

        let mut refreshed = 0;
        for key in [key, RegistryKey::Wildcard] {
            if let Some(queries) = self.queries.get(&key) {
                for query in queries {
                    refresh(&self.store, query);
                }
                refreshed += queries.len();
            }
        }
        debug!("Updated dataset {}, refreshed {} queries", dataset, refreshed);
        self
    }

    /// Drop all datasets and empty every query result in place.
    ///
    /// Holders only have the result buffers, so emptying them is what makes them observe
    /// the clear. The queries themselves stay registered.
    pub fn clear(&mut self) -> &mut Self {
        self.store.clear();
        for query in self.queries.values().flatten() {
            query.result().clear();
        }
        self
    }

    pub fn has(&self, dataset: &str) -> bool {
        self.store.has(dataset)
    }

    /// The underlying dataset index
    pub fn store(&self) -> &QuintStore {
        &self.store
    }

    /// Number of cached queries across all registry keys
    pub fn query_count(&self) -> usize {
        self.queries.values().map(Vec::len).sum()
    }
}

fn refresh(store: &QuintStore, query: &QuintQuery) {
    let quints = store.match_quints(
        query.subject.as_deref(),
        query.predicate.as_deref(),
        query.object.as_deref(),
        query.graph.as_deref(),
        query.dataset.as_deref(),
    );
    query.result().replace(quints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quint::Quint;
    use crate::store::{MatchedQuad, QuadSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory source that counts how often it is matched against.
    struct CountingSource {
        quads: Vec<MatchedQuad>,
        calls: Arc<AtomicUsize>,
    }

    impl CountingSource {
        fn new(quads: &[(&str, &str, &str, &str)], calls: Arc<AtomicUsize>) -> Self {
            let quads = quads
                .iter()
                .map(|(s, p, o, g)| MatchedQuad {
                    subject: s.to_string(),
                    predicate: p.to_string(),
                    object: o.to_string(),
                    graph: g.to_string(),
                })
                .collect();
            Self { quads, calls }
        }
    }

    impl QuadSource for CountingSource {
        fn match_quads(
            &self,
            subject: Option<&str>,
            predicate: Option<&str>,
            object: Option<&str>,
            graph: Option<&str>,
        ) -> crate::Result<Vec<MatchedQuad>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let is = |pattern: Option<&str>, value: &str| pattern.map_or(true, |p| p == value);
            Ok(self
                .quads
                .iter()
                .filter(|q| {
                    is(subject, &q.subject)
                        && is(predicate, &q.predicate)
                        && is(object, &q.object)
                        && is(graph, &q.graph)
                })
                .cloned()
                .collect())
        }
    }

    fn source(quads: &[(&str, &str, &str, &str)]) -> StoreHandle {
        Arc::new(CountingSource::new(quads, Arc::new(AtomicUsize::new(0))))
    }

    #[test]
    fn test_new_query_on_unknown_dataset_is_empty() {
        let mut store = ReactiveQuintStore::new();
        let result = store.get_reactive(None, None, None, None, Some("http://example.org/d"));
        assert!(result.is_empty());
        assert_eq!(store.query_count(), 1);
    }

    #[test]
    fn test_known_query_returns_same_buffer_without_rematching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = ReactiveQuintStore::new();
        store.update("D", Arc::new(CountingSource::new(&[("a", "b", "c", "g")], calls.clone())));

        let first = store.get_reactive(Some("a"), None, None, None, Some("D"));
        let second = store.get_reactive(Some("a"), None, None, None, Some("D"));
        assert!(first.ptr_eq(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.query_count(), 1);

        let all = store.get_reactive(None, None, None, None, None);
        let all_again = store.get_reactive(None, None, None, None, None);
        assert!(all.ptr_eq(&all_again));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fragment_variants_share_one_query() {
        let mut store = ReactiveQuintStore::new();
        store.update("D#x", source(&[("a", "b", "c", "g")]));
        assert!(store.has("D"));

        let with_fragment = store.get_reactive(None, None, None, None, Some("D#y"));
        let without = store.get_reactive(None, None, None, None, Some("D"));
        assert!(with_fragment.ptr_eq(&without));
        assert_eq!(without.snapshot(), vec![Quint::new("a", "b", "c", "g", "D")]);
    }

    #[test]
    fn test_update_refreshes_in_place() {
        let mut store = ReactiveQuintStore::new();
        store.update("D", source(&[("a", "b", "c", "g"), ("a", "b", "d", "g")]));
        let objects = store.get_reactive(Some("a"), None, None, None, Some("D"));
        let other = store.get_reactive(None, None, Some("c"), None, Some("D"));
        assert_eq!(objects.len(), 2);
        assert_eq!(other.len(), 1);

        store.update("D", source(&[("a", "b", "e", "g")]));
        assert_eq!(objects.snapshot(), vec![Quint::new("a", "b", "e", "g", "D")]);
        assert!(other.is_empty());
    }

    #[test]
    fn test_update_does_not_touch_other_datasets() {
        let mut store = ReactiveQuintStore::new();
        store.update("D1", source(&[("a", "b", "c", "g")]));
        let d1 = store.get_reactive(None, None, None, None, Some("D1"));

        store.update("D2", source(&[]));
        assert_eq!(d1.snapshot(), vec![Quint::new("a", "b", "c", "g", "D1")]);
    }

    #[test]
    fn test_wildcard_refreshes_on_any_dataset() {
        let mut store = ReactiveQuintStore::new();
        store.update("D", source(&[("a", "b", "c", "g")]));
        let all = store.get_reactive(None, None, None, None, None);
        assert_eq!(all.snapshot(), vec![Quint::new("a", "b", "c", "g", "D")]);

        store.update("D", source(&[("x", "b", "c", "g")]));
        assert_eq!(all.snapshot(), vec![Quint::new("x", "b", "c", "g", "D")]);

        store.update("E", source(&[("y", "b", "c", "g")]));
        assert_eq!(
            all.snapshot(),
            vec![Quint::new("x", "b", "c", "g", "D"), Quint::new("y", "b", "c", "g", "E")]
        );
    }

    #[test]
    fn test_update_returns_self_for_chaining() {
        let mut store = ReactiveQuintStore::new();
        store.update("D1", source(&[])).update("D2", source(&[]));
        assert!(store.has("D1"));
        assert!(store.has("D2"));
    }

    #[test]
    fn test_clear_empties_all_results() {
        let mut store = ReactiveQuintStore::new();
        store.update("D1", source(&[("a", "b", "c", "g")]));
        store.update("D2", source(&[("x", "y", "z", "g")]));
        let d1 = store.get_reactive(None, None, None, None, Some("D1"));
        let d2 = store.get_reactive(None, None, None, None, Some("D2"));
        let all = store.get_reactive(None, None, None, None, None);
        assert_eq!(all.len(), 2);

        store.clear();
        assert!(!store.has("D1"));
        assert!(!store.has("D2"));
        assert!(d1.is_empty());
        assert!(d2.is_empty());
        assert!(all.is_empty());

        // Queries survive a clear and refill on the next update.
        store.update("D1", source(&[("a", "b", "c", "g")]));
        assert_eq!(d1.len(), 1);
        assert_eq!(all.len(), 1);
    }
}
