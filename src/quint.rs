//! Quints, quint queries and the shared result buffers handed out by the reactive store.

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A Quint (s,p,o,g,d) is an RDF quad extended by the dataset it was retrieved from.
///
/// All terms are plain string values: IRIs without angle brackets, blank node ids,
/// literal lexical forms. The default graph has the value `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quint {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub graph: String,
    pub dataset: String,
}

impl Quint {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        graph: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
            dataset: dataset.into(),
        }
    }
}

/// Live, shared result buffer of a quint query.
///
/// Cloning yields another handle to the same buffer. The store refreshes the buffer in
/// place whenever the underlying dataset changes, so every holder sees the new contents
/// without re-issuing the query. Holders only get read access.
#[derive(Clone, Default)]
pub struct ReactiveResult {
    inner: Arc<RwLock<Vec<Quint>>>,
}

impl ReactiveResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_quints(quints: Vec<Quint>) -> Self {
        Self { inner: Arc::new(RwLock::new(quints)) }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<Quint> {
        self.inner.read().clone()
    }

    /// Read guard over the current contents. Do not hold it across store updates.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<Quint>> {
        self.inner.read()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains(&self, quint: &Quint) -> bool {
        self.inner.read().contains(quint)
    }

    /// True if both handles point at the same buffer
    pub fn ptr_eq(&self, other: &ReactiveResult) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Truncate and repopulate in place. The buffer instance is never swapped out.
    pub(crate) fn replace(&self, quints: Vec<Quint>) {
        let mut buffer = self.inner.write();
        buffer.clear();
        buffer.extend(quints);
    }

    pub(crate) fn clear(&self) {
        self.inner.write().clear();
    }
}

impl fmt::Debug for ReactiveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.read().iter()).finish()
    }
}

/// A QuintQuery (s,p,o,g,d) where any element may be unbound (`None`), together with
/// its cached result buffer.
pub struct QuintQuery {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    pub graph: Option<String>,
    pub dataset: Option<String>,
    result: ReactiveResult,
}

impl QuintQuery {
    /// Create a query with an empty result buffer
    pub fn new(
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
    ) -> Self {
        Self::with_result(subject, predicate, object, graph, dataset, Vec::new())
    }

    pub fn with_result(
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
        result: Vec<Quint>,
    ) -> Self {
        Self {
            subject: subject.map(str::to_owned),
            predicate: predicate.map(str::to_owned),
            object: object.map(str::to_owned),
            graph: graph.map(str::to_owned),
            dataset: dataset.map(str::to_owned),
            result: ReactiveResult::from_quints(result),
        }
    }

    pub fn result(&self) -> &ReactiveResult {
        &self.result
    }

    /// Whether this query has exactly the given signature
    pub fn matches_signature(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
    ) -> bool {
        self.subject.as_deref() == subject
            && self.predicate.as_deref() == predicate
            && self.object.as_deref() == object
            && self.graph.as_deref() == graph
            && self.dataset.as_deref() == dataset
    }
}

/// Equality over the five query fields; the result buffer is ignored.
impl PartialEq for QuintQuery {
    fn eq(&self, other: &Self) -> bool {
        self.matches_signature(
            other.subject.as_deref(),
            other.predicate.as_deref(),
            other.object.as_deref(),
            other.graph.as_deref(),
            other.dataset.as_deref(),
        )
    }
}

impl Eq for QuintQuery {}

impl fmt::Debug for QuintQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuintQuery")
            .field("subject", &self.subject)
            .field("predicate", &self.predicate)
            .field("object", &self.object)
            .field("graph", &self.graph)
            .field("dataset", &self.dataset)
            .field("result_len", &self.result.len())
            .finish()
    }
}
