//! Dataset index: a set of quints (s,p,o,g,d), keyed by the dataset each quad was retrieved from.

use indexmap::IndexMap;
use log::warn;
use oxigraph::model::{GraphName, GraphNameRef, NamedNode, Term};
use oxigraph::store::Store;
use std::sync::Arc;

use crate::error::Result;
use crate::quint::Quint;

/// A quad as returned by a [`QuadSource`], with all terms reduced to their string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedQuad {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub graph: String,
}

impl MatchedQuad {
    fn into_quint(self, dataset: &str) -> Quint {
        Quint::new(self.subject, self.predicate, self.object, self.graph, dataset)
    }
}

/// Pattern matching capability of a single underlying store.
///
/// A bound argument matches a term whose string value is equal to it; `None` matches
/// anything. The default graph has the value `""`.
pub trait QuadSource: Send + Sync {
    fn match_quads(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
    ) -> Result<Vec<MatchedQuad>>;
}

/// Shared handle to a dataset's store
pub type StoreHandle = Arc<dyn QuadSource>;

impl QuadSource for Store {
    fn match_quads(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
    ) -> Result<Vec<MatchedQuad>> {
        // Push down what maps onto an index lookup, filter the rest by value.
        let predicate_node = predicate.and_then(|p| NamedNode::new(p).ok());
        let graph_node = match graph {
            Some("") => Some(GraphName::DefaultGraph),
            Some(g) => NamedNode::new(g).ok().map(GraphName::NamedNode),
            None => None,
        };
        if predicate.is_some() && predicate_node.is_none() {
            // Predicates are always IRIs, nothing can match.
            return Ok(Vec::new());
        }

        let mut matched = Vec::new();
        for quad in self.quads_for_pattern(
            None,
            predicate_node.as_ref().map(NamedNode::as_ref),
            None,
            graph_node.as_ref().map(GraphName::as_ref),
        ) {
            let quad = quad?;
            let candidate = MatchedQuad {
                subject: term_value(&Term::from(quad.subject)),
                predicate: quad.predicate.as_str().to_owned(),
                object: term_value(&quad.object),
                graph: graph_value(quad.graph_name.as_ref()),
            };
            if value_matches(subject, &candidate.subject)
                && value_matches(object, &candidate.object)
                && value_matches(graph, &candidate.graph)
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }
}

fn value_matches(pattern: Option<&str>, value: &str) -> bool {
    pattern.map_or(true, |p| p == value)
}

/// Plain string value of a term: IRI, blank node id or literal lexical form.
pub fn term_value(term: &Term) -> String {
    #[allow(unreachable_patterns)]
    match term {
        Term::NamedNode(node) => node.as_str().to_owned(),
        Term::BlankNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        _ => term.to_string(),
    }
}

fn graph_value(graph: GraphNameRef<'_>) -> String {
    match graph {
        GraphNameRef::NamedNode(node) => node.as_str().to_owned(),
        GraphNameRef::BlankNode(node) => node.as_str().to_owned(),
        GraphNameRef::DefaultGraph => String::new(),
    }
}

/// Substring of `uri` before its first `#`; the whole string if there is no fragment.
pub fn strip_fragment(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(base, _)| base)
}

/// A QuintStore keeps track of which dataset every quad was retrieved from.
///
/// Datasets are keyed by their URI without fragment, so `http://x/d#me` and `http://x/d`
/// denote the same dataset. Iteration follows registration order.
#[derive(Default, Clone)]
pub struct QuintStore {
    datasets: IndexMap<String, StoreHandle>,
}

impl QuintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, dataset: &str) -> bool {
        self.datasets.contains_key(strip_fragment(dataset))
    }

    /// Install or replace the store of a dataset. A replaced dataset keeps its position.
    pub fn update(&mut self, dataset: &str, store: StoreHandle) {
        self.datasets.insert(strip_fragment(dataset).to_owned(), store);
    }

    /// Match a pattern against one dataset, or against all datasets when `dataset` is `None`.
    ///
    /// Querying an unknown dataset is not an error: a warning is logged and the result is empty.
    pub fn match_quints(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
        dataset: Option<&str>,
    ) -> Vec<Quint> {
        match dataset {
            Some(dataset) => {
                let dataset = strip_fragment(dataset);
                match self.datasets.get_key_value(dataset) {
                    Some((key, store)) => {
                        match_one(key, store.as_ref(), subject, predicate, object, graph)
                    }
                    None => {
                        warn!("Dataset not found: {}", dataset);
                        Vec::new()
                    }
                }
            }
            None => self
                .datasets
                .iter()
                .flat_map(|(key, store)| {
                    match_one(key, store.as_ref(), subject, predicate, object, graph)
                })
                .collect(),
        }
    }

    pub fn clear(&mut self) {
        self.datasets.clear();
    }

    /// Known dataset keys in registration order
    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

fn match_one(
    dataset: &str,
    store: &dyn QuadSource,
    subject: Option<&str>,
    predicate: Option<&str>,
    object: Option<&str>,
    graph: Option<&str>,
) -> Vec<Quint> {
    match store.match_quads(subject, predicate, object, graph) {
        Ok(quads) => quads.into_iter().map(|quad| quad.into_quint(dataset)).collect(),
        Err(e) => {
            warn!("Matching against dataset {} failed: {}", dataset, e);
            Vec::new()
        }
    }
}
