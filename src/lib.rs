//! # Quint Store
//!
//! An in-memory collection of RDF datasets that answers quad pattern queries against
//! one dataset or all of them, keeping track of which dataset every quad came from.
//!
//! Query results are reactive: [`ReactiveQuintStore::get_reactive`] hands out a live
//! [`ReactiveResult`] that is shared by every caller issuing the same query and that is
//! refreshed in place whenever the dataset behind it changes.
//! [`RemoteQuintStore`] adds lazy loading of datasets from the web, with at most one
//! fetch in flight per dataset.
//!
//! ## Example
//!
//! ```rust
//! use oxigraph::model::{GraphName, NamedNode, Quad};
//! use oxigraph::store::Store;
//! use quint_store::ReactiveQuintStore;
//! use std::sync::Arc;
//!
//! let dataset = "http://example.org/profile";
//! let alice = NamedNode::new("http://example.org/alice").unwrap();
//! let knows = NamedNode::new("http://example.org/knows").unwrap();
//! let bob = NamedNode::new("http://example.org/bob").unwrap();
//!
//! let mut store = ReactiveQuintStore::new();
//! let friends = store.get_reactive(None, Some(knows.as_str()), None, None, Some(dataset));
//! assert!(friends.is_empty());
//!
//! let data = Store::new().unwrap();
//! data.insert(&Quad::new(alice, knows, bob, GraphName::DefaultGraph)).unwrap();
//! store.update(dataset, Arc::new(data));
//! assert_eq!(friends.len(), 1);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::doc_markdown)]

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod error;
pub mod http_client;
pub mod parser;
pub mod quint;
pub mod reactive;
pub mod remote;
pub mod store;

pub use config::LoaderConfig;
pub use error::{QuintError, ReactiveLoadError, Result};
pub use http_client::{FetchedResource, HttpFetcher, ResourceFetcher};
pub use parser::{DatasetParser, OxigraphParser};
pub use quint::{Quint, QuintQuery, ReactiveResult};
pub use reactive::{ReactiveQuintStore, RegistryKey};
pub use remote::RemoteQuintStore;
pub use store::{strip_fragment, MatchedQuad, QuadSource, QuintStore, StoreHandle};

/// RDF serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RdfFormat {
    Turtle,
    NTriples,
    RdfXml,
    JsonLd,
    NQuads,
    TriG,
}

impl RdfFormat {
    /// Format for a `Content-Type` value; parameters such as `charset` are ignored.
    pub fn from_media_type(content_type: &str) -> Option<RdfFormat> {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        match media_type.to_lowercase().as_str() {
            "text/turtle" | "application/x-turtle" => Some(RdfFormat::Turtle),
            "application/n-triples" | "text/plain" => Some(RdfFormat::NTriples),
            "application/rdf+xml" => Some(RdfFormat::RdfXml),
            "application/ld+json" => Some(RdfFormat::JsonLd),
            "application/n-quads" => Some(RdfFormat::NQuads),
            "application/trig" => Some(RdfFormat::TriG),
            _ => None,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::RdfXml => "application/rdf+xml",
            RdfFormat::JsonLd => "application/ld+json",
            RdfFormat::NQuads => "application/n-quads",
            RdfFormat::TriG => "application/trig",
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "ntriples",
            RdfFormat::RdfXml => "rdfxml",
            RdfFormat::JsonLd => "jsonld",
            RdfFormat::NQuads => "nquads",
            RdfFormat::TriG => "trig",
        };
        f.write_str(name)
    }
}
