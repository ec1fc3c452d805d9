//! Parsing fetched documents into dataset stores

use async_trait::async_trait;
use log::debug;
use oxigraph::io::{RdfFormat as OxiRdfFormat, RdfParser};
use oxigraph::store::Store;
use std::sync::Arc;

use crate::config::LoaderConfig;
use crate::error::{QuintError, Result};
use crate::http_client::FetchedResource;
use crate::store::StoreHandle;
use crate::RdfFormat;

/// Turns a fetched document into a store handle for one dataset
#[async_trait]
pub trait DatasetParser: Send + Sync {
    /// Parse `resource`, resolving relative IRIs against `base_uri`.
    async fn parse_into_store(
        &self,
        resource: &FetchedResource,
        base_uri: &str,
        config: &LoaderConfig,
    ) -> Result<StoreHandle>;
}

/// Parser loading documents into a fresh in-memory oxigraph store
#[derive(Debug, Clone, Copy, Default)]
pub struct OxigraphParser;

impl OxigraphParser {
    pub fn new() -> Self {
        Self
    }

    /// Syntax of `resource` from its content type, `default_format` if unrecognised
    pub fn format_for(resource: &FetchedResource, default_format: RdfFormat) -> RdfFormat {
        resource
            .content_type
            .as_deref()
            .and_then(RdfFormat::from_media_type)
            .unwrap_or(default_format)
    }

    /// Synchronous variant of [`DatasetParser::parse_into_store`]
    pub fn parse(
        &self,
        resource: &FetchedResource,
        base_uri: &str,
        default_format: RdfFormat,
    ) -> Result<Store> {
        let format = Self::format_for(resource, default_format);
        let parser = RdfParser::from_format(to_oxigraph_format(format)?).with_base_iri(base_uri)?;

        let store = Store::new()?;
        store.load_from_reader(parser, resource.body.as_bytes())?;
        debug!("Parsed {} as {} ({} quads)", base_uri, format, store.len()?);
        Ok(store)
    }
}

/// Parsing runs on tokio's blocking pool so large documents do not stall the runtime.
#[async_trait]
impl DatasetParser for OxigraphParser {
    async fn parse_into_store(
        &self,
        resource: &FetchedResource,
        base_uri: &str,
        config: &LoaderConfig,
    ) -> Result<StoreHandle> {
        let parser = *self;
        let resource = resource.clone();
        let base_uri = base_uri.to_owned();
        let default_format = config.default_format;

        let store = tokio::task::spawn_blocking(move || {
            parser.parse(&resource, &base_uri, default_format)
        })
        .await
        .map_err(|e| QuintError::Parse(format!("parser task failed: {}", e)))??;
        Ok(Arc::new(store))
    }
}

fn to_oxigraph_format(format: RdfFormat) -> Result<OxiRdfFormat> {
    match format {
        RdfFormat::Turtle => Ok(OxiRdfFormat::Turtle),
        RdfFormat::NTriples => Ok(OxiRdfFormat::NTriples),
        RdfFormat::RdfXml => Ok(OxiRdfFormat::RdfXml),
        RdfFormat::NQuads => Ok(OxiRdfFormat::NQuads),
        RdfFormat::TriG => Ok(OxiRdfFormat::TriG),
        RdfFormat::JsonLd => {
            Err(QuintError::InvalidFormat("JSON-LD datasets are not supported".to_string()))
        }
    }
}
