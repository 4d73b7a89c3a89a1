//! Index management and mapping declarations.

use crate::error::{error_body, error_type, Result, SearchError};
use clubsearch_log::{debug, info, warn};
use opensearch::http::StatusCode;
use opensearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts,
};
use opensearch::OpenSearch;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Index manager for creating and managing indices.
#[derive(Clone)]
pub struct IndexManager {
    client: Arc<OpenSearch>,
}

impl IndexManager {
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self { client }
    }

    /// Create an index unless it already exists.
    ///
    /// Existence is probed first and an existing index is reported as
    /// [`SearchError::IndexExists`] without sending a create request. The
    /// probe and the create are separate requests, so a concurrent creator
    /// can still win the race; the engine's own conflict answer is mapped to
    /// the same error.
    pub async fn create(&self, name: &str, settings: &IndexSettings) -> Result<()> {
        if self.exists(name).await? {
            warn!("Index '{}' already exists, skipping creation", name);
            return Err(SearchError::IndexExists(name.to_string()));
        }

        info!("Creating index: {}", name);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(settings.to_json())
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            info!("Index created: {}", name);
            return Ok(());
        }

        let body = error_body(response).await?;
        if error_type(&body) == Some("resource_already_exists_exception") {
            return Err(SearchError::IndexExists(name.to_string()));
        }

        Err(SearchError::engine(status.as_u16(), &body))
    }

    /// Check if an index exists.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        debug!("Checking if index exists: {}", name);

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(SearchError::Engine {
                status: status.as_u16(),
                reason: format!("existence check for index '{}' failed", name),
            })
        }
    }

    /// Delete an index.
    pub async fn delete(&self, name: &str) -> Result<()> {
        info!("Deleting index: {}", name);

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        Ok(())
    }

    /// Refresh an index so recent writes become searchable.
    pub async fn refresh(&self, name: &str) -> Result<()> {
        debug!("Refreshing index: {}", name);

        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        Ok(())
    }
}

/// Body of an index-creation request.
#[derive(Debug, Clone, Default)]
pub struct IndexSettings {
    /// Number of shards.
    pub number_of_shards: Option<u32>,
    /// Number of replicas.
    pub number_of_replicas: Option<u32>,
    /// Field mappings.
    pub mappings: Option<Mapping>,
}

impl IndexSettings {
    /// Create empty index settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of shards.
    pub fn shards(mut self, shards: u32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    /// Set number of replicas.
    pub fn replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    /// Set mappings.
    pub fn mappings(mut self, mappings: Mapping) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Request body as sent to the engine.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        let mut settings = Map::new();

        if let Some(shards) = self.number_of_shards {
            settings.insert("number_of_shards".to_string(), json!(shards));
        }
        if let Some(replicas) = self.number_of_replicas {
            settings.insert("number_of_replicas".to_string(), json!(replicas));
        }
        if !settings.is_empty() {
            body.insert("settings".to_string(), Value::Object(settings));
        }

        if let Some(mappings) = &self.mappings {
            body.insert("mappings".to_string(), mappings.to_json());
        }

        Value::Object(body)
    }
}

/// Field mapping declaration.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    properties: BTreeMap<String, MappingField>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    /// Look up a declared field.
    pub fn get(&self, name: &str) -> Option<&MappingField> {
        self.properties.get(name)
    }

    /// Mapping as JSON.
    pub fn to_json(&self) -> Value {
        json!({ "properties": properties_json(&self.properties) })
    }
}

fn properties_json(properties: &BTreeMap<String, MappingField>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, field)| (name.clone(), field.to_json()))
            .collect(),
    )
}

/// Field mapping definition.
#[derive(Debug, Clone)]
pub struct MappingField {
    field_type: FieldType,
    analyzer: Option<String>,
    search_analyzer: Option<String>,
    properties: BTreeMap<String, MappingField>,
}

impl MappingField {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            analyzer: None,
            search_analyzer: None,
            properties: BTreeMap::new(),
        }
    }

    /// Analyzed full-text field.
    pub fn text() -> Self {
        Self::of(FieldType::Text)
    }

    /// Exact-match keyword field.
    pub fn keyword() -> Self {
        Self::of(FieldType::Keyword)
    }

    /// 32-bit integer field.
    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    /// 64-bit integer field.
    pub fn long() -> Self {
        Self::of(FieldType::Long)
    }

    /// Boolean field.
    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    /// Date field.
    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    /// Object field.
    pub fn object() -> Self {
        Self::of(FieldType::Object)
    }

    /// Nested field; each array element is indexed as its own document.
    pub fn nested() -> Self {
        Self::of(FieldType::Nested)
    }

    /// Set index-time analyzer.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Set search-time analyzer.
    pub fn search_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    /// Add a sub-field (object and nested fields).
    pub fn property(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    /// Declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    fn to_json(&self) -> Value {
        let mut field = Map::new();

        // Object fields are implied by their properties; a bare object keeps its type.
        if self.field_type != FieldType::Object || self.properties.is_empty() {
            field.insert("type".to_string(), json!(self.field_type.as_str()));
        }
        if let Some(analyzer) = &self.analyzer {
            field.insert("analyzer".to_string(), json!(analyzer));
        }
        if let Some(search_analyzer) = &self.search_analyzer {
            field.insert("search_analyzer".to_string(), json!(search_analyzer));
        }
        if !self.properties.is_empty() {
            field.insert("properties".to_string(), properties_json(&self.properties));
        }

        Value::Object(field)
    }
}

/// Field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Full-text searchable field.
    Text,
    /// Exact match keyword field.
    Keyword,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Boolean.
    Boolean,
    /// Date.
    Date,
    /// Object.
    Object,
    /// Nested object.
    Nested,
}

impl FieldType {
    /// Type name used in mappings.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Object => "object",
            FieldType::Nested => "nested",
        }
    }
}
