//! Query DSL builder.
//!
//! Builds the JSON query documents accepted by the engine's `_search`
//! endpoint. Anything the builder cannot express goes through [`Query::Raw`].

use serde_json::{json, Map, Value};

/// A query clause.
#[derive(Debug, Clone)]
pub enum Query {
    /// Match every document.
    MatchAll,
    /// Full-text match on an analyzed field.
    Match(MatchQuery),
    /// Exact match on a keyword field.
    Term {
        /// Field name.
        field: String,
        /// Exact value.
        value: Value,
    },
    /// Numeric or date range.
    Range(RangeQuery),
    /// Boolean combination of clauses.
    Bool(BoolQuery),
    /// Query against a `nested` field.
    Nested {
        /// Path of the nested field.
        path: String,
        /// Query evaluated against each nested object.
        query: Box<Query>,
    },
    /// Raw JSON clause, passed through untouched.
    Raw(Value),
}

impl Query {
    /// `match_all` clause.
    pub fn match_all() -> Self {
        Query::MatchAll
    }

    /// `match` clause on `field`.
    pub fn matches(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::Match(MatchQuery::new(field, text))
    }

    /// `term` clause on `field`.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `nested` clause wrapping `query`.
    pub fn nested(path: impl Into<String>, query: Query) -> Self {
        Query::Nested {
            path: path.into(),
            query: Box::new(query),
        }
    }

    /// Clause as JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match(m) => m.to_json(),
            Query::Term { field, value } => json!({ "term": { field: value } }),
            Query::Range(r) => r.to_json(),
            Query::Bool(b) => b.to_json(),
            Query::Nested { path, query } => json!({
                "nested": {
                    "path": path,
                    "query": query.to_json()
                }
            }),
            Query::Raw(v) => v.clone(),
        }
    }

    /// Full request body: `{"query": <clause>}`.
    pub fn to_body(&self) -> Value {
        json!({ "query": self.to_json() })
    }
}

impl From<MatchQuery> for Query {
    fn from(query: MatchQuery) -> Self {
        Query::Match(query)
    }
}

impl From<RangeQuery> for Query {
    fn from(query: RangeQuery) -> Self {
        Query::Range(query)
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}

/// Match query for full-text search.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    field: String,
    text: String,
    operator: Option<String>,
}

impl MatchQuery {
    /// Create a new match query.
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
            operator: None,
        }
    }

    /// Require all terms (`"and"`) or any term (`"or"`).
    pub fn operator(mut self, op: impl Into<String>) -> Self {
        self.operator = Some(op.into());
        self
    }

    fn to_json(&self) -> Value {
        match &self.operator {
            None => json!({ "match": { &self.field: self.text } }),
            Some(op) => json!({
                "match": { &self.field: { "query": self.text, "operator": op } }
            }),
        }
    }
}

/// Range query for numeric and date fields.
#[derive(Debug, Clone)]
pub struct RangeQuery {
    field: String,
    bounds: Map<String, Value>,
}

impl RangeQuery {
    /// Create an unbounded range on `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            bounds: Map::new(),
        }
    }

    /// Greater than.
    pub fn gt(self, value: impl Into<Value>) -> Self {
        self.bound("gt", value)
    }

    /// Greater than or equal.
    pub fn gte(self, value: impl Into<Value>) -> Self {
        self.bound("gte", value)
    }

    /// Less than.
    pub fn lt(self, value: impl Into<Value>) -> Self {
        self.bound("lt", value)
    }

    /// Less than or equal.
    pub fn lte(self, value: impl Into<Value>) -> Self {
        self.bound("lte", value)
    }

    fn bound(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.bounds.insert(key.to_string(), value.into());
        self
    }

    fn to_json(&self) -> Value {
        json!({ "range": { &self.field: self.bounds } })
    }
}

/// Bool query for combining clauses.
#[derive(Debug, Clone, Default)]
pub struct BoolQuery {
    must: Vec<Query>,
    should: Vec<Query>,
    must_not: Vec<Query>,
    filter: Vec<Query>,
}

impl BoolQuery {
    /// Create an empty bool query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scoring clause every hit must match.
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    /// Add an optional clause.
    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    /// Add an excluding clause.
    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    /// Add a non-scoring clause every hit must match.
    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut clauses = Map::new();
        for (name, queries) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ] {
            if !queries.is_empty() {
                clauses.insert(
                    name.to_string(),
                    Value::Array(queries.iter().map(Query::to_json).collect()),
                );
            }
        }
        json!({ "bool": clauses })
    }
}
