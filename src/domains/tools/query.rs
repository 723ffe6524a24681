//! Upstream query construction.
//!
//! openFDA searches are written in a Lucene-like field syntax:
//! `field:"term"` for equality, whitespace between terms for OR and `AND`
//! for conjunction. [`QueryExpr`] models the subset the tools need and is the
//! only place user text is interpolated, so the escaping rule lives in
//! [`quote_term`] and nowhere else.
//!
//! Escaping is deliberately narrow: double quotes become single quotes so a
//! name cannot close its own term early. Parentheses, colons and other
//! operators inside a name are passed through as-is.

use std::fmt;

/// openFDA collections queried by the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Structured product labels (`/drug/label.json`).
    Label,
    /// FAERS adverse event reports (`/drug/event.json`).
    Event,
}

impl Collection {
    /// Path of the collection relative to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Label => "/label.json",
            Self::Event => "/event.json",
        }
    }
}

/// A search expression tree rendered to openFDA syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// `field:"value"`
    FieldEq { field: &'static str, value: String },
    /// `(a AND b ...)`
    And(Vec<QueryExpr>),
    /// `(a b ...)`, whitespace is OR in openFDA.
    Or(Vec<QueryExpr>),
}

impl QueryExpr {
    pub fn field_eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::FieldEq {
            field,
            value: value.into(),
        }
    }

    /// Render to the upstream search string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldEq { field, value } => write!(f, "{}:{}", field, quote_term(value)),
            Self::And(terms) => write_group(f, terms, " AND "),
            Self::Or(terms) => write_group(f, terms, " "),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, terms: &[QueryExpr], joiner: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(joiner)?;
        }
        write!(f, "{}", term)?;
    }
    f.write_str(")")
}

/// Wrap a term in double quotes after replacing any embedded `"` with `'`.
pub fn quote_term(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "'"))
}

/// A fully built request against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    pub collection: Collection,
    pub search: String,
    pub limit: u32,
    pub api_key: Option<String>,
}

impl UpstreamQuery {
    pub fn path(&self) -> &'static str {
        self.collection.path()
    }

    /// Query parameters in wire order: `search`, `limit`, then `api_key` if any.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("search", self.search.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// The url-encoded query string, with the API key masked. Used for logs.
    pub fn redacted_query_string(&self) -> String {
        let params: Vec<(&str, String)> = self
            .params()
            .into_iter()
            .map(|(k, v)| if k == "api_key" { (k, "REDACTED".to_string()) } else { (k, v) })
            .collect();
        serde_urlencoded::to_string(&params).unwrap_or_default()
    }
}

/// Builds [`UpstreamQuery`] values for each tool.
///
/// Holds the process-wide API key handed over from configuration.
#[derive(Clone, Default)]
pub struct QueryBuilder {
    api_key: Option<String>,
}

impl QueryBuilder {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Label lookup: the name may match either the brand or the generic name.
    pub fn label(&self, drug_name: &str, limit: u32) -> UpstreamQuery {
        let expr = QueryExpr::Or(vec![
            QueryExpr::field_eq("openfda.brand_name", drug_name),
            QueryExpr::field_eq("openfda.generic_name", drug_name),
        ]);
        self.build(Collection::Label, &expr, limit)
    }

    /// Adverse-event lookup on the reported medicinal product name.
    pub fn adverse_events(&self, drug_name: &str, limit: u32) -> UpstreamQuery {
        let expr = QueryExpr::field_eq("patient.drug.medicinalproduct", drug_name);
        self.build(Collection::Event, &expr, limit)
    }

    fn build(&self, collection: Collection, expr: &QueryExpr, limit: u32) -> UpstreamQuery {
        UpstreamQuery {
            collection,
            search: expr.render(),
            limit,
            api_key: self.api_key.clone(),
        }
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
