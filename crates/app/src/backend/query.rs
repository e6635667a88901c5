//! Explicit query specifications for the row-store API.
//!
//! A [`QuerySpec`] describes field filters, ordering, and limit as a plain
//! value. Rendering to the REST query string is a pure function, so filter
//! assembly can be unit-tested without any network.

/// A single row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `field = value`
    Eq(String, String),
    /// Case-insensitive pattern match; `*` is the wildcard.
    ILike(String, String),
    /// `field` is any of the given values.
    In(String, Vec<String>),
    /// `field >= value`
    Gte(String, String),
    /// Any of the nested filters matches. Nested `Or` is not supported.
    Or(Vec<Filter>),
}

impl Filter {
    /// Render in the dotted form used inside `or=(...)` groups.
    fn to_dotted(&self) -> String {
        match self {
            Self::Eq(field, value) => format!("{field}.eq.{value}"),
            Self::ILike(field, pattern) => format!("{field}.ilike.{pattern}"),
            Self::In(field, values) => format!("{field}.in.({})", quote_list(values)),
            Self::Gte(field, value) => format!("{field}.gte.{value}"),
            Self::Or(filters) => filters
                .iter()
                .map(Self::to_dotted)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Render as a query pair.
    fn to_pair(&self) -> (String, String) {
        match self {
            Self::Eq(field, value) => (field.clone(), format!("eq.{value}")),
            Self::ILike(field, pattern) => (field.clone(), format!("ilike.{pattern}")),
            Self::In(field, values) => (field.clone(), format!("in.({})", quote_list(values))),
            Self::Gte(field, value) => (field.clone(), format!("gte.{value}")),
            Self::Or(filters) => {
                let inner = filters
                    .iter()
                    .map(Self::to_dotted)
                    .collect::<Vec<_>>()
                    .join(",");
                ("or".to_string(), format!("({inner})"))
            }
        }
    }
}

/// Quote list members so names with spaces survive the `in.(...)` syntax.
fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Result ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub ascending: bool,
}

/// An explicit query against a named collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    collection: String,
    select: Option<String>,
    filters: Vec<Filter>,
    order: Option<Order>,
    limit: Option<u32>,
}

impl QuerySpec {
    /// Start a query against the given collection.
    #[must_use]
    pub fn from_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            select: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Select specific columns (or embedded resources) instead of `*`.
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .push(Filter::Eq(field.into(), value.into()));
        self
    }

    /// Add a case-insensitive pattern filter; the term is wrapped in `*`.
    #[must_use]
    pub fn ilike_contains(mut self, field: impl Into<String>, term: &str) -> Self {
        self.filters
            .push(Filter::ILike(field.into(), format!("*{term}*")));
        self
    }

    /// Add a membership filter.
    #[must_use]
    pub fn is_in(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.filters.push(Filter::In(field.into(), values));
        self
    }

    /// Add a greater-than-or-equal filter.
    #[must_use]
    pub fn gte(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .push(Filter::Gte(field.into(), value.into()));
        self
    }

    /// Add a disjunction of filters.
    #[must_use]
    pub fn or(mut self, filters: Vec<Filter>) -> Self {
        self.filters.push(Filter::Or(filters));
        self
    }

    /// Order results descending by the given field.
    #[must_use]
    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Order {
            field: field.into(),
            ascending: false,
        });
        self
    }

    /// Order results ascending by the given field.
    #[must_use]
    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Order {
            field: field.into(),
            ascending: true,
        });
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The collection this query targets.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Render to REST query pairs. Pure; URL encoding is the transport's job.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }

        for filter in &self.filters {
            pairs.push(filter.to_pair());
        }

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{direction}", order.field)));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_order_limit() {
        let spec = QuerySpec::from_collection("pesquisas_usuarios")
            .eq("bairro_usuario", "centro")
            .order_desc("created_at")
            .limit(20);

        assert_eq!(spec.collection(), "pesquisas_usuarios");
        assert_eq!(
            spec.to_query_pairs(),
            vec![
                ("bairro_usuario".to_string(), "eq.centro".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_ilike_wraps_term_in_wildcards() {
        let spec = QuerySpec::from_collection("vw_search_geral").ilike_contains("texto_unificado", "pão");
        assert_eq!(
            spec.to_query_pairs(),
            vec![("texto_unificado".to_string(), "ilike.*pão*".to_string())]
        );
    }

    #[test]
    fn test_in_quotes_values_with_spaces() {
        let spec = QuerySpec::from_collection("vw_search_geral").is_in(
            "bairro",
            vec!["linha santa cruz".to_string(), "esmeralda".to_string()],
        );
        assert_eq!(
            spec.to_query_pairs(),
            vec![(
                "bairro".to_string(),
                "in.(\"linha santa cruz\",\"esmeralda\")".to_string()
            )]
        );
    }

    #[test]
    fn test_or_renders_dotted_group() {
        let spec = QuerySpec::from_collection("banners").or(vec![
            Filter::ILike("titulo".to_string(), "*leite*".to_string()),
            Filter::ILike("descricao".to_string(), "*leite*".to_string()),
        ]);
        assert_eq!(
            spec.to_query_pairs(),
            vec![(
                "or".to_string(),
                "(titulo.ilike.*leite*,descricao.ilike.*leite*)".to_string()
            )]
        );
    }

    #[test]
    fn test_gte_and_select() {
        let spec = QuerySpec::from_collection("pesquisas_usuarios")
            .select("search_text")
            .gte("created_at", "2026-07-08T00:00:00Z");
        assert_eq!(
            spec.to_query_pairs(),
            vec![
                ("select".to_string(), "search_text".to_string()),
                (
                    "created_at".to_string(),
                    "gte.2026-07-08T00:00:00Z".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_empty_spec_renders_no_pairs() {
        let spec = QuerySpec::from_collection("bairros");
        assert!(spec.to_query_pairs().is_empty());
    }
}
