//! Collection URL construction.
//!
//! Parameters always appear in the order `fields`, `limit`, `offset`,
//! `order_by`, `query`. The service relies on this order, so it is fixed.

use crate::Query;

/// Sort order on one field. Descending renders with a `-` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    field: String,
    descending: bool,
}

impl OrderBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn render(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// Projection, paging, ordering and filter for one collection request.
///
/// Negative `limit`/`offset` values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionQuery {
    fields: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    order_by: Option<OrderBy>,
    query: Option<Query>,
}

impl CollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends fields to the projection, keeping caller order.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn field_list(&self) -> &[String] {
        &self.fields
    }

    pub fn filter(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn to_url(&self, base_url: &str) -> String {
        build_url(
            base_url,
            self.fields.as_slice(),
            self.order_by.as_ref(),
            self.limit,
            self.offset,
            self.query.as_ref(),
        )
    }
}

/// Builds `<base>?fields=..&limit=..&offset=..&order_by=..&query=".."`,
/// leaving out every parameter that is empty or unset.
///
/// The filter text is percent-encoded; the surrounding quotes are literal.
pub fn build_url<S: AsRef<str>>(
    base_url: &str,
    fields: &[S],
    order_by: Option<&OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
    query: Option<&Query>,
) -> String {
    let mut params: Vec<String> = Vec::with_capacity(5);

    if !fields.is_empty() {
        let joined = fields
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        params.push(format!("fields={joined}"));
    }
    if let Some(limit) = limit.filter(|n| *n >= 0) {
        params.push(format!("limit={limit}"));
    }
    if let Some(offset) = offset.filter(|n| *n >= 0) {
        params.push(format!("offset={offset}"));
    }
    if let Some(order_by) = order_by {
        params.push(format!("order_by={}", order_by.render()));
    }
    if let Some(query) = query {
        params.push(format!("query=\"{}\"", urlencoding::encode(&query.render())));
    }

    if params.is_empty() {
        return base_url.to_string();
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}{}", params.join("&"))
}
