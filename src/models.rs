//! Request parameter surface and the per-request query description.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::ApiError;
use crate::filter::{FilterClause, parse_filters};
use crate::sort::{OrderClause, parse_order_by};

/// Query parameters accepted by list and single-record lookups.
///
/// # Filtering
/// `filters` is a comma-separated list of `field-operator-value` clauses,
/// ANDed together. The value segment may carry a coercion tag:
/// `int(42)`, `date(20240131)`, `datetime(20240131 09:30:00)`, or bare text.
///
/// ```text
/// GET /items?filters=name-like-%25ore%25,quantity-gte-int(3)
/// ```
///
/// # Sorting
/// `order_by` is a comma-separated list of `field-direction` pairs applied
/// left to right; direction is `asc` or `desc` (case-insensitive).
///
/// # Projection
/// `fields` restricts the attributes returned per record; the identifier is
/// always retained.
///
/// # Pagination
/// `page` (default 1) and `page_size` (default from the resource, 50 unless
/// overridden) are 1-based.
#[derive(Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// AND-ed filter clauses: `field-operator-value[,field-operator-value...]`
    #[param(example = "name-like-%ore%,quantity-gte-int(3)")]
    pub filters: Option<String>,
    /// Multi-key sort: `field-direction[,field-direction...]`
    #[param(example = "quantity-desc,name-asc")]
    pub order_by: Option<String>,
    /// Projection: `field[,field...]`
    #[param(example = "id,name")]
    pub fields: Option<String>,
    /// Page number (1-based)
    #[param(example = 2)]
    pub page: Option<u64>,
    /// Records per page, overriding the resource default for this request
    #[param(example = 25)]
    pub page_size: Option<u64>,
}

impl ListParams {
    /// Whether the request triggers raw mode.
    ///
    /// Raw mode means none of `filters`, `order_by`, `fields`, `page_size`
    /// is present. `page` alone does not count and is ignored in raw mode:
    /// the full collection is returned unpaginated regardless of `page`.
    /// This asymmetry is inherited from the system this layer models and is
    /// preserved deliberately.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.filters.is_none()
            && self.order_by.is_none()
            && self.fields.is_none()
            && self.page_size.is_none()
    }
}

/// A parsed request: either the raw-mode sentinel or a full query
/// description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    /// Return the entire collection, unpaginated and unfiltered.
    Raw,
    /// Compile and execute the described query.
    Query(QuerySpec),
}

impl QueryRequest {
    /// Parse raw request parameters into a query request.
    ///
    /// Built fresh per operation and never shared across requests.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for malformed filter/order tokens or a
    /// zero `page`/`page_size`.
    pub fn parse(params: &ListParams, default_page_size: u64) -> Result<Self, ApiError> {
        if params.is_raw() {
            return Ok(Self::Raw);
        }

        let filters = match &params.filters {
            Some(raw) => parse_filters(raw)?,
            None => Vec::new(),
        };
        let order = match &params.order_by {
            Some(raw) => parse_order_by(raw)?,
            None => Vec::new(),
        };
        let fields = params.fields.as_ref().map(|raw| {
            raw.split(',')
                .filter(|name| !name.is_empty())
                .map(ToString::to_string)
                .collect()
        });

        let page = params.page.unwrap_or(1);
        let page_size = params.page_size.unwrap_or(default_page_size);
        if page == 0 {
            return Err(ApiError::bad_request("page must be at least 1"));
        }
        if page_size == 0 {
            return Err(ApiError::bad_request("page_size must be at least 1"));
        }

        Ok(Self::Query(QuerySpec {
            filters,
            order,
            fields,
            page,
            page_size,
        }))
    }
}

/// Immutable description of one compiled query, discarded after execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub filters: Vec<FilterClause>,
    pub order: Vec<OrderClause>,
    /// `None` means all fields; `Some` restricts the projection.
    pub fields: Option<Vec<String>>,
    pub page: u64,
    pub page_size: u64,
}

impl QuerySpec {
    /// The empty spec used for single-record lookups on update/destroy.
    #[must_use]
    pub fn lookup() -> Self {
        Self {
            filters: Vec::new(),
            order: Vec::new(),
            fields: None,
            page: 1,
            page_size: 1,
        }
    }
}

/// One page of results plus the count metadata callers need to page further.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page {
    /// Records on this page, at most `page_size` of them
    pub data: Vec<serde_json::Value>,
    /// Total records matching the filter, across all pages
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}
