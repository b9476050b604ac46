//! Order clause parsing and resolution.
//!
//! The `order_by` parameter is a comma-separated list of `field-direction`
//! pairs composing a stable multi-key sort, applied left to right.

use sea_orm::sea_query::Order;

use crate::errors::ApiError;
use crate::traits::CrudResource;

/// Sort direction token. Matched case-insensitively (`asc`, `ASC`, `Desc`
/// are all accepted); anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// One sort directive: `field-direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub field: String,
    pub direction: SortDirection,
}

/// Parse the `order_by` parameter into clauses.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` when a token does not split into
/// `field-direction` or the direction is not `asc`/`desc`.
pub fn parse_order_by(raw: &str) -> Result<Vec<OrderClause>, ApiError> {
    raw.split(',')
        .filter(|token| !token.is_empty())
        .map(parse_clause)
        .collect()
}

fn parse_clause(token: &str) -> Result<OrderClause, ApiError> {
    let mut segments = token.splitn(2, '-');
    let field = segments.next().unwrap_or_default();
    let direction_token = segments.next();

    let Some(direction_token) = direction_token else {
        return Err(ApiError::bad_request(format!(
            "malformed order_by clause '{token}': expected field-direction"
        )));
    };
    if field.is_empty() {
        return Err(ApiError::bad_request(format!(
            "malformed order_by clause '{token}': expected field-direction"
        )));
    }

    let direction = SortDirection::parse(direction_token).ok_or_else(|| {
        ApiError::bad_request(format!(
            "unknown sort direction '{direction_token}' in clause '{token}'"
        ))
    })?;

    Ok(OrderClause {
        field: field.to_string(),
        direction,
    })
}

/// Resolve order clauses to typed columns, preserving clause order.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` for fields outside the queryable set.
pub fn resolve_order<T: CrudResource>(
    clauses: &[OrderClause],
) -> Result<Vec<(T::ColumnType, Order)>, ApiError> {
    let columns = T::queryable_columns();
    clauses
        .iter()
        .map(|clause| {
            columns
                .iter()
                .find(|(name, _)| *name == clause.field)
                .map(|(_, column)| (*column, clause.direction.into()))
                .ok_or_else(|| {
                    ApiError::bad_request(format!("unknown sort field '{}'", clause.field))
                })
        })
        .collect()
}
