//! Filter clause parsing and compilation.
//!
//! The `filters` parameter is a comma-separated list of clauses, each split
//! on `-` into exactly (field, operator, value). Clauses are ANDed. The
//! value segment is kept verbatim at parse time; coercion happens once per
//! clause when the condition is compiled.

use sea_orm::{ColumnTrait, Condition, sea_query::SimpleExpr};

use crate::coerce::coerce;
use crate::errors::ApiError;
use crate::traits::CrudResource;

/// Comparison operator of a filter clause.
///
/// Accepts both word tokens (`eq`, `neq`, `gt`, ...) and their SQL-symbol
/// spellings (`=`, `!=`, `>`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl FilterOperator {
    /// Parse an operator token, returning `None` for anything outside the
    /// supported set.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" | "=" => Some(Self::Eq),
            "neq" | "ne" | "!=" | "<>" => Some(Self::Ne),
            "gt" | ">" => Some(Self::Gt),
            "gte" | ">=" => Some(Self::Gte),
            "lt" | "<" => Some(Self::Lt),
            "lte" | "<=" => Some(Self::Lte),
            "like" => Some(Self::Like),
            _ => None,
        }
    }

    /// Apply this operator to a column, coercing the raw value.
    ///
    /// `like` takes the raw pattern as-is; the other operators compare
    /// against the coerced value.
    fn apply<C: ColumnTrait>(self, column: C, raw_value: &str) -> SimpleExpr {
        match self {
            Self::Like => column.like(raw_value),
            Self::Eq => column.eq(coerce(raw_value)),
            Self::Ne => column.ne(coerce(raw_value)),
            Self::Gt => column.gt(coerce(raw_value)),
            Self::Gte => column.gte(coerce(raw_value)),
            Self::Lt => column.lt(coerce(raw_value)),
            Self::Lte => column.lte(coerce(raw_value)),
        }
    }
}

/// One filter directive: `field-operator-value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOperator,
    /// Raw value segment, coerced at compile time
    pub value: String,
}

/// Parse the `filters` parameter into clauses.
///
/// Empty tokens between commas are skipped, so an explicit empty `filters=`
/// yields zero clauses (the identity filter) rather than an error.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` when a clause does not split into three
/// segments, names an unknown operator, or has an empty field/operator.
pub fn parse_filters(raw: &str) -> Result<Vec<FilterClause>, ApiError> {
    raw.split(',')
        .filter(|token| !token.is_empty())
        .map(parse_clause)
        .collect()
}

fn parse_clause(token: &str) -> Result<FilterClause, ApiError> {
    // Split on the first two dashes only: the value segment may contain
    // dashes of its own.
    let mut segments = token.splitn(3, '-');
    let field = segments.next().unwrap_or_default();
    let operator_token = segments.next();
    let value = segments.next();

    let (Some(operator_token), Some(value)) = (operator_token, value) else {
        return Err(ApiError::bad_request(format!(
            "malformed filter clause '{token}': expected field-operator-value"
        )));
    };
    if field.is_empty() || operator_token.is_empty() {
        return Err(ApiError::bad_request(format!(
            "malformed filter clause '{token}': expected field-operator-value"
        )));
    }

    let operator = FilterOperator::parse(operator_token).ok_or_else(|| {
        ApiError::bad_request(format!(
            "unknown filter operator '{operator_token}' in clause '{token}'"
        ))
    })?;

    Ok(FilterClause {
        field: field.to_string(),
        operator,
        value: value.to_string(),
    })
}

/// Compile filter clauses into an AND-composed store condition.
///
/// Field names are resolved against the resource's queryable column table so
/// that arbitrary identifiers never reach the store.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` for fields outside the queryable set.
pub fn build_condition<T: CrudResource>(clauses: &[FilterClause]) -> Result<Condition, ApiError> {
    let columns = T::queryable_columns();
    let mut condition = Condition::all();

    for clause in clauses {
        let column = columns
            .iter()
            .find(|(name, _)| *name == clause.field)
            .map(|(_, column)| *column)
            .ok_or_else(|| {
                ApiError::bad_request(format!("unknown filter field '{}'", clause.field))
            })?;
        condition = condition.add(clause.operator.apply(column, &clause.value));
    }

    Ok(condition)
}
