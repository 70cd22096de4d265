//! Variable preparation and aggregation resolution
//!
//! Callers may hand in variables as id/slug strings or as full catalog
//! objects. Both forms are resolved at this boundary into `Variable` values,
//! validated against the enrichment backend before any query runs.

use crate::catalog::{CatalogClient, Variable};
use super::error::EnrichmentError;

/// Aggregate used when a variable declares no default of its own.
pub const DEFAULT_AGGREGATION: &str = "ARRAY_AGG";

/// A variable given either by id/slug or as a resolved catalog object.
#[derive(Debug, Clone)]
pub enum VariableSpec {
    Id(String),
    Object(Variable),
}

impl VariableSpec {
    pub fn id(id: impl Into<String>) -> Self {
        VariableSpec::Id(id.into())
    }

    pub fn object(variable: Variable) -> Self {
        VariableSpec::Object(variable)
    }
}

impl From<&str> for VariableSpec {
    fn from(id: &str) -> Self {
        VariableSpec::Id(id.to_string())
    }
}

impl From<Variable> for VariableSpec {
    fn from(variable: Variable) -> Self {
        VariableSpec::Object(variable)
    }
}

/// A variable paired with the aggregation to apply in the query.
///
/// `aggregation: None` means the variable's values are selected as-is, with
/// no aggregate function.
#[derive(Debug, Clone)]
pub struct VariableAggregation {
    pub variable: Variable,
    pub aggregation: Option<String>,
}

impl VariableAggregation {
    pub fn new(variable: Variable, aggregation: impl Into<String>) -> Self {
        VariableAggregation {
            variable,
            aggregation: Some(aggregation.into()),
        }
    }
}

/// A variable paired with a SQL predicate fragment applied to its column.
///
/// The predicate is everything after the column reference, e.g. `"> 3"` or
/// `"= 'the string'"`.
#[derive(Debug, Clone)]
pub struct VariableFilter {
    pub variable: Variable,
    pub predicate: String,
}

impl VariableFilter {
    pub fn new(variable: Variable, predicate: impl Into<String>) -> Self {
        VariableFilter {
            variable,
            predicate: predicate.into(),
        }
    }
}

/// How to aggregate enrichment values when several catalog geometries
/// intersect one user geometry.
#[derive(Debug, Clone, Default)]
pub enum AggregationPolicy {
    /// No aggregation: one output row per intersecting geometry
    None,
    /// Each variable's declared default, falling back to [`DEFAULT_AGGREGATION`]
    #[default]
    Default,
    /// The same SQL aggregate for every variable
    Custom(String),
    /// Explicit per-variable overrides; unlisted variables use their default
    PerVariable(Vec<VariableAggregation>),
}

/// Resolve a batch of variable specs against the catalog.
///
/// String specs are fetched by id; objects pass through. Every variable is
/// then validated: its dataset and geography must both be available in
/// `backend`. Validation failures surface before any warehouse call.
pub fn prepare_variables<C: CatalogClient + ?Sized>(
    specs: &[VariableSpec],
    catalog: &C,
    backend: &str,
) -> Result<Vec<Variable>, EnrichmentError> {
    specs
        .iter()
        .map(|spec| prepare_variable(spec, catalog, backend))
        .collect()
}

fn prepare_variable<C: CatalogClient + ?Sized>(
    spec: &VariableSpec,
    catalog: &C,
    backend: &str,
) -> Result<Variable, EnrichmentError> {
    let variable = match spec {
        VariableSpec::Id(id) => catalog.variable(id)?,
        VariableSpec::Object(variable) => variable.clone(),
    };

    validate_variable(&variable, catalog, backend)?;
    Ok(variable)
}

fn validate_variable<C: CatalogClient + ?Sized>(
    variable: &Variable,
    catalog: &C,
    backend: &str,
) -> Result<(), EnrichmentError> {
    let dataset = catalog.dataset(&variable.dataset)?;
    let geography = catalog.geography(&dataset.geography)?;

    if !(dataset.is_available_in(backend) && geography.is_available_in(backend)) {
        return Err(EnrichmentError::NotAvailable {
            slug: variable.slug.clone(),
            backend: backend.to_string(),
        });
    }

    Ok(())
}

/// Validate the variable behind each filter.
///
/// Filter variables never reach the SELECT list, but an unavailable one
/// still has to fail before the geometry upload, like any other variable
/// used by the enrichment.
pub fn prepare_filters<C: CatalogClient + ?Sized>(
    filters: &[VariableFilter],
    catalog: &C,
    backend: &str,
) -> Result<(), EnrichmentError> {
    for filter in filters {
        validate_variable(&filter.variable, catalog, backend)?;
    }
    Ok(())
}

/// Resolve the effective aggregation for each variable under a policy.
pub fn variable_aggregations(
    variables: &[Variable],
    policy: &AggregationPolicy,
) -> Vec<VariableAggregation> {
    variables
        .iter()
        .map(|variable| VariableAggregation {
            variable: variable.clone(),
            aggregation: effective_aggregation(variable, policy),
        })
        .collect()
}

fn effective_aggregation(variable: &Variable, policy: &AggregationPolicy) -> Option<String> {
    let declared = || {
        variable
            .agg_method
            .clone()
            .unwrap_or_else(|| DEFAULT_AGGREGATION.to_string())
    };

    match policy {
        AggregationPolicy::None => None,
        AggregationPolicy::Default => Some(declared()),
        AggregationPolicy::Custom(agg) => Some(agg.clone()),
        AggregationPolicy::PerVariable(overrides) => {
            for over in overrides {
                if over.variable.id == variable.id {
                    return over.aggregation.clone();
                }
            }
            Some(declared())
        }
    }
}
