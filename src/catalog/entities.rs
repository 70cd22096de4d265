//! Catalog entity types
//!
//! A Variable identifies one column of one dataset table. Its qualified
//! dataset id has the form `<project>.<schema>.<table>`, and the variable id
//! appends the column: `<project>.<schema>.<table>.<column>`.

use serde::Deserialize;

/// A column of a catalog dataset, enrichable into user geometries.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Fully qualified id: `<project>.<schema>.<table>.<column>`
    pub id: String,
    /// Short unique handle, usable wherever the id is
    pub slug: String,
    /// Physical column name in the dataset table
    pub column_name: String,
    /// Qualified id of the dataset table: `<project>.<schema>.<table>`
    pub dataset: String,
    /// Declared default aggregation method (e.g. "SUM"), if any
    #[serde(default)]
    pub agg_method: Option<String>,
}

impl Variable {
    /// Project part of the qualified dataset id.
    pub fn project_name(&self) -> &str {
        self.dataset.split('.').next().unwrap_or("")
    }

    /// Schema part of the qualified dataset id.
    pub fn schema_name(&self) -> &str {
        self.dataset.split('.').nth(1).unwrap_or("")
    }

    /// Table part of the qualified dataset id.
    pub fn dataset_name(&self) -> &str {
        self.dataset.split('.').nth(2).unwrap_or("")
    }
}

/// A catalog dataset: a warehouse table plus its companion geography.
#[derive(Debug, Deserialize, Clone)]
pub struct Dataset {
    /// Qualified id: `<project>.<schema>.<table>`
    pub id: String,
    /// Qualified id of the geography table this dataset joins against
    pub geography: String,
    /// Warehouse backends this dataset is provisioned in
    #[serde(default)]
    pub available_in: Vec<String>,
}

impl Dataset {
    pub fn is_available_in(&self, backend: &str) -> bool {
        self.available_in.iter().any(|b| b == backend)
    }
}

/// A catalog geography: the geometry table datasets join against.
#[derive(Debug, Deserialize, Clone)]
pub struct Geography {
    /// Qualified id: `<project>.<schema>.<table>`
    pub id: String,
    #[serde(default)]
    pub available_in: Vec<String>,
}

impl Geography {
    pub fn is_available_in(&self, backend: &str) -> bool {
        self.available_in.iter().any(|b| b == backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population() -> Variable {
        Variable {
            id: "carto-do.acs.sociodemo.population".to_string(),
            slug: "population_abc123".to_string(),
            column_name: "population".to_string(),
            dataset: "carto-do.acs.sociodemo".to_string(),
            agg_method: Some("SUM".to_string()),
        }
    }

    #[test]
    fn test_variable_name_parts() {
        let var = population();
        assert_eq!(var.project_name(), "carto-do");
        assert_eq!(var.schema_name(), "acs");
        assert_eq!(var.dataset_name(), "sociodemo");
    }

    #[test]
    fn test_dataset_availability() {
        let dataset = Dataset {
            id: "carto-do.acs.sociodemo".to_string(),
            geography: "carto-do.acs.blockgroups".to_string(),
            available_in: vec!["bq".to_string()],
        };
        assert!(dataset.is_available_in("bq"));
        assert!(!dataset.is_available_in("spanner"));
    }

    #[test]
    fn test_geography_unavailable_when_empty() {
        let geography = Geography {
            id: "carto-do.acs.blockgroups".to_string(),
            available_in: vec![],
        };
        assert!(!geography.is_available_in("bq"));
    }
}
