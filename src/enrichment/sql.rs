//! Enrichment query construction
//!
//! One query per physical enrichment table. The uploaded geometry table is
//! spatially joined against the table's companion geography, and every
//! requested variable from that table is selected in the same statement.

use super::variables::{VariableAggregation, VariableFilter, DEFAULT_AGGREGATION};

/// Resolved addressing for one physical enrichment table and the variables
/// requested from it.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    /// Grouping key: the enrichment table name (view name for private tables)
    pub table: String,
    /// Fully qualified dataset to select variables from
    pub dataset: String,
    /// Fully qualified geography table to join against
    pub geo_table: String,
    /// Project the dataset is addressed through
    pub project: String,
    pub variables: Vec<VariableAggregation>,
}

/// Build the enrichment query for one grouped table.
///
/// `data_table` is the fully qualified name of the uploaded geometry table.
/// If any variable carries an aggregation the query groups by the join key;
/// otherwise every intersecting row is returned as-is.
pub fn build_query(meta: &TableMetadata, filters: &[VariableFilter], data_table: &str) -> String {
    let aggregated = meta.variables.iter().any(|v| v.aggregation.is_some());

    let selects: Vec<String> = meta
        .variables
        .iter()
        .map(|v| {
            let column = &v.variable.column_name;
            if aggregated {
                // Inside a grouped query an aggregation-free variable still
                // needs an aggregate to be selectable
                let agg = v.aggregation.as_deref().unwrap_or(DEFAULT_AGGREGATION);
                format!("{}(enrichment_table.{}) AS {}", agg, column, column)
            } else {
                format!("enrichment_table.{} AS {}", column, column)
            }
        })
        .collect();

    let mut query = format!(
        "SELECT data_table.enrichment_id, {selects}\n\
         FROM `{dataset}` enrichment_table\n\
         JOIN `{geo_table}` geo_table\n\
         \u{20} ON enrichment_table.geoid = geo_table.geoid\n\
         JOIN `{data_table}` data_table\n\
         \u{20} ON ST_INTERSECTS(geo_table.geom, ST_GEOGFROMGEOJSON(data_table.__geojson_geom))",
        selects = selects.join(", "),
        dataset = meta.dataset,
        geo_table = meta.geo_table,
        data_table = data_table,
    );

    let predicates: Vec<String> = filters
        .iter()
        .map(|f| format!("enrichment_table.{} {}", f.variable.column_name, f.predicate))
        .collect();
    if !predicates.is_empty() {
        query.push_str(&format!("\nWHERE {}", predicates.join(" AND ")));
    }

    if aggregated {
        query.push_str("\nGROUP BY data_table.enrichment_id");
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Variable;

    fn variable(column: &str, dataset: &str) -> Variable {
        Variable {
            id: format!("{}.{}", dataset, column),
            slug: format!("{}_slug", column),
            column_name: column.to_string(),
            dataset: dataset.to_string(),
            agg_method: None,
        }
    }

    fn metadata(variables: Vec<VariableAggregation>) -> TableMetadata {
        TableMetadata {
            table: "sociodemo".to_string(),
            dataset: "carto-do-public-data.acs.sociodemo".to_string(),
            geo_table: "carto-do-public-data.acs.blockgroups".to_string(),
            project: "carto-do-public-data".to_string(),
            variables,
        }
    }

    const DATA_TABLE: &str = "carto-do-customers.analyst.temp_abc";

    #[test]
    fn test_aggregated_query_groups_by_join_key() {
        let var = variable("population", "carto-do-public-data.acs.sociodemo");
        let meta = metadata(vec![VariableAggregation::new(var, "SUM")]);
        let sql = build_query(&meta, &[], DATA_TABLE);

        assert!(sql.contains("SUM(enrichment_table.population) AS population"));
        assert!(sql.contains("GROUP BY data_table.enrichment_id"));
        assert!(sql.contains("FROM `carto-do-public-data.acs.sociodemo` enrichment_table"));
        assert!(sql.contains("JOIN `carto-do-public-data.acs.blockgroups` geo_table"));
        assert!(sql.contains("JOIN `carto-do-customers.analyst.temp_abc` data_table"));
        assert!(sql.contains("ST_INTERSECTS"));
    }

    #[test]
    fn test_plain_query_has_no_group_by() {
        let var = variable("population", "carto-do-public-data.acs.sociodemo");
        let meta = metadata(vec![VariableAggregation {
            variable: var,
            aggregation: None,
        }]);
        let sql = build_query(&meta, &[], DATA_TABLE);

        assert!(sql.contains("enrichment_table.population AS population"));
        assert!(!sql.contains("GROUP BY"));
    }

    #[test]
    fn test_mixed_aggregation_falls_back_inside_grouped_query() {
        let dataset = "carto-do-public-data.acs.sociodemo";
        let meta = metadata(vec![
            VariableAggregation::new(variable("population", dataset), "SUM"),
            VariableAggregation {
                variable: variable("income", dataset),
                aggregation: None,
            },
        ]);
        let sql = build_query(&meta, &[], DATA_TABLE);

        assert!(sql.contains("SUM(enrichment_table.population)"));
        assert!(sql.contains("ARRAY_AGG(enrichment_table.income)"));
    }

    #[test]
    fn test_filters_join_with_and() {
        let dataset = "carto-do-public-data.acs.sociodemo";
        let var = variable("population", dataset);
        let meta = metadata(vec![VariableAggregation::new(var.clone(), "SUM")]);
        let filters = vec![
            VariableFilter::new(var, "> 100"),
            VariableFilter::new(variable("income", dataset), "< 50000"),
        ];
        let sql = build_query(&meta, &filters, DATA_TABLE);

        assert!(sql.contains(
            "WHERE enrichment_table.population > 100 AND enrichment_table.income < 50000"
        ));
        // WHERE must come before the grouping
        let where_pos = sql.find("WHERE").unwrap();
        let group_pos = sql.find("GROUP BY").unwrap();
        assert!(where_pos < group_pos);
    }

    #[test]
    fn test_multiple_variables_batched_in_one_select() {
        let dataset = "carto-do-public-data.acs.sociodemo";
        let meta = metadata(vec![
            VariableAggregation::new(variable("population", dataset), "SUM"),
            VariableAggregation::new(variable("income", dataset), "AVG"),
        ]);
        let sql = build_query(&meta, &[], DATA_TABLE);

        assert!(sql.contains("SUM(enrichment_table.population) AS population, AVG(enrichment_table.income) AS income"));
        // One FROM: a single statement serves every variable of the table
        assert_eq!(sql.matches("FROM").count(), 1);
    }
}
