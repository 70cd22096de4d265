//! Layer data sources
//!
//! A source is GeoJSON carried inline, a warehouse table, or a free SQL
//! query. Table and query sources are read through the SQL API by the
//! rendering library; GeoJSON is embedded in the page.

use serde_json::Value;

/// Where a layer's geometries come from.
#[derive(Debug, Clone)]
pub enum Source {
    GeoJson(Value),
    Table(String),
    Query(String),
}

impl Source {
    pub fn geojson(value: Value) -> Self {
        Source::GeoJson(value)
    }

    pub fn table(name: impl Into<String>) -> Self {
        Source::Table(name.into())
    }

    pub fn query(sql: impl Into<String>) -> Self {
        Source::Query(sql.into())
    }

    /// Type tag used in the layer definition.
    pub fn source_type(&self) -> &'static str {
        match self {
            Source::GeoJson(_) => "GeoJSON",
            Source::Table(_) => "Table",
            Source::Query(_) => "Query",
        }
    }

    /// The query (or inline data) the rendering library reads the layer from.
    pub fn read_query(&self) -> String {
        match self {
            Source::GeoJson(value) => value.to_string(),
            Source::Table(name) => format!("SELECT * FROM {}", name),
            Source::Query(sql) => sql.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_source_becomes_select_star() {
        let source = Source::table("listings");
        assert_eq!(source.source_type(), "Table");
        assert_eq!(source.read_query(), "SELECT * FROM listings");
    }

    #[test]
    fn test_query_source_passes_through() {
        let source = Source::query("SELECT * FROM listings WHERE price < 100");
        assert_eq!(source.source_type(), "Query");
        assert_eq!(source.read_query(), "SELECT * FROM listings WHERE price < 100");
    }

    #[test]
    fn test_geojson_source_serializes_inline() {
        let source = Source::geojson(json!({"type": "Point", "coordinates": [0, 0]}));
        assert_eq!(source.source_type(), "GeoJSON");
        assert!(source.read_query().contains("\"type\":\"Point\""));
    }
}
