//! Map assembly
//!
//! A Map collects layers and view settings and compiles them to the JSON
//! configuration the HTML template embeds.

use serde_json::{json, Value};

use crate::credentials::Credentials;
use super::constants;
use super::error::VizError;
use super::html::render_map_html;
use super::kuviz::{Kuviz, KuvizPublisher};
use super::layer::Layer;

/// Geographic extent given by its four edges, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl Bounds {
    /// Corner pairs for the rendering library, clamped to the valid
    /// longitude/latitude ranges: `[[west, south], [east, north]]`.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [
            [self.west.clamp(-180.0, 180.0), self.south.clamp(-90.0, 90.0)],
            [self.east.clamp(-180.0, 180.0), self.north.clamp(-90.0, 90.0)],
        ]
    }
}

/// A declarative map: layers plus view settings.
#[derive(Debug, Clone, Default)]
pub struct Map {
    pub layers: Vec<Layer>,
    pub bounds: Option<Bounds>,
    /// (width, height) in pixels; None lets the page decide
    pub size: Option<(u32, u32)>,
    pub title: Option<String>,
    pub default_legend: bool,
    credentials: Option<Credentials>,
    carto_vl_path: Option<String>,
    mapbox_gl_path: Option<String>,
}

impl Map {
    pub fn new() -> Self {
        Map::default()
    }

    pub fn add_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Show a generated legend. Requires a title; `to_html` fails otherwise.
    pub fn with_default_legend(mut self) -> Self {
        self.default_legend = true;
        self
    }

    /// Credentials embedded into table/query layer definitions.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Point at a development build of the rendering library.
    pub fn with_carto_vl_path(mut self, path: impl Into<String>) -> Self {
        self.carto_vl_path = Some(path.into());
        self
    }

    pub fn with_mapbox_gl_path(mut self, path: impl Into<String>) -> Self {
        self.mapbox_gl_path = Some(path.into());
        self
    }

    /// One JSON definition per layer, in draw order.
    pub fn layer_defs(&self) -> Vec<Value> {
        self.layers
            .iter()
            .map(|layer| layer.layer_def(self.credentials.as_ref()))
            .collect()
    }

    /// The configuration object embedded in the HTML document.
    pub fn map_config(&self) -> Value {
        json!({
            "layers": self.layer_defs(),
            "bounds": self.bounds.map(|b| b.corners()),
            "size": self.size.map(|(w, h)| json!([w, h])),
            "title": self.title,
            "default_legend": self.default_legend,
        })
    }

    /// Render the complete HTML document.
    pub fn to_html(&self) -> Result<String, VizError> {
        if self.default_legend && self.title.is_none() {
            return Err(VizError::DefaultLegendNeedsTitle);
        }

        render_map_html(
            &self.map_config(),
            self.title.as_deref().unwrap_or("geoenrich map"),
            self.carto_vl_path.as_deref().unwrap_or(constants::CARTO_VL_PATH),
            self.mapbox_gl_path.as_deref().unwrap_or(constants::MAPBOX_GL_PATH),
            constants::MAPBOX_GL_CSS_PATH,
        )
    }

    /// Render and publish to the hosted viewer.
    pub fn publish(
        &self,
        publisher: &mut KuvizPublisher,
        name: &str,
        password: Option<&str>,
    ) -> Result<Kuviz, VizError> {
        let html = self.to_html()?;
        let kuviz = publisher.publish(&html, name, password)?;
        Ok(kuviz.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::source::Source;
    use serde_json::json;

    fn geojson_layer() -> Layer {
        Layer::new(Source::geojson(json!({"type": "Point", "coordinates": [0, 0]})))
    }

    #[test]
    fn test_size_unset_by_default() {
        let map = Map::new();
        assert!(map.size.is_none());
        assert!(map.to_html().is_ok());
    }

    #[test]
    fn test_bounds_corner_order() {
        let map = Map::new().with_bounds(Bounds {
            west: -10.0,
            east: 10.0,
            north: -10.0,
            south: 10.0,
        });
        assert_eq!(map.bounds.unwrap().corners(), [[-10.0, 10.0], [10.0, -10.0]]);
    }

    #[test]
    fn test_bounds_clamped_to_valid_ranges() {
        let bounds = Bounds {
            west: -1000.0,
            east: 1000.0,
            north: -1000.0,
            south: 1000.0,
        };
        assert_eq!(bounds.corners(), [[-180.0, 90.0], [180.0, -90.0]]);
    }

    #[test]
    fn test_default_legend_requires_title() {
        let map = Map::new().with_default_legend();
        assert!(matches!(map.to_html(), Err(VizError::DefaultLegendNeedsTitle)));

        let map = Map::new().with_default_legend().with_title("My map");
        assert!(map.to_html().is_ok());
    }

    #[test]
    fn test_layers_keep_draw_order() {
        let map = Map::new().add_layer(geojson_layer()).add_layer(
            Layer::new(Source::table("listings")),
        );

        let defs = map.layer_defs();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0]["type"], "GeoJSON");
        assert_eq!(defs[1]["type"], "Table");
    }

    #[test]
    fn test_html_uses_default_library_path() {
        let html = Map::new().add_layer(geojson_layer()).to_html().unwrap();
        assert!(html.contains(constants::CARTO_VL_PATH));
    }

    #[test]
    fn test_html_uses_custom_library_path() {
        let html = Map::new()
            .with_carto_vl_path("http://localhost:8080/carto-vl.js")
            .to_html()
            .unwrap();
        assert!(html.contains("http://localhost:8080/carto-vl.js"));
        assert!(!html.contains(constants::CARTO_VL_PATH));
    }
}
