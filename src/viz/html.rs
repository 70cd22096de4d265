//! HTML bundle rendering
//!
//! The map document is a single self-contained HTML page: library script
//! tags plus the serialized map configuration. Rendering resolves the
//! placeholder tokens in the embedded template.

use serde_json::Value;

use super::error::VizError;

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>__TITLE__</title>
  <link rel="stylesheet" href="__MAPBOX_GL_CSS_PATH__">
  <script src="__MAPBOX_GL_PATH__"></script>
  <script src="__CARTO_VL_PATH__"></script>
  <style>
    body { margin: 0; padding: 0; }
    #map { position: absolute; width: 100%; height: 100%; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const config = __MAP_CONFIG__;

    const map = new mapboxgl.Map({
      container: 'map',
      style: carto.basemaps.voyager,
      dragRotate: false
    });

    if (config.bounds) {
      map.fitBounds(config.bounds, { animate: false, padding: 10 });
    }

    config.layers.forEach((layerDef, index) => {
      let source;
      if (layerDef.type === 'GeoJSON') {
        source = new carto.source.GeoJSON(JSON.parse(layerDef.query));
      } else {
        carto.setDefaultAuth({
          username: layerDef.credentials.username,
          apiKey: layerDef.credentials.api_key
        });
        source = new carto.source.SQL(layerDef.query);
      }
      const viz = new carto.Viz(layerDef.viz);
      const layer = new carto.Layer('layer' + index, source, viz);
      layer.addTo(map, 'watername_ocean');
    });
  </script>
</body>
</html>
"#;

/// Render the map configuration into the HTML template.
///
/// Library paths are parameters so development builds can point at local
/// bundles instead of the CDN.
pub fn render_map_html(
    config: &Value,
    title: &str,
    carto_vl_path: &str,
    mapbox_gl_path: &str,
    mapbox_gl_css_path: &str,
) -> Result<String, VizError> {
    let config_json = serde_json::to_string(config).map_err(|e| VizError::Serialize {
        detail: e.to_string(),
    })?;

    Ok(MAP_TEMPLATE
        .replace("__TITLE__", title)
        .replace("__CARTO_VL_PATH__", carto_vl_path)
        .replace("__MAPBOX_GL_PATH__", mapbox_gl_path)
        .replace("__MAPBOX_GL_CSS_PATH__", mapbox_gl_css_path)
        .replace("__MAP_CONFIG__", &config_json))
}
