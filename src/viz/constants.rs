//! Rendering library locations and publication privacy values

/// Default CDN location of the map rendering library.
pub const CARTO_VL_PATH: &str = "https://libs.cartocdn.com/carto-vl/v1.4/carto-vl.min.js";

/// Default CDN locations of the base map library.
pub const MAPBOX_GL_PATH: &str = "https://api.tiles.mapbox.com/mapbox-gl-js/v1.5.0/mapbox-gl.js";
pub const MAPBOX_GL_CSS_PATH: &str =
    "https://api.tiles.mapbox.com/mapbox-gl-js/v1.5.0/mapbox-gl.css";

/// Publication privacy values accepted by the hosted viewer.
pub const PRIVACY_PUBLIC: &str = "public";
pub const PRIVACY_PASSWORD: &str = "password";
