//! Map assembly and publication
//!
//! A `Map` is declarative: sources and layers are plain values that compile
//! to a JSON configuration for the browser-side rendering library, embedded
//! in a self-contained HTML document. `KuvizPublisher` pushes that document
//! to the hosted viewer.

pub mod constants;
mod error;
mod html;
mod kuviz;
mod layer;
mod map;
mod source;

pub use error::{PublishError, VizError};
pub use html::render_map_html;
pub use kuviz::{Kuviz, KuvizPublisher};
pub use layer::{Layer, Popup, PopupAttr};
pub use map::{Bounds, Map};
pub use source::Source;
