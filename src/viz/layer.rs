//! Map layers
//!
//! A layer pairs a source with its style, legend, and popup configuration
//! and compiles to a JSON layer definition. Popup attribute references are
//! aliased to short content-hashed names so the rendering library can use
//! them as identifiers.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::{json, Value};

use crate::credentials::Credentials;
use super::source::Source;

/// One popup attribute: the expression to show and an optional title.
#[derive(Debug, Clone)]
pub struct PopupAttr {
    pub value: String,
    pub title: Option<String>,
}

impl PopupAttr {
    pub fn new(value: impl Into<String>) -> Self {
        PopupAttr {
            value: value.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Popup configuration: attributes shown on click and on hover.
#[derive(Debug, Clone, Default)]
pub struct Popup {
    pub click: Vec<PopupAttr>,
    pub hover: Vec<PopupAttr>,
}

impl Popup {
    pub fn on_click(mut self, attrs: Vec<PopupAttr>) -> Self {
        self.click = attrs;
        self
    }

    pub fn on_hover(mut self, attrs: Vec<PopupAttr>) -> Self {
        self.hover = attrs;
        self
    }
}

/// A styled, optionally interactive map layer.
#[derive(Debug, Clone)]
pub struct Layer {
    pub source: Source,
    pub style: Option<String>,
    pub legend: Option<Value>,
    pub popup: Option<Popup>,
}

impl Layer {
    pub fn new(source: Source) -> Self {
        Layer {
            source,
            style: None,
            legend: None,
            popup: None,
        }
    }

    /// Style string in the rendering library's viz language.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_legend(mut self, legend: Value) -> Self {
        self.legend = Some(legend);
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Compile to the JSON definition embedded in the map configuration.
    pub fn layer_def(&self, credentials: Option<&Credentials>) -> Value {
        let credentials_json = match credentials {
            Some(creds) => json!({
                "username": creds.username,
                "api_key": creds.api_key,
                "base_url": creds.base_url(),
            }),
            None => json!({"username": "public", "api_key": "default_public"}),
        };

        json!({
            "type": self.source.source_type(),
            "query": self.source.read_query(),
            "viz": self.style.clone().unwrap_or_default(),
            "legend": self.legend.clone().unwrap_or_else(|| json!({})),
            "interactivity": self.interactivity(),
            "credentials": credentials_json,
        })
    }

    /// Popup config as interactivity events. An empty popup gives an empty
    /// list, not a default event.
    fn interactivity(&self) -> Vec<Value> {
        let Some(popup) = &self.popup else {
            return vec![];
        };

        let mut events = Vec::new();
        for (event, attrs) in [("click", &popup.click), ("hover", &popup.hover)] {
            if attrs.is_empty() {
                continue;
            }
            let attrs_json: Vec<Value> = attrs
                .iter()
                .map(|attr| {
                    json!({
                        "name": variable_name(&attr.value),
                        "title": attr.title.clone().unwrap_or_else(|| attr.value.clone()),
                    })
                })
                .collect();
            events.push(json!({"event": event, "attrs": attrs_json}));
        }
        events
    }
}

/// Short identifier-safe alias for a popup expression, stable across runs.
fn variable_name(value: &str) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    format!("v{:06x}", hasher.finish() & 0xffffff)
}
