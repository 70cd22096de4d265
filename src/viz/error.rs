//! Viz error types

use std::fmt;

/// Errors that can occur assembling or rendering a map
#[derive(Debug)]
pub enum VizError {
    /// `default_legend` was requested but the map has no title to show in it
    DefaultLegendNeedsTitle,
    /// A source or layer definition could not be serialized
    Serialize { detail: String },
    /// Publication failed
    Publish { source: PublishError },
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultLegendNeedsTitle => {
                write!(f, "The default legend needs a map title to be displayed")
            }
            Self::Serialize { detail } => write!(f, "Cannot serialize map definition: {}", detail),
            Self::Publish { source } => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Publish { source } => Some(source),
            _ => None,
        }
    }
}

impl From<PublishError> for VizError {
    fn from(err: PublishError) -> Self {
        VizError::Publish { source: err }
    }
}

/// Errors that can occur talking to the hosted viewer
#[derive(Debug)]
pub enum PublishError {
    /// update/delete called with nothing published yet
    NotPublished,
    /// Transport failure
    Http { source: reqwest::Error },
    /// The viewer API rejected the request
    Api { status: u16, message: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPublished => {
                write!(f, "Nothing is published yet; call publish first")
            }
            Self::Http { source } => write!(f, "Publication request failed: {}", source),
            Self::Api { status, message } => {
                write!(f, "The viewer API rejected the request ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Http { source: err }
    }
}
