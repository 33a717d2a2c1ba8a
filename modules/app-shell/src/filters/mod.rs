//! Property filters and the links that toggle them.

mod link;
mod properties;

pub use link::{FilterPropertyLink, LinkCallback, combine_url};
pub use properties::{PropertyFilter, PropertyValue, parse_properties, toggle_property};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("malformed properties: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("properties must be a list or an object, got {0}")]
    UnsupportedShape(&'static str),
}
