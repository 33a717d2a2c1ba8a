use std::fmt;

use serde_json::{Map, Value};
use session_sdk::Navigator;
use tracing::debug;
use url::form_urlencoded;

use super::FilterError;
use super::properties::{PropertyValue, parse_properties, toggle_property};

/// Called with the link's `(property, value)` when it is activated.
pub type LinkCallback = Box<dyn Fn(&str, &PropertyValue) + Send + Sync>;

const PROPERTIES_FIELD: &str = "properties";

/// A link that toggles one equality predicate in the current filters.
pub struct FilterPropertyLink {
    url: String,
    property: String,
    value: PropertyValue,
    on_click: Option<LinkCallback>,
}

impl fmt::Debug for FilterPropertyLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPropertyLink")
            .field("url", &self.url)
            .field("property", &self.property)
            .field("value", &self.value)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl FilterPropertyLink {
    /// Build the link for `property = value` on top of `filters`.
    ///
    /// The target keeps every other filter field and only replaces
    /// `properties` with the toggled list. It points at `current_path`;
    /// any query already on that path is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the existing `properties` member cannot
    /// be normalized into a predicate list.
    pub fn build(
        current_path: &str,
        filters: &Map<String, Value>,
        property: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<Self, FilterError> {
        let property = property.into();
        let value = value.into();

        let current = match filters.get(PROPERTIES_FIELD) {
            Some(raw) => parse_properties(raw)?,
            None => Vec::new(),
        };
        let toggled = toggle_property(&current, &property, &value.to_json());

        let mut next = filters.clone();
        next.insert(PROPERTIES_FIELD.to_owned(), serde_json::to_value(toggled)?);

        Ok(Self {
            url: combine_url(current_path, &next),
            property,
            value,
            on_click: None,
        })
    }

    #[must_use]
    pub fn with_on_click(
        mut self,
        callback: impl Fn(&str, &PropertyValue) + Send + Sync + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Text shown for the link.
    #[must_use]
    pub fn label(&self) -> String {
        self.value.to_string()
    }

    /// Follow the link, then notify the caller.
    pub fn activate(&self, navigator: &dyn Navigator) {
        debug!(property = %self.property, url = %self.url, "filter link activated");
        navigator.push(&self.url);
        if let Some(callback) = &self.on_click {
            callback(&self.property, &self.value);
        }
    }
}

/// Append `params` to `path` as a query string.
///
/// Strings are written as is, other values as compact JSON; null fields are
/// left out.
#[must_use]
pub fn combine_url(path: &str, params: &Map<String, Value>) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        match value {
            Value::Null => {}
            Value::String(text) => {
                query.append_pair(name, text);
            }
            other => {
                query.append_pair(name, &other.to_string());
            }
        }
    }
    let query = query.finish();

    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}
