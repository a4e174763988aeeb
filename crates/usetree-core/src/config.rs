//! Classification and rendering configuration.

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::property::{CLIENT, Property, SERVER};

/// Configuration for classifying an import graph.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ClassifyConfig {
    /// Declarable directive names in priority order (`"use <name>"`).
    #[builder(default = "default_directives()")]
    #[serde(default = "default_directives")]
    pub directives: Vec<CompactString>,

    /// Path segment marking vendored modules that are never read.
    #[builder(default = "default_vendor_marker()")]
    #[serde(default = "default_vendor_marker")]
    pub vendor_marker: CompactString,

    /// Maximum import depth to descend (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Number of threads for classification (0 = global rayon pool).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_directives() -> Vec<CompactString> {
    vec![CompactString::const_new(CLIENT), CompactString::const_new(SERVER)]
}

fn default_vendor_marker() -> CompactString {
    CompactString::const_new("node_modules")
}

impl ClassifyConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref directives) = self.directives {
            validate_directives(directives)?;
        }
        if let Some(ref marker) = self.vendor_marker {
            if marker.is_empty() {
                return Err("Vendor marker cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

fn validate_directives(directives: &[CompactString]) -> Result<(), String> {
    if directives.is_empty() {
        return Err("At least one directive is required".to_string());
    }
    for (i, name) in directives.iter().enumerate() {
        if name.trim().is_empty() {
            return Err("Directive names cannot be empty".to_string());
        }
        if name.contains(['"', '\'']) {
            return Err(format!("Directive name cannot contain quotes: {name}"));
        }
        if directives[..i].contains(name) {
            return Err(format!("Duplicate directive: {name}"));
        }
    }
    Ok(())
}

impl ClassifyConfig {
    /// Create a new config builder.
    pub fn builder() -> ClassifyConfigBuilder {
        ClassifyConfigBuilder::default()
    }

    /// Re-check a config that was deserialized or edited in place.
    pub fn validate(&self) -> Result<(), String> {
        validate_directives(&self.directives)?;
        if self.vendor_marker.is_empty() {
            return Err("Vendor marker cannot be empty".to_string());
        }
        Ok(())
    }

    /// Check if a path component names the vendor directory.
    pub fn is_vendor_segment(&self, segment: &str) -> bool {
        segment == self.vendor_marker
    }
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            directives: default_directives(),
            vendor_marker: default_vendor_marker(),
            max_depth: None,
            threads: 0,
        }
    }
}

/// Configuration for rendering a classified tree as text.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RenderConfig {
    /// Property flagged with the marker.
    #[builder(default = "Property::client()")]
    #[serde(default = "Property::client")]
    pub highlighted: Property,

    /// Extra indentation per depth level.
    #[builder(default = "2")]
    #[serde(default = "default_indent_step")]
    pub indent_step: usize,

    /// Two-character marker printed before highlighted rows.
    #[builder(default = "default_marker()")]
    #[serde(default = "default_marker")]
    pub marker: CompactString,
}

fn default_indent_step() -> usize {
    2
}

fn default_marker() -> CompactString {
    CompactString::const_new("| ")
}

impl RenderConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref marker) = self.marker {
            if marker.chars().count() != 2 {
                return Err(format!("Marker must be two characters wide: {marker:?}"));
            }
        }
        if let Some(Property::Vendored) = self.highlighted {
            return Err("Vendored modules are never rendered and cannot be highlighted".to_string());
        }
        Ok(())
    }
}

impl RenderConfig {
    /// Create a new config builder.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Blank marker of the same width, printed before other rows.
    pub fn blank_marker(&self) -> String {
        " ".repeat(self.marker.chars().count())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            highlighted: Property::client(),
            indent_step: default_indent_step(),
            marker: default_marker(),
        }
    }
}
