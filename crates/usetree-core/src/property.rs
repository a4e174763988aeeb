//! Boundary properties attached to classified modules.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Directive name for client-only modules (`"use client"`).
pub const CLIENT: &str = "client";

/// Directive name for server-only modules (`"use server"`).
pub const SERVER: &str = "server";

/// The boundary property of a module.
///
/// Exactly one property is attached to a node when it is classified. A
/// vendored module is matched structurally from its path and its contents
/// are never inspected; a directive is detected from the leading string
/// literal of the file; anything else is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// External/vendored module (path contains the vendor marker segment).
    Vendored,
    /// Module declares `"use <name>"`.
    Directive(CompactString),
    /// No directive declared.
    #[default]
    None,
}

impl Property {
    /// Create a directive property for the given name.
    pub fn directive(name: impl Into<CompactString>) -> Self {
        Self::Directive(name.into())
    }

    /// The `"use client"` property.
    pub fn client() -> Self {
        Self::directive(CLIENT)
    }

    /// The `"use server"` property.
    pub fn server() -> Self {
        Self::directive(SERVER)
    }

    /// Check if this is the vendored tag.
    pub fn is_vendored(&self) -> bool {
        matches!(self, Property::Vendored)
    }

    /// Check if no directive was declared.
    pub fn is_none(&self) -> bool {
        matches!(self, Property::None)
    }

    /// Directive name, if this is a directive property.
    pub fn directive_name(&self) -> Option<&str> {
        match self {
            Property::Directive(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Combine a module's own property with the one inherited from its importer.
    ///
    /// A declared directive always wins; absence of a directive passes the
    /// inherited property through unchanged.
    pub fn inherit(self, inherited: &Property) -> Property {
        match self {
            Property::None => inherited.clone(),
            own => own,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Vendored => f.write_str("vendored"),
            Property::Directive(name) => write!(f, "use {name}"),
            Property::None => f.write_str("none"),
        }
    }
}
