//! Component registry.
//!
//! Only fenced blocks whose first annotation segment is registered here are
//! lifted into component nodes; every other block stays ordinary code.

use mds_config::ComponentsConfig;
use std::collections::BTreeSet;

/// The set of registered component names.
///
/// The registry is plain configuration: it is built once, cloned into a
/// [`crate::Parser`] and never mutated while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    names: BTreeSet<String>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the `[components]` config section.
    pub fn from_config(config: &ComponentsConfig) -> Self {
        config.registered.iter().cloned().collect()
    }

    /// Register a component name. Returns `false` if it was already present.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Builder-style registration.
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.register(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ComponentRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}
