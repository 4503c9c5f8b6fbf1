//! Registered component configuration.

use serde::{Deserialize, Serialize};

/// Names of the components whose fenced blocks are lifted into component
/// nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComponentsConfig {
    /// Registered component names.
    /// Default: none
    #[serde(default)]
    pub registered: Vec<String>,
}

impl ComponentsConfig {
    /// Merge another ComponentsConfig into this one.
    ///
    /// Registrations accumulate: names from `other` are appended unless
    /// already present.
    pub fn merge(&mut self, other: &ComponentsConfig) {
        for name in &other.registered {
            if !self.registered.contains(name) {
                self.registered.push(name.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_a_union() {
        let mut base = ComponentsConfig {
            registered: vec!["quiz".to_string()],
        };
        let other = ComponentsConfig {
            registered: vec!["card".to_string(), "quiz".to_string()],
        };
        base.merge(&other);
        assert_eq!(base.registered, vec!["quiz", "card"]);
    }

    #[test]
    fn test_parse() {
        let config: ComponentsConfig = toml::from_str(r#"Registered = ["card"]"#).unwrap();
        assert_eq!(config.registered, vec!["card"]);
    }
}
