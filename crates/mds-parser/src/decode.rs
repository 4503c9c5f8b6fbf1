//! Data block decoding.

use log::warn;
use mds_core::{MdsError, MetaValue, Metadata, Result};

/// Decode a data block body into a metadata map.
///
/// Only a mapping contributes keys; an empty body or any other value decodes
/// to `None`. Invalid YAML is an error. `header` names the block in
/// diagnostics.
pub fn decode_mapping(body: &str, header: &str) -> Result<Option<Metadata>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(body).map_err(|source| MdsError::Decode {
            header: header.to_string(),
            source,
        })?;

    match MetaValue::from(value) {
        MetaValue::Mapping(map) => Ok(Some(map)),
        MetaValue::Null => Ok(None),
        other => {
            warn!(
                "`{}` block holds {}, not a mapping; ignoring it",
                header,
                other.kind()
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        let map = decode_mapping("title: Intro\ncount: 3", "yaml @")
            .unwrap()
            .unwrap();
        assert_eq!(map["title"], "Intro");
        assert_eq!(map["count"], 3i64);
    }

    #[test]
    fn test_empty_and_null_bodies() {
        assert!(decode_mapping("", "yaml @").unwrap().is_none());
        assert!(decode_mapping("  \n", "yaml @").unwrap().is_none());
        assert!(decode_mapping("~", "yaml @").unwrap().is_none());
    }

    #[test]
    fn test_non_mapping_contributes_nothing() {
        assert!(decode_mapping("42", "yaml @").unwrap().is_none());
        assert!(decode_mapping("- a\n- b", "yaml @@").unwrap().is_none());
        assert!(decode_mapping("just text", "data @").unwrap().is_none());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let err = decode_mapping("key: [unclosed", "yaml @").unwrap_err();
        assert!(matches!(err, MdsError::Decode { .. }));
    }
}
