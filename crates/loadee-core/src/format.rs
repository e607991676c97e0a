// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Source formats and the static-text decoders

use crate::error::{ErrorKind, LoaderError};
use crate::path;
use serde_json::Value;
use std::path::Path;

/// Source format selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json` or no extension
    Json,
    /// `.js` / `.mjs` / `.cjs`
    Script,
}

impl Format {
    /// Detect the format from a path's lower-cased extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path::extension(path).as_deref() {
            Some("yaml") | Some("yml") => Some(Format::Yaml),
            Some("json") | None => Some(Format::Json),
            Some("js") | Some("mjs") | Some("cjs") => Some(Format::Script),
            Some(_) => None,
        }
    }

    /// Detect the format, failing with `FILE_NOT_SUPPORTED`
    pub fn detect(path: &Path) -> Result<Self, LoaderError> {
        Self::from_path(path).ok_or_else(|| LoaderError::not_supported(path))
    }
}

/// Parse YAML text
///
/// Merge keys (`<<: *anchor`) are applied. `.nan` and `.inf` have no JSON
/// form and are rejected.
pub fn decode_yaml(text: &str) -> Result<Value, LoaderError> {
    // Going through serde_yaml's own Value rejects duplicate mapping keys
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(yaml_error)?;
    yaml.apply_merge().map_err(yaml_error)?;
    reject_non_finite(&yaml)?;
    serde_json::to_value(yaml).map_err(|e| LoaderError::new(ErrorKind::YamlLoad, e.to_string()))
}

fn yaml_error(err: serde_yaml::Error) -> LoaderError {
    LoaderError::new(ErrorKind::YamlLoad, err.to_string())
}

fn reject_non_finite(yaml: &serde_yaml::Value) -> Result<(), LoaderError> {
    match yaml {
        serde_yaml::Value::Number(n) if n.is_nan() || n.is_infinite() => Err(LoaderError::new(
            ErrorKind::YamlLoad,
            format!("non-finite number {} cannot be represented", n),
        )),
        serde_yaml::Value::Sequence(items) => items.iter().try_for_each(reject_non_finite),
        serde_yaml::Value::Mapping(map) => map.values().try_for_each(reject_non_finite),
        serde_yaml::Value::Tagged(tagged) => reject_non_finite(&tagged.value),
        _ => Ok(()),
    }
}

/// Parse JSON text
pub fn decode_json(text: &str) -> Result<Value, LoaderError> {
    serde_json::from_str(text).map_err(|e| LoaderError::new(ErrorKind::JsonLoad, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect() {
        assert_eq!(Format::from_path(Path::new("/a/b.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("/a/b.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("/a/b.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("/a/.data")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("/a/b.cjs")), Some(Format::Script));
        assert_eq!(Format::from_path(Path::new("/a/b.toml")), None);
    }

    #[test]
    fn test_detect_unsupported() {
        let err = Format::detect(Path::new("/a/data.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotSupported);
        assert!(err.message().starts_with("Unsupported file format: "));
    }

    #[test]
    fn test_decode_yaml() {
        let value = decode_yaml("- name: John Doe\n  subscription: Standard\n").unwrap();
        assert_eq!(value, json!([{"name": "John Doe", "subscription": "Standard"}]));
    }

    #[test]
    fn test_decode_yaml_error_has_location() {
        let err = decode_yaml("key: [unclosed\nother: 1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::YamlLoad);
        assert!(err.message().contains("line"));
    }

    #[test]
    fn test_decode_yaml_duplicate_key() {
        let err = decode_yaml("a: 1\na: 2\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::YamlLoad);
    }

    #[test]
    fn test_decode_yaml_merge_keys() {
        let value = decode_yaml("base: &b\n  port: 80\nsite:\n  <<: *b\n  host: x\n").unwrap();
        assert_eq!(value["site"], json!({"port": 80, "host": "x"}));
    }

    #[test]
    fn test_decode_yaml_non_finite_rejected() {
        for text in ["a: .nan\n", "b: [1, .inf]\n", "c:\n  d: -.inf\n"] {
            let err = decode_yaml(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::YamlLoad, "{text}");
        }
        assert_eq!(decode_yaml("a: 1.5\n").unwrap(), json!({"a": 1.5}));
    }

    #[test]
    fn test_decode_json_error() {
        let err = decode_json("{ not json }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::JsonLoad);
    }
}
