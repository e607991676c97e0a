// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Shared fixtures for the loader integration tests
//!
//! Script fixtures under `tests/fixtures` are paired with Rust definitions
//! that behave the way their source text reads.

#![allow(dead_code)]

use loadee_core::{
    ExportRecord, LoadedValue, Loader, ModuleError, ModuleRegistry, ModuleStyle,
};
use serde_json::{Value, json};
use std::path::PathBuf;

/// Directory holding the fixture files
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Absolute path of a fixture
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// The data every fixture resolves to
pub fn users() -> Value {
    json!([
        { "name": "John Doe", "subscription": "Standard" },
        { "name": "Jane Smith", "subscription": "Free" }
    ])
}

fn users_thunk() -> LoadedValue {
    LoadedValue::function(|_| Ok(LoadedValue::data(users())))
}

fn async_users_thunk() -> LoadedValue {
    LoadedValue::function(|_| {
        Ok(LoadedValue::deferred(async {
            tokio::task::yield_now().await;
            Ok(LoadedValue::data(users()))
        }))
    })
}

fn syntax_error(path: &std::path::Path, message: &str) -> ModuleError {
    ModuleError::Syntax {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Registry defining every script fixture
pub fn registry() -> ModuleRegistry {
    ModuleRegistry::new()
        // ES modules
        .with_module(fixture("data.js"), ModuleStyle::Esm, |_| {
            Ok(ExportRecord::default_export(users_thunk()))
        })
        .with_module(fixture("data.async.js"), ModuleStyle::Esm, |_| {
            Ok(ExportRecord::default_export(async_users_thunk()))
        })
        .with_module(fixture("data.var.js"), ModuleStyle::Esm, |_| {
            Ok(ExportRecord::default_export(json!(42)))
        })
        .with_module(fixture("data.asyncvar.js"), ModuleStyle::Esm, |_| {
            Ok(ExportRecord::default_export(LoadedValue::deferred(async {
                Ok(LoadedValue::data(42))
            })))
        })
        .with_module(fixture("data.nodefault.js"), ModuleStyle::Esm, |_| {
            Ok(ExportRecord::new().with("config", json!({ "root": "src" })))
        })
        .with_module(fixture("invalid.js"), ModuleStyle::Esm, |module| {
            Err(syntax_error(&module.path, "Unexpected end of input"))
        })
        // CommonJS modules
        .with_module(fixture("cjs/data.cjs"), ModuleStyle::CommonJs, |_| {
            Ok(ExportRecord::module_exports(users_thunk()))
        })
        .with_module(fixture("cjs/data.async.cjs"), ModuleStyle::CommonJs, |_| {
            Ok(ExportRecord::module_exports(async_users_thunk()))
        })
        .with_module(fixture("cjs/data.var.cjs"), ModuleStyle::CommonJs, |_| {
            Ok(ExportRecord::module_exports(json!(42)))
        })
        .with_module(fixture("cjs/data.asyncvar.cjs"), ModuleStyle::CommonJs, |_| {
            Ok(ExportRecord::module_exports(LoadedValue::deferred(async {
                Ok(LoadedValue::data(42))
            })))
        })
        .with_module(fixture("cjs/data.nodefault.cjs"), ModuleStyle::CommonJs, |_| {
            Ok(ExportRecord::new().declare("module"))
        })
        .with_module(fixture("cjs/invalid.cjs"), ModuleStyle::CommonJs, |module| {
            Err(syntax_error(
                &module.path,
                "Unexpected token 'export'",
            ))
        })
}

/// Loader rooted at the fixtures directory with every script defined
pub fn loader() -> Loader {
    Loader::builder()
        .base_dir(fixtures_dir())
        .host(registry())
        .build()
}
