// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Script module system
//!
//! The loader never executes scripts itself. It hands the canonical path to a
//! [`ModuleHost`] and receives the module's bindings as an [`ExportRecord`].
//!
//! ## Module styles
//! - ES modules expose their value as the `default` export
//! - CommonJS modules expose it through `module.exports`
//! - `.mjs` is always ESM, `.cjs` always CommonJS, `.js` is declared per module

mod exports;
mod registry;

pub use exports::ExportShape;
pub use registry::{ModuleDefinition, ModuleRegistry, ModuleSource};

use crate::error::ModuleError;
use crate::path;
use crate::value::LoadedValue;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Binding name of the primary (ESM) export slot
pub const PRIMARY_EXPORT: &str = "default";

/// Binding name of the legacy (CommonJS) export slot
pub const LEGACY_EXPORT: &str = "module";

/// Module convention a script is authored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStyle {
    /// ECMAScript module (import/export)
    Esm,
    /// CommonJS module (require/module.exports)
    CommonJs,
}

impl ModuleStyle {
    /// Style forced by the file extension, if any
    pub fn from_path(path: &Path) -> Option<Self> {
        match path::extension(path).as_deref() {
            Some("mjs") => Some(ModuleStyle::Esm),
            Some("cjs") => Some(ModuleStyle::CommonJs),
            _ => None,
        }
    }

    /// Effective style of a file whose definition declares `declared`
    pub fn resolve(path: &Path, declared: ModuleStyle) -> Self {
        Self::from_path(path).unwrap_or(declared)
    }
}

/// Bindings exported by one evaluation of a script module
///
/// A binding mapped to `None` exists but holds no value.
#[derive(Debug, Default)]
pub struct ExportRecord {
    bindings: HashMap<String, Option<LoadedValue>>,
}

impl ExportRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with only a primary export
    pub fn default_export(value: impl Into<LoadedValue>) -> Self {
        Self::new().with(PRIMARY_EXPORT, value)
    }

    /// Record with only a legacy `module.exports` value
    pub fn module_exports(value: impl Into<LoadedValue>) -> Self {
        Self::new().with(LEGACY_EXPORT, value)
    }

    /// Add a binding
    pub fn with(mut self, name: impl Into<String>, value: impl Into<LoadedValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a binding that holds no value
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), None);
        self
    }

    /// Set a binding
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<LoadedValue>) {
        self.bindings.insert(name.into(), Some(value.into()));
    }

    /// Check if a binding is declared
    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Remove a binding; the outer `Option` tells whether it was declared
    pub fn take(&mut self, name: &str) -> Option<Option<LoadedValue>> {
        self.bindings.remove(name)
    }

    /// Names of all declared bindings
    pub fn names(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }

    /// Number of declared bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the record has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Executes script files and returns their bindings
#[async_trait]
pub trait ModuleHost: Send + Sync {
    /// Load a module the way dynamic `import()` does
    async fn import(&self, path: &Path) -> Result<ExportRecord, ModuleError>;

    /// Load a module the way `require()` does; never suspends
    fn require(&self, path: &Path) -> Result<ExportRecord, ModuleError>;
}

#[async_trait]
impl<H: ModuleHost + ?Sized> ModuleHost for Arc<H> {
    async fn import(&self, path: &Path) -> Result<ExportRecord, ModuleError> {
        (**self).import(path).await
    }

    fn require(&self, path: &Path) -> Result<ExportRecord, ModuleError> {
        (**self).require(path)
    }
}
