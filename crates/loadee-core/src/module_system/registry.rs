// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! In-process module host
//!
//! Modules are defined by Rust closures registered under the canonical path of
//! their script file. Loading still goes through the file: a missing file
//! fails like a missing module, and the source text is handed to the closure.
//! Nothing is cached, every load evaluates the module again.

use super::{ExportRecord, ModuleHost, ModuleStyle};
use crate::error::ModuleError;
use crate::path;
use async_trait::async_trait;
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Evaluator = dyn Fn(&ModuleSource) -> Result<ExportRecord, ModuleError> + Send + Sync;

/// What a module definition sees when it is evaluated
#[derive(Debug, Clone)]
pub struct ModuleSource {
    /// Canonical path of the script file
    pub path: PathBuf,
    /// Source text of the script file
    pub source: String,
    /// Effective module style
    pub style: ModuleStyle,
}

/// A registered module
#[derive(Clone)]
pub struct ModuleDefinition {
    style: ModuleStyle,
    evaluate: Arc<Evaluator>,
}

impl ModuleDefinition {
    /// Create a definition
    pub fn new<F>(style: ModuleStyle, evaluate: F) -> Self
    where
        F: Fn(&ModuleSource) -> Result<ExportRecord, ModuleError> + Send + Sync + 'static,
    {
        Self {
            style,
            evaluate: Arc::new(evaluate),
        }
    }

    /// Declared module style
    pub fn style(&self) -> ModuleStyle {
        self.style
    }
}

impl std::fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

/// Thread-safe registry of module definitions
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    /// Definitions by canonical path
    modules: DashMap<PathBuf, ModuleDefinition>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module for a script file
    ///
    /// A relative `file` is taken relative to the process working directory.
    pub fn define<F>(&self, file: impl AsRef<Path>, style: ModuleStyle, evaluate: F)
    where
        F: Fn(&ModuleSource) -> Result<ExportRecord, ModuleError> + Send + Sync + 'static,
    {
        let key = path::absolutize(file.as_ref());
        tracing::debug!("defining {:?} module {}", style, key.display());
        self.modules.insert(key, ModuleDefinition::new(style, evaluate));
    }

    /// Builder-style [`ModuleRegistry::define`]
    pub fn with_module<F>(self, file: impl AsRef<Path>, style: ModuleStyle, evaluate: F) -> Self
    where
        F: Fn(&ModuleSource) -> Result<ExportRecord, ModuleError> + Send + Sync + 'static,
    {
        self.define(file, style, evaluate);
        self
    }

    /// Remove a module definition
    pub fn remove(&self, file: impl AsRef<Path>) -> Option<ModuleDefinition> {
        self.modules
            .remove(&path::absolutize(file.as_ref()))
            .map(|(_, definition)| definition)
    }

    /// Check if a module is defined for a file
    pub fn is_defined(&self, file: impl AsRef<Path>) -> bool {
        self.modules.contains_key(&path::absolutize(file.as_ref()))
    }

    /// Get the number of defined modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if no modules are defined
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn definition(&self, path: &Path) -> Result<ModuleDefinition, ModuleError> {
        // Cloned out so the evaluator never runs under a map guard
        self.modules
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ModuleError::Unregistered(path.to_path_buf()))
    }

    fn evaluate(
        &self,
        path: &Path,
        source: String,
        definition: &ModuleDefinition,
    ) -> Result<ExportRecord, ModuleError> {
        let style = ModuleStyle::resolve(path, definition.style);
        tracing::debug!("evaluating {:?} module {}", style, path.display());

        (definition.evaluate)(&ModuleSource {
            path: path.to_path_buf(),
            source,
            style,
        })
    }
}

#[async_trait]
impl ModuleHost for ModuleRegistry {
    async fn import(&self, path: &Path) -> Result<ExportRecord, ModuleError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| source_error(path, e))?;
        let definition = self.definition(path)?;
        self.evaluate(path, source, &definition)
    }

    fn require(&self, path: &Path) -> Result<ExportRecord, ModuleError> {
        let source = std::fs::read_to_string(path).map_err(|e| source_error(path, e))?;
        let definition = self.definition(path)?;

        if ModuleStyle::resolve(path, definition.style) == ModuleStyle::Esm {
            return Err(ModuleError::RequireEsm(path.to_path_buf()));
        }
        self.evaluate(path, source, &definition)
    }
}

fn source_error(path: &Path, err: io::Error) -> ModuleError {
    if err.kind() == io::ErrorKind::NotFound {
        ModuleError::NotFound(path.to_path_buf())
    } else {
        ModuleError::Io(err)
    }
}
