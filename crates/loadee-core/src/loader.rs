// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader - resolves a path to data or a live value

use crate::cache::{CacheEntry, ContentCache};
use crate::config::LoaderConfig;
use crate::error::{Error, ErrorKind, LoaderError, ModuleError, Result};
use crate::format::{self, Format};
use crate::module_system::{ExportShape, ModuleHost, ModuleRegistry};
use crate::path::{self, PathLike};
use crate::resolver;
use crate::value::LoadedValue;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads YAML, JSON and script-module files
///
/// Holds the default base directory, the content cache and the module host.
/// A `Loader` is `Send + Sync`; share it through an `Arc`.
pub struct Loader {
    /// Directory relative paths resolve against
    base_dir: RwLock<PathBuf>,
    /// Content cache for YAML and JSON files
    cache: Arc<ContentCache>,
    /// Executes script modules
    host: Arc<dyn ModuleHost>,
}

impl Loader {
    /// Create a loader rooted at the process working directory
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start building a loader
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    /// Create a loader from configuration
    pub fn from_config(config: &LoaderConfig) -> Self {
        let mut builder = Self::builder();
        if let Some(dir) = &config.base_dir {
            builder = builder.base_dir(dir);
        }
        builder.build()
    }

    /// The default base directory
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.read().clone()
    }

    /// Set the default base directory from a path or `file:` URL
    ///
    /// When the target is a file, its parent directory is used. Relative
    /// paths are taken relative to the process working directory.
    pub fn set_base_dir(&self, target: impl Into<PathLike>) -> Result<PathBuf> {
        let target = target.into().to_path(&path::absolutize(Path::new(".")))?;
        let metadata =
            std::fs::metadata(&target).map_err(|e| LoaderError::file_system(&target, &e))?;

        let dir = if metadata.is_dir() {
            target
        } else {
            target.parent().map(Path::to_path_buf).unwrap_or(target)
        };

        tracing::debug!("base directory set to {}", dir.display());
        *self.base_dir.write() = dir.clone();
        Ok(dir)
    }

    /// The content cache
    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Cached content of a canonical path, if any
    pub fn cache_entry(&self, path: impl AsRef<Path>) -> Option<CacheEntry> {
        self.cache.get(path.as_ref())
    }

    /// The module host
    pub fn host(&self) -> &Arc<dyn ModuleHost> {
        &self.host
    }

    /// Resolve a path-like value against the default base directory
    pub fn canonical_path(&self, path: impl Into<PathLike>) -> Result<PathBuf> {
        path.into().to_path(&self.base_dir.read())
    }

    fn canonical_from(&self, base_dir: &Path, path: PathLike) -> Result<PathBuf> {
        path.to_path(&path::absolutize(base_dir))
    }

    /// Read a file's text through the content cache
    pub async fn read(&self, path: impl Into<PathLike>) -> Result<Arc<str>> {
        let path = self.canonical_path(path)?;
        Ok(self.cache.read(&path).await?)
    }

    /// Blocking variant of [`Loader::read`]
    pub fn read_sync(&self, path: impl Into<PathLike>) -> Result<Arc<str>> {
        let path = self.canonical_path(path)?;
        Ok(self.cache.read_sync(&path)?)
    }

    /// Read and parse a file as YAML, whatever its extension
    pub async fn load_yaml(&self, path: impl Into<PathLike>) -> Result<Value> {
        let path = self.canonical_path(path)?;
        Ok(format::decode_yaml(&self.cache.read(&path).await?)?)
    }

    /// Blocking variant of [`Loader::load_yaml`]
    pub fn load_yaml_sync(&self, path: impl Into<PathLike>) -> Result<Value> {
        let path = self.canonical_path(path)?;
        Ok(format::decode_yaml(&self.cache.read_sync(&path)?)?)
    }

    /// Read and parse a file as JSON, whatever its extension
    pub async fn load_json(&self, path: impl Into<PathLike>) -> Result<Value> {
        let path = self.canonical_path(path)?;
        Ok(format::decode_json(&self.cache.read(&path).await?)?)
    }

    /// Blocking variant of [`Loader::load_json`]
    pub fn load_json_sync(&self, path: impl Into<PathLike>) -> Result<Value> {
        let path = self.canonical_path(path)?;
        Ok(format::decode_json(&self.cache.read_sync(&path)?)?)
    }

    /// Import a script module and return its export un-resolved
    pub async fn load_script(&self, path: impl Into<PathLike>) -> Result<LoadedValue> {
        let path = self.canonical_path(path)?;
        self.import(&path).await
    }

    /// Require a script module and return its export un-resolved
    pub fn load_script_sync(&self, path: impl Into<PathLike>) -> Result<LoadedValue> {
        let path = self.canonical_path(path)?;
        self.require(&path)
    }

    /// Decode a file by extension without resolving the result
    pub async fn load(&self, path: impl Into<PathLike>) -> Result<LoadedValue> {
        let path = self.canonical_path(path)?;
        self.decode(&path).await
    }

    /// Blocking variant of [`Loader::load`]
    pub fn load_sync(&self, path: impl Into<PathLike>) -> Result<LoadedValue> {
        let path = self.canonical_path(path)?;
        self.decode_sync(&path)
    }

    /// Load a file and resolve its value
    ///
    /// Callables are invoked with `args`, deferred values are awaited. The
    /// returned value is never [`LoadedValue::Deferred`].
    pub async fn load_file(
        &self,
        path: impl Into<PathLike>,
        args: &[Value],
    ) -> Result<LoadedValue> {
        let path = self.canonical_path(path)?;
        self.load_canonical(&path, args).await
    }

    /// [`Loader::load_file`] with an explicit base directory
    pub async fn load_file_from(
        &self,
        base_dir: impl AsRef<Path>,
        path: impl Into<PathLike>,
        args: &[Value],
    ) -> Result<LoadedValue> {
        let path = self.canonical_from(base_dir.as_ref(), path.into())?;
        self.load_canonical(&path, args).await
    }

    /// Load a file and resolve its value without suspending
    ///
    /// Script files are always required as CommonJS; an ES module fails with
    /// the host's `ERR_REQUIRE_ESM` error. A deferred value is returned still
    /// pending, see [`LoadedValue::settle`].
    pub fn load_file_sync(&self, path: impl Into<PathLike>, args: &[Value]) -> Result<LoadedValue> {
        let path = self.canonical_path(path)?;
        self.load_canonical_sync(&path, args)
    }

    /// [`Loader::load_file_sync`] with an explicit base directory
    pub fn load_file_sync_from(
        &self,
        base_dir: impl AsRef<Path>,
        path: impl Into<PathLike>,
        args: &[Value],
    ) -> Result<LoadedValue> {
        let path = self.canonical_from(base_dir.as_ref(), path.into())?;
        self.load_canonical_sync(&path, args)
    }

    /// Load a file, resolve it and deserialize the data
    pub async fn load_data<T: DeserializeOwned>(
        &self,
        path: impl Into<PathLike>,
        args: &[Value],
    ) -> Result<T> {
        let path = self.canonical_path(path)?;
        let value = self.load_canonical(&path, args).await?;
        into_typed(&path, value)
    }

    /// Blocking variant of [`Loader::load_data`]
    pub fn load_data_sync<T: DeserializeOwned>(
        &self,
        path: impl Into<PathLike>,
        args: &[Value],
    ) -> Result<T> {
        let path = self.canonical_path(path)?;
        let value = self.load_canonical_sync(&path, args)?;
        into_typed(&path, value)
    }

    async fn load_canonical(&self, path: &Path, args: &[Value]) -> Result<LoadedValue> {
        let value = self.decode(path).await?;
        Ok(resolver::resolve(value, args).await?)
    }

    fn load_canonical_sync(&self, path: &Path, args: &[Value]) -> Result<LoadedValue> {
        let value = self.decode_sync(path)?;
        Ok(resolver::resolve_sync(value, args))
    }

    async fn decode(&self, path: &Path) -> Result<LoadedValue> {
        let format = Format::detect(path)?;
        tracing::debug!("loading {} as {:?}", path.display(), format);

        match format {
            Format::Yaml => Ok(format::decode_yaml(&self.cache.read(path).await?)?.into()),
            Format::Json => Ok(format::decode_json(&self.cache.read(path).await?)?.into()),
            Format::Script => self.import(path).await,
        }
    }

    fn decode_sync(&self, path: &Path) -> Result<LoadedValue> {
        let format = Format::detect(path)?;
        tracing::debug!("loading {} as {:?} (sync)", path.display(), format);

        match format {
            Format::Yaml => Ok(format::decode_yaml(&self.cache.read_sync(path)?)?.into()),
            Format::Json => Ok(format::decode_json(&self.cache.read_sync(path)?)?.into()),
            Format::Script => self.require(path),
        }
    }

    async fn import(&self, path: &Path) -> Result<LoadedValue> {
        let record = self.host.import(path).await.map_err(js_load_error)?;
        Ok(ExportShape::from_record(record).into_value()?)
    }

    fn require(&self, path: &Path) -> Result<LoadedValue> {
        let record = self.host.require(path).map_err(|e| match e {
            ModuleError::RequireEsm(_) => Error::Module(e),
            other => js_load_error(other),
        })?;
        Ok(ExportShape::from_record(record).into_value()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("base_dir", &*self.base_dir.read())
            .field("cached_files", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Loader`]
#[derive(Default)]
pub struct LoaderBuilder {
    base_dir: Option<PathBuf>,
    cache: Option<Arc<ContentCache>>,
    host: Option<Arc<dyn ModuleHost>>,
}

impl LoaderBuilder {
    /// Set the default base directory
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Share an existing content cache
    pub fn cache(mut self, cache: Arc<ContentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the module host
    pub fn host(mut self, host: impl ModuleHost + 'static) -> Self {
        self.host = Some(Arc::new(host));
        self
    }

    /// Build the loader
    pub fn build(self) -> Loader {
        let base_dir = path::absolutize(self.base_dir.as_deref().unwrap_or(Path::new(".")));

        Loader {
            base_dir: RwLock::new(base_dir),
            cache: self.cache.unwrap_or_default(),
            host: self
                .host
                .unwrap_or_else(|| Arc::new(ModuleRegistry::new())),
        }
    }
}

fn js_load_error(err: ModuleError) -> Error {
    LoaderError::new(ErrorKind::JsLoad, err.to_string()).into()
}

fn into_typed<T: DeserializeOwned>(path: &Path, value: LoadedValue) -> Result<T> {
    let data = value
        .into_data()
        .ok_or_else(|| Error::NotData(path.to_path_buf()))?;
    serde_json::from_value(data).map_err(|source| Error::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}
