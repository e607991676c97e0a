// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # loadee-core
//!
//! Loads YAML, JSON and script-module files into normalized values.
//!
//! - `.yaml` / `.yml` are parsed as YAML
//! - `.json` and extensionless files are parsed as JSON
//! - `.js` / `.mjs` / `.cjs` are executed by a [`ModuleHost`]
//!
//! Static files are read through a [`ContentCache`] keyed by modification
//! time. Script modules must expose a `default` export (or a CommonJS
//! `module.exports`); when that value is a function it is called with the
//! caller's arguments, and deferred results are awaited.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loadee_core::Loader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let loader = Loader::builder().base_dir("config").build();
//!     let yaml = loader.load_file("app.yaml", &[]).await?;
//!     let json = loader.load_file("app.json", &[]).await?;
//!     println!("{:?} {:?}", yaml.as_data(), json.as_data());
//!     Ok(())
//! }
//! ```
//!
//! ## Script modules
//!
//! ```rust,ignore
//! use loadee_core::{ExportRecord, LoadedValue, Loader, ModuleRegistry, ModuleStyle};
//! use serde_json::json;
//!
//! let registry = ModuleRegistry::new();
//! registry.define("config/app.js", ModuleStyle::Esm, |_| {
//!     Ok(ExportRecord::default_export(LoadedValue::function(|_| {
//!         Ok(LoadedValue::data(json!({ "port": 8080 })))
//!     })))
//! });
//!
//! let loader = Loader::builder().host(registry).build();
//! let config = loader.load_file("config/app.js", &[]).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod module_system;
pub mod path;
pub mod resolver;
pub mod value;

// Re-exports
pub use cache::{CacheEntry, CacheStats, ContentCache};
pub use config::LoaderConfig;
pub use error::{Error, ErrorKind, LoaderError, ModuleError, Result, ScriptError};
pub use format::Format;
pub use loader::{Loader, LoaderBuilder};
pub use module_system::{
    ExportRecord, ExportShape, ModuleDefinition, ModuleHost, ModuleRegistry, ModuleSource,
    ModuleStyle,
};
pub use path::PathLike;
pub use value::{Callable, Deferred, LoadedValue};

/// Version of the loader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
