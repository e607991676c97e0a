// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the loader
//!
//! Failures detected by the loader itself are [`LoaderError`]s tagged with an
//! [`ErrorKind`]. Errors raised by the module host or by script code pass
//! through [`Error`] untouched so callers can tell them apart.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories a caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path missing, unreadable, or a directory
    FileSystem,
    /// YAML text failed to parse
    YamlLoad,
    /// JSON text failed to parse
    JsonLoad,
    /// The module host failed to resolve or evaluate a script
    JsLoad,
    /// A script module exposes no usable export slot
    RequiredDefaultExport,
    /// No decoder for the file extension
    FileNotSupported,
}

impl ErrorKind {
    /// Stable code string for this kind
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::FileSystem => "FILE_SYSTEM_ERROR",
            ErrorKind::YamlLoad => "YAML_LOAD_ERROR",
            ErrorKind::JsonLoad => "JSON_LOAD_ERROR",
            ErrorKind::JsLoad => "JS_LOAD_ERROR",
            ErrorKind::RequiredDefaultExport => "REQUIRED_DEFAULT_EXPORT",
            ErrorKind::FileNotSupported => "FILE_NOT_SUPPORTED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A tagged failure raised by the loader
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoaderError {
    kind: ErrorKind,
    message: String,
}

impl LoaderError {
    /// Create a new error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a file system error for `path`
    pub fn file_system(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::new(
            ErrorKind::FileSystem,
            format!("Failed to load {}: {}", path.display(), err),
        )
    }

    /// Create the error for a module without a usable export
    pub fn required_default_export() -> Self {
        Self::new(
            ErrorKind::RequiredDefaultExport,
            "Expected module file to be exported as default export",
        )
    }

    /// Create the error for an unknown extension
    pub fn not_supported(path: &std::path::Path) -> Self {
        Self::new(
            ErrorKind::FileNotSupported,
            format!("Unsupported file format: {}", path.display()),
        )
    }

    /// The failure category
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The code string of the failure category
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An error thrown by script code
///
/// Raised by callables and deferred values defined by a script module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct ScriptError {
    /// Error class, e.g. `TypeError`
    pub name: String,
    /// Error message
    pub message: String,
}

impl ScriptError {
    /// Create a generic `Error`
    pub fn new(message: impl Into<String>) -> Self {
        Self::named("Error", message)
    }

    /// Create an error with an explicit class name
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a `TypeError`
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::named("TypeError", message)
    }
}

/// Errors raised by a module host
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The module file does not exist
    #[error("Cannot find module '{}'", .0.display())]
    NotFound(PathBuf),

    /// The file exists but the host has no definition for it
    #[error("No module registered for '{}'", .0.display())]
    Unregistered(PathBuf),

    /// An ES module was loaded through the synchronous path
    #[error("require() of ES Module {} not supported", .0.display())]
    RequireEsm(PathBuf),

    /// The module source is malformed
    #[error("SyntaxError: {message} ({})", .path.display())]
    Syntax {
        /// Module path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Module evaluation threw
    #[error("{0}")]
    Evaluation(#[from] ScriptError),

    /// Reading the module source failed
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModuleError {
    /// Node-style error code of this failure
    pub fn code(&self) -> &'static str {
        match self {
            ModuleError::NotFound(_) | ModuleError::Unregistered(_) => "MODULE_NOT_FOUND",
            ModuleError::RequireEsm(_) => "ERR_REQUIRE_ESM",
            ModuleError::Syntax { .. } => "ERR_SYNTAX",
            ModuleError::Evaluation(_) => "ERR_EVALUATION",
            ModuleError::Io(_) => "ERR_IO",
        }
    }
}

/// Every failure a load operation can produce
#[derive(Debug, Error)]
pub enum Error {
    /// A tagged loader failure
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// A module host failure surfaced as-is (synchronous ES module loads)
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// Script code failed while a deferred value was settled
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// A URL path could not be decoded to a filesystem path
    #[error("Invalid file URL '{input}': {reason}")]
    InvalidUrl {
        /// The URL text
        input: String,
        /// Why decoding failed
        reason: String,
    },

    /// Data was required but the resolved value is a callable
    #[error("{} resolved to a callable, not data", .0.display())]
    NotData(PathBuf),

    /// Resolved data did not match the requested type
    #[error("Failed to deserialize {}: {source}", .path.display())]
    Deserialize {
        /// File that was loaded
        path: PathBuf,
        /// Deserialization failure
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// The taxonomy kind, when this is a loader failure
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Loader(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
