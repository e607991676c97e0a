// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the default base directory
pub const BASE_DIR_ENV: &str = "LOADEE_BASE_DIR";

/// Configuration for a [`Loader`](crate::Loader)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory relative paths are resolved against (defaults to the
    /// process working directory)
    pub base_dir: Option<PathBuf>,
}

impl LoaderConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Override fields from environment variables
    pub fn load_from_env(&mut self) {
        if let Some(dir) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.base_dir = Some(PathBuf::from(dir));
        }
    }

    /// Set the base directory
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}
