// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Path normalization
//!
//! Turns text paths, byte buffers and `file:` URLs into one absolute,
//! lexically normalized filesystem path. No I/O is performed.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// URL scheme prefixes recognized inside text paths
const URL_PREFIXES: [&str; 2] = ["file:", "data:"];

/// Any accepted representation of a file location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLike {
    /// A text path, relative or absolute, or URL text
    Text(String),
    /// A byte-encoded path
    Bytes(Vec<u8>),
    /// A parsed URL
    Url(Url),
}

impl PathLike {
    /// Resolve to a canonical absolute path against `base`
    pub fn to_path(&self, base: &Path) -> Result<PathBuf> {
        match self {
            PathLike::Text(text) => text_to_path(text, base),
            PathLike::Bytes(bytes) => bytes_to_path(bytes, base),
            PathLike::Url(url) => url_to_path(url),
        }
    }
}

impl From<&str> for PathLike {
    fn from(s: &str) -> Self {
        PathLike::Text(s.to_string())
    }
}

impl From<String> for PathLike {
    fn from(s: String) -> Self {
        PathLike::Text(s)
    }
}

impl From<&String> for PathLike {
    fn from(s: &String) -> Self {
        PathLike::Text(s.clone())
    }
}

impl From<&Path> for PathLike {
    fn from(p: &Path) -> Self {
        match p.to_str() {
            Some(text) => PathLike::Text(text.to_string()),
            None => PathLike::Bytes(os_bytes(p)),
        }
    }
}

impl From<PathBuf> for PathLike {
    fn from(p: PathBuf) -> Self {
        PathLike::from(p.as_path())
    }
}

impl From<&PathBuf> for PathLike {
    fn from(p: &PathBuf) -> Self {
        PathLike::from(p.as_path())
    }
}

impl From<&[u8]> for PathLike {
    fn from(b: &[u8]) -> Self {
        PathLike::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for PathLike {
    fn from(b: Vec<u8>) -> Self {
        PathLike::Bytes(b)
    }
}

impl From<Url> for PathLike {
    fn from(u: Url) -> Self {
        PathLike::Url(u)
    }
}

impl From<&Url> for PathLike {
    fn from(u: &Url) -> Self {
        PathLike::Url(u.clone())
    }
}

#[cfg(unix)]
fn os_bytes(p: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    p.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn os_bytes(p: &Path) -> Vec<u8> {
    p.to_string_lossy().into_owned().into_bytes()
}

/// Check whether text starts with a `file:` or `data:` scheme
pub fn is_url_like(text: &str) -> bool {
    URL_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

fn text_to_path(text: &str, base: &Path) -> Result<PathBuf> {
    if is_url_like(text) {
        let url = Url::parse(text).map_err(|e| Error::invalid_url(text, e.to_string()))?;
        return url_to_path(&url);
    }

    let resolved = resolve(base, Path::new(text));
    tracing::trace!("normalized {} to {}", text, resolved.display());
    Ok(resolved)
}

fn bytes_to_path(bytes: &[u8], base: &Path) -> Result<PathBuf> {
    if URL_PREFIXES.iter().any(|prefix| bytes.starts_with(prefix.as_bytes())) {
        return text_to_path(&String::from_utf8_lossy(bytes), base);
    }

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Ok(resolve(base, Path::new(std::ffi::OsStr::from_bytes(bytes))))
    }
    #[cfg(not(unix))]
    {
        text_to_path(&String::from_utf8_lossy(bytes), base)
    }
}

/// Decode a `file:` URL to a filesystem path
pub fn url_to_path(url: &Url) -> Result<PathBuf> {
    if url.scheme() != "file" {
        return Err(Error::invalid_url(
            url.as_str(),
            format!("the URL must be of scheme file, got {}", url.scheme()),
        ));
    }

    url.to_file_path()
        .map(|p| normalize(&p))
        .map_err(|_| Error::invalid_url(url.as_str(), "the URL has no local file path"))
}

/// Resolve `path` against `base`, folding `.` and `..` segments
///
/// An absolute `path` replaces the base. A relative base is made absolute
/// against the process working directory first.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    normalize(&absolutize(base).join(path))
}

/// Make a path absolute against the process working directory
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// Lexically normalize a path
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    result.pop();
                    depth -= 1;
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
        }
    }

    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Lower-cased extension of a path, without the dot
pub fn extension(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
