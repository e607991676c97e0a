// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Values produced by a load
//!
//! Static formats only ever produce [`LoadedValue::Data`]. Script modules may
//! also export callables and deferred computations, which the resolver turns
//! into data.

use crate::error::ScriptError;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Result of calling a script callable
pub type CallResult = std::result::Result<LoadedValue, ScriptError>;

/// A value exported by a data file or a script module
pub enum LoadedValue {
    /// Plain structured data
    Data(Value),
    /// A function that may be invoked with arguments
    Invokable(Callable),
    /// A computation that completes later
    Deferred(Deferred),
}

impl LoadedValue {
    /// Wrap a plain value
    pub fn data(value: impl Into<Value>) -> Self {
        LoadedValue::Data(value.into())
    }

    /// Wrap a function
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> CallResult + Send + Sync + 'static,
    {
        LoadedValue::Invokable(Callable::new(f))
    }

    /// Wrap a future
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = CallResult> + Send + 'static,
    {
        LoadedValue::Deferred(Deferred::new(future))
    }

    /// Borrow the data, if this is data
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            LoadedValue::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Take the data, if this is data
    pub fn into_data(self) -> Option<Value> {
        match self {
            LoadedValue::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this is a callable
    pub fn is_callable(&self) -> bool {
        matches!(self, LoadedValue::Invokable(_))
    }

    /// Whether this is still pending
    pub fn is_deferred(&self) -> bool {
        matches!(self, LoadedValue::Deferred(_))
    }

    /// Await a pending value until it settles
    ///
    /// Non-deferred values are returned unchanged. A deferred value that
    /// settles to another deferred value is awaited again.
    pub async fn settle(self) -> CallResult {
        let mut current = self;
        loop {
            match current {
                LoadedValue::Deferred(deferred) => current = deferred.await_value().await?,
                settled => return Ok(settled),
            }
        }
    }
}

impl fmt::Debug for LoadedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadedValue::Data(value) => f.debug_tuple("Data").field(value).finish(),
            LoadedValue::Invokable(callable) => f.debug_tuple("Invokable").field(callable).finish(),
            LoadedValue::Deferred(deferred) => f.debug_tuple("Deferred").field(deferred).finish(),
        }
    }
}

impl From<Value> for LoadedValue {
    fn from(value: Value) -> Self {
        LoadedValue::Data(value)
    }
}

impl From<Callable> for LoadedValue {
    fn from(callable: Callable) -> Self {
        LoadedValue::Invokable(callable)
    }
}

impl From<Deferred> for LoadedValue {
    fn from(deferred: Deferred) -> Self {
        LoadedValue::Deferred(deferred)
    }
}

/// A shareable script function
#[derive(Clone)]
pub struct Callable {
    func: Arc<dyn Fn(&[Value]) -> CallResult + Send + Sync>,
}

impl Callable {
    /// Create a callable from a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> CallResult + Send + Sync + 'static,
    {
        Self { func: Arc::new(f) }
    }

    /// Invoke with the given arguments
    pub fn call(&self, args: &[Value]) -> CallResult {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Function]")
    }
}

/// A pending script computation
pub struct Deferred {
    future: BoxFuture<'static, CallResult>,
}

impl Deferred {
    /// Box a future as a deferred value
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = CallResult> + Send + 'static,
    {
        Self {
            future: Box::pin(future),
        }
    }

    /// Await one step of the computation
    pub async fn await_value(self) -> CallResult {
        self.future.await
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Deferred]")
    }
}
