// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Value resolution
//!
//! Turns a loaded value into the value handed to the caller:
//!
//! | value        | async                          | sync                        |
//! |--------------|--------------------------------|-----------------------------|
//! | `Deferred`   | awaited                        | returned pending            |
//! | `Invokable`  | called, deferred result awaited | called, result returned    |
//! | `Data`       | unchanged                      | unchanged                   |
//!
//! A callable whose invocation fails is returned un-invoked instead.

use crate::error::ScriptError;
use crate::value::{Callable, LoadedValue};
use serde_json::Value;

/// Resolve a value, awaiting deferred computations
pub async fn resolve(value: LoadedValue, args: &[Value]) -> Result<LoadedValue, ScriptError> {
    match value {
        deferred @ LoadedValue::Deferred(_) => deferred.settle().await,
        LoadedValue::Invokable(callable) => invoke(callable, args).settle().await,
        data @ LoadedValue::Data(_) => Ok(data),
    }
}

/// Resolve a value without suspending
///
/// Deferred values, given or returned by a call, come back still pending.
pub fn resolve_sync(value: LoadedValue, args: &[Value]) -> LoadedValue {
    match value {
        LoadedValue::Invokable(callable) => invoke(callable, args),
        other => other,
    }
}

fn invoke(callable: Callable, args: &[Value]) -> LoadedValue {
    match callable.call(args) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!("invocation failed ({}), returning the callable itself", e);
            LoadedValue::Invokable(callable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thunk(value: Value) -> LoadedValue {
        LoadedValue::function(move |_| Ok(LoadedValue::data(value.clone())))
    }

    #[tokio::test]
    async fn test_data_unchanged() {
        let resolved = resolve(LoadedValue::data(json!({"a": 1})), &[]).await.unwrap();
        assert_eq!(resolved.into_data(), Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_thunk_invoked() {
        let resolved = resolve(thunk(json!([1, 2])), &[]).await.unwrap();
        assert_eq!(resolved.into_data(), Some(json!([1, 2])));
    }

    #[tokio::test]
    async fn test_args_forwarded() {
        let sum = LoadedValue::function(|args| {
            let total: i64 = args.iter().filter_map(Value::as_i64).sum();
            Ok(LoadedValue::data(total))
        });

        let resolved = resolve(sum, &[json!(2), json!(40)]).await.unwrap();
        assert_eq!(resolved.into_data(), Some(json!(42)));
    }

    #[tokio::test]
    async fn test_async_thunk_awaited() {
        let value = LoadedValue::function(|_| {
            Ok(LoadedValue::deferred(async {
                tokio::task::yield_now().await;
                Ok(LoadedValue::data(42))
            }))
        });

        let resolved = resolve(value, &[]).await.unwrap();
        assert_eq!(resolved.into_data(), Some(json!(42)));
    }

    #[tokio::test]
    async fn test_deferred_awaited_not_invoked() {
        let value = LoadedValue::deferred(async { Ok(thunk(json!("inner"))) });

        let resolved = resolve(value, &[]).await.unwrap();
        assert!(resolved.is_callable());
    }

    #[tokio::test]
    async fn test_failed_invocation_degrades() {
        let value = LoadedValue::function(|args| {
            if args.is_empty() {
                Err(ScriptError::type_error("missing argument"))
            } else {
                Ok(LoadedValue::data(args[0].clone()))
            }
        });

        let resolved = resolve(value, &[]).await.unwrap();
        let LoadedValue::Invokable(callable) = resolved else {
            panic!("expected the callable back");
        };
        assert_eq!(callable.call(&[json!(7)]).unwrap().into_data(), Some(json!(7)));
    }

    #[tokio::test]
    async fn test_rejected_deferred_propagates() {
        let value = LoadedValue::function(|_| {
            Ok(LoadedValue::deferred(async { Err(ScriptError::new("rejected")) }))
        });

        let err = resolve(value, &[]).await.unwrap_err();
        assert_eq!(err.message, "rejected");
    }

    #[tokio::test]
    async fn test_sync_leaves_deferred_pending() {
        let value = LoadedValue::function(|_| {
            Ok(LoadedValue::deferred(async { Ok(LoadedValue::data(42)) }))
        });

        let pending = resolve_sync(value, &[]);
        assert!(pending.is_deferred());
        assert_eq!(pending.settle().await.unwrap().into_data(), Some(json!(42)));
    }

    #[test]
    fn test_sync_thunk_invoked() {
        let resolved = resolve_sync(thunk(json!({"ok": true})), &[]);
        assert_eq!(resolved.into_data(), Some(json!({"ok": true})));
    }
}
