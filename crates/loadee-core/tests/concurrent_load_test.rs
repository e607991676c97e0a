// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Integration tests for a loader shared between tasks

mod common;

use common::{fixture, loader, users};
use loadee_core::{LoadedValue, Loader};
use serde_json::json;
use std::sync::Arc;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_loader_is_send_sync() {
    assert_send_sync::<Loader>();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawned_loads_share_cache() {
    let loader = Arc::new(loader());
    let names = [
        "data.yaml",
        "data.json",
        "data.js",
        "data.yaml",
        "cjs/data.async.cjs",
        "data.json",
        "data.var.js",
        "data.yaml",
    ];

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let name = *name;
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_file(name, &[]).await })
        })
        .collect();

    for (name, handle) in names.iter().zip(handles) {
        let value = handle.await.unwrap().unwrap_or_else(|e| panic!("{name} failed: {e}"));
        let expected = if *name == "data.var.js" { json!(42) } else { users() };
        assert_eq!(value.into_data(), Some(expected), "{name}");
    }

    // Five static loads over two files; racing first reads may each hit the disk
    let stats = loader.cache().stats();
    assert_eq!(stats.hits + stats.reads, 5);
    assert!(stats.reads >= 2);
    assert_eq!(loader.cache().len(), 2);
    assert!(loader.cache().contains(&fixture("data.yaml")));
    assert!(loader.cache().contains(&fixture("data.json")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_blocking_and_async_loads_mix() {
    let loader = Arc::new(loader());

    let blocking = {
        let loader = Arc::clone(&loader);
        tokio::task::spawn_blocking(move || loader.load_file_sync("data.yml", &[]))
    };
    let pending = {
        let loader = Arc::clone(&loader);
        tokio::task::spawn_blocking(move || loader.load_file_sync("cjs/data.asyncvar.cjs", &[]))
    };
    let async_load = loader.load_file("data.yml", &[]).await.unwrap();

    assert_eq!(blocking.await.unwrap().unwrap().into_data(), Some(users()));
    assert_eq!(async_load.into_data(), Some(users()));

    let pending: LoadedValue = pending.await.unwrap().unwrap();
    assert!(pending.is_deferred());
    assert_eq!(pending.settle().await.unwrap().into_data(), Some(json!(42)));
}
