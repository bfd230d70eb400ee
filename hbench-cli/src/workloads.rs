// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Bundled benchmark workloads.
//!
//! The `catalog.*` benchmarks treat a scratch directory as a table catalog:
//! an entry is a table, listing the directory lists the tables.

use std::cell::RefCell;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use hbench::{BenchSuite, Operation};

/// Size of the buffer touched by the `alloc` benchmark.
const ALLOC_BYTES: usize = 64 * 1024;
const PAGE_BYTES: usize = 4096;

/// Entry created and dropped by the catalog benchmarks.
const TABLE_NAME: &str = "hbench_table";

/// Register every bundled workload on `suite`, in a fixed order.
pub fn register<'a>(suite: &mut BenchSuite<'a>, scratch: &'a Path) {
    suite
        .add("noop", |b| b.bench_simple(|| Ok(())))
        .add("sleep", |b| {
            b.bench_simple(|| {
                thread::sleep(Duration::from_millis(1));
                Ok(())
            })
        })
        .add("demo", |b| {
            let buffer = RefCell::new(Vec::<u64>::new());
            let op = Operation::new(|| {
                buffer.borrow_mut().sort_unstable();
                Ok(())
            })
            .with_pre(|| {
                buffer.borrow_mut().extend((0..256u64).rev());
                Ok(())
            })
            .with_post(|| {
                buffer.borrow_mut().clear();
                Ok(())
            });
            b.bench(op)
        })
        .add("alloc", |b| {
            b.bench_simple(|| {
                let mut buf = vec![0u8; ALLOC_BYTES];
                for page in buf.iter_mut().step_by(PAGE_BYTES) {
                    *page = 1;
                }
                black_box(buf);
                Ok(())
            })
        })
        .add("catalog.list", move |b| {
            b.bench_simple(|| list_tables(scratch).map(|tables| drop(black_box(tables))))
        })
        .add("catalog.create", move |b| {
            let op = Operation::new(|| create_table(scratch, TABLE_NAME))
                .with_post(|| drop_table(scratch, TABLE_NAME));
            b.bench(op)
        })
        .add("catalog.drop", move |b| {
            let op = Operation::new(|| drop_table(scratch, TABLE_NAME))
                .with_pre(|| create_table(scratch, TABLE_NAME));
            b.bench(op)
        });
}

fn list_tables(catalog: &Path) -> anyhow::Result<Vec<String>> {
    let entries = fs::read_dir(catalog)
        .with_context(|| format!("listing catalog {}", catalog.display()))?;

    let mut tables = Vec::new();
    for entry in entries {
        let entry = entry.context("reading catalog entry")?;
        tables.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(tables)
}

fn create_table(catalog: &Path, name: &str) -> anyhow::Result<()> {
    let path = catalog.join(name);
    fs::create_dir(&path).with_context(|| format!("creating table {}", path.display()))
}

fn drop_table(catalog: &Path, name: &str) -> anyhow::Result<()> {
    let path = catalog.join(name);
    fs::remove_dir(&path).with_context(|| format!("dropping table {}", path.display()))
}
