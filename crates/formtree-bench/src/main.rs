//! Benchmark for form submission.
//!
//! Builds a wide form whose fields form a long dependency chain, plus an array
//! of embedded order forms, then times submit, value and http_value.
//!
//! Usage: `bench-submit [payload.json]`. Without a file a synthetic payload is
//! generated. Set `RUST_LOG=formtree=debug` to see submission events.

use std::fs;
use std::time::Instant;

use formtree::{Element, Form, FormBuilder, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of chained scalar fields.
const FIELDS: usize = 200;
/// Number of orders in the synthetic payload.
const ORDERS: usize = 5_000;
const ROUNDS: u32 = 20;

fn field_name(i: usize) -> String {
    format!("field_{i}")
}

/// Every field depends on the previous one, so each addition shifts the whole
/// chain one level deeper.
fn build_form() -> Form {
    let mut builder = FormBuilder::new();
    for i in 0..FIELDS {
        builder = builder.string(&field_name(i), |f| {
            let f = f.trim().length(None, Some(64));
            if i == 0 { f.required() } else { f.depends([field_name(i - 1)]) }
        });
    }

    builder
        .array("orders", |a| {
            a.form(|order| {
                order
                    .string("sku", |f| f.required().length(Some(3), Some(16)))
                    .integer("quantity", |f| f.required().range(Some(1.0), Some(1000.0)))
                    .float("price", |f| f.range(Some(0.0), None))
                    .boolean("gift", |f| f)
            })
            .count(Some(1), None)
        })
        .build()
}

fn synthetic_payload() -> Value {
    let mut fields: Vec<(String, Value)> = (0..FIELDS)
        .map(|i| (field_name(i), Value::from(format!("  value {i} "))))
        .collect();

    let orders = Value::list((0..ORDERS).map(|i| {
        if i % 50 == 0 {
            return Value::Null;
        }
        Value::map([
            ("sku", Value::from(format!("SKU-{i:05}"))),
            ("quantity", Value::from((i % 7 + 1).to_string())),
            ("price", Value::from(format!("{}.99", i % 100))),
            ("gift", Value::from(if i % 3 == 0 { "on" } else { "" })),
        ])
    }));
    fields.push(("orders".to_string(), orders));

    Value::map(fields)
}

fn load_payload(path: &str) -> Value {
    let json = fs::read_to_string(path).expect("Failed to read payload file");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("Failed to parse JSON");
    Value::from(parsed)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let payload = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading payload from: {}", path);
            load_payload(&path)
        }
        None => synthetic_payload(),
    };

    let build_start = Instant::now();
    let mut form = build_form();
    let build_time = build_start.elapsed();

    let depth = form.children().levels().deepest();
    println!(
        "Built form with {} children over {} levels in {:?}",
        form.children().len(),
        depth + 1,
        build_time
    );

    // Submit
    let submit_start = Instant::now();
    let mut valid = false;
    for _ in 0..ROUNDS {
        valid = form.submit(payload.clone());
    }
    let submit_time = submit_start.elapsed() / ROUNDS;

    let orders = form["orders"]
        .element()
        .as_array()
        .map(|array| array.len())
        .unwrap_or_default();
    println!("\nSubmit: valid={} orders={} in {:?}", valid, orders, submit_time);
    if !valid {
        for (path, message) in form.error().flatten().into_iter().take(10) {
            println!("  - {}: {}", path, message);
        }
    }

    // Value
    let value_start = Instant::now();
    let mut value = Value::Null;
    for _ in 0..ROUNDS {
        value = form.value();
    }
    let value_time = value_start.elapsed() / ROUNDS;
    let value_entries = value.as_map().map_or(0, |m| m.len());
    println!("Value: {} entries in {:?}", value_entries, value_time);

    // HTTP value
    let http_start = Instant::now();
    let mut http = Value::Null;
    for _ in 0..ROUNDS {
        http = form.http_value();
    }
    let http_time = http_start.elapsed() / ROUNDS;
    let encoded = serde_json::to_string(&serde_json::Value::from(http)).expect("Failed to encode");
    println!("HTTP value: {} bytes as JSON in {:?}", encoded.len(), http_time);

    info!(
        submit_us = submit_time.as_micros() as u64,
        value_us = value_time.as_micros() as u64,
        http_us = http_time.as_micros() as u64,
        "benchmark finished"
    );
}
