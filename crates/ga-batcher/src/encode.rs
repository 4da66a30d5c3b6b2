// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Wire encoding for measurement-protocol batch payloads.
//!
//! One hit becomes an `&`-joined sequence of URL-encoded `key=value` pairs
//! in field insertion order; a batch joins its hit records with newlines,
//! one record per line.

use crate::hit::Hit;

/// Encodes a single hit. Fields holding an empty value are dropped here,
/// not at submit time.
pub fn hit_record(hit: &Hit) -> String {
    let mut pairs = Vec::with_capacity(hit.len());
    for (key, value) in hit.fields() {
        if value.is_empty() {
            continue;
        }
        pairs.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(&value.to_string())
        ));
    }
    pairs.join("&")
}

/// Joins encoded hit records into one batch body.
pub fn batch_body(records: &[String]) -> String {
    records.join("\n")
}
