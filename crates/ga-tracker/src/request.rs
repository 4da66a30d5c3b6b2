// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Request metadata read by the hit builders and the producers.
///
/// Absent headers stay `None` and the matching fields are dropped from the
/// encoded hit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestContext {
    /// Value of the `Host` header.
    pub host: Option<String>,
    /// Value of the `Referrer` header.
    pub referrer: Option<String>,
    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,
    /// Path of the request as served.
    pub path: String,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        RequestContext {
            path: path.into(),
            ..RequestContext::default()
        }
    }
}
