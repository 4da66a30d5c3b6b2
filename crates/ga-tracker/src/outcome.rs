// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Summary of a served response, mapped onto hits by
/// [`Analytics::track_response`](crate::analytics::Analytics::track_response).
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseOutcome {
    /// Final HTTP status code.
    pub status_code: u16,
    /// Whether the response rendered a view rather than raw data.
    pub rendered_view: bool,
    /// Route pattern that served the request, e.g. `/items/{id}`.
    pub route_path: String,
}

/// What a served response should produce, if anything.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum OutcomeAction {
    PageView,
    Exception { route_path: String, status_code: u16 },
    Ignore,
}

impl ResponseOutcome {
    /// Successful responses that rendered a view count as page views,
    /// server errors count as exception events, everything else is ignored.
    pub(crate) fn action(&self) -> OutcomeAction {
        match self.status_code {
            200..=299 if self.rendered_view => OutcomeAction::PageView,
            500..=599 => OutcomeAction::Exception {
                route_path: self.route_path.clone(),
                status_code: self.status_code,
            },
            _ => OutcomeAction::Ignore,
        }
    }
}
