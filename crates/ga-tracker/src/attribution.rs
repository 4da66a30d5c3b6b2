// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use ga_batcher::Hit;

/// Campaign attribution resolved for one request.
///
/// Every field is optional; whatever is present is forwarded. Completeness
/// only gates a warning, never delivery.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attribution {
    pub campaign: Option<String>,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub content: Option<String>,
    pub term: Option<String>,
    pub id: Option<String>,
}

impl Attribution {
    /// An attribution is complete when it names a campaign and at least one
    /// of source or id. Blank values count as missing.
    pub fn is_complete(&self) -> bool {
        non_blank(&self.campaign) && (non_blank(&self.source) || non_blank(&self.id))
    }

    /// Appends the campaign fields to `hit` in protocol order. Absent
    /// fields encode to nothing.
    pub(crate) fn append_to(&self, hit: &mut Hit) {
        hit.push_field("cn", self.campaign.clone());
        hit.push_field("cs", self.source.clone());
        hit.push_field("cm", self.medium.clone());
        hit.push_field("cc", self.content.clone());
        hit.push_field("ck", self.term.clone());
        hit.push_field("ci", self.id.clone());
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
