// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::time::Instant;

/// Reserved field key under which the engine reports queue time at flush.
pub const QUEUE_TIME_KEY: &str = "qt";

/// Scalar value of one measurement-protocol field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Explicitly absent. Dropped when the hit is encoded.
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => FieldValue::Empty,
        }
    }
}

/// One analytics hit: an ordered mapping of measurement-protocol keys to
/// scalar values.
///
/// Field insertion order is preserved all the way to the wire. A hit is
/// immutable once submitted, except for the reserved queue-time field the
/// engine sets when the hit leaves the buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hit {
    fields: Vec<(String, FieldValue)>,
}

impl Hit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, builder style.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push_field(key, value);
        self
    }

    /// Appends a field in place.
    pub fn push_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Sets the reserved queue-time field, replacing any caller-supplied
    /// value so the engine-computed figure always wins.
    pub fn set_queue_time_ms(&mut self, queue_time_ms: i64) {
        self.fields.retain(|(key, _)| key != QUEUE_TIME_KEY);
        self.fields
            .push((QUEUE_TIME_KEY.to_string(), FieldValue::Int(queue_time_ms)));
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A hit plus the instant it entered the engine, kept together so queue
/// time can be computed at flush.
#[derive(Clone, Debug)]
pub struct QueuedHit {
    pub hit: Hit,
    pub queued_at: Instant,
}

impl QueuedHit {
    pub fn new(hit: Hit) -> Self {
        QueuedHit {
            hit,
            queued_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_format_like_their_scalars() {
        assert_eq!(FieldValue::from("two").to_string(), "two");
        assert_eq!(FieldValue::from(1).to_string(), "1");
        assert_eq!(FieldValue::from(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::from(false).to_string(), "false");
        assert_eq!(FieldValue::Empty.to_string(), "");
    }

    #[test]
    fn option_fields_map_none_to_empty() {
        assert_eq!(FieldValue::from(None::<&str>), FieldValue::Empty);
        assert_eq!(
            FieldValue::from(Some("referrer")),
            FieldValue::Text("referrer".to_string())
        );
    }

    #[test]
    fn fields_keep_insertion_order() {
        let hit = Hit::new().field("a", 1).field("b", "two").field("c", false);
        let keys: Vec<&str> = hit.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn queue_time_replaces_caller_supplied_value() {
        let mut hit = Hit::new().field("dp", "/page").field(QUEUE_TIME_KEY, 999);
        hit.set_queue_time_ms(42);

        let queue_fields: Vec<&FieldValue> = hit
            .fields()
            .iter()
            .filter(|(k, _)| k == QUEUE_TIME_KEY)
            .map(|(_, v)| v)
            .collect();
        assert_eq!(queue_fields, vec![&FieldValue::Int(42)]);
        // The engine value goes last so it trails every caller field.
        assert_eq!(hit.fields().last().map(|(k, _)| k.as_str()), Some("qt"));
    }
}
