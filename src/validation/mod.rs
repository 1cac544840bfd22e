//! Declarative field rules for JSON request bodies.
//!
//! A DTO lists its [`FieldRule`]s once; [`check`] runs every rule against the
//! raw body and returns all violations together, so a client sees every
//! problem in a single 400 response.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Fits in `i64`.
    Integer,
    /// Fits in `i32`.
    Stat,
    Number,
    String,
    Boolean,
    StringList,
    Object,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::Integer => value.is_i64(),
            FieldKind::Stat => value
                .as_i64()
                .map(|v| i32::try_from(v).is_ok())
                .unwrap_or(false),
            FieldKind::Number => value.is_number(),
            FieldKind::String => value.is_string(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::StringList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::Object => value.is_object(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldKind::Integer => "must be an integer",
            FieldKind::Stat => "must be an integer between -2147483648 and 2147483647",
            FieldKind::Number => "must be a number",
            FieldKind::String => "must be a string",
            FieldKind::Boolean => "must be a boolean",
            FieldKind::StringList => "must be an array of strings",
            FieldKind::Object => "must be an object",
        }
    }
}

/// One check against one (possibly nested) field.
///
/// `path` is a list of object keys rather than a dotted string because
/// catalog keys such as `Sp. Attack` contain dots themselves.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static [&'static str],
    pub kind: FieldKind,
    pub required: bool,
    pub non_empty: bool,
}

impl FieldRule {
    pub const fn required(path: &'static [&'static str], kind: FieldKind) -> Self {
        Self { path, kind, required: true, non_empty: false }
    }

    pub const fn optional(path: &'static [&'static str], kind: FieldKind) -> Self {
        Self { path, kind, required: false, non_empty: false }
    }

    pub const fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn field_name(&self) -> String {
        self.path.join(".")
    }

    fn lookup<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        self.path.iter().try_fold(body, |node, key| node.as_object()?.get(*key))
    }

    fn apply(&self, body: &Value) -> Option<Violation> {
        let value = match self.lookup(body) {
            Some(Value::Null) | None if self.required => {
                return Some(Violation::new(self.field_name(), "is required"));
            }
            Some(Value::Null) | None => return None,
            Some(value) => value,
        };

        if !self.kind.matches(value) {
            return Some(Violation::new(self.field_name(), self.kind.describe()));
        }

        if self.non_empty && is_blank(value) {
            return Some(Violation::new(self.field_name(), "must not be empty"));
        }

        None
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Runs every rule and returns all violations (empty when the body is acceptable).
pub fn check(body: &Value, rules: &[FieldRule]) -> Vec<Violation> {
    if !body.is_object() {
        return vec![Violation::new("body", "must be a JSON object")];
    }
    rules.iter().filter_map(|rule| rule.apply(body)).collect()
}

/// A request DTO with a declarative rule set.
pub trait Validate: DeserializeOwned {
    const RULES: &'static [FieldRule];
}

/// Checks `body` against `T::RULES`, then deserializes. Any failure yields the full violation list.
pub fn validate<T: Validate>(body: Value) -> Result<T, Vec<Violation>> {
    let violations = check(&body, T::RULES);
    if !violations.is_empty() {
        return Err(violations);
    }
    serde_json::from_value(body).map_err(|e| vec![Violation::new("body", e.to_string())])
}
