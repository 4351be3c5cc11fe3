//! # Insert Schemas
//!
//! Request bodies arrive as untyped JSON. Each `New*` insert shape
//! implements [`InsertSchema`], which checks a JSON value field by field and
//! yields either the typed insert or every field-level error at once.
//!
//! ## Rules
//!
//! - Required text fields must be present and strings; `""` is accepted.
//! - A concept slug must be non-empty and URL-safe.
//! - `conceptId` must be an integer >= 1, since ids start at 1.
//! - Optional fields accept an absent key or `null`.
//! - Integer fields must be JSON integers; `1.5` and `"1"` are rejected.
//! - Unknown keys are ignored.
//!
//! Error objects mirror what the browser client already renders:
//! `{ code, path, message, expected?, received? }`.

use crate::primitives::{MAX_LONG_TEXT_LENGTH, MAX_SHORT_TEXT_LENGTH, MAX_TAGS, is_url_safe};
use crate::types::{
    NewCodeImplementation, NewConcept, NewExperiment, NewPaper, NewTheoryContent, NewUser,
    RecordId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidString,
    InvalidJson,
}

/// One step of the path to a rejected value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: FieldErrorCode,
    /// Empty for errors about the body as a whole.
    pub path: Vec<PathSegment>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

impl FieldError {
    fn invalid_type(path: Vec<PathSegment>, expected: &str, received: &str) -> Self {
        let message = if received == "undefined" {
            "Required".to_string()
        } else {
            format!("Expected {}, received {}", expected, received)
        };
        Self {
            code: FieldErrorCode::InvalidType,
            path,
            message,
            expected: Some(expected.to_string()),
            received: Some(received.to_string()),
        }
    }

    fn with_code(code: FieldErrorCode, key: &str, message: String) -> Self {
        Self {
            code,
            path: vec![PathSegment::Key(key.to_string())],
            message,
            expected: None,
            received: None,
        }
    }

    /// A root-level error for a body that is not valid JSON at all.
    #[must_use]
    pub fn invalid_json(detail: impl Into<String>) -> Self {
        Self {
            code: FieldErrorCode::InvalidJson,
            path: vec![],
            message: detail.into(),
            expected: None,
            received: None,
        }
    }
}

/// Every field error found in one body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }
}

// =============================================================================
// INSERTSCHEMA TRAIT
// =============================================================================

/// Validation of an untyped body into a typed insert shape.
pub trait InsertSchema: Sized {
    /// Human-readable entity name, e.g. `"code implementation"`.
    const ENTITY: &'static str;

    /// Check `body` and build the insert, or report every invalid field.
    fn parse(body: &Value) -> Result<Self, ValidationErrors>;
}

/// JSON type name as reported in `received`.
fn kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Field-by-field reader that accumulates errors instead of stopping at the
/// first one. Accessors return a placeholder on error; `finish` discards the
/// built value whenever an error was recorded.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn of(body: &'a Value) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                errors: Vec::new(),
            }),
            other => Err(ValidationErrors(vec![FieldError::invalid_type(
                vec![],
                "object",
                kind(Some(other)),
            )])),
        }
    }

    fn key_path(key: &str) -> Vec<PathSegment> {
        vec![PathSegment::Key(key.to_string())]
    }

    fn type_error(&mut self, key: &str, expected: &str) {
        let received = kind(self.object.get(key));
        self.errors
            .push(FieldError::invalid_type(Self::key_path(key), expected, received));
    }

    fn check_length(&mut self, key: &str, text: &str, max: usize) {
        let len = text.chars().count();
        if len > max {
            self.errors.push(FieldError::with_code(
                FieldErrorCode::TooBig,
                key,
                format!("String must contain at most {} character(s)", max),
            ));
        }
    }

    fn required_text(&mut self, key: &str, max: usize) -> String {
        match self.object.get(key) {
            Some(Value::String(s)) => {
                self.check_length(key, s, max);
                s.clone()
            }
            _ => {
                self.type_error(key, "string");
                String::new()
            }
        }
    }

    fn optional_text(&mut self, key: &str, max: usize) -> Option<String> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                self.check_length(key, s, max);
                Some(s.clone())
            }
            Some(_) => {
                self.type_error(key, "string");
                None
            }
        }
    }

    fn required_id(&mut self, key: &str) -> RecordId {
        match self.object.get(key) {
            Some(Value::Number(n)) => match (n.as_u64(), n.as_i64()) {
                (Some(id), _) if id >= 1 => RecordId(id),
                (Some(_), _) | (None, Some(_)) => {
                    self.errors.push(FieldError::with_code(
                        FieldErrorCode::TooSmall,
                        key,
                        "Number must be greater than or equal to 1".to_string(),
                    ));
                    RecordId::default()
                }
                (None, None) => {
                    self.errors.push(FieldError::invalid_type(
                        Self::key_path(key),
                        "integer",
                        "float",
                    ));
                    RecordId::default()
                }
            },
            _ => {
                self.type_error(key, "integer");
                RecordId::default()
            }
        }
    }

    fn required_i32(&mut self, key: &str) -> i32 {
        match self.object.get(key) {
            Some(Value::Number(n)) => {
                if let Some(wide) = n.as_i64() {
                    match i32::try_from(wide) {
                        Ok(v) => v,
                        Err(_) => {
                            let (code, message) = if wide < 0 {
                                (
                                    FieldErrorCode::TooSmall,
                                    format!("Number must be greater than or equal to {}", i32::MIN),
                                )
                            } else {
                                (
                                    FieldErrorCode::TooBig,
                                    format!("Number must be less than or equal to {}", i32::MAX),
                                )
                            };
                            self.errors.push(FieldError::with_code(code, key, message));
                            0
                        }
                    }
                } else if n.as_u64().is_some() {
                    self.errors.push(FieldError::with_code(
                        FieldErrorCode::TooBig,
                        key,
                        format!("Number must be less than or equal to {}", i32::MAX),
                    ));
                    0
                } else {
                    self.errors.push(FieldError::invalid_type(
                        Self::key_path(key),
                        "integer",
                        "float",
                    ));
                    0
                }
            }
            _ => {
                self.type_error(key, "integer");
                0
            }
        }
    }

    fn optional_bool(&mut self, key: &str) -> bool {
        match self.object.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.type_error(key, "boolean");
                false
            }
        }
    }

    fn optional_json(&self, key: &str) -> Option<Value> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        }
    }

    fn optional_tags(&mut self, key: &str) -> Option<Vec<String>> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => {
                if items.len() > MAX_TAGS {
                    self.errors.push(FieldError::with_code(
                        FieldErrorCode::TooBig,
                        key,
                        format!("Array must contain at most {} element(s)", MAX_TAGS),
                    ));
                }
                let mut tags = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => tags.push(s.clone()),
                        other => self.errors.push(FieldError::invalid_type(
                            vec![PathSegment::Key(key.to_string()), PathSegment::Index(index)],
                            "string",
                            kind(Some(other)),
                        )),
                    }
                }
                Some(tags)
            }
            Some(_) => {
                self.type_error(key, "array");
                None
            }
        }
    }

    /// Slugs end up as a path segment, so they must be non-empty and
    /// need no escaping. Only checked when the field is a string.
    fn require_slug(&mut self, key: &str) {
        let Some(Value::String(value)) = self.object.get(key) else {
            return;
        };
        if value.is_empty() {
            self.errors.push(FieldError::with_code(
                FieldErrorCode::TooSmall,
                key,
                "String must contain at least 1 character(s)".to_string(),
            ));
        } else if !is_url_safe(value) {
            self.errors.push(FieldError::with_code(
                FieldErrorCode::InvalidString,
                key,
                "Must contain only letters, digits, '-', '_', '.' and '~'".to_string(),
            ));
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

// =============================================================================
// SCHEMAS
// =============================================================================

impl InsertSchema for NewUser {
    const ENTITY: &'static str = "user";

    fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::of(body)?;
        let value = Self {
            username: f.required_text("username", MAX_SHORT_TEXT_LENGTH),
            password: f.required_text("password", MAX_SHORT_TEXT_LENGTH),
            name: f.optional_text("name", MAX_SHORT_TEXT_LENGTH),
            email: f.optional_text("email", MAX_SHORT_TEXT_LENGTH),
            is_admin: f.optional_bool("isAdmin"),
        };
        f.finish(value)
    }
}

impl InsertSchema for NewConcept {
    const ENTITY: &'static str = "concept";

    fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::of(body)?;
        let slug = f.required_text("slug", MAX_SHORT_TEXT_LENGTH);
        f.require_slug("slug");
        let value = Self {
            slug,
            title: f.required_text("title", MAX_SHORT_TEXT_LENGTH),
            description: f.optional_text("description", MAX_LONG_TEXT_LENGTH),
            category: f.required_text("category", MAX_SHORT_TEXT_LENGTH),
        };
        f.finish(value)
    }
}

impl InsertSchema for NewTheoryContent {
    const ENTITY: &'static str = "theory content";

    fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::of(body)?;
        let value = Self {
            concept_id: f.required_id("conceptId"),
            content: f.required_text("content", MAX_LONG_TEXT_LENGTH),
            references: f.optional_text("references", MAX_LONG_TEXT_LENGTH),
        };
        f.finish(value)
    }
}

impl InsertSchema for NewCodeImplementation {
    const ENTITY: &'static str = "code implementation";

    fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::of(body)?;
        let value = Self {
            concept_id: f.required_id("conceptId"),
            title: f.required_text("title", MAX_SHORT_TEXT_LENGTH),
            language: f.required_text("language", MAX_SHORT_TEXT_LENGTH),
            code: f.required_text("code", MAX_LONG_TEXT_LENGTH),
            description: f.optional_text("description", MAX_LONG_TEXT_LENGTH),
        };
        f.finish(value)
    }
}

impl InsertSchema for NewExperiment {
    const ENTITY: &'static str = "experiment";

    fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::of(body)?;
        let value = Self {
            concept_id: f.required_id("conceptId"),
            title: f.required_text("title", MAX_SHORT_TEXT_LENGTH),
            description: f.optional_text("description", MAX_LONG_TEXT_LENGTH),
            setup: f.optional_text("setup", MAX_LONG_TEXT_LENGTH),
            results: f.optional_json("results"),
            metrics: f.optional_json("metrics"),
        };
        f.finish(value)
    }
}

impl InsertSchema for NewPaper {
    const ENTITY: &'static str = "paper";

    fn parse(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::of(body)?;
        let value = Self {
            title: f.required_text("title", MAX_SHORT_TEXT_LENGTH),
            authors: f.required_text("authors", MAX_LONG_TEXT_LENGTH),
            year: f.required_i32("year"),
            conference: f.optional_text("conference", MAX_SHORT_TEXT_LENGTH),
            link: f.optional_text("link", MAX_SHORT_TEXT_LENGTH),
            r#abstract: f.optional_text("abstract", MAX_LONG_TEXT_LENGTH),
            key_points: f.optional_text("key_points", MAX_LONG_TEXT_LENGTH),
            concepts: f.optional_tags("concepts"),
        };
        f.finish(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
