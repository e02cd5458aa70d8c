//! Request validation
//!
//! Checks path parameters and headers before any business logic runs. Rules
//! are evaluated in order and the first failure short-circuits the chain.

pub mod rules;

pub use rules::{HeaderValueRule, PathPatternRule, ValidationRule};

use crate::core::ObjectId;
use http::HeaderMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Shape of an activity id on the wire.
pub const OBJECT_ID_PATTERN: &str = "^[a-fA-F0-9]{24}$";
pub const JSON_CONTENT_TYPE: &str = "application/json";

lazy_static! {
    static ref OBJECT_ID_REGEX: Regex =
        Regex::new(OBJECT_ID_PATTERN).expect("object id pattern is a valid regex");
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    Required,
    PatternMismatch { pattern: String },
    NotAllowed { allowed: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: String,
    value: Option<String>,
    reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, value: Option<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            value,
            reason,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn reason(&self) -> &ValidationReason {
        &self.reason
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ValidationReason::Required => write!(f, "\"{}\" is required", self.field),
            ValidationReason::PatternMismatch { pattern } => write!(
                f,
                "\"{}\" with value \"{}\" fails to match the required pattern: /{}/",
                self.field,
                self.value.as_deref().unwrap_or_default(),
                pattern
            ),
            ValidationReason::NotAllowed { allowed } if allowed.len() == 1 => {
                write!(f, "\"{}\" must be [{}]", self.field, allowed[0])
            }
            ValidationReason::NotAllowed { allowed } => write!(
                f,
                "\"{}\" must be one of [{}]",
                self.field,
                allowed.join(", ")
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The parts of a request the validator looks at.
#[derive(Debug, Clone)]
pub struct RequestInput<'a> {
    params: Vec<(&'a str, &'a str)>,
    headers: &'a HeaderMap,
}

impl<'a> RequestInput<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self {
            params: Vec::new(),
            headers,
        }
    }

    pub fn with_param(mut self, name: &'a str, value: &'a str) -> Self {
        self.params.push((name, value));
        self
    }

    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    /// Parses a path parameter that has already passed an id rule.
    pub fn object_id(&self, name: &str) -> Result<ObjectId, ValidationError> {
        let value = self
            .param(name)
            .ok_or_else(|| ValidationError::new(name, None, ValidationReason::Required))?;
        value.parse().map_err(|_| {
            ValidationError::new(
                name,
                Some(value.to_string()),
                ValidationReason::PatternMismatch {
                    pattern: OBJECT_ID_PATTERN.to_string(),
                },
            )
        })
    }
}

/// Ordered, stateless chain of validation rules.
#[derive(Default)]
pub struct RequestValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// `id` path parameter followed by a JSON content type.
    pub fn activity_transition() -> Self {
        Self::activity_id().with_rule(HeaderValueRule::new("content-type", [JSON_CONTENT_TYPE]))
    }

    /// `id` path parameter only.
    pub fn activity_id() -> Self {
        Self::new().with_rule(PathPatternRule::new("id", &OBJECT_ID_REGEX))
    }

    /// JSON content type only.
    pub fn json_body() -> Self {
        Self::new().with_rule(HeaderValueRule::new("content-type", [JSON_CONTENT_TYPE]))
    }

    pub fn validate<'a>(&self, request: RequestInput<'a>) -> Result<RequestInput<'a>, ValidationError> {
        for rule in &self.rules {
            rule.validate(&request)?;
        }
        Ok(request)
    }
}

/// Validators used by the HTTP routes, built once at startup.
pub struct Validators {
    pub transition: RequestValidator,
    pub lookup: RequestValidator,
    pub create: RequestValidator,
}

impl Default for Validators {
    fn default() -> Self {
        Self {
            transition: RequestValidator::activity_transition(),
            lookup: RequestValidator::activity_id(),
            create: RequestValidator::json_body(),
        }
    }
}
