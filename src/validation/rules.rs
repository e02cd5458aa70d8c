use super::{RequestInput, ValidationError, ValidationReason};
use regex::Regex;

/// Trait for request validation rules (Chain of Responsibility pattern)
pub trait ValidationRule: Send + Sync {
    fn validate(&self, request: &RequestInput<'_>) -> Result<(), ValidationError>;
}

/// Requires a path parameter matching a regular expression
pub struct PathPatternRule {
    field: &'static str,
    pattern: &'static Regex,
}

impl PathPatternRule {
    pub fn new(field: &'static str, pattern: &'static Regex) -> Self {
        Self { field, pattern }
    }
}

impl ValidationRule for PathPatternRule {
    fn validate(&self, request: &RequestInput<'_>) -> Result<(), ValidationError> {
        let value = request
            .param(self.field)
            .ok_or_else(|| ValidationError::new(self.field, None, ValidationReason::Required))?;

        if self.pattern.is_match(value) {
            return Ok(());
        }
        Err(ValidationError::new(
            self.field,
            Some(value.to_string()),
            ValidationReason::PatternMismatch {
                pattern: self.pattern.as_str().to_string(),
            },
        ))
    }
}

/// Requires a header whose value is one of an allowed set.
///
/// Values are compared ASCII case-insensitively after trimming. Headers not
/// named by any rule are ignored.
pub struct HeaderValueRule {
    name: &'static str,
    allowed: Vec<&'static str>,
}

impl HeaderValueRule {
    pub fn new(name: &'static str, allowed: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            name,
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl ValidationRule for HeaderValueRule {
    fn validate(&self, request: &RequestInput<'_>) -> Result<(), ValidationError> {
        let Some(raw) = request.headers().get(self.name) else {
            return Err(ValidationError::new(self.name, None, ValidationReason::Required));
        };

        let value = raw.to_str().map(str::trim).unwrap_or_default();
        if self
            .allowed
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(value))
        {
            return Ok(());
        }

        Err(ValidationError::new(
            self.name,
            Some(value.to_string()),
            ValidationReason::NotAllowed {
                allowed: self.allowed.iter().map(|a| a.to_string()).collect(),
            },
        ))
    }
}
