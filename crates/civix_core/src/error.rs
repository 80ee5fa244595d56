use thiserror::Error;

#[derive(Debug, Error)]
pub enum CivicError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(ValidationError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CivicError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 403,
            Self::Internal(_) => 500,
        }
    }
}

/// A single attribute-validation failure. Validation is all-or-nothing:
/// the first failure aborts the whole submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// The schema attribute code the failure refers to.
    pub attribute: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, attribute: impl Into<String>) -> Self {
        Self {
            kind,
            attribute: attribute.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.attribute, self.kind.as_str())
    }
}

impl From<ValidationError> for CivicError {
    fn from(err: ValidationError) -> Self {
        CivicError::Validation(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MissingRequiredAttribute,
    InvalidNumber,
    InvalidDateTime,
    InvalidSelectValue,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredAttribute => "missing required attribute",
            Self::InvalidNumber => "invalid number",
            Self::InvalidDateTime => "invalid datetime",
            Self::InvalidSelectValue => "value not in permitted list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── http_status: exhaustive variant coverage ──────────────────

    #[test]
    fn http_status_not_found() {
        assert_eq!(CivicError::NotFound("x".into()).http_status(), 404);
    }

    #[test]
    fn http_status_validation() {
        let err = CivicError::Validation(ValidationError::new(
            ValidationErrorKind::InvalidNumber,
            "SDWLK_WIDTH",
        ));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn http_status_bad_request() {
        assert_eq!(CivicError::BadRequest("x".into()).http_status(), 400);
    }

    #[test]
    fn http_status_unauthorized() {
        assert_eq!(CivicError::Unauthorized("x".into()).http_status(), 403);
    }

    #[test]
    fn http_status_internal() {
        let err = CivicError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.http_status(), 500);
    }

    // ── Display ──────────────────────────────────────────────────

    #[test]
    fn display_not_found() {
        let e = CivicError::NotFound("no jurisdiction with id: x.gov".into());
        assert_eq!(e.to_string(), "not found: no jurisdiction with id: x.gov");
    }

    #[test]
    fn display_validation_names_attribute_and_kind() {
        let e = CivicError::from(ValidationError::new(
            ValidationErrorKind::MissingRequiredAttribute,
            "SDWLK",
        ));
        assert_eq!(
            e.to_string(),
            "validation failed: [SDWLK] missing required attribute"
        );
    }

    #[test]
    fn display_invalid_select() {
        let v = ValidationError::new(ValidationErrorKind::InvalidSelectValue, "SDWLK_SNGLIST");
        assert_eq!(v.to_string(), "[SDWLK_SNGLIST] value not in permitted list");
    }

    #[test]
    fn display_internal() {
        let e = CivicError::Internal(anyhow::anyhow!("connection reset"));
        assert_eq!(e.to_string(), "internal: connection reset");
    }
}
