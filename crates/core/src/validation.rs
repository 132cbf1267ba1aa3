/// Stateless field checks applied before an entity is persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    /// Returns `false` when the name is absent or empty. Whitespace is not trimmed.
    pub fn validate_full_name(&self, candidate: Option<&str>) -> bool {
        matches!(candidate, Some(name) if !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_name() {
        assert!(!FieldValidator::new().validate_full_name(None));
    }

    #[test]
    fn rejects_empty_name() {
        assert!(!FieldValidator::new().validate_full_name(Some("")));
    }

    #[test]
    fn accepts_regular_name() {
        assert!(FieldValidator::new().validate_full_name(Some("Bob")));
    }

    #[test]
    fn accepts_whitespace_only_name() {
        assert!(FieldValidator::new().validate_full_name(Some("   ")));
    }
}
