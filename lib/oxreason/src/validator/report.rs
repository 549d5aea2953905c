use std::fmt;
use std::sync::Arc;

/// Severity of a validation evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceCategory {
    /// A logical violation: the model is inconsistent.
    Error,
    /// An advisory finding.
    Warning,
}

impl fmt::Display for EvidenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("Error"),
            Self::Warning => f.write_str("Warning"),
        }
    }
}

/// A problem found by a validator rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvidence {
    category: EvidenceCategory,
    rule: Arc<str>,
    message: String,
    suggestion: String,
}

impl ValidationEvidence {
    pub fn new(
        category: EvidenceCategory,
        rule: impl Into<Arc<str>>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            category,
            rule: rule.into(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Builds an [`EvidenceCategory::Error`] evidence.
    pub fn error(
        rule: impl Into<Arc<str>>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::new(EvidenceCategory::Error, rule, message, suggestion)
    }

    /// Builds an [`EvidenceCategory::Warning`] evidence.
    pub fn warning(
        rule: impl Into<Arc<str>>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::new(EvidenceCategory::Warning, rule, message, suggestion)
    }

    #[inline]
    pub fn category(&self) -> EvidenceCategory {
        self.category
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.category == EvidenceCategory::Error
    }

    /// Name of the rule that found the problem.
    #[inline]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// What is wrong.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// How the problem could be fixed.
    #[inline]
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }
}

impl fmt::Display for ValidationEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.rule, self.message)?;
        if !self.suggestion.is_empty() {
            write!(f, " ({})", self.suggestion)?;
        }
        Ok(())
    }
}

/// The problems found by a validation run, in catalog order.
///
/// Evidences are not deduplicated: two rules reporting the same problem give two evidences.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    evidences: Vec<ValidationEvidence>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, evidence: ValidationEvidence) {
        self.evidences.push(evidence);
    }

    /// Appends the evidences of another report.
    pub fn merge(&mut self, other: Self) {
        self.evidences.extend(other.evidences);
    }

    #[inline]
    pub fn evidence_count(&self) -> usize {
        self.evidences.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.evidences.is_empty()
    }

    /// Returns true if no rule found an error. Warnings do not count.
    pub fn is_consistent(&self) -> bool {
        !self.evidences.iter().any(ValidationEvidence::is_error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationEvidence> {
        self.evidences.iter()
    }

    /// Evidences that make the model inconsistent.
    pub fn select_errors(&self) -> impl Iterator<Item = &ValidationEvidence> {
        self.evidences.iter().filter(|evidence| evidence.is_error())
    }

    /// Advisory evidences.
    pub fn select_warnings(&self) -> impl Iterator<Item = &ValidationEvidence> {
        self.evidences.iter().filter(|evidence| !evidence.is_error())
    }

    /// Evidences found by the rule named `rule`.
    pub fn select_by_rule<'a>(
        &'a self,
        rule: &'a str,
    ) -> impl Iterator<Item = &'a ValidationEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| &*evidence.rule == rule)
    }
}

impl Extend<ValidationEvidence> for ValidationReport {
    fn extend<I: IntoIterator<Item = ValidationEvidence>>(&mut self, iter: I) {
        self.evidences.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationEvidence;
    type IntoIter = std::slice::Iter<'a, ValidationEvidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.evidences.iter()
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationEvidence;
    type IntoIter = std::vec::IntoIter<ValidationEvidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.evidences.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection() {
        let mut report = ValidationReport::new();
        assert!(report.is_consistent());
        report.add(ValidationEvidence::warning("Deprecation", "deprecated class", ""));
        assert!(report.is_consistent());
        report.extend([ValidationEvidence::error(
            "ClassType",
            "disjoint classtypes",
            "remove one of them",
        )]);
        assert!(!report.is_consistent());
        assert_eq!(report.evidence_count(), 2);
        assert_eq!(report.select_errors().count(), 1);
        assert_eq!(report.select_warnings().count(), 1);
        assert_eq!(report.select_by_rule("ClassType").count(), 1);
        assert_eq!(
            report.iter().nth(1).unwrap().to_string(),
            "[Error] ClassType: disjoint classtypes (remove one of them)"
        );
    }
}
