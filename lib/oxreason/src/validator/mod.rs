//! Consistency validator.
//!
//! Rules are read-only and independent from each other: [`Validator::analyze`] runs them on the
//! rayon thread pool and concatenates their evidences in catalog order.

mod report;
mod rules;

pub use report::{EvidenceCategory, ValidationEvidence, ValidationReport};
pub use rules::ConsistencyRule;

use crate::error::RuleError;
use crate::model::KnowledgeModel;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

type RuleFn = dyn Fn(&KnowledgeModel) -> Vec<ValidationEvidence> + Send + Sync;

/// A consistency rule of the validator catalog.
///
/// ```
/// use oxreason::{KnowledgeModel, ValidationEvidence, Validator, ValidatorRule};
///
/// let mut validator = Validator::new();
/// validator.add_rule(ValidatorRule::new(
///     "NonEmpty",
///     "The model declares at least one class",
///     |model: &KnowledgeModel| {
///         if model.classes().is_empty() {
///             vec![ValidationEvidence::warning("NonEmpty", "No class is declared", "Declare a class")]
///         } else {
///             Vec::new()
///         }
///     },
/// ))?;
/// let report = validator.analyze(&KnowledgeModel::new());
/// assert_eq!(report.select_warnings().count(), 1);
/// assert!(report.is_consistent());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct ValidatorRule {
    name: String,
    description: String,
    eval: Box<RuleFn>,
}

impl ValidatorRule {
    /// Creates a rule from its evaluation function.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        eval: impl Fn(&KnowledgeModel) -> Vec<ValidationEvidence> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            eval: Box::new(eval),
        }
    }

    /// Unique name of the rule in a validator catalog.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Runs the rule against the model.
    pub fn evaluate(&self, model: &KnowledgeModel) -> Vec<ValidationEvidence> {
        (self.eval)(model)
    }
}

impl fmt::Debug for ValidatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRule")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl From<ConsistencyRule> for ValidatorRule {
    fn from(rule: ConsistencyRule) -> Self {
        Self::new(rule.name(), rule.description(), move |model| {
            rule.evaluate(model)
        })
    }
}

/// Configuration for the validator.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Whether rules run on the rayon thread pool. The report is the same either way.
    pub parallel: bool,
    /// Names of the rules to skip.
    pub excluded_rules: FxHashSet<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            excluded_rules: FxHashSet::default(),
        }
    }
}

/// Checks a [`KnowledgeModel`] against a catalog of consistency rules.
///
/// ```
/// use oxreason::{Class, KnowledgeModel, Validator, vocab::rdf};
///
/// let mut model = KnowledgeModel::new();
/// model.classes_mut().declare_class(Class::new(rdf::BAG.into()));
/// let report = Validator::new().analyze(&model);
/// assert_eq!(report.select_errors().count(), 1);
/// assert_eq!(report.select_by_rule("Vocabulary_Reservation").count(), 1);
/// ```
#[derive(Debug)]
pub struct Validator {
    rules: Vec<ValidatorRule>,
    config: ValidatorConfig,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator with the built-in rules.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Creates a validator with the built-in rules and a custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            rules: ConsistencyRule::all()
                .iter()
                .map(|rule| ValidatorRule::from(*rule))
                .collect(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Adds a custom rule at the end of the catalog.
    pub fn add_rule(&mut self, rule: ValidatorRule) -> Result<(), RuleError> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(RuleError::duplicate_rule(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// The catalog, in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &ValidatorRule> {
        self.rules.iter()
    }

    /// Runs every enabled rule against the model without modifying it.
    pub fn analyze(&self, model: &KnowledgeModel) -> ValidationReport {
        let start = Instant::now();
        let rules: Vec<&ValidatorRule> = self
            .rules
            .iter()
            .filter(|rule| !self.config.excluded_rules.contains(rule.name()))
            .collect();
        let results: Vec<Vec<ValidationEvidence>> = if self.config.parallel {
            rules.par_iter().map(|rule| run_rule(rule, model)).collect()
        } else {
            rules.iter().map(|rule| run_rule(rule, model)).collect()
        };
        let mut report = ValidationReport::new();
        for evidences in results {
            report.extend(evidences);
        }
        info!(
            evidences = report.evidence_count(),
            errors = report.select_errors().count(),
            elapsed = ?start.elapsed(),
            "validation completed"
        );
        report
    }
}

fn run_rule(rule: &ValidatorRule, model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let start = Instant::now();
    let evidences = rule.evaluate(model);
    debug!(
        rule = rule.name(),
        evidences = evidences.len(),
        elapsed = ?start.elapsed(),
        "applied validator rule"
    );
    evidences
}
