//! Forward-chaining reasoner.
//!
//! A reasoning pass is one ordered sweep over the rule catalog: the built-in rules run first,
//! by ascending priority, followed by the custom rules. Entries entailed by a rule are visible
//! to the rules running after it, so most entailment chains are materialized in one pass.
//! Chains going back to an earlier rule need another call to [`Reasoner::apply`].

mod report;
mod rules;

pub use report::{ReasonerEvidence, ReasonerReport};
pub use rules::{BASE_MAX_PRIORITY, BaseRule};

use crate::error::RuleError;
use crate::model::{KnowledgeModel, Relation, base_ontology, expand, unexpand};
use crate::resource::Resource;
use crate::taxonomy::{InferenceType, TaxonomyEntry};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// An entry entailed by a rule, with the taxonomy it belongs to.
#[derive(Debug, Clone)]
pub struct Entailment {
    relation: Relation,
    entry: TaxonomyEntry,
}

impl Entailment {
    /// Creates an entailment tagged [`InferenceType::Reasoner`].
    pub fn new(
        relation: Relation,
        subject: Resource,
        predicate: Resource,
        object: Resource,
    ) -> Self {
        Self {
            relation,
            entry: TaxonomyEntry::new(subject, predicate, object)
                .with_inference(InferenceType::Reasoner),
        }
    }

    /// The taxonomy the entailed entry goes into.
    #[inline]
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// The entailed entry, marked as [`InferenceType::Reasoner`].
    #[inline]
    pub fn entry(&self) -> &TaxonomyEntry {
        &self.entry
    }
}

type RuleFn = dyn Fn(&KnowledgeModel) -> Vec<Entailment> + Send + Sync;

/// An entailment rule of the reasoner catalog.
///
/// ```
/// use oxreason::{Entailment, KnowledgeModel, ReasonerReport, ReasonerRule, Relation};
///
/// // Every fact is the same as itself
/// let rule = ReasonerRule::new("SameAsReflexivity", "(F) => (F SAMEAS F)", 20, |model: &KnowledgeModel| {
///     model
///         .data()
///         .facts()
///         .map(|fact| {
///             Entailment::new(
///                 Relation::SameAs,
///                 fact.clone(),
///                 oxreason::vocab::owl::SAME_AS.into(),
///                 fact.clone(),
///             )
///         })
///         .collect()
/// });
/// let mut model = KnowledgeModel::new();
/// model.data_mut().declare_fact(oxreason::Resource::named("http://example.org/a")?);
/// let mut report = ReasonerReport::new();
/// assert_eq!(rule.apply(&mut model, &mut report), 1);
/// assert_eq!(report.evidence_count(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct ReasonerRule {
    name: Arc<str>,
    description: String,
    priority: u32,
    eval: Box<RuleFn>,
}

impl ReasonerRule {
    /// Creates a rule from its evaluation function.
    ///
    /// Priorities up to 15 are reserved for the built-in rules: a custom rule registered
    /// with such a priority through [`Reasoner::add_rule`] is shifted after them.
    pub fn new(
        name: impl Into<Arc<str>>,
        description: impl Into<String>,
        priority: u32,
        eval: impl Fn(&KnowledgeModel) -> Vec<Entailment> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            priority,
            eval: Box::new(eval),
        }
    }

    /// Unique name of the rule in a reasoner catalog.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rules run by increasing priority.
    #[inline]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Computes the entailments of the rule without touching the model.
    pub fn evaluate(&self, model: &KnowledgeModel) -> Vec<Entailment> {
        (self.eval)(model)
    }

    /// Inserts the entailments of the rule into the model.
    ///
    /// Only the entries that were not already in the model are recorded in the report.
    /// Returns the number of recorded evidences.
    pub fn apply(&self, model: &mut KnowledgeModel, report: &mut ReasonerReport) -> usize {
        let mut count = 0;
        for Entailment { relation, entry } in self.evaluate(model) {
            if model.taxonomy_mut(relation).add(entry.clone())
                && report.add(ReasonerEvidence::new(relation, Arc::clone(&self.name), entry))
            {
                count += 1;
            }
        }
        count
    }
}

impl fmt::Debug for ReasonerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasonerRule")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl From<BaseRule> for ReasonerRule {
    fn from(rule: BaseRule) -> Self {
        Self::new(rule.name(), rule.description(), rule.priority(), move |model| {
            rule.evaluate(model)
        })
    }
}

/// Configuration for the reasoner.
#[derive(Debug, Clone)]
pub struct ReasonerConfig {
    /// Whether the built-in rules run.
    pub base_rules: bool,
    /// Names of the rules to skip.
    pub excluded_rules: FxHashSet<String>,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            base_rules: true,
            excluded_rules: FxHashSet::default(),
        }
    }
}

/// Forward-chaining reasoner materializing entailed relations into a [`KnowledgeModel`].
///
/// ```
/// use oxreason::{KnowledgeModel, Reasoner, Resource};
///
/// let mut model = KnowledgeModel::new();
/// let [a, b, c] = ["a", "b", "c"]
///     .map(|f| Resource::named(format!("http://example.org/{f}")).unwrap());
/// model.add_same_as(&a, &b);
/// model.add_same_as(&b, &c);
///
/// let report = Reasoner::new().apply(&mut model);
/// assert_eq!(report.evidence_count(), 2);
/// assert_eq!(model.data().same_as().len(), 6);
/// ```
#[derive(Debug)]
pub struct Reasoner {
    base: Arc<KnowledgeModel>,
    rules: Vec<ReasonerRule>,
    config: ReasonerConfig,
}

impl Default for Reasoner {
    fn default() -> Self {
        Self::new()
    }
}

impl Reasoner {
    /// Creates a reasoner with the built-in rules and the default BASE ontology.
    pub fn new() -> Self {
        Self::with_config(ReasonerConfig::default())
    }

    /// Creates a reasoner with the built-in rules and a custom configuration.
    pub fn with_config(config: ReasonerConfig) -> Self {
        Self::with_base(Arc::new(base_ontology()), config)
    }

    /// Creates a reasoner sharing an already built BASE ontology.
    pub fn with_base(base: Arc<KnowledgeModel>, config: ReasonerConfig) -> Self {
        Self {
            base,
            rules: BaseRule::all()
                .iter()
                .map(|rule| ReasonerRule::from(*rule))
                .collect(),
            config,
        }
    }

    /// The BASE ontology unioned into models during a pass.
    pub fn base(&self) -> &Arc<KnowledgeModel> {
        &self.base
    }

    #[inline]
    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    /// Adds a custom rule to the catalog.
    ///
    /// Custom rules always run after the built-in ones: a priority lower or equal to
    /// [`BASE_MAX_PRIORITY`] is shifted above it.
    pub fn add_rule(&mut self, mut rule: ReasonerRule) -> Result<(), RuleError> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(RuleError::duplicate_rule(rule.name()));
        }
        if rule.priority <= BASE_MAX_PRIORITY {
            rule.priority += BASE_MAX_PRIORITY + 1;
        }
        self.rules.push(rule);
        // Stable: custom rules with the same priority keep their insertion order
        self.rules.sort_by_key(|r| r.priority);
        Ok(())
    }

    /// The rules of the catalog, in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &ReasonerRule> {
        self.rules.iter()
    }

    fn is_enabled(&self, rule: &ReasonerRule) -> bool {
        if rule.priority <= BASE_MAX_PRIORITY && !self.config.base_rules {
            return false;
        }
        !self.config.excluded_rules.contains(rule.name())
    }

    /// Runs one reasoning pass over the model.
    ///
    /// The model is expanded with the BASE ontology, every enabled rule is applied once in
    /// priority order, then what the BASE ontology contributed is removed again.
    pub fn apply(&self, model: &mut KnowledgeModel) -> ReasonerReport {
        let start = Instant::now();
        let contributed = self.base.difference(model);
        let mut expanded = expand(model, &self.base);
        let mut report = ReasonerReport::new();
        for rule in self.rules.iter().filter(|rule| self.is_enabled(rule)) {
            let rule_start = Instant::now();
            let count = rule.apply(&mut expanded, &mut report);
            debug!(
                rule = rule.name(),
                priority = rule.priority(),
                evidences = count,
                elapsed = ?rule_start.elapsed(),
                "applied reasoner rule"
            );
        }
        *model = unexpand(&expanded, &contributed);
        info!(
            evidences = report.evidence_count(),
            elapsed = ?start.elapsed(),
            "reasoning pass completed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_rules_run_after_base_rules() {
        let mut reasoner = Reasoner::new();
        reasoner
            .add_rule(ReasonerRule::new("Custom", "", 3, |_| Vec::new()))
            .unwrap();
        let last = reasoner.rules().last().unwrap();
        assert_eq!(last.name(), "Custom");
        assert_eq!(last.priority(), 19);
        assert!(matches!(
            reasoner.add_rule(ReasonerRule::new("SameAsEntailment", "", 30, |_| Vec::new())),
            Err(RuleError::DuplicateRule { .. })
        ));
    }

    #[test]
    fn test_configuration_disables_rules() {
        let mut model = KnowledgeModel::new();
        let [a, b, c] = ["a", "b", "c"]
            .map(|f| Resource::named(format!("http://example.org/{f}")).unwrap());
        model.add_same_as(&a, &b);
        model.add_same_as(&b, &c);

        let mut config = ReasonerConfig::default();
        config
            .excluded_rules
            .insert(BaseRule::SameAsTransitivity.name().to_owned());
        assert!(Reasoner::with_config(config).apply(&mut model).is_empty());

        let config = ReasonerConfig {
            base_rules: false,
            ..ReasonerConfig::default()
        };
        assert!(Reasoner::with_config(config).apply(&mut model).is_empty());
        assert_eq!(model.data().same_as().len(), 4);
    }
}
