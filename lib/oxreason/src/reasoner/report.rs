use crate::model::{Partition, Relation};
use crate::resource::Resource;
use crate::taxonomy::{EntryId, TaxonomyEntry};
use oxrdf::Graph;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// A relation materialized by a reasoner rule.
#[derive(Debug, Clone)]
pub struct ReasonerEvidence {
    relation: Relation,
    rule: Arc<str>,
    entry: TaxonomyEntry,
}

impl ReasonerEvidence {
    /// Records that `rule` added `entry` to the `relation` taxonomy.
    pub fn new(relation: Relation, rule: impl Into<Arc<str>>, entry: TaxonomyEntry) -> Self {
        Self {
            relation,
            rule: rule.into(),
            entry,
        }
    }

    /// The taxonomy the entry was inserted into.
    #[inline]
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// The model partition of the taxonomy.
    #[inline]
    pub fn partition(&self) -> Partition {
        self.relation.partition()
    }

    /// Name of the rule that produced the entry.
    #[inline]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// The materialized entry.
    #[inline]
    pub fn entry(&self) -> &TaxonomyEntry {
        &self.entry
    }
}

impl fmt::Display for ReasonerEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.rule, self.entry, self.relation)
    }
}

/// The relations materialized by a reasoning pass, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct ReasonerReport {
    evidences: Vec<ReasonerEvidence>,
    keys: FxHashSet<(Relation, EntryId)>,
}

impl ReasonerReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an evidence. Returns `false` if the same entry of the same taxonomy is already recorded.
    pub fn add(&mut self, evidence: ReasonerEvidence) -> bool {
        if !self.keys.insert((evidence.relation, evidence.entry.id())) {
            return false;
        }
        self.evidences.push(evidence);
        true
    }

    /// Adds the evidences of another report that are not already in this one.
    pub fn merge(&mut self, other: Self) {
        for evidence in other.evidences {
            self.add(evidence);
        }
    }

    /// Number of distinct materialized entries.
    #[inline]
    pub fn evidence_count(&self) -> usize {
        self.evidences.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.evidences.is_empty()
    }

    /// Evidences in the order they were produced.
    pub fn iter(&self) -> std::slice::Iter<'_, ReasonerEvidence> {
        self.evidences.iter()
    }

    /// Evidences that went into the `relation` taxonomy.
    pub fn select_by_relation(
        &self,
        relation: Relation,
    ) -> impl Iterator<Item = &ReasonerEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| evidence.relation == relation)
    }

    /// Evidences that went into a taxonomy of `partition`.
    pub fn select_by_partition(
        &self,
        partition: Partition,
    ) -> impl Iterator<Item = &ReasonerEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| evidence.partition() == partition)
    }

    /// Evidences produced by the rule named `rule`.
    pub fn select_by_rule<'a>(
        &'a self,
        rule: &'a str,
    ) -> impl Iterator<Item = &'a ReasonerEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| &*evidence.rule == rule)
    }

    /// Evidences whose entry has the given subject.
    pub fn select_by_subject<'a>(
        &'a self,
        subject: &'a Resource,
    ) -> impl Iterator<Item = &'a ReasonerEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| evidence.entry.subject() == subject)
    }

    /// Evidences whose entry has the given predicate.
    pub fn select_by_predicate<'a>(
        &'a self,
        predicate: &'a Resource,
    ) -> impl Iterator<Item = &'a ReasonerEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| evidence.entry.predicate() == predicate)
    }

    /// Evidences whose entry has the given object.
    pub fn select_by_object<'a>(
        &'a self,
        object: &'a Resource,
    ) -> impl Iterator<Item = &'a ReasonerEvidence> {
        self.evidences
            .iter()
            .filter(move |evidence| evidence.entry.object() == object)
    }

    /// The materialized relations as an RDF graph.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        for triple in self
            .evidences
            .iter()
            .filter_map(|evidence| evidence.entry.to_triple())
        {
            graph.insert(&triple);
        }
        graph
    }
}

impl<'a> IntoIterator for &'a ReasonerReport {
    type Item = &'a ReasonerEvidence;
    type IntoIter = std::slice::Iter<'a, ReasonerEvidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.evidences.iter()
    }
}

impl IntoIterator for ReasonerReport {
    type Item = ReasonerEvidence;
    type IntoIter = std::vec::IntoIter<ReasonerEvidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.evidences.into_iter()
    }
}
