//! Data partition of a knowledge model: facts, literals and the relations between them.
//!
//! Guards that need the class or property partitions live on
//! [`KnowledgeModel`](super::KnowledgeModel).

use crate::resource::{Resource, ResourceId};
use crate::taxonomy::{Taxonomy, TaxonomyCategory, TaxonomyEntry};
use std::collections::BTreeMap;
use tracing::warn;

/// Declared facts and literals and the taxonomies relating them.
#[expect(clippy::field_scoped_visibility_modifiers)]
#[derive(Debug, Clone)]
pub struct DataModel {
    pub(crate) facts: BTreeMap<ResourceId, Resource>,
    pub(crate) literals: BTreeMap<ResourceId, Resource>,
    pub(crate) class_type: Taxonomy,
    pub(crate) same_as: Taxonomy,
    pub(crate) different_from: Taxonomy,
    pub(crate) assertions: Taxonomy,
    pub(crate) negative_assertions: Taxonomy,
    pub(crate) annotations: Taxonomy,
}

impl Default for DataModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataModel {
    pub fn new() -> Self {
        Self {
            facts: BTreeMap::new(),
            literals: BTreeMap::new(),
            class_type: Taxonomy::new(TaxonomyCategory::Data),
            same_as: Taxonomy::new(TaxonomyCategory::Data),
            different_from: Taxonomy::new(TaxonomyCategory::Data),
            assertions: Taxonomy::new(TaxonomyCategory::Data),
            negative_assertions: Taxonomy::new(TaxonomyCategory::Data),
            annotations: Taxonomy::new(TaxonomyCategory::Annotation),
        }
    }

    /// Declares a fact, i.e. a named or anonymous individual.
    ///
    /// Literals are rejected: use [`declare_literal`](Self::declare_literal).
    pub fn declare_fact(&mut self, fact: Resource) -> bool {
        if fact.is_literal() {
            warn!(%fact, "rejected fact declaration: literals are not facts");
            return false;
        }
        let id = fact.id();
        if self.facts.contains_key(&id) {
            return false;
        }
        self.facts.insert(id, fact);
        true
    }

    /// Declares a literal.
    pub fn declare_literal(&mut self, literal: Resource) -> bool {
        if !literal.is_literal() {
            warn!(%literal, "rejected literal declaration: not a literal");
            return false;
        }
        let id = literal.id();
        if self.literals.contains_key(&id) {
            return false;
        }
        self.literals.insert(id, literal);
        true
    }

    /// Checks if the resource is a declared fact.
    #[inline]
    pub fn contains_fact(&self, fact: &Resource) -> bool {
        self.facts.contains_key(&fact.id())
    }

    #[inline]
    pub fn contains_literal(&self, literal: &Resource) -> bool {
        self.literals.contains_key(&literal.id())
    }

    /// All declared facts, ordered by id.
    pub fn facts(&self) -> impl Iterator<Item = &Resource> {
        self.facts.values()
    }

    /// All declared literals, ordered by id.
    pub fn literals(&self) -> impl Iterator<Item = &Resource> {
        self.literals.values()
    }

    /// Annotates a fact.
    pub fn annotate(&mut self, fact: &Resource, property: &Resource, value: &Resource) -> bool {
        self.annotations.add(TaxonomyEntry::new(
            fact.clone(),
            property.clone(),
            value.clone(),
        ))
    }

    /// `rdf:type` relations from facts to classes.
    pub fn class_type(&self) -> &Taxonomy {
        &self.class_type
    }

    /// `owl:sameAs` relations. Both directions are stored.
    pub fn same_as(&self) -> &Taxonomy {
        &self.same_as
    }

    /// `owl:differentFrom` relations. Both directions are stored.
    pub fn different_from(&self) -> &Taxonomy {
        &self.different_from
    }

    /// Property assertions between facts, or from a fact to a literal.
    pub fn assertions(&self) -> &Taxonomy {
        &self.assertions
    }

    /// Negative property assertions.
    pub fn negative_assertions(&self) -> &Taxonomy {
        &self.negative_assertions
    }

    pub fn annotations(&self) -> &Taxonomy {
        &self.annotations
    }

    /// Returns the facts, literals and relations of both models.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut facts = self.facts.clone();
        for (id, fact) in &other.facts {
            facts.entry(*id).or_insert_with(|| fact.clone());
        }
        let mut literals = self.literals.clone();
        for (id, literal) in &other.literals {
            literals.entry(*id).or_insert_with(|| literal.clone());
        }
        Self {
            facts,
            literals,
            class_type: self.class_type.union(&other.class_type),
            same_as: self.same_as.union(&other.same_as),
            different_from: self.different_from.union(&other.different_from),
            assertions: self.assertions.union(&other.assertions),
            negative_assertions: self.negative_assertions.union(&other.negative_assertions),
            annotations: self.annotations.union(&other.annotations),
        }
    }

    /// Returns the facts, literals and relations present in both models.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            facts: retain_keys(&self.facts, |id| other.facts.contains_key(id)),
            literals: retain_keys(&self.literals, |id| other.literals.contains_key(id)),
            class_type: self.class_type.intersect(&other.class_type),
            same_as: self.same_as.intersect(&other.same_as),
            different_from: self.different_from.intersect(&other.different_from),
            assertions: self.assertions.intersect(&other.assertions),
            negative_assertions: self
                .negative_assertions
                .intersect(&other.negative_assertions),
            annotations: self.annotations.intersect(&other.annotations),
        }
    }

    /// Returns the facts, literals and relations of `self` missing from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            facts: retain_keys(&self.facts, |id| !other.facts.contains_key(id)),
            literals: retain_keys(&self.literals, |id| !other.literals.contains_key(id)),
            class_type: self.class_type.difference(&other.class_type),
            same_as: self.same_as.difference(&other.same_as),
            different_from: self.different_from.difference(&other.different_from),
            assertions: self.assertions.difference(&other.assertions),
            negative_assertions: self
                .negative_assertions
                .difference(&other.negative_assertions),
            annotations: self.annotations.difference(&other.annotations),
        }
    }
}

fn retain_keys(
    map: &BTreeMap<ResourceId, Resource>,
    keep: impl Fn(&ResourceId) -> bool,
) -> BTreeMap<ResourceId, Resource> {
    map.iter()
        .filter(|(id, _)| keep(id))
        .map(|(id, resource)| (*id, resource.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_and_literals_are_kept_apart() {
        let mut data = DataModel::new();
        let alice = Resource::named("http://example.org/Alice").unwrap();
        let name = Resource::plain_literal("Alice", None).unwrap();
        assert!(data.declare_fact(alice.clone()));
        assert!(!data.declare_fact(alice.clone()));
        assert!(!data.declare_fact(name.clone()));
        assert!(data.declare_literal(name.clone()));
        assert!(!data.declare_literal(alice.clone()));
        assert!(data.contains_fact(&alice));
        assert!(data.contains_literal(&name));
        assert_eq!(data.facts().count(), 1);
    }
}
