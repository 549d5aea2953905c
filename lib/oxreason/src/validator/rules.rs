//! The built-in consistency rules.
//!
//! Rules only read the model. None of them depend on another, so they can run in any order.

use super::ValidationEvidence;
use crate::closure::{
    equivalent_classes_of, inverse_properties_of, is_disjoint_class, is_sub_class_of,
    same_facts_as, sub_properties_of, super_properties_of,
};
use crate::membership::{MembershipCache, is_literal_compatible_class};
use crate::model::{
    ANNOTATION_PROPERTIES, Class, ClassModel, DataModel, KnowledgeModel, Partition, Property,
    Relation,
};
use crate::resource::{Resource, ResourceId};
use crate::taxonomy::TaxonomyEntry;
use crate::vocab::{is_datatype_iri, is_forbidden_iri, is_reserved_iri};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::fmt;

/// Built-in consistency rule identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyRule {
    VocabularyReservation,
    VocabularyDisjointness,
    VocabularyDeclaration,
    DomainRange,
    InverseOf,
    SymmetricProperty,
    ClassType,
    GlobalCardinalityConstraint,
    LocalCardinalityConstraint,
    Deprecation,
    NegativeAssertions,
}

impl ConsistencyRule {
    /// Every rule, in catalog order.
    pub fn all() -> &'static [Self] {
        &[
            Self::VocabularyReservation,
            Self::VocabularyDisjointness,
            Self::VocabularyDeclaration,
            Self::DomainRange,
            Self::InverseOf,
            Self::SymmetricProperty,
            Self::ClassType,
            Self::GlobalCardinalityConstraint,
            Self::LocalCardinalityConstraint,
            Self::Deprecation,
            Self::NegativeAssertions,
        ]
    }

    /// Name of the rule in the validator catalog.
    pub fn name(self) -> &'static str {
        match self {
            Self::VocabularyReservation => "Vocabulary_Reservation",
            Self::VocabularyDisjointness => "Vocabulary_Disjointness",
            Self::VocabularyDeclaration => "Vocabulary_Declaration",
            Self::DomainRange => "Domain_Range",
            Self::InverseOf => "InverseOf",
            Self::SymmetricProperty => "SymmetricProperty",
            Self::ClassType => "ClassType",
            Self::GlobalCardinalityConstraint => "GlobalCardinalityConstraint",
            Self::LocalCardinalityConstraint => "LocalCardinalityConstraint",
            Self::Deprecation => "Deprecation",
            Self::NegativeAssertions => "NegativeAssertions",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::VocabularyReservation => {
                "Classes, properties and facts cannot be named in the RDF, RDFS or OWL namespaces"
            }
            Self::VocabularyDisjointness => {
                "The same identifier cannot be used for a class, a property and a fact"
            }
            Self::VocabularyDeclaration => {
                "Every resource used by a relation is declared, and every fact has a classtype"
            }
            Self::DomainRange => {
                "Domains are not literal-compatible and assertions respect the domain and range of their property"
            }
            Self::InverseOf => {
                "The domain of a property is compatible with the range of its inverse and conversely"
            }
            Self::SymmetricProperty => {
                "Assertions of a symmetric property still respect its domain and range once mirrored"
            }
            Self::ClassType => {
                "Facts are not typed with literal-compatible classes nor with disjoint classes"
            }
            Self::GlobalCardinalityConstraint => {
                "Functional and inverse functional properties have one value per fact and are not transitive"
            }
            Self::LocalCardinalityConstraint => {
                "Properties restricted by a cardinality, their subproperties and inverses are not transitive"
            }
            Self::Deprecation => {
                "Facts are not typed with deprecated classes nor use deprecated properties"
            }
            Self::NegativeAssertions => "An assertion is not both asserted and negatively asserted",
        }
    }

    /// Runs the rule against the model.
    pub fn evaluate(self, model: &KnowledgeModel) -> Vec<ValidationEvidence> {
        match self {
            Self::VocabularyReservation => vocabulary_reservation(model),
            Self::VocabularyDisjointness => vocabulary_disjointness(model),
            Self::VocabularyDeclaration => vocabulary_declaration(model),
            Self::DomainRange => domain_range(model),
            Self::InverseOf => inverse_of(model),
            Self::SymmetricProperty => symmetric_property(model),
            Self::ClassType => class_type(model),
            Self::GlobalCardinalityConstraint => global_cardinality_constraint(model),
            Self::LocalCardinalityConstraint => local_cardinality_constraint(model),
            Self::Deprecation => deprecation(model),
            Self::NegativeAssertions => negative_assertions(model),
        }
    }
}

fn vocabulary_reservation(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::VocabularyReservation.name();
    // Datatypes and the standard annotation properties are part of the BASE ontology
    let forbidden = |resource: &Resource| {
        resource
            .iri()
            .is_some_and(|iri| is_forbidden_iri(iri) && !is_datatype_iri(iri))
    };
    let mut evidences = Vec::new();
    for class in model.classes().classes().map(Class::resource) {
        if forbidden(class) {
            evidences.push(ValidationEvidence::error(
                rule,
                format!("The class {class} is named in a reserved namespace"),
                "Rename the class outside of the RDF, RDFS and OWL namespaces",
            ));
        }
    }
    for property in model.properties().properties().map(Property::resource) {
        if forbidden(property)
            && !ANNOTATION_PROPERTIES
                .iter()
                .any(|annotation| property.is(*annotation))
        {
            evidences.push(ValidationEvidence::error(
                rule,
                format!("The property {property} is named in a reserved namespace"),
                "Rename the property outside of the RDF, RDFS and OWL namespaces",
            ));
        }
    }
    for fact in model.data().facts() {
        if forbidden(fact) {
            evidences.push(ValidationEvidence::error(
                rule,
                format!("The fact {fact} is named in a reserved namespace"),
                "Rename the fact outside of the RDF, RDFS and OWL namespaces",
            ));
        }
    }
    evidences
}

fn vocabulary_disjointness(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::VocabularyDisjointness.name();
    let (classes, properties, data) = (model.classes(), model.properties(), model.data());
    let mut evidences = Vec::new();
    for class in classes.classes().map(Class::resource) {
        if properties.contains(class) {
            evidences.push(ValidationEvidence::error(
                rule,
                format!("{class} is declared both as a class and as a property"),
                "Use distinct identifiers for classes and properties",
            ));
        }
        if data.contains_fact(class) {
            evidences.push(ValidationEvidence::error(
                rule,
                format!("{class} is declared both as a class and as a fact"),
                "Use distinct identifiers for classes and facts",
            ));
        }
    }
    for property in properties.properties().map(Property::resource) {
        if data.contains_fact(property) {
            evidences.push(ValidationEvidence::error(
                rule,
                format!("{property} is declared both as a property and as a fact"),
                "Use distinct identifiers for properties and facts",
            ));
        }
    }
    evidences
}

/// Collects one warning per undeclared resource and partition.
struct Declarations<'a> {
    model: &'a KnowledgeModel,
    reported: FxHashSet<(ResourceId, Partition)>,
    evidences: Vec<ValidationEvidence>,
}

impl Declarations<'_> {
    fn is_declared(&self, resource: &Resource, partition: Partition) -> bool {
        if resource
            .iri()
            .is_some_and(|iri| is_reserved_iri(iri) || is_datatype_iri(iri))
        {
            return true;
        }
        match partition {
            Partition::Class => self.model.classes().contains(resource),
            Partition::Property => self.model.properties().contains(resource),
            Partition::Data => resource.is_literal() || self.model.data().contains_fact(resource),
        }
    }

    fn check(&mut self, resource: &Resource, partition: Partition, used_by: &dyn fmt::Display) {
        if self.is_declared(resource, partition)
            || !self.reported.insert((resource.id(), partition))
        {
            return;
        }
        let kind = match partition {
            Partition::Class => "class",
            Partition::Property => "property",
            Partition::Data => "fact",
        };
        self.evidences.push(ValidationEvidence::warning(
            ConsistencyRule::VocabularyDeclaration.name(),
            format!("{resource} is used by {used_by} but is not declared as a {kind}"),
            format!("Declare {resource} as a {kind}"),
        ));
    }

    fn check_taxonomy(&mut self, relation: Relation, subject: Partition, object: Partition) {
        let model = self.model;
        for entry in model.taxonomy(relation) {
            self.check(entry.subject(), subject, &relation);
            self.check(entry.object(), object, &relation);
            if matches!(relation, Relation::Assertion | Relation::NegativeAssertion) {
                self.check(entry.predicate(), Partition::Property, &relation);
            }
        }
    }
}

fn vocabulary_declaration(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let mut declarations = Declarations {
        model,
        reported: FxHashSet::default(),
        evidences: Vec::new(),
    };
    for relation in [
        Relation::SubClassOf,
        Relation::EquivalentClass,
        Relation::DisjointWith,
        Relation::IntersectionOf,
        Relation::UnionOf,
        Relation::ComplementOf,
    ] {
        declarations.check_taxonomy(relation, Partition::Class, Partition::Class);
    }
    declarations.check_taxonomy(Relation::OneOf, Partition::Class, Partition::Data);
    for class in model.classes().classes() {
        let Some(restriction) = class.as_restriction() else {
            continue;
        };
        let used_by = format!("the restriction {}", class.resource());
        declarations.check(restriction.on_property(), Partition::Property, &used_by);
        if let Some(from) = restriction.from_class() {
            declarations.check(from, Partition::Class, &used_by);
        }
        if let Some(value) = restriction.required_value() {
            declarations.check(value, Partition::Data, &used_by);
        }
    }
    for relation in [
        Relation::SubPropertyOf,
        Relation::EquivalentProperty,
        Relation::InverseOf,
    ] {
        declarations.check_taxonomy(relation, Partition::Property, Partition::Property);
    }
    declarations.check_taxonomy(Relation::ClassType, Partition::Data, Partition::Class);
    for relation in [
        Relation::SameAs,
        Relation::DifferentFrom,
        Relation::Assertion,
        Relation::NegativeAssertion,
    ] {
        declarations.check_taxonomy(relation, Partition::Data, Partition::Data);
    }

    let mut evidences = declarations.evidences;
    let data = model.data();
    for fact in data.facts() {
        if data.class_type().select_by_subject(fact).next().is_none() {
            evidences.push(ValidationEvidence::error(
                ConsistencyRule::VocabularyDeclaration.name(),
                format!("The fact {fact} has no classtype"),
                format!("Declare at least one classtype for {fact}, owl:Thing if nothing else"),
            ));
        }
    }
    evidences
}

fn domain_range(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::DomainRange.name();
    let (classes, properties) = (model.classes(), model.properties());
    let mut cache = MembershipCache::new(model);
    let mut evidences = Vec::new();
    let mut literal_domains = FxHashSet::<ResourceId>::default();
    for property in properties.properties() {
        let Some(domain) = property.domain() else {
            continue;
        };
        if is_literal_compatible_class(classes, domain) {
            literal_domains.insert(property.resource().id());
            evidences.push(ValidationEvidence::error(
                rule,
                format!(
                    "The domain {domain} of {} is literal-compatible",
                    property.resource()
                ),
                "Only classes having facts as members can be used as domain",
            ));
        }
    }
    for entry in model.data().assertions() {
        let Some(property) = properties.property(entry.predicate()) else {
            continue;
        };
        if property.is_annotation_property() {
            continue;
        }
        if let Some(domain) = property.domain() {
            if !literal_domains.contains(&property.resource().id())
                && !cache.is_member(entry.subject(), domain)
            {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "The subject of {entry} is not a member of the domain {domain}"
                    ),
                    format!("Declare {} as a member of {domain}", entry.subject()),
                ));
            }
        }
        if let Some(range) = property.range() {
            if !cache.is_member(entry.object(), range) {
                let suggestion = if entry.object().is_literal() {
                    format!("Use a literal compatible with {range}")
                } else {
                    format!("Declare {} as a member of {range}", entry.object())
                };
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!("The object of {entry} is not a member of the range {range}"),
                    suggestion,
                ));
            }
        }
    }
    evidences
}

/// Two classes are compatible if they are the same, equivalent or one is a subclass of the other.
fn are_compatible(classes: &ClassModel, left: &Resource, right: &Resource) -> bool {
    left == right
        || equivalent_classes_of(classes, left).contains(right)
        || is_sub_class_of(classes, left, right)
        || is_sub_class_of(classes, right, left)
}

fn inverse_of(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::InverseOf.name();
    let (classes, properties) = (model.classes(), model.properties());
    let mut visited = FxHashSet::<(ResourceId, ResourceId)>::default();
    let mut evidences = Vec::new();
    for entry in properties.inverse_of() {
        let (left, right) = (entry.subject(), entry.object());
        if !visited.insert((left.id().min(right.id()), left.id().max(right.id()))) {
            continue;
        }
        let (Some(left), Some(right)) = (properties.property(left), properties.property(right))
        else {
            continue;
        };
        let (Some(left_domain), Some(left_range), Some(right_domain), Some(right_range)) =
            (left.domain(), left.range(), right.domain(), right.range())
        else {
            continue;
        };
        for (first, domain, second, range) in [
            (left, left_domain, right, right_range),
            (right, right_domain, left, left_range),
        ] {
            if !are_compatible(classes, domain, range) {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "The domain {domain} of {} is not compatible with the range {range} of its inverse {}",
                        first.resource(),
                        second.resource()
                    ),
                    "Align the domain and range of inverse properties",
                ));
            }
        }
    }
    evidences
}

fn symmetric_property(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::SymmetricProperty.name();
    let mut cache = MembershipCache::new(model);
    let mut evidences = Vec::new();
    for property in model.properties().properties() {
        if !property.is_symmetric() {
            continue;
        }
        let (Some(domain), Some(range)) = (property.domain(), property.range()) else {
            continue;
        };
        for entry in model
            .data()
            .assertions()
            .select_by_predicate(property.resource())
        {
            if !cache.is_member(entry.object(), domain) {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "The object of {entry} is not a member of the domain {domain} of the symmetric property"
                    ),
                    format!("Declare {} as a member of {domain}", entry.object()),
                ));
            }
            if !cache.is_member(entry.subject(), range) {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "The subject of {entry} is not a member of the range {range} of the symmetric property"
                    ),
                    format!("Declare {} as a member of {range}", entry.subject()),
                ));
            }
        }
    }
    evidences
}

fn class_type(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::ClassType.name();
    let (classes, data) = (model.classes(), model.data());
    let mut evidences = Vec::new();
    let mut visited = FxHashSet::<ResourceId>::default();
    for entry in data.class_type() {
        if is_literal_compatible_class(classes, entry.object()) {
            evidences.push(ValidationEvidence::error(
                rule,
                format!(
                    "The fact {} has the literal-compatible classtype {}",
                    entry.subject(),
                    entry.object()
                ),
                "Facts can only be typed with classes having facts as members",
            ));
        }
        let fact = entry.subject();
        if !visited.insert(fact.id()) {
            continue;
        }
        let types: Vec<&Resource> = data
            .class_type()
            .select_by_subject(fact)
            .map(TaxonomyEntry::object)
            .collect();
        for (i, left) in types.iter().enumerate() {
            for right in &types[i + 1..] {
                if is_disjoint_class(classes, left, right) {
                    evidences.push(ValidationEvidence::error(
                        rule,
                        format!("The fact {fact} has the disjoint classtypes {left} and {right}"),
                        format!("Remove one of the classtypes of {fact}"),
                    ));
                }
            }
        }
    }
    evidences
}

/// Assertions giving a key a value different from the first one it got.
///
/// A fact value that is `owl:sameAs` the first value is not a conflict.
fn conflicting_values<'a>(
    data: &DataModel,
    assertions: &[&'a TaxonomyEntry],
    key: fn(&TaxonomyEntry) -> &Resource,
    value: fn(&TaxonomyEntry) -> &Resource,
) -> Vec<&'a TaxonomyEntry> {
    let mut first_values = FxHashMap::<ResourceId, &Resource>::default();
    let mut conflicts = Vec::new();
    for &entry in assertions {
        let current = value(entry);
        match first_values.entry(key(entry).id()) {
            Entry::Vacant(vacant) => {
                vacant.insert(current);
            }
            Entry::Occupied(occupied) => {
                let first = *occupied.get();
                if first != current
                    && (first.is_literal() || !same_facts_as(data, first).contains(current))
                {
                    conflicts.push(entry);
                }
            }
        }
    }
    conflicts
}

fn global_cardinality_constraint(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::GlobalCardinalityConstraint.name();
    let (properties, data) = (model.properties(), model.data());
    let mut evidences = Vec::new();
    for property in properties.properties() {
        if !property.is_functional() && !property.is_inverse_functional() {
            continue;
        }
        let resource = property.resource();
        let assertions: Vec<&TaxonomyEntry> =
            data.assertions().select_by_predicate(resource).collect();
        // Properties are only checked through their assertions
        if assertions.is_empty() {
            continue;
        }
        if property.is_functional() {
            for entry in conflicting_values(
                data,
                &assertions,
                TaxonomyEntry::subject,
                TaxonomyEntry::object,
            ) {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "{entry} gives {} a second value for the functional property {resource}",
                        entry.subject()
                    ),
                    "Keep a single value or declare the values owl:sameAs",
                ));
            }
        }
        if property.is_inverse_functional() {
            for entry in conflicting_values(
                data,
                &assertions,
                TaxonomyEntry::object,
                TaxonomyEntry::subject,
            ) {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "{entry} gives {} a second subject for the inverse functional property {resource}",
                        entry.object()
                    ),
                    "Keep a single subject or declare the subjects owl:sameAs",
                ));
            }
        }
        let transitive = property.is_transitive()
            || super_properties_of(properties, resource)
                .iter()
                .any(|parent| {
                    properties
                        .property(parent)
                        .is_some_and(Property::is_transitive)
                });
        if transitive {
            evidences.push(ValidationEvidence::error(
                rule,
                format!(
                    "The functional or inverse functional property {resource} is transitive, directly or through a superproperty"
                ),
                format!(
                    "Remove the transitive characteristic from {resource} and its superproperties"
                ),
            ));
        }
    }
    evidences
}

fn local_cardinality_constraint(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::LocalCardinalityConstraint.name();
    let properties = model.properties();
    let mut evidences = Vec::new();
    for class in model.classes().classes() {
        let Some(restriction) = class.as_restriction().filter(|r| r.is_cardinality()) else {
            continue;
        };
        let on_property = restriction.on_property();
        let mut candidates = vec![on_property.clone()];
        candidates.extend(sub_properties_of(properties, on_property));
        candidates.extend(inverse_properties_of(properties, on_property));
        let mut visited = FxHashSet::<ResourceId>::default();
        for candidate in candidates {
            if visited.insert(candidate.id())
                && properties
                    .property(&candidate)
                    .is_some_and(Property::is_transitive)
            {
                evidences.push(ValidationEvidence::error(
                    rule,
                    format!(
                        "The restriction {} bounds the cardinality of {on_property} but {candidate} is transitive",
                        class.resource()
                    ),
                    format!("Remove the transitive characteristic from {candidate}"),
                ));
            }
        }
    }
    evidences
}

fn deprecation(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let rule = ConsistencyRule::Deprecation.name();
    let data = model.data();
    let mut evidences = Vec::new();
    for entry in data.class_type() {
        if model.classes().is_deprecated(entry.object()) {
            evidences.push(ValidationEvidence::warning(
                rule,
                format!(
                    "The fact {} has the deprecated classtype {}",
                    entry.subject(),
                    entry.object()
                ),
                "Replace the deprecated class",
            ));
        }
    }
    for entry in data.assertions() {
        if model.properties().is_deprecated(entry.predicate()) {
            evidences.push(ValidationEvidence::warning(
                rule,
                format!("{entry} uses the deprecated property {}", entry.predicate()),
                "Replace the deprecated property",
            ));
        }
    }
    evidences
}

fn negative_assertions(model: &KnowledgeModel) -> Vec<ValidationEvidence> {
    let data = model.data();
    data.negative_assertions()
        .iter()
        .filter(|entry| data.assertions().contains(entry.id()))
        .map(|entry| {
            ValidationEvidence::error(
                ConsistencyRule::NegativeAssertions.name(),
                format!("{entry} is both asserted and negatively asserted"),
                "Remove the assertion or the negative assertion",
            )
        })
        .collect()
}
