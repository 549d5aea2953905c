//! The built-in entailment rules.
//!
//! Each rule is a pure function reading the model and returning the entries it entails.
//! Entries already in the model are returned too: the engine only records the new ones.

use super::Entailment;
use crate::closure::{
    disjoint_classes_with, different_facts_from, equivalent_classes_of,
    equivalent_properties_of, inverse_properties_of, same_facts_as, super_classes_of,
    super_properties_of, transitive_assertions_of,
};
use crate::membership::is_literal_compatible_class;
use crate::model::{KnowledgeModel, Property, Relation};
use crate::resource::{Resource, ResourceId};
use crate::taxonomy::{Taxonomy, TaxonomyEntry};
use crate::vocab::{is_reserved_iri, owl, rdf, rdfs};
use oxrdf::NamedNodeRef;
use rustc_hash::{FxHashMap, FxHashSet};

/// Highest priority taken by a built-in rule.
pub const BASE_MAX_PRIORITY: u32 = 15;

/// Built-in entailment rule identifier, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseRule {
    EquivalentClassTransitivity,
    SubClassTransitivity,
    DisjointWithEntailment,
    EquivalentPropertyTransitivity,
    SubPropertyTransitivity,
    SameAsTransitivity,
    DifferentFromEntailment,
    DomainEntailment,
    RangeEntailment,
    ClassTypeEntailment,
    InverseOfEntailment,
    SymmetricPropertyEntailment,
    TransitivePropertyEntailment,
    PropertyEntailment,
    SameAsEntailment,
}

impl BaseRule {
    /// Returns all built-in rules, sorted by priority.
    pub fn all() -> &'static [Self] {
        &[
            Self::EquivalentClassTransitivity,
            Self::SubClassTransitivity,
            Self::DisjointWithEntailment,
            Self::EquivalentPropertyTransitivity,
            Self::SubPropertyTransitivity,
            Self::SameAsTransitivity,
            Self::DifferentFromEntailment,
            Self::DomainEntailment,
            Self::RangeEntailment,
            Self::ClassTypeEntailment,
            Self::InverseOfEntailment,
            Self::SymmetricPropertyEntailment,
            Self::TransitivePropertyEntailment,
            Self::PropertyEntailment,
            Self::SameAsEntailment,
        ]
    }

    /// Name of the rule in the reasoner catalog.
    pub fn name(self) -> &'static str {
        match self {
            Self::EquivalentClassTransitivity => "EquivalentClassTransitivity",
            Self::SubClassTransitivity => "SubClassTransitivity",
            Self::DisjointWithEntailment => "DisjointWithEntailment",
            Self::EquivalentPropertyTransitivity => "EquivalentPropertyTransitivity",
            Self::SubPropertyTransitivity => "SubPropertyTransitivity",
            Self::SameAsTransitivity => "SameAsTransitivity",
            Self::DifferentFromEntailment => "DifferentFromEntailment",
            Self::DomainEntailment => "DomainEntailment",
            Self::RangeEntailment => "RangeEntailment",
            Self::ClassTypeEntailment => "ClassTypeEntailment",
            Self::InverseOfEntailment => "InverseOfEntailment",
            Self::SymmetricPropertyEntailment => "SymmetricPropertyEntailment",
            Self::TransitivePropertyEntailment => "TransitivePropertyEntailment",
            Self::PropertyEntailment => "PropertyEntailment",
            Self::SameAsEntailment => "SameAsEntailment",
        }
    }

    /// Position of the rule in a reasoning pass, from 1 to 15.
    pub fn priority(self) -> u32 {
        match self {
            Self::EquivalentClassTransitivity => 1,
            Self::SubClassTransitivity => 2,
            Self::DisjointWithEntailment => 3,
            Self::EquivalentPropertyTransitivity => 4,
            Self::SubPropertyTransitivity => 5,
            Self::SameAsTransitivity => 6,
            Self::DifferentFromEntailment => 7,
            Self::DomainEntailment => 8,
            Self::RangeEntailment => 9,
            Self::ClassTypeEntailment => 10,
            Self::InverseOfEntailment => 11,
            Self::SymmetricPropertyEntailment => 12,
            Self::TransitivePropertyEntailment => 13,
            Self::PropertyEntailment => 14,
            Self::SameAsEntailment => 15,
        }
    }

    /// The rule in `premises => conclusion` form.
    pub fn description(self) -> &'static str {
        match self {
            Self::EquivalentClassTransitivity => {
                "((C1 EQUIVALENTCLASS C2) AND (C2 EQUIVALENTCLASS C3)) => (C1 EQUIVALENTCLASS C3)"
            }
            Self::SubClassTransitivity => {
                "((C1 SUBCLASSOF C2) AND (C2 SUBCLASSOF|EQUIVALENTCLASS C3)) => (C1 SUBCLASSOF C3)"
            }
            Self::DisjointWithEntailment => {
                "((C1 EQUIVALENTCLASS|SUBCLASSOF C2) AND (C2 DISJOINTWITH C3)) => (C1 DISJOINTWITH C3)"
            }
            Self::EquivalentPropertyTransitivity => {
                "((P1 EQUIVALENTPROPERTY P2) AND (P2 EQUIVALENTPROPERTY P3)) => (P1 EQUIVALENTPROPERTY P3)"
            }
            Self::SubPropertyTransitivity => {
                "((P1 SUBPROPERTYOF P2) AND (P2 SUBPROPERTYOF|EQUIVALENTPROPERTY P3)) => (P1 SUBPROPERTYOF P3)"
            }
            Self::SameAsTransitivity => "((F1 SAMEAS F2) AND (F2 SAMEAS F3)) => (F1 SAMEAS F3)",
            Self::DifferentFromEntailment => {
                "((F1 SAMEAS F2) AND (F2 DIFFERENTFROM F3)) => (F1 DIFFERENTFROM F3)"
            }
            Self::DomainEntailment => "((F1 P F2) AND (P DOMAIN C)) => (F1 TYPE C)",
            Self::RangeEntailment => "((F1 P F2) AND (P RANGE C)) => (F2 TYPE C)",
            Self::ClassTypeEntailment => {
                "((F TYPE C1) AND (C1 SUBCLASSOF|EQUIVALENTCLASS C2)) => (F TYPE C2)"
            }
            Self::InverseOfEntailment => "((F1 P1 F2) AND (P1 INVERSEOF P2)) => (F2 P2 F1)",
            Self::SymmetricPropertyEntailment => {
                "((F1 P F2) AND (P TYPE SYMMETRICPROPERTY)) => (F2 P F1)"
            }
            Self::TransitivePropertyEntailment => {
                "((F1 P F2) AND (F2 P F3) AND (P TYPE TRANSITIVEPROPERTY)) => (F1 P F3)"
            }
            Self::PropertyEntailment => {
                "((F1 P1 F2) AND (P1 SUBPROPERTYOF|EQUIVALENTPROPERTY P2)) => (F1 P2 F2)"
            }
            Self::SameAsEntailment => {
                "((F1 P F2) AND (F1 SAMEAS F3)) => (F3 P F2), ((F1 P F2) AND (F2 SAMEAS F3)) => (F1 P F3)"
            }
        }
    }

    /// Runs the rule against the model.
    pub fn evaluate(self, model: &KnowledgeModel) -> Vec<Entailment> {
        match self {
            Self::EquivalentClassTransitivity => equivalent_class_transitivity(model),
            Self::SubClassTransitivity => sub_class_transitivity(model),
            Self::DisjointWithEntailment => disjoint_with_entailment(model),
            Self::EquivalentPropertyTransitivity => equivalent_property_transitivity(model),
            Self::SubPropertyTransitivity => sub_property_transitivity(model),
            Self::SameAsTransitivity => same_as_transitivity(model),
            Self::DifferentFromEntailment => different_from_entailment(model),
            Self::DomainEntailment => domain_entailment(model),
            Self::RangeEntailment => range_entailment(model),
            Self::ClassTypeEntailment => class_type_entailment(model),
            Self::InverseOfEntailment => inverse_of_entailment(model),
            Self::SymmetricPropertyEntailment => symmetric_property_entailment(model),
            Self::TransitivePropertyEntailment => transitive_property_entailment(model),
            Self::PropertyEntailment => property_entailment(model),
            Self::SameAsEntailment => same_as_entailment(model),
        }
    }
}

/// Distinct subjects of the given taxonomies, in insertion order.
fn subjects<'a>(taxonomies: impl IntoIterator<Item = &'a Taxonomy>) -> Vec<&'a Resource> {
    let mut seen = FxHashSet::<ResourceId>::default();
    taxonomies
        .into_iter()
        .flat_map(Taxonomy::iter)
        .map(TaxonomyEntry::subject)
        .filter(|subject| seen.insert(subject.id()))
        .collect()
}

/// Declared object or datatype property outside of the reserved vocabularies.
fn reasoned_property<'a>(model: &'a KnowledgeModel, property: &Resource) -> Option<&'a Property> {
    model
        .properties()
        .property(property)
        .filter(|p| !p.is_annotation_property() && !property.iri().is_some_and(is_reserved_iri))
}

/// Assertions whose predicate is a reasoned property.
fn reasoned_assertions(
    model: &KnowledgeModel,
) -> impl Iterator<Item = (&TaxonomyEntry, &Property)> {
    model
        .data()
        .assertions()
        .iter()
        .filter_map(|entry| Some((entry, reasoned_property(model, entry.predicate())?)))
}

/// Both `left predicate right` and `right predicate left`.
fn mirrored_pair(
    relation: Relation,
    left: &Resource,
    predicate: NamedNodeRef<'_>,
    right: &Resource,
) -> [Entailment; 2] {
    [
        Entailment::new(relation, left.clone(), predicate.into(), right.clone()),
        Entailment::new(relation, right.clone(), predicate.into(), left.clone()),
    ]
}

fn equivalent_class_transitivity(model: &KnowledgeModel) -> Vec<Entailment> {
    let classes = model.classes();
    let mut entailments = Vec::new();
    for class in subjects([classes.equivalent_class()]) {
        for equivalent in equivalent_classes_of(classes, class) {
            entailments.extend(mirrored_pair(
                Relation::EquivalentClass,
                class,
                owl::EQUIVALENT_CLASS,
                &equivalent,
            ));
        }
    }
    entailments
}

fn sub_class_transitivity(model: &KnowledgeModel) -> Vec<Entailment> {
    let classes = model.classes();
    let mut entailments = Vec::new();
    for class in subjects([classes.sub_class_of(), classes.equivalent_class()]) {
        for parent in super_classes_of(classes, class) {
            entailments.push(Entailment::new(
                Relation::SubClassOf,
                class.clone(),
                rdfs::SUB_CLASS_OF.into(),
                parent,
            ));
        }
    }
    entailments
}

fn disjoint_with_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let classes = model.classes();
    let mut entailments = Vec::new();
    for class in subjects([
        classes.disjoint_with(),
        classes.sub_class_of(),
        classes.equivalent_class(),
    ]) {
        for disjoint in disjoint_classes_with(classes, class) {
            entailments.extend(mirrored_pair(
                Relation::DisjointWith,
                class,
                owl::DISJOINT_WITH,
                &disjoint,
            ));
        }
    }
    entailments
}

fn equivalent_property_transitivity(model: &KnowledgeModel) -> Vec<Entailment> {
    let properties = model.properties();
    let mut entailments = Vec::new();
    for property in subjects([properties.equivalent_property()]) {
        if reasoned_property(model, property).is_none() {
            continue;
        }
        for equivalent in equivalent_properties_of(properties, property) {
            entailments.extend(mirrored_pair(
                Relation::EquivalentProperty,
                property,
                owl::EQUIVALENT_PROPERTY,
                &equivalent,
            ));
        }
    }
    entailments
}

fn sub_property_transitivity(model: &KnowledgeModel) -> Vec<Entailment> {
    let properties = model.properties();
    let mut entailments = Vec::new();
    for property in subjects([
        properties.sub_property_of(),
        properties.equivalent_property(),
    ]) {
        if reasoned_property(model, property).is_none() {
            continue;
        }
        for parent in super_properties_of(properties, property) {
            entailments.push(Entailment::new(
                Relation::SubPropertyOf,
                property.clone(),
                rdfs::SUB_PROPERTY_OF.into(),
                parent,
            ));
        }
    }
    entailments
}

fn same_as_transitivity(model: &KnowledgeModel) -> Vec<Entailment> {
    let data = model.data();
    let mut entailments = Vec::new();
    for fact in subjects([data.same_as()]) {
        for same in same_facts_as(data, fact) {
            entailments.extend(mirrored_pair(Relation::SameAs, fact, owl::SAME_AS, &same));
        }
    }
    entailments
}

fn different_from_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let data = model.data();
    let mut entailments = Vec::new();
    for fact in subjects([data.different_from(), data.same_as()]) {
        for different in different_facts_from(data, fact) {
            entailments.extend(mirrored_pair(
                Relation::DifferentFrom,
                fact,
                owl::DIFFERENT_FROM,
                &different,
            ));
        }
    }
    entailments
}

/// A class facts can be typed with: plain or undeclared, and not literal-compatible.
fn is_typing_class(model: &KnowledgeModel, class: &Resource) -> bool {
    !class.is_literal()
        && model.classes().class(class).is_none_or(|c| c.is_plain())
        && !is_literal_compatible_class(model.classes(), class)
}

fn class_type(fact: &Resource, class: &Resource) -> Entailment {
    Entailment::new(
        Relation::ClassType,
        fact.clone(),
        rdf::TYPE.into(),
        class.clone(),
    )
}

fn domain_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    reasoned_assertions(model)
        .filter_map(|(entry, property)| {
            let domain = property.domain()?;
            (is_typing_class(model, domain) && !entry.subject().iri().is_some_and(is_reserved_iri))
                .then(|| class_type(entry.subject(), domain))
        })
        .collect()
}

fn range_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    reasoned_assertions(model)
        .filter_map(|(entry, property)| {
            let range = property.range()?;
            (property.is_object_property()
                && !entry.object().is_literal()
                && !entry.object().iri().is_some_and(is_reserved_iri)
                && is_typing_class(model, range))
            .then(|| class_type(entry.object(), range))
        })
        .collect()
}

fn class_type_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let classes = model.classes();
    let mut targets = FxHashMap::<ResourceId, Vec<Resource>>::default();
    let mut entailments = Vec::new();
    for entry in model.data().class_type() {
        let class = entry.object();
        let related = targets.entry(class.id()).or_insert_with(|| {
            super_classes_of(classes, class)
                .into_iter()
                .chain(equivalent_classes_of(classes, class))
                .filter(|target| {
                    !target.iri().is_some_and(is_reserved_iri) && is_typing_class(model, target)
                })
                .collect()
        });
        for target in related.iter() {
            entailments.push(class_type(entry.subject(), target));
        }
    }
    entailments
}

fn inverse_of_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let mut inverses = FxHashMap::<ResourceId, Vec<Resource>>::default();
    let mut entailments = Vec::new();
    for (entry, property) in reasoned_assertions(model) {
        if !property.is_object_property() || entry.object().is_literal() {
            continue;
        }
        let related = inverses
            .entry(entry.predicate().id())
            .or_insert_with(|| {
                inverse_properties_of(model.properties(), entry.predicate())
                    .into_iter()
                    .filter(|inverse| {
                        reasoned_property(model, inverse).is_some_and(Property::is_object_property)
                    })
                    .collect()
            });
        for inverse in related.iter() {
            entailments.push(Entailment::new(
                Relation::Assertion,
                entry.object().clone(),
                inverse.clone(),
                entry.subject().clone(),
            ));
        }
    }
    entailments
}

fn symmetric_property_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    reasoned_assertions(model)
        .filter(|(entry, property)| property.is_symmetric() && !entry.object().is_literal())
        .map(|(entry, _)| {
            Entailment::new(
                Relation::Assertion,
                entry.object().clone(),
                entry.predicate().clone(),
                entry.subject().clone(),
            )
        })
        .collect()
}

fn transitive_property_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let mut visited = FxHashSet::<(ResourceId, ResourceId)>::default();
    let mut entailments = Vec::new();
    for (entry, property) in reasoned_assertions(model) {
        if !property.is_transitive()
            || !visited.insert((entry.subject().id(), entry.predicate().id()))
        {
            continue;
        }
        for reached in transitive_assertions_of(
            model.properties(),
            model.data(),
            entry.subject(),
            entry.predicate(),
        ) {
            if &reached != entry.subject() {
                entailments.push(Entailment::new(
                    Relation::Assertion,
                    entry.subject().clone(),
                    entry.predicate().clone(),
                    reached,
                ));
            }
        }
    }
    entailments
}

fn property_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let properties = model.properties();
    let mut targets = FxHashMap::<ResourceId, Vec<&Property>>::default();
    let mut entailments = Vec::new();
    for (entry, _) in reasoned_assertions(model) {
        let related = targets.entry(entry.predicate().id()).or_insert_with(|| {
            super_properties_of(properties, entry.predicate())
                .into_iter()
                .chain(equivalent_properties_of(properties, entry.predicate()))
                .filter_map(|target| reasoned_property(model, &target))
                .collect()
        });
        for target in related.iter() {
            // The value must fit the kind of the entailed property
            let fits = if target.is_object_property() {
                !entry.object().is_literal()
            } else {
                entry.object().is_literal()
            };
            if fits {
                entailments.push(Entailment::new(
                    Relation::Assertion,
                    entry.subject().clone(),
                    target.resource().clone(),
                    entry.object().clone(),
                ));
            }
        }
    }
    entailments
}

fn same_as_entailment(model: &KnowledgeModel) -> Vec<Entailment> {
    let data = model.data();
    let mut same = FxHashMap::<ResourceId, Vec<Resource>>::default();
    let mut same_of = |resource: &Resource| -> Vec<Resource> {
        let mut all = vec![resource.clone()];
        if !resource.is_literal() {
            all.extend(
                same.entry(resource.id())
                    .or_insert_with(|| same_facts_as(data, resource))
                    .iter()
                    .cloned(),
            );
        }
        all
    };
    let mut entailments = Vec::new();
    for (entry, _) in reasoned_assertions(model) {
        let subjects = same_of(entry.subject());
        let objects = same_of(entry.object());
        if subjects.len() == 1 && objects.len() == 1 {
            continue;
        }
        for subject in &subjects {
            for object in &objects {
                entailments.push(Entailment::new(
                    Relation::Assertion,
                    subject.clone(),
                    entry.predicate().clone(),
                    object.clone(),
                ));
            }
        }
    }
    entailments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Characteristic, Class, ClassKind};

    fn named(name: &str) -> Resource {
        Resource::named(format!("http://example.org/{name}")).unwrap()
    }

    fn new_entries(model: &KnowledgeModel, entailments: &[Entailment]) -> usize {
        let mut seen = FxHashSet::default();
        entailments
            .iter()
            .filter(|e| !model.taxonomy(e.relation()).contains(e.entry().id()))
            .filter(|e| seen.insert(e.entry().id()))
            .count()
    }

    #[test]
    fn test_priorities_follow_declaration_order() {
        let priorities: Vec<_> = BaseRule::all().iter().map(|r| r.priority()).collect();
        assert_eq!(priorities, (1..=BASE_MAX_PRIORITY).collect::<Vec<_>>());
    }

    #[test]
    fn test_sub_class_transitivity_computes_the_full_closure() {
        let mut model = KnowledgeModel::new();
        let classes = model.classes_mut();
        classes.add_sub_class_of(&named("A"), &named("B"));
        classes.add_sub_class_of(&named("B"), &named("C"));
        classes.add_sub_class_of(&named("C"), &named("D"));
        let entailments = BaseRule::SubClassTransitivity.evaluate(&model);
        assert_eq!(new_entries(&model, &entailments), 3);
    }

    #[test]
    fn test_class_type_skips_composite_and_reserved_classes() {
        let mut model = KnowledgeModel::new();
        model
            .classes_mut()
            .declare_class(Class::with_kind(named("U"), ClassKind::Union));
        model.classes_mut().add_sub_class_of(&named("Dog"), &named("U"));
        model.classes_mut().add_sub_class_of(&named("Dog"), &named("Animal"));
        model
            .classes_mut()
            .add_sub_class_of(&named("Animal"), &owl::THING.into());
        model.add_class_type(&named("rex"), &named("Dog"));
        let entailments = BaseRule::ClassTypeEntailment.evaluate(&model);
        assert_eq!(entailments.len(), 1);
        assert_eq!(entailments[0].entry().object(), &named("Animal"));
    }

    #[test]
    fn test_property_entailment_respects_kinds() {
        let mut model = KnowledgeModel::new();
        let properties = model.properties_mut();
        properties.declare_property(Property::object(named("hasMother")));
        properties.declare_property(Property::object(named("hasParent")));
        properties.add_sub_property_of(&named("hasMother"), &named("hasParent"));
        model.add_assertion(&named("john"), &named("hasMother"), &named("mary"));
        let entailments = BaseRule::PropertyEntailment.evaluate(&model);
        assert_eq!(entailments.len(), 1);
        assert_eq!(entailments[0].entry().predicate(), &named("hasParent"));
    }

    #[test]
    fn test_transitive_property_entailment() {
        let mut model = KnowledgeModel::new();
        let part_of = named("partOf");
        model.properties_mut().declare_property(
            Property::object(part_of.clone()).with_characteristic(Characteristic::Transitive),
        );
        model.add_assertion(&named("a"), &part_of, &named("b"));
        model.add_assertion(&named("b"), &part_of, &named("c"));
        model.add_assertion(&named("c"), &part_of, &named("d"));
        let entailments = BaseRule::TransitivePropertyEntailment.evaluate(&model);
        assert_eq!(new_entries(&model, &entailments), 3);
    }

    #[test]
    fn test_same_as_entailment() {
        let mut model = KnowledgeModel::new();
        let knows = named("knows");
        model
            .properties_mut()
            .declare_property(Property::object(knows.clone()));
        model.add_same_as(&named("a"), &named("a2"));
        model.add_assertion(&named("a"), &knows, &named("b"));
        let entailments = BaseRule::SameAsEntailment.evaluate(&model);
        assert_eq!(new_entries(&model, &entailments), 1);
    }
}
