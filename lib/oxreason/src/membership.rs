//! Class membership and literal compatibility.

use crate::closure::{
    equivalent_classes_of, equivalent_properties_of, same_facts_as, sub_classes_of,
    sub_properties_of, super_classes_of,
};
use crate::model::{ClassKind, ClassModel, KnowledgeModel, Relation, Restriction, RestrictionKind};
use crate::resource::{Resource, ResourceId};
use crate::taxonomy::Taxonomy;
use crate::vocab::{RDF_PLAIN_LITERAL, is_datatype_iri, owl, rdfs, xsd};
use oxrdf::Literal;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// A shared set of class members.
pub type Members = Arc<FxHashSet<Resource>>;

/// Returns true if the class can only have literals as members.
///
/// This is the case of `rdfs:Literal`, of datatypes, of data ranges and of their subclasses
/// and equivalents.
pub fn is_literal_compatible_class(classes: &ClassModel, class: &Resource) -> bool {
    let is_literal_class = |candidate: &Resource| {
        candidate.is(rdfs::LITERAL)
            || candidate.iri().is_some_and(is_datatype_iri)
            || classes.class(candidate).is_some_and(|c| c.is_data_range())
    };
    is_literal_class(class)
        || super_classes_of(classes, class).iter().any(is_literal_class)
        || equivalent_classes_of(classes, class)
            .iter()
            .any(is_literal_class)
}

/// Returns true if the literal can be a member of the class.
pub fn is_literal_compatible_with(
    classes: &ClassModel,
    literal: &Resource,
    class: &Resource,
) -> bool {
    let Some(value) = literal.as_literal() else {
        return false;
    };
    let mut candidates = vec![class.clone()];
    candidates.extend(sub_classes_of(classes, class));
    candidates.extend(equivalent_classes_of(classes, class));
    candidates.iter().any(|candidate| {
        if candidate.is(rdfs::LITERAL) {
            return true;
        }
        if let Some(iri) = candidate.iri().filter(|iri| is_datatype_iri(iri)) {
            return has_datatype(value, iri);
        }
        classes.class(candidate).is_some_and(|c| c.is_data_range())
            && classes
                .one_of
                .contains_relation(candidate, &owl::ONE_OF.into(), literal)
    })
}

fn has_datatype(literal: &Literal, datatype: &str) -> bool {
    if datatype == RDF_PLAIN_LITERAL.as_str() {
        return literal.language().is_some() || literal.datatype() == xsd::STRING;
    }
    literal.datatype().as_str() == datatype
}

/// Computes class members, caching them by class id.
///
/// A cache is meant to live for one rule execution: it does not see changes made to the model
/// after its creation.
///
/// ```
/// use oxreason::{KnowledgeModel, MembershipCache, Resource};
///
/// let mut model = KnowledgeModel::new();
/// let alice = Resource::named("http://example.org/Alice")?;
/// let person = Resource::named("http://example.org/Person")?;
/// let agent = Resource::named("http://example.org/Agent")?;
/// model.add_class_type(&alice, &person);
/// model.classes_mut().add_sub_class_of(&person, &agent);
/// let mut cache = MembershipCache::new(&model);
/// assert!(cache.members_of(&agent).contains(&alice));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct MembershipCache<'a> {
    model: &'a KnowledgeModel,
    members: FxHashMap<ResourceId, Members>,
    in_progress: FxHashSet<ResourceId>,
    /// Set when a computation reached a class that was still in progress.
    cyclic: bool,
    facts: Option<Members>,
    literals: Option<Members>,
}

impl<'a> MembershipCache<'a> {
    /// Creates an empty cache over the model. The model must not change while the cache is alive.
    pub fn new(model: &'a KnowledgeModel) -> Self {
        Self {
            model,
            members: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            cyclic: false,
            facts: None,
            literals: None,
        }
    }

    /// Facts and literals entailed to be members of the class.
    pub fn members_of(&mut self, class: &Resource) -> Members {
        if let Some(members) = self.members.get(&class.id()) {
            return Arc::clone(members);
        }
        if !self.in_progress.insert(class.id()) {
            // The class is defined through itself
            self.cyclic = true;
            return Members::default();
        }
        let outer_cyclic = std::mem::replace(&mut self.cyclic, false);
        let members = Arc::new(self.compute(class));
        self.in_progress.remove(&class.id());
        // A result built while an enclosing class was incomplete is only valid for this query
        if !self.cyclic || self.in_progress.is_empty() {
            self.members.insert(class.id(), Arc::clone(&members));
        }
        self.cyclic |= outer_cyclic;
        members
    }

    /// Facts entailed to be members of the class, empty for literal-compatible classes.
    pub fn members_of_non_literal_compatible(&mut self, class: &Resource) -> Members {
        if is_literal_compatible_class(&self.model.classes, class) {
            return Members::default();
        }
        let members = self.members_of(class);
        if members.iter().all(|member| !member.is_literal()) {
            return members;
        }
        Arc::new(
            members
                .iter()
                .filter(|member| !member.is_literal())
                .cloned()
                .collect(),
        )
    }

    /// Returns true if the fact or literal is entailed to be a member of the class.
    pub fn is_member(&mut self, resource: &Resource, class: &Resource) -> bool {
        if resource.is_literal() {
            return is_literal_compatible_with(&self.model.classes, resource, class);
        }
        self.members_of(class).contains(resource)
    }

    /// Declared facts and every fact used in the data taxonomies.
    fn known_facts(&mut self) -> Members {
        if let Some(facts) = &self.facts {
            return Arc::clone(facts);
        }
        let model = self.model;
        let mut facts: FxHashSet<Resource> = model.data.facts.values().cloned().collect();
        for relation in [
            Relation::ClassType,
            Relation::SameAs,
            Relation::DifferentFrom,
            Relation::Assertion,
        ] {
            for entry in model.taxonomy(relation) {
                facts.insert(entry.subject().clone());
                if relation != Relation::ClassType && !entry.object().is_literal() {
                    facts.insert(entry.object().clone());
                }
            }
        }
        let facts = Arc::new(facts);
        self.facts = Some(Arc::clone(&facts));
        facts
    }

    /// Declared literals and every literal used as an assertion object.
    fn known_literals(&mut self) -> Members {
        if let Some(literals) = &self.literals {
            return Arc::clone(literals);
        }
        let data = &self.model.data;
        let mut literals: FxHashSet<Resource> = data.literals.values().cloned().collect();
        literals.extend(
            data.assertions
                .iter()
                .filter(|entry| entry.object().is_literal())
                .map(|entry| entry.object().clone()),
        );
        let literals = Arc::new(literals);
        self.literals = Some(Arc::clone(&literals));
        literals
    }

    fn compute(&mut self, class: &Resource) -> FxHashSet<Resource> {
        let model = self.model;
        let classes = &model.classes;
        if class.is(owl::THING) {
            return self.known_facts().as_ref().clone();
        }
        if class.is(owl::NOTHING) {
            return FxHashSet::default();
        }
        if is_literal_compatible_class(classes, class) {
            return self
                .known_literals()
                .iter()
                .filter(|literal| is_literal_compatible_with(classes, literal, class))
                .cloned()
                .collect();
        }
        let kind = classes.class(class).map(|c| c.kind().clone());
        match kind {
            Some(ClassKind::Enumerate) => {
                let mut members = FxHashSet::default();
                for entry in classes.one_of.select_by_subject(class) {
                    members.insert(entry.object().clone());
                    members.extend(same_facts_as(&model.data, entry.object()));
                }
                members
            }
            Some(ClassKind::Union) => {
                let mut members = FxHashSet::default();
                for operand in operands(&classes.union_of, class) {
                    members.extend(self.members_of(&operand).iter().cloned());
                }
                members
            }
            Some(ClassKind::Intersection) => {
                let mut result: Option<FxHashSet<Resource>> = None;
                for operand in operands(&classes.intersection_of, class) {
                    let members = self.members_of(&operand);
                    result = Some(match result {
                        Some(current) => current
                            .into_iter()
                            .filter(|member| members.contains(member))
                            .collect(),
                        None => members.as_ref().clone(),
                    });
                }
                result.unwrap_or_default()
            }
            Some(ClassKind::Complement) => {
                let mut excluded = FxHashSet::default();
                for operand in operands(&classes.complement_of, class) {
                    excluded.extend(self.members_of(&operand).iter().cloned());
                }
                self.known_facts()
                    .iter()
                    .filter(|fact| !excluded.contains(*fact))
                    .cloned()
                    .collect()
            }
            Some(ClassKind::Restriction(restriction)) => self.restriction_members(&restriction),
            Some(ClassKind::Simple | ClassKind::DataRange) | None => self.typed_members(class),
        }
    }

    /// Members through `rdf:type` of the class, of its subclasses and of its equivalents.
    fn typed_members(&mut self, class: &Resource) -> FxHashSet<Resource> {
        let model = self.model;
        let classes = &model.classes;
        let mut related = vec![class.clone()];
        related.extend(sub_classes_of(classes, class));
        related.extend(equivalent_classes_of(classes, class));

        let mut members = FxHashSet::default();
        for candidate in &related {
            if candidate != class
                && classes
                    .class(candidate)
                    .is_some_and(|c| c.is_composite())
            {
                members.extend(self.members_of(candidate).iter().cloned());
            }
            for entry in model.data.class_type.select_by_object(candidate) {
                members.insert(entry.subject().clone());
            }
        }
        let mut same = Vec::new();
        for member in &members {
            if !member.is_literal() {
                same.extend(same_facts_as(&model.data, member));
            }
        }
        members.extend(same);
        members
    }

    /// Facts having at least one value for the restricted property that satisfy the restriction.
    fn restriction_members(&mut self, restriction: &Restriction) -> FxHashSet<Resource> {
        let model = self.model;
        let properties = &model.properties;
        let on_property = restriction.on_property();
        let mut related = vec![on_property.clone()];
        related.extend(sub_properties_of(properties, on_property));
        related.extend(equivalent_properties_of(properties, on_property));

        let mut values = FxHashMap::<Resource, Vec<Resource>>::default();
        for property in &related {
            for entry in model.data.assertions.select_by_predicate(property) {
                let subject_values = values.entry(entry.subject().clone()).or_default();
                if !subject_values.contains(entry.object()) {
                    subject_values.push(entry.object().clone());
                }
            }
        }

        let mut members = FxHashSet::default();
        for (subject, subject_values) in values {
            let satisfied = match restriction.kind() {
                RestrictionKind::AllValuesFrom(from) => subject_values
                    .iter()
                    .all(|value| self.is_member(value, from)),
                RestrictionKind::SomeValuesFrom(from) => subject_values
                    .iter()
                    .any(|value| self.is_member(value, from)),
                RestrictionKind::HasValue(required) => {
                    let mut accepted = vec![required.clone()];
                    if !required.is_literal() {
                        accepted.extend(same_facts_as(&model.data, required));
                    }
                    subject_values.iter().any(|value| accepted.contains(value))
                }
                RestrictionKind::Cardinality { min, max } => {
                    let count = u32::try_from(subject_values.len()).unwrap_or(u32::MAX);
                    min.is_none_or(|min| count >= min) && max.is_none_or(|max| count <= max)
                }
            };
            if satisfied {
                members.insert(subject);
            }
        }
        members
    }
}

fn operands(taxonomy: &Taxonomy, class: &Resource) -> Vec<Resource> {
    taxonomy
        .select_by_subject(class)
        .map(|entry| entry.object().clone())
        .collect()
}

/// Facts and literals entailed to be members of the class.
pub fn members_of(model: &KnowledgeModel, class: &Resource) -> Members {
    MembershipCache::new(model).members_of(class)
}

/// Facts entailed to be members of the class, empty for literal-compatible classes.
pub fn members_of_non_literal_compatible(model: &KnowledgeModel, class: &Resource) -> Members {
    MembershipCache::new(model).members_of_non_literal_compatible(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Property};

    fn named(name: &str) -> Resource {
        Resource::named(format!("http://example.org/{name}")).unwrap()
    }

    #[test]
    fn test_literal_compatibility() {
        let mut model = KnowledgeModel::new();
        let classes = model.classes_mut();
        classes.declare_class(Class::with_kind(named("Colors"), ClassKind::DataRange));
        let red = Resource::plain_literal("red", None).unwrap();
        classes.add_one_of(&named("Colors"), &red);
        classes.add_sub_class_of(&named("Age"), &xsd::INTEGER.into());

        let classes = model.classes();
        assert!(is_literal_compatible_class(classes, &rdfs::LITERAL.into()));
        assert!(is_literal_compatible_class(classes, &named("Colors")));
        assert!(is_literal_compatible_class(classes, &named("Age")));
        assert!(!is_literal_compatible_class(classes, &named("Person")));

        let forty = Resource::typed_literal("40", xsd::INTEGER).unwrap();
        assert!(is_literal_compatible_with(classes, &forty, &xsd::INTEGER.into()));
        assert!(!is_literal_compatible_with(classes, &forty, &xsd::STRING.into()));
        assert!(is_literal_compatible_with(classes, &red, &xsd::STRING.into()));
        assert!(is_literal_compatible_with(classes, &red, &RDF_PLAIN_LITERAL.into()));
        assert!(is_literal_compatible_with(classes, &red, &named("Colors")));
        assert!(!is_literal_compatible_with(classes, &forty, &named("Colors")));
    }

    #[test]
    fn test_typed_members_follow_hierarchy_and_same_as() {
        let mut model = KnowledgeModel::new();
        model.classes_mut().add_sub_class_of(&named("Dog"), &named("Animal"));
        model.add_class_type(&named("rex"), &named("Dog"));
        model.add_class_type(&named("tom"), &named("Animal"));
        model.add_same_as(&named("rex"), &named("rexy"));
        let members = members_of(&model, &named("Animal"));
        assert_eq!(members.len(), 3);
        assert!(members.contains(&named("rexy")));
        assert!(members_of(&model, &named("Dog")).len() == 2);
        assert!(members_of(&model, &owl::NOTHING.into()).is_empty());
    }

    #[test]
    fn test_composite_members() {
        let mut model = KnowledgeModel::new();
        let classes = model.classes_mut();
        classes.declare_class(Class::with_kind(named("Pet"), ClassKind::Union));
        classes.declare_class(Class::with_kind(named("NotDog"), ClassKind::Complement));
        classes.declare_class(Class::with_kind(named("Both"), ClassKind::Intersection));
        classes.add_union_of(&named("Pet"), &named("Dog"));
        classes.add_union_of(&named("Pet"), &named("Cat"));
        classes.add_complement_of(&named("NotDog"), &named("Dog"));
        classes.add_intersection_of(&named("Both"), &named("Dog"));
        classes.add_intersection_of(&named("Both"), &named("Pet"));
        model.add_class_type(&named("rex"), &named("Dog"));
        model.add_class_type(&named("tom"), &named("Cat"));

        let mut cache = MembershipCache::new(&model);
        assert_eq!(cache.members_of(&named("Pet")).len(), 2);
        let not_dog = cache.members_of(&named("NotDog"));
        assert!(not_dog.contains(&named("tom")));
        assert!(!not_dog.contains(&named("rex")));
        assert_eq!(cache.members_of(&named("Both")).len(), 1);
    }

    #[test]
    fn test_mutually_recursive_unions() {
        let mut model = KnowledgeModel::new();
        let classes = model.classes_mut();
        classes.declare_class(Class::with_kind(named("U"), ClassKind::Union));
        classes.declare_class(Class::with_kind(named("V"), ClassKind::Union));
        classes.add_union_of(&named("U"), &named("A"));
        classes.add_union_of(&named("U"), &named("V"));
        classes.add_union_of(&named("V"), &named("U"));
        classes.add_union_of(&named("V"), &named("B"));
        model.add_class_type(&named("a"), &named("A"));
        model.add_class_type(&named("b"), &named("B"));

        assert_eq!(members_of(&model, &named("V")).len(), 2);
        assert_eq!(members_of(&model, &named("U")).len(), 2);
        let mut cache = MembershipCache::new(&model);
        assert_eq!(cache.members_of(&named("U")).len(), 2);
        assert_eq!(cache.members_of(&named("V")).len(), 2);
        let mut cache = MembershipCache::new(&model);
        assert_eq!(cache.members_of(&named("V")).len(), 2);
        assert_eq!(cache.members_of(&named("U")).len(), 2);
        assert!(cache.is_member(&named("a"), &named("V")));
        assert!(cache.is_member(&named("b"), &named("U")));
    }

    #[test]
    fn test_restriction_members() {
        let mut model = KnowledgeModel::new();
        let owns = named("owns");
        let age = named("age");
        model
            .properties_mut()
            .declare_property(Property::object(owns.clone()));
        model
            .properties_mut()
            .declare_property(Property::datatype(age.clone()));
        let classes = model.classes_mut();
        classes.declare_class(Class::restriction(
            named("DogOwner"),
            Restriction::some_values_from(owns.clone(), named("Dog")),
        ));
        classes.declare_class(Class::restriction(
            named("Adult"),
            Restriction::all_values_from(age.clone(), xsd::INTEGER.into()),
        ));
        classes.declare_class(Class::restriction(
            named("OwnsRex"),
            Restriction::has_value(owns.clone(), named("rex")),
        ));
        classes.declare_class(Class::restriction(
            named("OwnsOne"),
            Restriction::exact_cardinality(owns.clone(), 1),
        ));
        model.add_class_type(&named("rex"), &named("Dog"));
        model.add_assertion(&named("alice"), &owns, &named("rex"));
        model.add_assertion(&named("bob"), &owns, &named("tom"));
        model.add_assertion(&named("bob"), &owns, &named("garfield"));
        model.add_assertion(
            &named("alice"),
            &age,
            &Resource::typed_literal("40", xsd::INTEGER).unwrap(),
        );
        model.add_assertion(
            &named("bob"),
            &age,
            &Resource::plain_literal("old", None).unwrap(),
        );

        let mut cache = MembershipCache::new(&model);
        let dog_owners = cache.members_of(&named("DogOwner"));
        assert!(dog_owners.contains(&named("alice")) && dog_owners.len() == 1);
        let adults = cache.members_of(&named("Adult"));
        assert!(adults.contains(&named("alice")) && adults.len() == 1);
        assert_eq!(cache.members_of(&named("OwnsRex")).len(), 1);
        let owns_one = cache.members_of(&named("OwnsOne"));
        assert!(owns_one.contains(&named("alice")) && owns_one.len() == 1);
    }
}
