//! Class partition of a knowledge model.

use crate::closure::{equivalent_classes_of, is_disjoint_class, is_sub_class_of};
use crate::resource::{Resource, ResourceId};
use crate::taxonomy::{Taxonomy, TaxonomyCategory, TaxonomyEntry};
use crate::vocab::{owl, rdfs, xsd};
use oxrdf::{Literal, NamedNodeRef};
use std::collections::BTreeMap;
use tracing::warn;

/// What a class is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    /// A plain named or anonymous class.
    Simple,
    /// A class enumerating literals with `owl:oneOf`.
    DataRange,
    /// A class enumerating facts with `owl:oneOf`.
    Enumerate,
    /// A class defined with `owl:unionOf`.
    Union,
    /// A class defined with `owl:intersectionOf`.
    Intersection,
    /// A class defined with `owl:complementOf`.
    Complement,
    /// An `owl:Restriction`.
    Restriction(Restriction),
}

/// The constraint of a restriction class on the values of its property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestrictionKind {
    /// Every value must be a member of the class.
    AllValuesFrom(Resource),
    /// At least one value must be a member of the class.
    SomeValuesFrom(Resource),
    /// One of the values must be the given fact or literal.
    HasValue(Resource),
    /// The number of values is bounded.
    Cardinality { min: Option<u32>, max: Option<u32> },
}

/// An `owl:Restriction` on the values a property takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    on_property: Resource,
    kind: RestrictionKind,
}

impl Restriction {
    /// Builds a restriction on `on_property`.
    pub fn new(on_property: Resource, kind: RestrictionKind) -> Self {
        Self { on_property, kind }
    }

    /// Every value of `on_property` must be a member of `from_class`.
    pub fn all_values_from(on_property: Resource, from_class: Resource) -> Self {
        Self::new(on_property, RestrictionKind::AllValuesFrom(from_class))
    }

    /// At least one value of `on_property` must be a member of `from_class`.
    pub fn some_values_from(on_property: Resource, from_class: Resource) -> Self {
        Self::new(on_property, RestrictionKind::SomeValuesFrom(from_class))
    }

    /// `on_property` must take `required_value` among its values.
    pub fn has_value(on_property: Resource, required_value: Resource) -> Self {
        Self::new(on_property, RestrictionKind::HasValue(required_value))
    }

    /// Bounds the number of values of `on_property`. `None` leaves a side unbounded.
    pub fn cardinality(on_property: Resource, min: Option<u32>, max: Option<u32>) -> Self {
        Self::new(on_property, RestrictionKind::Cardinality { min, max })
    }

    /// `on_property` must take exactly `cardinality` values.
    pub fn exact_cardinality(on_property: Resource, cardinality: u32) -> Self {
        Self::cardinality(on_property, Some(cardinality), Some(cardinality))
    }

    /// The restricted property.
    #[inline]
    pub fn on_property(&self) -> &Resource {
        &self.on_property
    }

    #[inline]
    pub fn kind(&self) -> &RestrictionKind {
        &self.kind
    }

    /// The class constraining the values of `allValuesFrom` and `someValuesFrom` restrictions.
    pub fn from_class(&self) -> Option<&Resource> {
        match &self.kind {
            RestrictionKind::AllValuesFrom(class) | RestrictionKind::SomeValuesFrom(class) => {
                Some(class)
            }
            RestrictionKind::HasValue(_) | RestrictionKind::Cardinality { .. } => None,
        }
    }

    /// The value required by `hasValue` restrictions.
    pub fn required_value(&self) -> Option<&Resource> {
        if let RestrictionKind::HasValue(value) = &self.kind {
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_cardinality(&self) -> bool {
        matches!(self.kind, RestrictionKind::Cardinality { .. })
    }
}

/// A class declared in a [`ClassModel`].
#[derive(Debug, Clone)]
pub struct Class {
    resource: Resource,
    kind: ClassKind,
}

impl Class {
    /// Creates a plain class.
    pub fn new(resource: Resource) -> Self {
        Self::with_kind(resource, ClassKind::Simple)
    }

    /// Creates a class of the given kind.
    ///
    /// Composite classes get their operands through the [`ClassModel`] relations,
    /// e.g. [`ClassModel::add_union_of`].
    pub fn with_kind(resource: Resource, kind: ClassKind) -> Self {
        Self { resource, kind }
    }

    /// Creates an anonymous or named `owl:Restriction` class.
    pub fn restriction(resource: Resource, restriction: Restriction) -> Self {
        Self::with_kind(resource, ClassKind::Restriction(restriction))
    }

    /// The resource naming the class.
    #[inline]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    #[inline]
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Plain classes are the only ones facts can be typed with.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.kind == ClassKind::Simple
    }

    /// Returns true for enumerations, unions, intersections, complements and restrictions.
    pub fn is_composite(&self) -> bool {
        !matches!(self.kind, ClassKind::Simple | ClassKind::DataRange)
    }

    #[inline]
    pub fn is_data_range(&self) -> bool {
        self.kind == ClassKind::DataRange
    }

    /// The restriction of a restriction class.
    pub fn as_restriction(&self) -> Option<&Restriction> {
        if let ClassKind::Restriction(restriction) = &self.kind {
            Some(restriction)
        } else {
            None
        }
    }
}

/// Declared classes and the taxonomies relating them.
#[expect(clippy::field_scoped_visibility_modifiers)]
#[derive(Debug, Clone)]
pub struct ClassModel {
    pub(crate) classes: BTreeMap<ResourceId, Class>,
    pub(crate) sub_class_of: Taxonomy,
    pub(crate) equivalent_class: Taxonomy,
    pub(crate) disjoint_with: Taxonomy,
    pub(crate) one_of: Taxonomy,
    pub(crate) intersection_of: Taxonomy,
    pub(crate) union_of: Taxonomy,
    pub(crate) complement_of: Taxonomy,
    pub(crate) annotations: Taxonomy,
}

impl Default for ClassModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassModel {
    pub fn new() -> Self {
        Self {
            classes: BTreeMap::new(),
            sub_class_of: Taxonomy::new(TaxonomyCategory::Model),
            equivalent_class: Taxonomy::new(TaxonomyCategory::Model),
            disjoint_with: Taxonomy::new(TaxonomyCategory::Model),
            one_of: Taxonomy::new(TaxonomyCategory::Model),
            intersection_of: Taxonomy::new(TaxonomyCategory::Model),
            union_of: Taxonomy::new(TaxonomyCategory::Model),
            complement_of: Taxonomy::new(TaxonomyCategory::Model),
            annotations: Taxonomy::new(TaxonomyCategory::Annotation),
        }
    }

    /// Declares a class. Returns `false` if a class with the same identity is already declared.
    pub fn declare_class(&mut self, class: Class) -> bool {
        let id = class.resource.id();
        if self.classes.contains_key(&id) {
            return false;
        }
        self.classes.insert(id, class);
        true
    }

    /// Looks up a declared class.
    pub fn class(&self, resource: &Resource) -> Option<&Class> {
        self.classes.get(&resource.id())
    }

    /// Checks if the resource is a declared class.
    #[inline]
    pub fn contains(&self, resource: &Resource) -> bool {
        self.classes.contains_key(&resource.id())
    }

    /// All declared classes, ordered by id.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns true if the resource is a declared class of the given kind.
    fn has_kind(&self, resource: &Resource, kind: &ClassKind) -> bool {
        self.class(resource).is_some_and(|class| &class.kind == kind)
    }

    /// Adds `child rdfs:subClassOf parent`.
    ///
    /// Rejected if it would make the classes equivalent, cyclic or clash with a disjointness.
    pub fn add_sub_class_of(&mut self, child: &Resource, parent: &Resource) -> bool {
        if child == parent
            || is_sub_class_of(self, parent, child)
            || equivalent_classes_of(self, child).contains(parent)
            || is_disjoint_class(self, child, parent)
        {
            warn!(%child, %parent, "rejected subClassOf relation: incompatible with the class hierarchy");
            return false;
        }
        self.sub_class_of.add(TaxonomyEntry::new(
            child.clone(),
            rdfs::SUB_CLASS_OF.into(),
            parent.clone(),
        ))
    }

    /// Adds `left owl:equivalentClass right` together with its mirror.
    pub fn add_equivalent_class(&mut self, left: &Resource, right: &Resource) -> bool {
        if left == right
            || is_sub_class_of(self, left, right)
            || is_sub_class_of(self, right, left)
            || is_disjoint_class(self, left, right)
        {
            warn!(%left, %right, "rejected equivalentClass relation: incompatible with the class hierarchy");
            return false;
        }
        let entry = TaxonomyEntry::new(left.clone(), owl::EQUIVALENT_CLASS.into(), right.clone());
        let mirror = entry.mirrored();
        let added = self.equivalent_class.add(entry);
        self.equivalent_class.add(mirror) || added
    }

    /// Adds `left owl:disjointWith right` together with its mirror.
    pub fn add_disjoint_with(&mut self, left: &Resource, right: &Resource) -> bool {
        if left == right
            || is_sub_class_of(self, left, right)
            || is_sub_class_of(self, right, left)
            || equivalent_classes_of(self, left).contains(right)
        {
            warn!(%left, %right, "rejected disjointWith relation: incompatible with the class hierarchy");
            return false;
        }
        let entry = TaxonomyEntry::new(left.clone(), owl::DISJOINT_WITH.into(), right.clone());
        let mirror = entry.mirrored();
        let added = self.disjoint_with.add(entry);
        self.disjoint_with.add(mirror) || added
    }

    /// Adds a member to an enumerated class (facts) or a data range (literals).
    pub fn add_one_of(&mut self, class: &Resource, member: &Resource) -> bool {
        let expected = if member.is_literal() {
            ClassKind::DataRange
        } else {
            ClassKind::Enumerate
        };
        if !self.has_kind(class, &expected) {
            warn!(%class, %member, "rejected oneOf relation: the class is not a declared enumeration of this kind of member");
            return false;
        }
        self.one_of.add(TaxonomyEntry::new(
            class.clone(),
            owl::ONE_OF.into(),
            member.clone(),
        ))
    }

    /// Adds an operand to a union class.
    pub fn add_union_of(&mut self, class: &Resource, member: &Resource) -> bool {
        self.add_operand(class, member, &ClassKind::Union, owl::UNION_OF)
    }

    /// Adds an operand to an intersection class.
    pub fn add_intersection_of(&mut self, class: &Resource, member: &Resource) -> bool {
        self.add_operand(
            class,
            member,
            &ClassKind::Intersection,
            owl::INTERSECTION_OF,
        )
    }

    /// Sets the class complemented by a complement class.
    pub fn add_complement_of(&mut self, class: &Resource, complemented: &Resource) -> bool {
        self.add_operand(
            class,
            complemented,
            &ClassKind::Complement,
            owl::COMPLEMENT_OF,
        )
    }

    fn add_operand(
        &mut self,
        class: &Resource,
        operand: &Resource,
        kind: &ClassKind,
        predicate: NamedNodeRef<'_>,
    ) -> bool {
        if class == operand || operand.is_literal() || !self.has_kind(class, kind) {
            warn!(%class, %operand, %predicate, "rejected class operand: the class is not a declared class of the right kind");
            return false;
        }
        let taxonomy = match *kind {
            ClassKind::Union => &mut self.union_of,
            ClassKind::Intersection => &mut self.intersection_of,
            _ => &mut self.complement_of,
        };
        taxonomy.add(TaxonomyEntry::new(
            class.clone(),
            predicate.into(),
            operand.clone(),
        ))
    }

    /// Annotates a class.
    pub fn annotate(&mut self, class: &Resource, property: &Resource, value: &Resource) -> bool {
        self.annotations.add(TaxonomyEntry::new(
            class.clone(),
            property.clone(),
            value.clone(),
        ))
    }

    /// Marks a class as `owl:deprecated`.
    pub fn deprecate_class(&mut self, class: &Resource) -> bool {
        self.annotate(class, &owl::DEPRECATED.into(), &deprecated_flag())
    }

    /// Checks if the class carries an `owl:deprecated true` annotation.
    pub fn is_deprecated(&self, class: &Resource) -> bool {
        is_deprecated_in(&self.annotations, class)
    }

    /// `rdfs:subClassOf` relations, asserted and entailed.
    pub fn sub_class_of(&self) -> &Taxonomy {
        &self.sub_class_of
    }

    /// `owl:equivalentClass` relations. Both directions are stored.
    pub fn equivalent_class(&self) -> &Taxonomy {
        &self.equivalent_class
    }

    /// `owl:disjointWith` relations. Both directions are stored.
    pub fn disjoint_with(&self) -> &Taxonomy {
        &self.disjoint_with
    }

    /// Members of enumerated classes.
    pub fn one_of(&self) -> &Taxonomy {
        &self.one_of
    }

    /// Operands of intersection classes.
    pub fn intersection_of(&self) -> &Taxonomy {
        &self.intersection_of
    }

    /// Operands of union classes.
    pub fn union_of(&self) -> &Taxonomy {
        &self.union_of
    }

    /// The complemented class of complement classes.
    pub fn complement_of(&self) -> &Taxonomy {
        &self.complement_of
    }

    /// Annotations on classes.
    pub fn annotations(&self) -> &Taxonomy {
        &self.annotations
    }

    /// Returns the declarations and relations of both models.
    ///
    /// A class declared in both keeps the declaration of `self`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut classes = self.classes.clone();
        for (id, class) in &other.classes {
            classes.entry(*id).or_insert_with(|| class.clone());
        }
        Self {
            classes,
            sub_class_of: self.sub_class_of.union(&other.sub_class_of),
            equivalent_class: self.equivalent_class.union(&other.equivalent_class),
            disjoint_with: self.disjoint_with.union(&other.disjoint_with),
            one_of: self.one_of.union(&other.one_of),
            intersection_of: self.intersection_of.union(&other.intersection_of),
            union_of: self.union_of.union(&other.union_of),
            complement_of: self.complement_of.union(&other.complement_of),
            annotations: self.annotations.union(&other.annotations),
        }
    }

    /// Returns the declarations and relations present in both models.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            classes: self
                .classes
                .iter()
                .filter(|(id, _)| other.classes.contains_key(id))
                .map(|(id, class)| (*id, class.clone()))
                .collect(),
            sub_class_of: self.sub_class_of.intersect(&other.sub_class_of),
            equivalent_class: self.equivalent_class.intersect(&other.equivalent_class),
            disjoint_with: self.disjoint_with.intersect(&other.disjoint_with),
            one_of: self.one_of.intersect(&other.one_of),
            intersection_of: self.intersection_of.intersect(&other.intersection_of),
            union_of: self.union_of.intersect(&other.union_of),
            complement_of: self.complement_of.intersect(&other.complement_of),
            annotations: self.annotations.intersect(&other.annotations),
        }
    }

    /// Returns the declarations and relations of `self` missing from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            classes: self
                .classes
                .iter()
                .filter(|(id, _)| !other.classes.contains_key(id))
                .map(|(id, class)| (*id, class.clone()))
                .collect(),
            sub_class_of: self.sub_class_of.difference(&other.sub_class_of),
            equivalent_class: self.equivalent_class.difference(&other.equivalent_class),
            disjoint_with: self.disjoint_with.difference(&other.disjoint_with),
            one_of: self.one_of.difference(&other.one_of),
            intersection_of: self.intersection_of.difference(&other.intersection_of),
            union_of: self.union_of.difference(&other.union_of),
            complement_of: self.complement_of.difference(&other.complement_of),
            annotations: self.annotations.difference(&other.annotations),
        }
    }
}

/// The `"true"^^xsd:boolean` value of `owl:deprecated` annotations.
pub(crate) fn deprecated_flag() -> Resource {
    Literal::new_typed_literal("true", xsd::BOOLEAN).into()
}

pub(crate) fn is_deprecated_in(annotations: &Taxonomy, resource: &Resource) -> bool {
    annotations.select_by_subject(resource).any(|entry| {
        entry.predicate().is(owl::DEPRECATED)
            && entry
                .object()
                .as_literal()
                .is_some_and(|value| matches!(value.value(), "true" | "1"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::InferenceType;

    fn class(name: &str) -> Resource {
        Resource::named(format!("http://example.org/{name}")).unwrap()
    }

    #[test]
    fn test_sub_class_of_guards() {
        let mut model = ClassModel::new();
        assert!(model.add_sub_class_of(&class("A"), &class("B")));
        assert!(model.add_sub_class_of(&class("B"), &class("C")));
        assert!(!model.add_sub_class_of(&class("A"), &class("B")));
        assert!(!model.add_sub_class_of(&class("C"), &class("A")));
        assert!(!model.add_sub_class_of(&class("A"), &class("A")));
        assert_eq!(model.sub_class_of().len(), 2);
    }

    #[test]
    fn test_symmetric_relations_are_mirrored() {
        let mut model = ClassModel::new();
        assert!(model.add_disjoint_with(&class("A"), &class("B")));
        assert_eq!(model.disjoint_with().len(), 2);
        let mirror = model.disjoint_with().select_by_subject(&class("B")).next().unwrap();
        assert_eq!(mirror.object(), &class("A"));
        assert_eq!(mirror.inference(), InferenceType::Api);

        assert!(!model.add_equivalent_class(&class("A"), &class("B")));
        assert!(!model.add_sub_class_of(&class("A"), &class("B")));
    }

    #[test]
    fn test_operands_need_the_right_kind() {
        let mut model = ClassModel::new();
        model.declare_class(Class::with_kind(class("U"), ClassKind::Union));
        model.declare_class(Class::new(class("A")));
        assert!(model.add_union_of(&class("U"), &class("A")));
        assert!(!model.add_intersection_of(&class("U"), &class("A")));
        assert!(!model.add_union_of(&class("A"), &class("U")));
    }

    #[test]
    fn test_deprecation() {
        let mut model = ClassModel::new();
        model.declare_class(Class::new(class("Old")));
        assert!(!model.is_deprecated(&class("Old")));
        model.deprecate_class(&class("Old"));
        assert!(model.is_deprecated(&class("Old")));
    }
}
