//! Property partition of a knowledge model.

use crate::closure::{equivalent_properties_of, is_sub_property_of};
use crate::model::class::{deprecated_flag, is_deprecated_in};
use crate::resource::{Resource, ResourceId};
use crate::taxonomy::{Taxonomy, TaxonomyCategory, TaxonomyEntry};
use crate::vocab::{owl, rdfs};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// The kind of values a property relates facts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Relates facts to facts.
    Object,
    /// Relates facts to literals.
    Datatype,
    /// Annotates any resource, never reasoned on.
    Annotation,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Datatype => write!(f, "datatype"),
            Self::Annotation => write!(f, "annotation"),
        }
    }
}

/// OWL-DL characteristics of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// At most one value per subject. Object and datatype properties.
    Functional,
    /// At most one subject per value. Object properties only.
    InverseFunctional,
    /// Object properties only.
    Symmetric,
    /// Object properties only.
    Transitive,
}

impl Characteristic {
    fn bit(self) -> u8 {
        match self {
            Self::Functional => 1,
            Self::InverseFunctional => 2,
            Self::Symmetric => 4,
            Self::Transitive => 8,
        }
    }

    fn applies_to(self, kind: PropertyKind) -> bool {
        match kind {
            PropertyKind::Object => true,
            PropertyKind::Datatype => self == Self::Functional,
            PropertyKind::Annotation => false,
        }
    }
}

/// A property declared in a [`PropertyModel`].
#[derive(Debug, Clone)]
pub struct Property {
    resource: Resource,
    kind: PropertyKind,
    domain: Option<Resource>,
    range: Option<Resource>,
    characteristics: u8,
}

impl Property {
    /// Creates a property without domain, range or characteristics.
    pub fn new(resource: Resource, kind: PropertyKind) -> Self {
        Self {
            resource,
            kind,
            domain: None,
            range: None,
            characteristics: 0,
        }
    }

    /// Creates an `owl:ObjectProperty`, relating facts to facts.
    pub fn object(resource: Resource) -> Self {
        Self::new(resource, PropertyKind::Object)
    }

    /// Creates an `owl:DatatypeProperty`, relating facts to literals.
    pub fn datatype(resource: Resource) -> Self {
        Self::new(resource, PropertyKind::Datatype)
    }

    /// Creates an `owl:AnnotationProperty`.
    pub fn annotation(resource: Resource) -> Self {
        Self::new(resource, PropertyKind::Annotation)
    }

    /// Sets the class of the subjects of the property. Ignored for annotation properties.
    #[must_use]
    pub fn with_domain(mut self, domain: Resource) -> Self {
        if self.kind != PropertyKind::Annotation {
            self.domain = Some(domain);
        }
        self
    }

    /// Sets the class of the values of the property. Ignored for annotation properties.
    #[must_use]
    pub fn with_range(mut self, range: Resource) -> Self {
        if self.kind != PropertyKind::Annotation {
            self.range = Some(range);
        }
        self
    }

    /// Adds a characteristic, if meaningful for the kind of the property.
    #[must_use]
    pub fn with_characteristic(mut self, characteristic: Characteristic) -> Self {
        if characteristic.applies_to(self.kind) {
            self.characteristics |= characteristic.bit();
        } else {
            warn!(property = %self.resource, kind = %self.kind, ?characteristic, "ignored characteristic not applicable to this kind of property");
        }
        self
    }

    /// The resource naming the property.
    #[inline]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    #[inline]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// The class of the subjects of the property.
    #[inline]
    pub fn domain(&self) -> Option<&Resource> {
        self.domain.as_ref()
    }

    /// The class or datatype of the values of the property.
    #[inline]
    pub fn range(&self) -> Option<&Resource> {
        self.range.as_ref()
    }

    #[inline]
    pub fn has_characteristic(&self, characteristic: Characteristic) -> bool {
        self.characteristics & characteristic.bit() != 0
    }

    #[inline]
    pub fn is_object_property(&self) -> bool {
        self.kind == PropertyKind::Object
    }

    #[inline]
    pub fn is_datatype_property(&self) -> bool {
        self.kind == PropertyKind::Datatype
    }

    #[inline]
    pub fn is_annotation_property(&self) -> bool {
        self.kind == PropertyKind::Annotation
    }

    #[inline]
    pub fn is_functional(&self) -> bool {
        self.has_characteristic(Characteristic::Functional)
    }

    #[inline]
    pub fn is_inverse_functional(&self) -> bool {
        self.has_characteristic(Characteristic::InverseFunctional)
    }

    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.has_characteristic(Characteristic::Symmetric)
    }

    #[inline]
    pub fn is_transitive(&self) -> bool {
        self.has_characteristic(Characteristic::Transitive)
    }
}

/// Declared properties and the taxonomies relating them.
#[expect(clippy::field_scoped_visibility_modifiers)]
#[derive(Debug, Clone)]
pub struct PropertyModel {
    pub(crate) properties: BTreeMap<ResourceId, Property>,
    pub(crate) sub_property_of: Taxonomy,
    pub(crate) equivalent_property: Taxonomy,
    pub(crate) inverse_of: Taxonomy,
    pub(crate) annotations: Taxonomy,
}

impl Default for PropertyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyModel {
    pub fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
            sub_property_of: Taxonomy::new(TaxonomyCategory::Model),
            equivalent_property: Taxonomy::new(TaxonomyCategory::Model),
            inverse_of: Taxonomy::new(TaxonomyCategory::Model),
            annotations: Taxonomy::new(TaxonomyCategory::Annotation),
        }
    }

    /// Declares a property. Returns `false` if a property with the same identity is already declared.
    pub fn declare_property(&mut self, property: Property) -> bool {
        let id = property.resource.id();
        if self.properties.contains_key(&id) {
            return false;
        }
        self.properties.insert(id, property);
        true
    }

    /// Looks up a declared property.
    pub fn property(&self, resource: &Resource) -> Option<&Property> {
        self.properties.get(&resource.id())
    }

    /// Checks if the resource is a declared property.
    #[inline]
    pub fn contains(&self, resource: &Resource) -> bool {
        self.properties.contains_key(&resource.id())
    }

    /// All declared properties, ordered by id.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Both properties are declared with the same kind, other than annotation.
    fn same_kind(&self, left: &Resource, right: &Resource) -> bool {
        match (self.property(left), self.property(right)) {
            (Some(left), Some(right)) => {
                left.kind == right.kind && left.kind != PropertyKind::Annotation
            }
            _ => false,
        }
    }

    /// Adds `child rdfs:subPropertyOf parent`.
    ///
    /// Both properties must be declared with the same kind and the relation must not create a cycle.
    pub fn add_sub_property_of(&mut self, child: &Resource, parent: &Resource) -> bool {
        if child == parent
            || !self.same_kind(child, parent)
            || is_sub_property_of(self, parent, child)
            || equivalent_properties_of(self, child).contains(parent)
        {
            warn!(%child, %parent, "rejected subPropertyOf relation: incompatible properties");
            return false;
        }
        self.sub_property_of.add(TaxonomyEntry::new(
            child.clone(),
            rdfs::SUB_PROPERTY_OF.into(),
            parent.clone(),
        ))
    }

    /// Adds `left owl:equivalentProperty right` together with its mirror.
    pub fn add_equivalent_property(&mut self, left: &Resource, right: &Resource) -> bool {
        if left == right
            || !self.same_kind(left, right)
            || is_sub_property_of(self, left, right)
            || is_sub_property_of(self, right, left)
        {
            warn!(%left, %right, "rejected equivalentProperty relation: incompatible properties");
            return false;
        }
        let entry = TaxonomyEntry::new(
            left.clone(),
            owl::EQUIVALENT_PROPERTY.into(),
            right.clone(),
        );
        let mirror = entry.mirrored();
        let added = self.equivalent_property.add(entry);
        self.equivalent_property.add(mirror) || added
    }

    /// Adds `left owl:inverseOf right` together with its mirror. Only object properties have inverses.
    pub fn add_inverse_of(&mut self, left: &Resource, right: &Resource) -> bool {
        let both_object = [left, right].iter().all(|property| {
            self.property(property)
                .is_some_and(Property::is_object_property)
        });
        if left == right || !both_object {
            warn!(%left, %right, "rejected inverseOf relation: both sides must be distinct object properties");
            return false;
        }
        let entry = TaxonomyEntry::new(left.clone(), owl::INVERSE_OF.into(), right.clone());
        let mirror = entry.mirrored();
        let added = self.inverse_of.add(entry);
        self.inverse_of.add(mirror) || added
    }

    /// Annotates a property.
    pub fn annotate(
        &mut self,
        property: &Resource,
        annotation: &Resource,
        value: &Resource,
    ) -> bool {
        self.annotations.add(TaxonomyEntry::new(
            property.clone(),
            annotation.clone(),
            value.clone(),
        ))
    }

    /// Marks a property as `owl:deprecated`.
    pub fn deprecate_property(&mut self, property: &Resource) -> bool {
        self.annotate(property, &owl::DEPRECATED.into(), &deprecated_flag())
    }

    /// Checks if the property carries an `owl:deprecated true` annotation.
    pub fn is_deprecated(&self, property: &Resource) -> bool {
        is_deprecated_in(&self.annotations, property)
    }

    /// `rdfs:subPropertyOf` relations, asserted and entailed.
    pub fn sub_property_of(&self) -> &Taxonomy {
        &self.sub_property_of
    }

    /// `owl:equivalentProperty` relations. Both directions are stored.
    pub fn equivalent_property(&self) -> &Taxonomy {
        &self.equivalent_property
    }

    /// `owl:inverseOf` relations. Both directions are stored.
    pub fn inverse_of(&self) -> &Taxonomy {
        &self.inverse_of
    }

    /// Annotations on properties.
    pub fn annotations(&self) -> &Taxonomy {
        &self.annotations
    }

    /// Returns the declarations and relations of both models.
    ///
    /// A property declared in both keeps the declaration of `self`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut properties = self.properties.clone();
        for (id, property) in &other.properties {
            properties.entry(*id).or_insert_with(|| property.clone());
        }
        Self {
            properties,
            sub_property_of: self.sub_property_of.union(&other.sub_property_of),
            equivalent_property: self.equivalent_property.union(&other.equivalent_property),
            inverse_of: self.inverse_of.union(&other.inverse_of),
            annotations: self.annotations.union(&other.annotations),
        }
    }

    /// Returns the declarations and relations present in both models.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            properties: self
                .properties
                .iter()
                .filter(|(id, _)| other.properties.contains_key(id))
                .map(|(id, property)| (*id, property.clone()))
                .collect(),
            sub_property_of: self.sub_property_of.intersect(&other.sub_property_of),
            equivalent_property: self
                .equivalent_property
                .intersect(&other.equivalent_property),
            inverse_of: self.inverse_of.intersect(&other.inverse_of),
            annotations: self.annotations.intersect(&other.annotations),
        }
    }

    /// Returns the declarations and relations of `self` missing from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            properties: self
                .properties
                .iter()
                .filter(|(id, _)| !other.properties.contains_key(id))
                .map(|(id, property)| (*id, property.clone()))
                .collect(),
            sub_property_of: self.sub_property_of.difference(&other.sub_property_of),
            equivalent_property: self
                .equivalent_property
                .difference(&other.equivalent_property),
            inverse_of: self.inverse_of.difference(&other.inverse_of),
            annotations: self.annotations.difference(&other.annotations),
        }
    }
}
