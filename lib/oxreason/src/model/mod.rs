//! The knowledge model: class, property and data partitions with their mutation guards.
//!
//! Guards never fail: an insertion breaking an invariant of the model is dropped,
//! logged with [`tracing::warn!`] and reported with a `false` return value.

mod base;
mod class;
mod data;
mod property;

pub use base::base_ontology;
pub(crate) use base::ANNOTATION_PROPERTIES;
pub use class::{Class, ClassKind, ClassModel, Restriction, RestrictionKind};
pub use data::DataModel;
pub use property::{Characteristic, Property, PropertyKind, PropertyModel};

use crate::closure::{different_facts_from, same_facts_as, transitive_assertions_of};
use crate::membership::is_literal_compatible_class;
use crate::resource::Resource;
use crate::taxonomy::{Taxonomy, TaxonomyEntry};
use crate::vocab::{is_reserved_iri, owl, rdf, rdfs, xsd};
use oxrdf::{BlankNode, Graph, Literal, NamedNodeRef, NamedOrBlankNode, Term, Triple};
use std::fmt;
use tracing::warn;

/// The three partitions of a [`KnowledgeModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Class,
    Property,
    Data,
}

/// Names every taxonomy of a [`KnowledgeModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    SubClassOf,
    EquivalentClass,
    DisjointWith,
    OneOf,
    IntersectionOf,
    UnionOf,
    ComplementOf,
    ClassAnnotation,
    SubPropertyOf,
    EquivalentProperty,
    InverseOf,
    PropertyAnnotation,
    ClassType,
    SameAs,
    DifferentFrom,
    Assertion,
    NegativeAssertion,
    FactAnnotation,
}

impl Relation {
    /// All relations, class partition first.
    pub const ALL: [Self; 18] = [
        Self::SubClassOf,
        Self::EquivalentClass,
        Self::DisjointWith,
        Self::OneOf,
        Self::IntersectionOf,
        Self::UnionOf,
        Self::ComplementOf,
        Self::ClassAnnotation,
        Self::SubPropertyOf,
        Self::EquivalentProperty,
        Self::InverseOf,
        Self::PropertyAnnotation,
        Self::ClassType,
        Self::SameAs,
        Self::DifferentFrom,
        Self::Assertion,
        Self::NegativeAssertion,
        Self::FactAnnotation,
    ];

    /// The model partition holding this relation.
    pub fn partition(self) -> Partition {
        match self {
            Self::SubClassOf
            | Self::EquivalentClass
            | Self::DisjointWith
            | Self::OneOf
            | Self::IntersectionOf
            | Self::UnionOf
            | Self::ComplementOf
            | Self::ClassAnnotation => Partition::Class,
            Self::SubPropertyOf
            | Self::EquivalentProperty
            | Self::InverseOf
            | Self::PropertyAnnotation => Partition::Property,
            Self::ClassType
            | Self::SameAs
            | Self::DifferentFrom
            | Self::Assertion
            | Self::NegativeAssertion
            | Self::FactAnnotation => Partition::Data,
        }
    }

    /// The predicate shared by all entries of the taxonomy.
    ///
    /// `None` for assertions and annotations, whose predicate is the asserted property.
    pub fn predicate(self) -> Option<NamedNodeRef<'static>> {
        Some(match self {
            Self::SubClassOf => rdfs::SUB_CLASS_OF,
            Self::EquivalentClass => owl::EQUIVALENT_CLASS,
            Self::DisjointWith => owl::DISJOINT_WITH,
            Self::OneOf => owl::ONE_OF,
            Self::IntersectionOf => owl::INTERSECTION_OF,
            Self::UnionOf => owl::UNION_OF,
            Self::ComplementOf => owl::COMPLEMENT_OF,
            Self::SubPropertyOf => rdfs::SUB_PROPERTY_OF,
            Self::EquivalentProperty => owl::EQUIVALENT_PROPERTY,
            Self::InverseOf => owl::INVERSE_OF,
            Self::ClassType => rdf::TYPE,
            Self::SameAs => owl::SAME_AS,
            Self::DifferentFrom => owl::DIFFERENT_FROM,
            Self::ClassAnnotation
            | Self::PropertyAnnotation
            | Self::Assertion
            | Self::NegativeAssertion
            | Self::FactAnnotation => return None,
        })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SubClassOf => "subClassOf",
            Self::EquivalentClass => "equivalentClass",
            Self::DisjointWith => "disjointWith",
            Self::OneOf => "oneOf",
            Self::IntersectionOf => "intersectionOf",
            Self::UnionOf => "unionOf",
            Self::ComplementOf => "complementOf",
            Self::ClassAnnotation => "classAnnotation",
            Self::SubPropertyOf => "subPropertyOf",
            Self::EquivalentProperty => "equivalentProperty",
            Self::InverseOf => "inverseOf",
            Self::PropertyAnnotation => "propertyAnnotation",
            Self::ClassType => "classType",
            Self::SameAs => "sameAs",
            Self::DifferentFrom => "differentFrom",
            Self::Assertion => "assertion",
            Self::NegativeAssertion => "negativeAssertion",
            Self::FactAnnotation => "factAnnotation",
        })
    }
}

/// An ontology made of a class, a property and a data partition.
///
/// ```
/// use oxreason::{KnowledgeModel, Property, Resource};
///
/// let mut model = KnowledgeModel::new();
/// let john = Resource::named("http://example.org/John")?;
/// let mary = Resource::named("http://example.org/Mary")?;
/// let has_parent = Resource::named("http://example.org/hasParent")?;
/// model.properties_mut().declare_property(Property::object(has_parent.clone()));
/// model.data_mut().declare_fact(john.clone());
/// model.data_mut().declare_fact(mary.clone());
/// assert!(model.add_assertion(&john, &has_parent, &mary));
/// // The object of an object property must be a fact
/// assert!(!model.add_assertion(&john, &has_parent, &Resource::plain_literal("Mary", None)?));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[expect(clippy::field_scoped_visibility_modifiers)]
#[derive(Debug, Clone, Default)]
pub struct KnowledgeModel {
    pub(crate) classes: ClassModel,
    pub(crate) properties: PropertyModel,
    pub(crate) data: DataModel,
}

impl KnowledgeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a model from its three partitions.
    pub fn from_parts(classes: ClassModel, properties: PropertyModel, data: DataModel) -> Self {
        Self {
            classes,
            properties,
            data,
        }
    }

    #[inline]
    pub fn classes(&self) -> &ClassModel {
        &self.classes
    }

    /// Mutable access to the class partition.
    ///
    /// Facts typed with classes go through [`add_class_type`](Self::add_class_type) instead.
    #[inline]
    pub fn classes_mut(&mut self) -> &mut ClassModel {
        &mut self.classes
    }

    #[inline]
    pub fn properties(&self) -> &PropertyModel {
        &self.properties
    }

    #[inline]
    pub fn properties_mut(&mut self) -> &mut PropertyModel {
        &mut self.properties
    }

    #[inline]
    pub fn data(&self) -> &DataModel {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut DataModel {
        &mut self.data
    }

    /// The taxonomy storing `relation`.
    ///
    /// ```
    /// use oxreason::{KnowledgeModel, Relation, Resource};
    ///
    /// let mut model = KnowledgeModel::new();
    /// let dog = Resource::named("http://example.org/Dog")?;
    /// let animal = Resource::named("http://example.org/Animal")?;
    /// model.classes_mut().add_sub_class_of(&dog, &animal);
    /// assert_eq!(model.taxonomy(Relation::SubClassOf).len(), 1);
    /// assert!(model.taxonomy(Relation::EquivalentClass).is_empty());
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn taxonomy(&self, relation: Relation) -> &Taxonomy {
        match relation {
            Relation::SubClassOf => &self.classes.sub_class_of,
            Relation::EquivalentClass => &self.classes.equivalent_class,
            Relation::DisjointWith => &self.classes.disjoint_with,
            Relation::OneOf => &self.classes.one_of,
            Relation::IntersectionOf => &self.classes.intersection_of,
            Relation::UnionOf => &self.classes.union_of,
            Relation::ComplementOf => &self.classes.complement_of,
            Relation::ClassAnnotation => &self.classes.annotations,
            Relation::SubPropertyOf => &self.properties.sub_property_of,
            Relation::EquivalentProperty => &self.properties.equivalent_property,
            Relation::InverseOf => &self.properties.inverse_of,
            Relation::PropertyAnnotation => &self.properties.annotations,
            Relation::ClassType => &self.data.class_type,
            Relation::SameAs => &self.data.same_as,
            Relation::DifferentFrom => &self.data.different_from,
            Relation::Assertion => &self.data.assertions,
            Relation::NegativeAssertion => &self.data.negative_assertions,
            Relation::FactAnnotation => &self.data.annotations,
        }
    }

    /// Raw mutable access to a taxonomy, bypassing the guards of the model.
    pub fn taxonomy_mut(&mut self, relation: Relation) -> &mut Taxonomy {
        match relation {
            Relation::SubClassOf => &mut self.classes.sub_class_of,
            Relation::EquivalentClass => &mut self.classes.equivalent_class,
            Relation::DisjointWith => &mut self.classes.disjoint_with,
            Relation::OneOf => &mut self.classes.one_of,
            Relation::IntersectionOf => &mut self.classes.intersection_of,
            Relation::UnionOf => &mut self.classes.union_of,
            Relation::ComplementOf => &mut self.classes.complement_of,
            Relation::ClassAnnotation => &mut self.classes.annotations,
            Relation::SubPropertyOf => &mut self.properties.sub_property_of,
            Relation::EquivalentProperty => &mut self.properties.equivalent_property,
            Relation::InverseOf => &mut self.properties.inverse_of,
            Relation::PropertyAnnotation => &mut self.properties.annotations,
            Relation::ClassType => &mut self.data.class_type,
            Relation::SameAs => &mut self.data.same_as,
            Relation::DifferentFrom => &mut self.data.different_from,
            Relation::Assertion => &mut self.data.assertions,
            Relation::NegativeAssertion => &mut self.data.negative_assertions,
            Relation::FactAnnotation => &mut self.data.annotations,
        }
    }

    /// Adds `fact rdf:type class`.
    ///
    /// The fact must not be a literal nor a reserved term and the class must be a plain class
    /// able to have facts as members.
    pub fn add_class_type(&mut self, fact: &Resource, class: &Resource) -> bool {
        if fact.is_literal() || fact.iri().is_some_and(is_reserved_iri) {
            warn!(%fact, %class, "rejected classType relation: the fact is a literal or a reserved term");
            return false;
        }
        if self.classes.class(class).is_some_and(|c| !c.is_plain()) {
            warn!(%fact, %class, "rejected classType relation: facts can only be typed with plain classes");
            return false;
        }
        if is_literal_compatible_class(&self.classes, class) {
            warn!(%fact, %class, "rejected classType relation: the class only has literal members");
            return false;
        }
        self.data.class_type.add(TaxonomyEntry::new(
            fact.clone(),
            rdf::TYPE.into(),
            class.clone(),
        ))
    }

    /// Adds `left owl:sameAs right` together with its mirror.
    pub fn add_same_as(&mut self, left: &Resource, right: &Resource) -> bool {
        if left == right || left.is_literal() || right.is_literal() {
            warn!(%left, %right, "rejected sameAs relation: both sides must be distinct facts");
            return false;
        }
        if different_facts_from(&self.data, left).contains(right) {
            warn!(%left, %right, "rejected sameAs relation: the facts are known to be different");
            return false;
        }
        let entry = TaxonomyEntry::new(left.clone(), owl::SAME_AS.into(), right.clone());
        let mirror = entry.mirrored();
        let added = self.data.same_as.add(entry);
        self.data.same_as.add(mirror) || added
    }

    /// Adds `left owl:differentFrom right` together with its mirror.
    pub fn add_different_from(&mut self, left: &Resource, right: &Resource) -> bool {
        if left == right || left.is_literal() || right.is_literal() {
            warn!(%left, %right, "rejected differentFrom relation: both sides must be distinct facts");
            return false;
        }
        if same_facts_as(&self.data, left).contains(right) {
            warn!(%left, %right, "rejected differentFrom relation: the facts are known to be the same");
            return false;
        }
        let entry = TaxonomyEntry::new(left.clone(), owl::DIFFERENT_FROM.into(), right.clone());
        let mirror = entry.mirrored();
        let added = self.data.different_from.add(entry);
        self.data.different_from.add(mirror) || added
    }

    /// Checks the shape of a positive or negative assertion.
    fn is_valid_assertion(
        &self,
        subject: &Resource,
        property: &Resource,
        object: &Resource,
    ) -> bool {
        let Some(declared) = self.properties.property(property) else {
            warn!(%subject, %property, %object, "rejected assertion: undeclared property");
            return false;
        };
        if declared.is_annotation_property() || property.iri().is_some_and(is_reserved_iri) {
            warn!(%subject, %property, %object, "rejected assertion: annotation or reserved property");
            return false;
        }
        if subject.is_literal() || subject.iri().is_some_and(is_reserved_iri) {
            warn!(%subject, %property, %object, "rejected assertion: the subject must be a user fact");
            return false;
        }
        if declared.is_object_property() == object.is_literal() {
            warn!(%subject, %property, %object, kind = %declared.kind(), "rejected assertion: the object does not fit the kind of the property");
            return false;
        }
        true
    }

    /// Adds the assertion `subject property object`.
    ///
    /// The property must be a declared object or datatype property taking an object of the
    /// matching kind. The assertion is rejected if it is negatively asserted or if it closes
    /// a cycle through a transitive property.
    pub fn add_assertion(
        &mut self,
        subject: &Resource,
        property: &Resource,
        object: &Resource,
    ) -> bool {
        if !self.is_valid_assertion(subject, property, object) {
            return false;
        }
        if self
            .data
            .negative_assertions
            .contains_relation(subject, property, object)
        {
            warn!(%subject, %property, %object, "rejected assertion: it is negatively asserted");
            return false;
        }
        if self
            .properties
            .property(property)
            .is_some_and(Property::is_transitive)
            && (subject == object
                || transitive_assertions_of(&self.properties, &self.data, object, property)
                    .contains(subject))
        {
            warn!(%subject, %property, %object, "rejected assertion: it would close a cycle through a transitive property");
            return false;
        }
        self.data.assertions.add(TaxonomyEntry::new(
            subject.clone(),
            property.clone(),
            object.clone(),
        ))
    }

    /// Adds the negative assertion `subject property object`.
    pub fn add_negative_assertion(
        &mut self,
        subject: &Resource,
        property: &Resource,
        object: &Resource,
    ) -> bool {
        if !self.is_valid_assertion(subject, property, object) {
            return false;
        }
        if self
            .data
            .assertions
            .contains_relation(subject, property, object)
        {
            warn!(%subject, %property, %object, "rejected negative assertion: it is positively asserted");
            return false;
        }
        self.data.negative_assertions.add(TaxonomyEntry::new(
            subject.clone(),
            property.clone(),
            object.clone(),
        ))
    }

    /// Total number of entries over all taxonomies.
    pub fn entry_count(&self) -> usize {
        Relation::ALL
            .iter()
            .map(|relation| self.taxonomy(*relation).len())
            .sum()
    }

    /// Declarations and taxonomies of both models.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            classes: self.classes.union(&other.classes),
            properties: self.properties.union(&other.properties),
            data: self.data.union(&other.data),
        }
    }

    /// Declarations and entries present in both models.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            classes: self.classes.intersect(&other.classes),
            properties: self.properties.intersect(&other.properties),
            data: self.data.intersect(&other.data),
        }
    }

    /// Declarations and entries of `self` missing from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            classes: self.classes.difference(&other.classes),
            properties: self.properties.difference(&other.properties),
            data: self.data.difference(&other.data),
        }
    }

    /// Exports the model as an OWL graph.
    ///
    /// Class operands (`owl:oneOf`, `owl:unionOf`, `owl:intersectionOf`) are written as
    /// one triple per member instead of RDF lists. Negative assertions are written as
    /// `owl:NegativePropertyAssertion` blank nodes.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        for class in self.classes.classes() {
            write_class(&mut graph, class);
        }
        for property in self.properties.properties() {
            write_property(&mut graph, property);
        }
        for relation in Relation::ALL {
            if relation != Relation::NegativeAssertion {
                self.taxonomy(relation).write_into(&mut graph);
            }
        }
        for entry in &self.data.negative_assertions {
            write_negative_assertion(&mut graph, entry);
        }
        graph
    }
}

/// Unions the BASE ontology into a model.
pub fn expand(model: &KnowledgeModel, base: &KnowledgeModel) -> KnowledgeModel {
    model.union(base)
}

/// Removes from an expanded model what the BASE ontology contributed to it.
///
/// `contributed` is the BASE ontology minus the model it was expanded into, so that
/// the declarations and entries the model already had before expansion are kept.
pub fn unexpand(expanded: &KnowledgeModel, contributed: &KnowledgeModel) -> KnowledgeModel {
    expanded.difference(contributed)
}

fn node_of(resource: &Resource) -> Option<NamedOrBlankNode> {
    match resource.term() {
        Term::NamedNode(node) => Some(node.clone().into()),
        Term::BlankNode(node) => Some(node.clone().into()),
        _ => None,
    }
}

fn insert(
    graph: &mut Graph,
    subject: &NamedOrBlankNode,
    predicate: NamedNodeRef<'_>,
    object: impl Into<Term>,
) {
    graph.insert(&Triple::new(subject.clone(), predicate, object));
}

fn cardinality_literal(value: u32) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::NON_NEGATIVE_INTEGER)
}

fn write_class(graph: &mut Graph, class: &Class) {
    let Some(subject) = node_of(class.resource()) else {
        return;
    };
    let class_type = match class.kind() {
        ClassKind::DataRange => owl::DATA_RANGE,
        ClassKind::Restriction(_) => owl::RESTRICTION,
        _ => owl::CLASS,
    };
    insert(graph, &subject, rdf::TYPE, class_type.into_owned());
    let Some(restriction) = class.as_restriction() else {
        return;
    };
    insert(
        graph,
        &subject,
        owl::ON_PROPERTY,
        restriction.on_property().clone(),
    );
    match restriction.kind() {
        RestrictionKind::AllValuesFrom(from) => {
            insert(graph, &subject, owl::ALL_VALUES_FROM, from.clone());
        }
        RestrictionKind::SomeValuesFrom(from) => {
            insert(graph, &subject, owl::SOME_VALUES_FROM, from.clone());
        }
        RestrictionKind::HasValue(value) => {
            insert(graph, &subject, owl::HAS_VALUE, value.clone());
        }
        RestrictionKind::Cardinality { min, max } => match (min, max) {
            (Some(min), Some(max)) if min == max => {
                insert(graph, &subject, owl::CARDINALITY, cardinality_literal(*min));
            }
            _ => {
                if let Some(min) = min {
                    insert(
                        graph,
                        &subject,
                        owl::MIN_CARDINALITY,
                        cardinality_literal(*min),
                    );
                }
                if let Some(max) = max {
                    insert(
                        graph,
                        &subject,
                        owl::MAX_CARDINALITY,
                        cardinality_literal(*max),
                    );
                }
            }
        },
    }
}

fn write_property(graph: &mut Graph, property: &Property) {
    let Some(subject) = node_of(property.resource()) else {
        return;
    };
    let property_type = match property.kind() {
        PropertyKind::Object => owl::OBJECT_PROPERTY,
        PropertyKind::Datatype => owl::DATATYPE_PROPERTY,
        PropertyKind::Annotation => owl::ANNOTATION_PROPERTY,
    };
    insert(graph, &subject, rdf::TYPE, property_type.into_owned());
    for (characteristic, class) in [
        (Characteristic::Functional, owl::FUNCTIONAL_PROPERTY),
        (
            Characteristic::InverseFunctional,
            owl::INVERSE_FUNCTIONAL_PROPERTY,
        ),
        (Characteristic::Symmetric, owl::SYMMETRIC_PROPERTY),
        (Characteristic::Transitive, owl::TRANSITIVE_PROPERTY),
    ] {
        if property.has_characteristic(characteristic) {
            insert(graph, &subject, rdf::TYPE, class.into_owned());
        }
    }
    if let Some(domain) = property.domain() {
        insert(graph, &subject, rdfs::DOMAIN, domain.clone());
    }
    if let Some(range) = property.range() {
        insert(graph, &subject, rdfs::RANGE, range.clone());
    }
}

fn write_negative_assertion(graph: &mut Graph, entry: &TaxonomyEntry) {
    let (Some(source), Some(property)) =
        (node_of(entry.subject()), entry.predicate().as_named_node())
    else {
        return;
    };
    let node = NamedOrBlankNode::from(BlankNode::default());
    insert(
        graph,
        &node,
        rdf::TYPE,
        owl::NEGATIVE_PROPERTY_ASSERTION.into_owned(),
    );
    insert(graph, &node, owl::SOURCE_INDIVIDUAL, source);
    insert(graph, &node, owl::ASSERTION_PROPERTY, property.clone());
    let target = if entry.object().is_literal() {
        owl::TARGET_VALUE
    } else {
        owl::TARGET_INDIVIDUAL
    };
    insert(graph, &node, target, entry.object().clone());
}
