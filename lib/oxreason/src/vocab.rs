//! Provides ready to use [`NamedNodeRef`]s for the OWL vocabulary and the reserved namespaces.
//!
//! The RDF, RDFS and XSD vocabularies are re-exported from [`oxrdf::vocab`].

use oxrdf::NamedNodeRef;
pub use oxrdf::vocab::{rdf, rdfs, xsd};

/// The RDF namespace.
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// The RDFS namespace.
pub const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// The OWL namespace.
pub const OWL_NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";
/// The XSD namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Namespaces whose terms cannot be used as user classes, properties or facts.
pub const RESERVED_NAMESPACES: [&str; 3] = [RDF_NAMESPACE, RDFS_NAMESPACE, OWL_NAMESPACE];

/// Local names of the reserved namespaces that may still be declared as classes.
pub const RESERVED_ALLOW_LIST: [&str; 5] = ["Thing", "Nothing", "Literal", "XMLLiteral", "HTML"];

/// The datatype of HTML literals.
pub const RDF_HTML: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML");
/// The datatype of plain literals.
pub const RDF_PLAIN_LITERAL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#PlainLiteral");

/// Returns true if the IRI belongs to the RDF, RDFS or OWL namespace.
pub fn is_reserved_iri(iri: &str) -> bool {
    RESERVED_NAMESPACES.iter().any(|ns| iri.starts_with(ns))
}

/// Returns true if the IRI belongs to a reserved namespace and is not allow-listed.
pub fn is_forbidden_iri(iri: &str) -> bool {
    RESERVED_NAMESPACES.iter().any(|ns| {
        iri.strip_prefix(ns)
            .is_some_and(|local| !RESERVED_ALLOW_LIST.contains(&local))
    })
}

/// Returns true if the IRI names a datatype: XSD datatypes and the RDF literal datatypes.
pub fn is_datatype_iri(iri: &str) -> bool {
    iri.starts_with(XSD_NAMESPACE)
        || iri == rdf::XML_LITERAL.as_str()
        || iri == rdf::LANG_STRING.as_str()
        || iri == RDF_HTML.as_str()
        || iri == RDF_PLAIN_LITERAL.as_str()
}

pub mod owl {
    //! [OWL](https://www.w3.org/TR/owl2-rdf-based-semantics/) vocabulary.
    use oxrdf::NamedNodeRef;

    /// The class of all facts.
    pub const THING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");
    /// The empty class.
    pub const NOTHING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing");
    /// The class of OWL classes.
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    /// The class of data ranges.
    pub const DATA_RANGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DataRange");
    /// The class of restrictions.
    pub const RESTRICTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    /// The class of object properties.
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    /// The class of datatype properties.
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    /// The class of annotation properties.
    pub const ANNOTATION_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
    /// The class of functional properties.
    pub const FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#FunctionalProperty");
    /// The class of inverse functional properties.
    pub const INVERSE_FUNCTIONAL_PROPERTY: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://www.w3.org/2002/07/owl#InverseFunctionalProperty",
    );
    /// The class of symmetric properties.
    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    /// The class of transitive properties.
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    /// Relates two classes with the same members.
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    /// Relates two classes without common members.
    pub const DISJOINT_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
    /// Relates an enumerated class to one of its members.
    pub const ONE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#oneOf");
    /// Relates an intersection class to one of its operands.
    pub const INTERSECTION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#intersectionOf");
    /// Relates a union class to one of its operands.
    pub const UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
    /// Relates a complement class to the class it complements.
    pub const COMPLEMENT_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#complementOf");
    /// The property a restriction is about.
    pub const ON_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    /// Universal restriction filler.
    pub const ALL_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");
    /// Existential restriction filler.
    pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    /// Value restriction filler.
    pub const HAS_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasValue");
    /// Exact cardinality.
    pub const CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#cardinality");
    /// Minimum cardinality.
    pub const MIN_CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#minCardinality");
    /// Maximum cardinality.
    pub const MAX_CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#maxCardinality");
    /// Relates two properties with the same extension.
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentProperty");
    /// Relates two inverse object properties.
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    /// Relates two facts denoting the same thing.
    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
    /// Relates two facts denoting different things.
    pub const DIFFERENT_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#differentFrom");
    /// Links a negative assertion to the asserted property.
    pub const NEGATIVE_PROPERTY_ASSERTION: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://www.w3.org/2002/07/owl#NegativePropertyAssertion",
    );
    /// Subject of a negative property assertion.
    pub const SOURCE_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sourceIndividual");
    /// Property of a negative property assertion.
    pub const ASSERTION_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#assertionProperty");
    /// Fact object of a negative object property assertion.
    pub const TARGET_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#targetIndividual");
    /// Literal object of a negative datatype property assertion.
    pub const TARGET_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#targetValue");
    /// Marks a class or property as deprecated.
    pub const DEPRECATED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#deprecated");
    /// Version information annotation.
    pub const VERSION_INFO: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#versionInfo");
    /// Prior version annotation.
    pub const PRIOR_VERSION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#priorVersion");
    /// Backward compatibility annotation.
    pub const BACKWARD_COMPATIBLE_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#backwardCompatibleWith");
    /// Incompatibility annotation.
    pub const INCOMPATIBLE_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#incompatibleWith");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_listed_terms_are_not_forbidden() {
        assert!(is_reserved_iri(owl::THING.as_str()));
        assert!(!is_forbidden_iri(owl::THING.as_str()));
        assert!(!is_forbidden_iri(rdfs::LITERAL.as_str()));
        assert!(is_forbidden_iri(rdf::BAG.as_str()));
        assert!(!is_forbidden_iri("http://example.org/Bag"));
    }

    #[test]
    fn test_datatypes() {
        assert!(is_datatype_iri(xsd::INTEGER.as_str()));
        assert!(is_datatype_iri(rdf::XML_LITERAL.as_str()));
        assert!(!is_datatype_iri(rdfs::LITERAL.as_str()));
    }
}
