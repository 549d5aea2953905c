//! The BASE ontology: foundational classes and annotation properties used as rule operands.

use super::{Class, ClassModel, DataModel, KnowledgeModel, Property, PropertyModel};
use crate::resource::Resource;
use crate::vocab::{RDF_HTML, RDF_PLAIN_LITERAL, owl, rdf, rdfs, xsd};
use oxrdf::NamedNodeRef;

const DATATYPES: [NamedNodeRef<'static>; 43] = [
    rdf::XML_LITERAL,
    rdf::LANG_STRING,
    RDF_HTML,
    RDF_PLAIN_LITERAL,
    xsd::ANY_URI,
    xsd::BASE_64_BINARY,
    xsd::BOOLEAN,
    xsd::BYTE,
    xsd::DATE,
    xsd::DATE_TIME,
    xsd::DATE_TIME_STAMP,
    xsd::DAY_TIME_DURATION,
    xsd::DECIMAL,
    xsd::DOUBLE,
    xsd::DURATION,
    xsd::FLOAT,
    xsd::G_DAY,
    xsd::G_MONTH,
    xsd::G_MONTH_DAY,
    xsd::G_YEAR,
    xsd::G_YEAR_MONTH,
    xsd::HEX_BINARY,
    xsd::INT,
    xsd::INTEGER,
    xsd::LANGUAGE,
    xsd::LONG,
    xsd::NAME,
    xsd::NC_NAME,
    xsd::NEGATIVE_INTEGER,
    xsd::NMTOKEN,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::NORMALIZED_STRING,
    xsd::POSITIVE_INTEGER,
    xsd::SHORT,
    xsd::STRING,
    xsd::TIME,
    xsd::TOKEN,
    xsd::UNSIGNED_BYTE,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_SHORT,
    xsd::YEAR_MONTH_DURATION,
];

pub(crate) const ANNOTATION_PROPERTIES: [NamedNodeRef<'static>; 9] = [
    rdfs::LABEL,
    rdfs::COMMENT,
    rdfs::SEE_ALSO,
    rdfs::IS_DEFINED_BY,
    owl::VERSION_INFO,
    owl::DEPRECATED,
    owl::PRIOR_VERSION,
    owl::BACKWARD_COMPATIBLE_WITH,
    owl::INCOMPATIBLE_WITH,
];

/// Builds the BASE ontology.
///
/// It declares `owl:Thing`, `owl:Nothing` (a subclass of `owl:Thing`), `rdfs:Literal` with
/// every known datatype as a subclass, and the RDFS/OWL annotation properties.
/// The reasoner holds it behind an `Arc` and unions it into the model for the time of a pass.
pub fn base_ontology() -> KnowledgeModel {
    let thing = Resource::from(owl::THING);
    let nothing = Resource::from(owl::NOTHING);
    let literal = Resource::from(rdfs::LITERAL);

    let mut classes = ClassModel::new();
    for class in [&thing, &nothing, &literal] {
        classes.declare_class(Class::new(class.clone()));
    }
    classes.add_sub_class_of(&nothing, &thing);
    for datatype in DATATYPES {
        let datatype = Resource::from(datatype);
        classes.declare_class(Class::new(datatype.clone()));
        classes.add_sub_class_of(&datatype, &literal);
    }

    let mut properties = PropertyModel::new();
    for property in ANNOTATION_PROPERTIES {
        properties.declare_property(Property::annotation(property.into()));
    }

    KnowledgeModel::from_parts(classes, properties, DataModel::new())
}
