#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

pub mod closure;
mod error;
mod membership;
mod model;
mod reasoner;
mod resource;
mod taxonomy;
mod validator;
pub mod vocab;

pub use error::{ConstructionError, OntologyError, RuleError};
pub use membership::{
    Members, MembershipCache, is_literal_compatible_class, is_literal_compatible_with,
    members_of, members_of_non_literal_compatible,
};
pub use model::{
    Characteristic, Class, ClassKind, ClassModel, DataModel, KnowledgeModel, Partition, Property,
    PropertyKind, PropertyModel, Relation, Restriction, RestrictionKind, base_ontology, expand,
    unexpand,
};
pub use reasoner::{
    BASE_MAX_PRIORITY, BaseRule, Entailment, Reasoner, ReasonerConfig, ReasonerEvidence,
    ReasonerReport, ReasonerRule,
};
pub use resource::{Resource, ResourceId};
pub use taxonomy::{EntryId, InferenceType, Taxonomy, TaxonomyCategory, TaxonomyEntry};
pub use validator::{
    ConsistencyRule, EvidenceCategory, ValidationEvidence, ValidationReport, Validator,
    ValidatorConfig, ValidatorRule,
};
