use oxreason::vocab::{owl, rdf, rdfs, xsd};
use oxreason::{
    Characteristic, Class, ClassKind, ConstructionError, InferenceType, KnowledgeModel, Property,
    Relation, Resource, Restriction, Taxonomy, TaxonomyCategory, TaxonomyEntry, base_ontology,
    expand, members_of, unexpand,
};

fn ex(name: &str) -> Resource {
    Resource::named(format!("http://example.org/{name}")).unwrap()
}

#[test]
fn test_taxonomy_insertion_is_idempotent() {
    let mut taxonomy = Taxonomy::new(TaxonomyCategory::Model);
    let entry = TaxonomyEntry::new(ex("A"), rdfs::SUB_CLASS_OF.into(), ex("B"));
    assert!(taxonomy.add(entry.clone()));
    assert!(!taxonomy.add(entry.clone()));
    assert!(!taxonomy.add(entry.with_inference(InferenceType::Reasoner)));
    assert_eq!(taxonomy.len(), 1);
    assert_eq!(
        taxonomy.iter().next().unwrap().inference(),
        InferenceType::None
    );
}

#[test]
fn test_resource_identity_is_the_identifier() {
    assert_eq!(ex("A"), Resource::named("http://example.org/A").unwrap());
    assert_eq!(ex("A").id(), ex("A").id());
    assert_ne!(ex("A").id(), ex("B").id());
    assert_ne!(
        Resource::blank("b1").unwrap().id(),
        Resource::blank("b2").unwrap().id()
    );
}

#[test]
fn test_constructors_reject_invalid_input() {
    assert!(matches!(
        Resource::named(""),
        Err(ConstructionError::EmptyIdentifier)
    ));
    assert!(matches!(
        Resource::named("not an iri"),
        Err(ConstructionError::InvalidIri(_))
    ));
    assert!(matches!(
        Resource::typed_literal("forty", xsd::INTEGER),
        Err(ConstructionError::InvalidLexicalForm { .. })
    ));
    assert!(Resource::typed_literal("40", xsd::INTEGER).is_ok());
}

#[test]
fn test_symmetric_relations_are_mirrored() {
    let mut model = KnowledgeModel::new();
    assert!(model.classes_mut().add_disjoint_with(&ex("Cat"), &ex("Dog")));
    let disjoint = model.classes().disjoint_with();
    assert_eq!(disjoint.len(), 2);
    let mirror = disjoint.select_by_subject(&ex("Dog")).next().unwrap();
    assert_eq!(mirror.object(), &ex("Cat"));
    assert_eq!(mirror.inference(), InferenceType::Api);
}

#[test]
fn test_reserved_terms_are_not_typed() {
    let mut model = KnowledgeModel::new();
    assert!(!model.add_class_type(&rdf::TYPE.into(), &ex("Person")));
    assert!(!model.add_class_type(&ex("alice"), &xsd::INTEGER.into()));
    assert!(model.add_class_type(&ex("alice"), &ex("Person")));
    assert_eq!(model.data().class_type().len(), 1);
}

#[test]
fn test_assertions_must_fit_the_property() {
    let mut model = KnowledgeModel::new();
    let name = ex("name");
    let knows = ex("knows");
    let label: Resource = rdfs::LABEL.into();
    let properties = model.properties_mut();
    properties.declare_property(Property::datatype(name.clone()));
    properties.declare_property(Property::object(knows.clone()));
    properties.declare_property(Property::annotation(label.clone()));

    let alice_name = Resource::plain_literal("Alice", Some("en")).unwrap();
    assert!(model.add_assertion(&ex("alice"), &name, &alice_name));
    assert!(!model.add_assertion(&ex("alice"), &name, &ex("bob")));
    assert!(model.add_assertion(&ex("alice"), &knows, &ex("bob")));
    assert!(!model.add_assertion(&alice_name, &knows, &ex("bob")));
    assert!(!model.add_assertion(&ex("alice"), &label, &alice_name));
    assert!(!model.add_assertion(&ex("alice"), &ex("undeclared"), &ex("bob")));
    assert_eq!(model.data().assertions().len(), 2);
}

#[test]
fn test_class_hierarchy_guards() {
    let mut model = KnowledgeModel::new();
    let classes = model.classes_mut();
    assert!(classes.add_sub_class_of(&ex("A"), &ex("B")));
    assert!(classes.add_sub_class_of(&ex("B"), &ex("C")));
    assert!(!classes.add_sub_class_of(&ex("C"), &ex("A")));
    assert!(!classes.add_disjoint_with(&ex("A"), &ex("C")));
    assert!(!classes.add_sub_class_of(&ex("A"), &ex("A")));
}

#[test]
fn test_property_hierarchy_guards() {
    let mut model = KnowledgeModel::new();
    let properties = model.properties_mut();
    properties.declare_property(Property::object(ex("hasMother")));
    properties.declare_property(Property::object(ex("hasParent")));
    properties.declare_property(Property::datatype(ex("age")));
    assert!(properties.add_sub_property_of(&ex("hasMother"), &ex("hasParent")));
    assert!(!properties.add_sub_property_of(&ex("hasParent"), &ex("hasMother")));
    assert!(!properties.add_sub_property_of(&ex("age"), &ex("hasParent")));
    assert!(!properties.add_inverse_of(&ex("age"), &ex("hasParent")));
}

#[test]
fn test_characteristics_depend_on_the_kind() {
    let age = Property::datatype(ex("age"))
        .with_characteristic(Characteristic::Functional)
        .with_characteristic(Characteristic::Transitive);
    assert!(age.is_functional());
    assert!(!age.is_transitive());
    let label = Property::annotation(rdfs::LABEL.into()).with_domain(ex("Person"));
    assert!(label.domain().is_none());
}

#[test]
fn test_restriction_membership() {
    let mut model = KnowledgeModel::new();
    let owns = ex("owns");
    model
        .properties_mut()
        .declare_property(Property::object(owns.clone()));
    model.classes_mut().declare_class(Class::restriction(
        ex("DogOwner"),
        Restriction::some_values_from(owns.clone(), ex("Dog")),
    ));
    model
        .classes_mut()
        .declare_class(Class::with_kind(ex("Pets"), ClassKind::Enumerate));
    model.classes_mut().add_one_of(&ex("Pets"), &ex("rex"));
    model.add_class_type(&ex("rex"), &ex("Dog"));
    model.add_assertion(&ex("alice"), &owns, &ex("rex"));
    model.add_assertion(&ex("bob"), &owns, &ex("car"));

    let owners = members_of(&model, &ex("DogOwner"));
    assert_eq!(owners.len(), 1);
    assert!(owners.contains(&ex("alice")));
    assert!(members_of(&model, &ex("Pets")).contains(&ex("rex")));
    assert!(members_of(&model, &owl::THING.into()).contains(&ex("car")));
}

#[test]
fn test_set_algebra() {
    let mut left = KnowledgeModel::new();
    left.add_class_type(&ex("a"), &ex("A"));
    left.add_class_type(&ex("b"), &ex("B"));
    let mut right = KnowledgeModel::new();
    right.add_class_type(&ex("b"), &ex("B"));
    right.add_class_type(&ex("c"), &ex("C"));

    assert_eq!(left.union(&right).entry_count(), 3);
    assert_eq!(left.intersect(&right).entry_count(), 1);
    let difference = left.difference(&right);
    assert_eq!(difference.entry_count(), 1);
    assert!(
        difference
            .taxonomy(Relation::ClassType)
            .contains_relation(&ex("a"), &rdf::TYPE.into(), &ex("A"))
    );
}

#[test]
fn test_expansion_keeps_user_entries_equal_to_base_entries() {
    let base = base_ontology();
    let mut model = KnowledgeModel::new();
    model
        .classes_mut()
        .add_sub_class_of(&xsd::STRING.into(), &rdfs::LITERAL.into());
    model.add_class_type(&ex("a"), &ex("A"));

    let expanded = expand(&model, &base);
    assert!(expanded.entry_count() > model.entry_count());
    let restored = unexpand(&expanded, &base.difference(&model));
    assert_eq!(restored.entry_count(), 2);
    assert!(restored.classes().sub_class_of().contains_relation(
        &xsd::STRING.into(),
        &rdfs::SUB_CLASS_OF.into(),
        &rdfs::LITERAL.into()
    ));
}

#[test]
fn test_graph_export() {
    let mut model = KnowledgeModel::new();
    model.classes_mut().declare_class(Class::new(ex("Person")));
    model.add_class_type(&ex("alice"), &ex("Person"));
    model.add_same_as(&ex("alice"), &ex("alicia"));
    // Class declaration, classType and both sameAs entries
    assert_eq!(model.to_graph().len(), 4);
    assert_eq!(model.data().same_as().to_graph().len(), 2);
}
