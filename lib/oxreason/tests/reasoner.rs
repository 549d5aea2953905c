use oxreason::vocab::{owl, rdf, rdfs};
use oxreason::{
    BaseRule, Characteristic, Entailment, InferenceType, KnowledgeModel, Partition, Property,
    Reasoner, ReasonerReport, ReasonerRule, Relation, Resource, Taxonomy,
};

fn ex(name: &str) -> Resource {
    Resource::named(format!("http://example.org/{name}")).unwrap()
}

/// Applies the reasoner until it reports nothing new. Returns the number of passes.
fn converge(reasoner: &Reasoner, model: &mut KnowledgeModel) -> usize {
    for pass in 1..=10 {
        if reasoner.apply(model).is_empty() {
            return pass;
        }
    }
    panic!("the reasoner did not converge")
}

/// Applies a single built-in rule and returns its report.
fn apply_rule(rule: BaseRule, model: &mut KnowledgeModel) -> ReasonerReport {
    let mut report = ReasonerReport::new();
    ReasonerRule::from(rule).apply(model, &mut report);
    report
}

fn assert_entailed(
    taxonomy: &Taxonomy,
    subject: &Resource,
    predicate: &Resource,
    object: &Resource,
) {
    let entry = taxonomy
        .select_by_subject(subject)
        .find(|entry| entry.predicate() == predicate && entry.object() == object)
        .unwrap_or_else(|| panic!("{subject} {predicate} {object} is not entailed"));
    assert_eq!(entry.inference(), InferenceType::Reasoner);
}

#[test]
fn test_equivalent_class_transitivity() {
    let mut model = KnowledgeModel::new();
    model.classes_mut().add_equivalent_class(&ex("A"), &ex("B"));
    model.classes_mut().add_equivalent_class(&ex("B"), &ex("C"));

    let report = apply_rule(BaseRule::EquivalentClassTransitivity, &mut model);
    assert_eq!(report.evidence_count(), 2);
    let equivalent = model.classes().equivalent_class();
    let predicate: Resource = owl::EQUIVALENT_CLASS.into();
    assert_entailed(equivalent, &ex("A"), &predicate, &ex("C"));
    assert_entailed(equivalent, &ex("C"), &predicate, &ex("A"));
    assert_eq!(equivalent.len(), 6);
}

#[test]
fn test_equivalent_property_transitivity() {
    let mut model = KnowledgeModel::new();
    let properties = model.properties_mut();
    for name in ["p", "q", "r"] {
        properties.declare_property(Property::object(ex(name)));
    }
    properties.add_equivalent_property(&ex("p"), &ex("q"));
    properties.add_equivalent_property(&ex("q"), &ex("r"));

    let report = apply_rule(BaseRule::EquivalentPropertyTransitivity, &mut model);
    assert_eq!(report.evidence_count(), 2);
    let equivalent = model.properties().equivalent_property();
    let predicate: Resource = owl::EQUIVALENT_PROPERTY.into();
    assert_entailed(equivalent, &ex("p"), &predicate, &ex("r"));
    assert_entailed(equivalent, &ex("r"), &predicate, &ex("p"));
    assert_eq!(equivalent.len(), 6);
}

#[test]
fn test_sub_property_transitivity_follows_equivalences() {
    let mut model = KnowledgeModel::new();
    let properties = model.properties_mut();
    for name in ["p", "q", "r", "s"] {
        properties.declare_property(Property::object(ex(name)));
    }
    properties.add_sub_property_of(&ex("p"), &ex("q"));
    properties.add_sub_property_of(&ex("q"), &ex("r"));
    properties.add_equivalent_property(&ex("r"), &ex("s"));

    let report = apply_rule(BaseRule::SubPropertyTransitivity, &mut model);
    assert_eq!(report.evidence_count(), 3);
    let sub_property_of = model.properties().sub_property_of();
    let predicate: Resource = rdfs::SUB_PROPERTY_OF.into();
    assert_entailed(sub_property_of, &ex("p"), &predicate, &ex("r"));
    assert_entailed(sub_property_of, &ex("p"), &predicate, &ex("s"));
    assert_entailed(sub_property_of, &ex("q"), &predicate, &ex("s"));
}

#[test]
fn test_different_from_spreads_over_same_facts() {
    let mut model = KnowledgeModel::new();
    model.add_same_as(&ex("a"), &ex("a2"));
    model.add_different_from(&ex("a"), &ex("b"));
    model.add_same_as(&ex("b"), &ex("b2"));

    let report = apply_rule(BaseRule::DifferentFromEntailment, &mut model);
    assert_eq!(report.evidence_count(), 6);
    let different = model.data().different_from();
    let predicate: Resource = owl::DIFFERENT_FROM.into();
    for (left, right) in [("a2", "b"), ("a", "b2"), ("a2", "b2")] {
        assert_entailed(different, &ex(left), &predicate, &ex(right));
        assert_entailed(different, &ex(right), &predicate, &ex(left));
    }
    assert_eq!(report.select_by_relation(Relation::DifferentFrom).count(), 6);
}

#[test]
fn test_symmetric_property_entailment() {
    let mut model = KnowledgeModel::new();
    let knows = ex("knows");
    model.properties_mut().declare_property(
        Property::object(knows.clone()).with_characteristic(Characteristic::Symmetric),
    );
    model.add_assertion(&ex("alice"), &knows, &ex("bob"));

    let report = apply_rule(BaseRule::SymmetricPropertyEntailment, &mut model);
    assert_eq!(report.evidence_count(), 1);
    assert_entailed(model.data().assertions(), &ex("bob"), &knows, &ex("alice"));
    assert!(apply_rule(BaseRule::SymmetricPropertyEntailment, &mut model).is_empty());
    assert_eq!(model.data().assertions().len(), 2);
}

#[test]
fn test_range_entailment_only_types_facts() {
    let mut model = KnowledgeModel::new();
    let (age, has_pet) = (ex("age"), ex("hasPet"));
    let properties = model.properties_mut();
    properties.declare_property(Property::datatype(age.clone()).with_range(ex("Years")));
    properties.declare_property(Property::object(has_pet.clone()).with_range(ex("Pet")));
    model.add_assertion(
        &ex("alice"),
        &age,
        &Resource::plain_literal("30", None).unwrap(),
    );
    model.add_assertion(&ex("alice"), &has_pet, &ex("rex"));

    let report = apply_rule(BaseRule::RangeEntailment, &mut model);
    assert_eq!(report.evidence_count(), 1);
    let class_type = model.data().class_type();
    assert_entailed(class_type, &ex("rex"), &rdf::TYPE.into(), &ex("Pet"));
    assert!(class_type.select_by_object(&ex("Years")).next().is_none());
    assert_eq!(class_type.len(), 1);
}

#[test]
fn test_sub_class_chain_is_closed_by_one_rule() {
    let mut model = KnowledgeModel::new();
    let classes = model.classes_mut();
    classes.add_sub_class_of(&ex("A"), &ex("B"));
    classes.add_sub_class_of(&ex("B"), &ex("C"));
    classes.add_sub_class_of(&ex("C"), &ex("D"));

    let mut report = ReasonerReport::new();
    let rule = ReasonerRule::from(BaseRule::SubClassTransitivity);
    assert_eq!(rule.apply(&mut model, &mut report), 3);
    assert_eq!(model.classes().sub_class_of().len(), 6);
    for (child, parent) in [("A", "C"), ("A", "D"), ("B", "D")] {
        let entry = model
            .classes()
            .sub_class_of()
            .select_by_subject(&ex(child))
            .find(|entry| entry.object() == &ex(parent))
            .unwrap();
        assert_eq!(entry.inference(), InferenceType::Reasoner);
    }
    assert_eq!(report.select_by_rule("SubClassTransitivity").count(), 3);
}

#[test]
fn test_disjointness_is_entailed_in_both_directions() {
    let mut model = KnowledgeModel::new();
    model.classes_mut().add_disjoint_with(&ex("Animal"), &ex("Plant"));
    model.classes_mut().add_sub_class_of(&ex("Dog"), &ex("Animal"));

    let report = Reasoner::new().apply(&mut model);
    let disjoint = model.classes().disjoint_with();
    let predicate: Resource = owl::DISJOINT_WITH.into();
    assert!(disjoint.contains_relation(&ex("Dog"), &predicate, &ex("Plant")));
    assert!(disjoint.contains_relation(&ex("Plant"), &predicate, &ex("Dog")));
    assert_eq!(report.select_by_relation(Relation::DisjointWith).count(), 2);
}

#[test]
fn test_inverse_of_scenario() {
    let mut model = KnowledgeModel::new();
    let (john, mary) = (ex("John"), ex("Mary"));
    let (has_parent, has_child) = (ex("hasParent"), ex("hasChild"));
    let properties = model.properties_mut();
    properties.declare_property(Property::object(has_parent.clone()));
    properties.declare_property(Property::object(has_child.clone()));
    properties.add_inverse_of(&has_parent, &has_child);
    model.add_assertion(&john, &has_parent, &mary);

    let reasoner = Reasoner::new();
    let report = reasoner.apply(&mut model);
    assert_eq!(report.evidence_count(), 1);
    let evidence = report.iter().next().unwrap();
    assert_eq!(evidence.rule(), "InverseOfEntailment");
    assert_eq!(evidence.partition(), Partition::Data);
    let entry = model
        .data()
        .assertions()
        .select_by_predicate(&has_child)
        .next()
        .unwrap();
    assert_eq!((entry.subject(), entry.object()), (&mary, &john));
    assert_eq!(entry.inference(), InferenceType::Reasoner);

    assert!(reasoner.apply(&mut model).is_empty());
}

#[test]
fn test_same_as_chain_scenario() {
    let mut model = KnowledgeModel::new();
    model.add_same_as(&ex("F1"), &ex("F2"));
    model.add_same_as(&ex("F2"), &ex("F3"));
    assert_eq!(model.data().same_as().len(), 4);

    let report = Reasoner::new().apply(&mut model);
    let same_as = model.data().same_as();
    assert_eq!(same_as.len(), 6);
    let predicate: Resource = owl::SAME_AS.into();
    assert!(same_as.contains_relation(&ex("F1"), &predicate, &ex("F3")));
    assert!(same_as.contains_relation(&ex("F3"), &predicate, &ex("F1")));
    assert_eq!(report.select_by_subject(&ex("F1")).count(), 1);
}

#[test]
fn test_class_types_follow_domains_ranges_and_hierarchy() {
    let mut model = KnowledgeModel::new();
    let has_pet = ex("hasPet");
    model.properties_mut().declare_property(
        Property::object(has_pet.clone())
            .with_domain(ex("Owner"))
            .with_range(ex("Pet")),
    );
    model.classes_mut().add_sub_class_of(&ex("Owner"), &ex("Person"));
    model.add_assertion(&ex("alice"), &has_pet, &ex("rex"));

    Reasoner::new().apply(&mut model);
    let class_type = model.data().class_type();
    let predicate: Resource = rdf::TYPE.into();
    assert!(class_type.contains_relation(&ex("alice"), &predicate, &ex("Owner")));
    assert!(class_type.contains_relation(&ex("alice"), &predicate, &ex("Person")));
    assert!(class_type.contains_relation(&ex("rex"), &predicate, &ex("Pet")));
    assert_eq!(class_type.len(), 3);
}

#[test]
fn test_property_chains_converge_quickly() {
    let mut model = KnowledgeModel::new();
    let (ancestor, parent, child) = (ex("ancestor"), ex("parent"), ex("child"));
    let properties = model.properties_mut();
    properties.declare_property(
        Property::object(ancestor.clone()).with_characteristic(Characteristic::Transitive),
    );
    properties.declare_property(Property::object(parent.clone()));
    properties.declare_property(Property::object(child.clone()));
    properties.add_sub_property_of(&parent, &ancestor);
    properties.add_inverse_of(&parent, &child);
    model.add_assertion(&ex("a"), &parent, &ex("b"));
    model.add_assertion(&ex("b"), &parent, &ex("c"));
    model.add_assertion(&ex("c"), &parent, &ex("d"));
    model.add_same_as(&ex("d"), &ex("d2"));

    let passes = converge(&Reasoner::new(), &mut model);
    assert!(passes <= 3, "converged after {passes} passes");
    let predicate = &ancestor;
    let assertions = model.data().assertions();
    assert!(assertions.contains_relation(&ex("a"), predicate, &ex("d")));
    assert!(assertions.contains_relation(&ex("a"), predicate, &ex("d2")));
    assert!(assertions.contains_relation(&ex("d2"), &child, &ex("c")));
}

#[test]
fn test_reasoning_leaves_the_base_ontology_out() {
    let mut model = KnowledgeModel::new();
    model.add_class_type(&ex("a"), &ex("A"));
    model.classes_mut().add_sub_class_of(&ex("A"), &owl::THING.into());

    let report = Reasoner::new().apply(&mut model);
    assert!(report.is_empty());
    assert!(model.classes().is_empty());
    assert!(model.properties().is_empty());
    assert_eq!(model.entry_count(), 2);
    assert!(!model.classes().sub_class_of().contains_relation(
        &owl::NOTHING.into(),
        &rdfs::SUB_CLASS_OF.into(),
        &owl::THING.into()
    ));
}

#[test]
fn test_custom_rules_see_base_entailments() {
    let mut reasoner = Reasoner::new();
    // Every fact typed with a subclass of Agent is typed Active
    reasoner
        .add_rule(ReasonerRule::new(
            "ActiveAgents",
            "((F TYPE Agent)) => (F TYPE Active)",
            1,
            |model: &KnowledgeModel| {
                model
                    .data()
                    .class_type()
                    .select_by_object(&ex("Agent"))
                    .map(|entry| {
                        Entailment::new(
                            Relation::ClassType,
                            entry.subject().clone(),
                            rdf::TYPE.into(),
                            ex("Active"),
                        )
                    })
                    .collect()
            },
        ))
        .unwrap();
    assert_eq!(reasoner.rules().last().unwrap().priority(), 17);

    let mut model = KnowledgeModel::new();
    model.classes_mut().add_sub_class_of(&ex("Person"), &ex("Agent"));
    model.add_class_type(&ex("alice"), &ex("Person"));
    let report = reasoner.apply(&mut model);
    assert_eq!(report.select_by_rule("ClassTypeEntailment").count(), 1);
    assert_eq!(report.select_by_rule("ActiveAgents").count(), 1);
    assert_eq!(report.to_graph().len(), 2);
}
