//! Cycle-safe transitive closures over the relations of a knowledge model.
//!
//! Every function walks its relation breadth first with a visited set local to the call,
//! so it terminates on cyclic inputs and returns the full closure at once.
//! The starting resource is never part of the result.

use crate::model::{ClassModel, DataModel, PropertyModel};
use crate::resource::{Resource, ResourceId};
use crate::taxonomy::{Taxonomy, TaxonomyEntry};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Walks from `seeds`, collecting every resource returned by `next` that was not seen before.
///
/// Seeds are marked visited but are not part of the result.
fn breadth_first(
    seeds: Vec<Resource>,
    mut next: impl FnMut(&Resource) -> Vec<Resource>,
) -> Vec<Resource> {
    let mut visited = FxHashSet::<ResourceId>::default();
    let mut queue = VecDeque::new();
    for seed in seeds {
        if visited.insert(seed.id()) {
            queue.push_back(seed);
        }
    }
    let mut result = Vec::new();
    while let Some(current) = queue.pop_front() {
        for found in next(&current) {
            if visited.insert(found.id()) {
                result.push(found.clone());
                queue.push_back(found);
            }
        }
    }
    result
}

/// Resources related to `resource` in either direction.
fn neighbors<'a>(
    taxonomy: &'a Taxonomy,
    resource: &Resource,
) -> impl Iterator<Item = &'a Resource> + use<'a> {
    taxonomy
        .select_by_subject(resource)
        .map(TaxonomyEntry::object)
        .chain(
            taxonomy
                .select_by_object(resource)
                .map(TaxonomyEntry::subject),
        )
}

fn objects_of(taxonomy: &Taxonomy, subject: &Resource) -> Vec<Resource> {
    taxonomy
        .select_by_subject(subject)
        .map(|entry| entry.object().clone())
        .collect()
}

fn subjects_of(taxonomy: &Taxonomy, object: &Resource) -> Vec<Resource> {
    taxonomy
        .select_by_object(object)
        .map(|entry| entry.subject().clone())
        .collect()
}

/// Follows `step` and adds the equivalents of every resource reached.
fn hierarchy_closure(
    start: &Resource,
    step: impl Fn(&Resource) -> Vec<Resource>,
    equivalents: impl Fn(&Resource) -> Vec<Resource>,
) -> Vec<Resource> {
    let mut seeds = vec![start.clone()];
    seeds.extend(equivalents(start));
    breadth_first(seeds, |current| {
        let mut found = Vec::new();
        for next in step(current) {
            let next_equivalents = equivalents(&next);
            found.push(next);
            found.extend(next_equivalents);
        }
        found
    })
}

/// Classes equivalent to `class`, directly or through other equivalences.
pub fn equivalent_classes_of(classes: &ClassModel, class: &Resource) -> Vec<Resource> {
    breadth_first(vec![class.clone()], |current| {
        neighbors(&classes.equivalent_class, current)
            .cloned()
            .collect()
    })
}

/// Classes `class` is a subclass of, with their equivalents.
pub fn super_classes_of(classes: &ClassModel, class: &Resource) -> Vec<Resource> {
    hierarchy_closure(
        class,
        |current| objects_of(&classes.sub_class_of, current),
        |current| equivalent_classes_of(classes, current),
    )
}

/// Classes that are subclasses of `class`, with their equivalents.
pub fn sub_classes_of(classes: &ClassModel, class: &Resource) -> Vec<Resource> {
    hierarchy_closure(
        class,
        |current| subjects_of(&classes.sub_class_of, current),
        |current| equivalent_classes_of(classes, current),
    )
}

/// Classes that cannot share members with `class`.
///
/// A class declared disjoint with `class`, one of its equivalents or one of its superclasses
/// is disjoint with it, and so are the equivalents and subclasses of such a class.
pub fn disjoint_classes_with(classes: &ClassModel, class: &Resource) -> Vec<Resource> {
    let mut sources = vec![class.clone()];
    sources.extend(equivalent_classes_of(classes, class));
    sources.extend(super_classes_of(classes, class));

    let mut visited = FxHashSet::<ResourceId>::default();
    visited.insert(class.id());
    let mut result = Vec::new();
    for source in &sources {
        for disjoint in neighbors(&classes.disjoint_with, source) {
            let mut found = vec![disjoint.clone()];
            found.extend(equivalent_classes_of(classes, disjoint));
            found.extend(sub_classes_of(classes, disjoint));
            for candidate in found {
                if visited.insert(candidate.id()) {
                    result.push(candidate);
                }
            }
        }
    }
    result
}

/// Returns true if `child` is a subclass of `parent`, directly or not.
pub fn is_sub_class_of(classes: &ClassModel, child: &Resource, parent: &Resource) -> bool {
    super_classes_of(classes, child).contains(parent)
}

/// Returns true if the two classes cannot share members.
pub fn is_disjoint_class(classes: &ClassModel, left: &Resource, right: &Resource) -> bool {
    disjoint_classes_with(classes, left).contains(right)
}

/// Properties equivalent to `property`, directly or through other equivalences.
pub fn equivalent_properties_of(properties: &PropertyModel, property: &Resource) -> Vec<Resource> {
    breadth_first(vec![property.clone()], |current| {
        neighbors(&properties.equivalent_property, current)
            .cloned()
            .collect()
    })
}

/// Properties `property` is a subproperty of, with their equivalents.
pub fn super_properties_of(properties: &PropertyModel, property: &Resource) -> Vec<Resource> {
    hierarchy_closure(
        property,
        |current| objects_of(&properties.sub_property_of, current),
        |current| equivalent_properties_of(properties, current),
    )
}

/// Properties that are subproperties of `property`, with their equivalents.
pub fn sub_properties_of(properties: &PropertyModel, property: &Resource) -> Vec<Resource> {
    hierarchy_closure(
        property,
        |current| subjects_of(&properties.sub_property_of, current),
        |current| equivalent_properties_of(properties, current),
    )
}

/// Checks if `parent` is a direct or inherited superproperty of `child`.
pub fn is_sub_property_of(properties: &PropertyModel, child: &Resource, parent: &Resource) -> bool {
    super_properties_of(properties, child).contains(parent)
}

/// Inverses of `property` or of its equivalents, with their equivalents.
pub fn inverse_properties_of(properties: &PropertyModel, property: &Resource) -> Vec<Resource> {
    let mut sources = vec![property.clone()];
    sources.extend(equivalent_properties_of(properties, property));

    let mut visited = FxHashSet::<ResourceId>::default();
    let mut result = Vec::new();
    for source in &sources {
        for inverse in neighbors(&properties.inverse_of, source) {
            let mut found = vec![inverse.clone()];
            found.extend(equivalent_properties_of(properties, inverse));
            for candidate in found {
                if visited.insert(candidate.id()) {
                    result.push(candidate);
                }
            }
        }
    }
    result
}

/// Facts `owl:sameAs` `fact`, directly or not.
pub fn same_facts_as(data: &DataModel, fact: &Resource) -> Vec<Resource> {
    breadth_first(vec![fact.clone()], |current| {
        neighbors(&data.same_as, current).cloned().collect()
    })
}

/// Facts known to be different from `fact` or from one of its same facts,
/// with the facts that are the same as them.
pub fn different_facts_from(data: &DataModel, fact: &Resource) -> Vec<Resource> {
    let mut sources = vec![fact.clone()];
    sources.extend(same_facts_as(data, fact));

    let mut visited = FxHashSet::<ResourceId>::default();
    visited.insert(fact.id());
    let mut result = Vec::new();
    for source in &sources {
        for different in neighbors(&data.different_from, source) {
            let mut found = vec![different.clone()];
            found.extend(same_facts_as(data, different));
            for candidate in found {
                if visited.insert(candidate.id()) {
                    result.push(candidate);
                }
            }
        }
    }
    result
}

/// Facts reachable from `fact` by following assertions of `property`.
///
/// Empty unless `property` is declared transitive.
pub fn transitive_assertions_of(
    properties: &PropertyModel,
    data: &DataModel,
    fact: &Resource,
    property: &Resource,
) -> Vec<Resource> {
    if !properties
        .property(property)
        .is_some_and(|declared| declared.is_transitive())
    {
        return Vec::new();
    }
    breadth_first(vec![fact.clone()], |current| {
        data.assertions
            .select_by_subject(current)
            .filter(|entry| entry.predicate() == property && !entry.object().is_literal())
            .map(|entry| entry.object().clone())
            .collect()
    })
}
