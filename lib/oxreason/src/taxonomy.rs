//! Indexed, deduplicated sets of `(subject, predicate, object)` relations.

use crate::resource::{Resource, ResourceId};
use oxrdf::{Graph, Term, Triple};
use rustc_hash::FxHashMap;
use siphasher::sip128::{Hasher128, SipHasher24};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Provenance of a taxonomy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InferenceType {
    /// Asserted by the user.
    #[default]
    None,
    /// Derived at insertion time, e.g. the mirror of a symmetric relation.
    Api,
    /// Derived by the reasoner.
    Reasoner,
}

impl fmt::Display for InferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Api => write!(f, "API"),
            Self::Reasoner => write!(f, "Reasoner"),
        }
    }
}

/// Key of a taxonomy entry: a hash of its subject, predicate and object ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u128);

impl EntryId {
    /// Hashes the ids of a relation.
    pub fn new(subject: ResourceId, predicate: ResourceId, object: ResourceId) -> Self {
        let mut hasher = SipHasher24::new();
        hasher.write(&subject.to_be_bytes());
        hasher.write(&predicate.to_be_bytes());
        hasher.write(&object.to_be_bytes());
        Self(hasher.finish128().into())
    }
}

/// A single relation of a [`Taxonomy`].
#[derive(Debug, Clone)]
pub struct TaxonomyEntry {
    id: EntryId,
    subject: Resource,
    predicate: Resource,
    object: Resource,
    inference: InferenceType,
}

impl TaxonomyEntry {
    /// Creates a user-asserted entry.
    pub fn new(subject: Resource, predicate: Resource, object: Resource) -> Self {
        Self {
            id: EntryId::new(subject.id(), predicate.id(), object.id()),
            subject,
            predicate,
            object,
            inference: InferenceType::None,
        }
    }

    /// Sets the provenance of the entry.
    #[must_use]
    pub fn with_inference(mut self, inference: InferenceType) -> Self {
        self.inference = inference;
        self
    }

    /// The same relation with subject and object swapped, tagged [`InferenceType::Api`].
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self::new(
            self.object.clone(),
            self.predicate.clone(),
            self.subject.clone(),
        )
        .with_inference(InferenceType::Api)
    }

    /// The key of the entry, shared by every entry of the same relation.
    #[inline]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[inline]
    pub fn subject(&self) -> &Resource {
        &self.subject
    }

    #[inline]
    pub fn predicate(&self) -> &Resource {
        &self.predicate
    }

    #[inline]
    pub fn object(&self) -> &Resource {
        &self.object
    }

    /// How the entry came to be.
    #[inline]
    pub fn inference(&self) -> InferenceType {
        self.inference
    }

    /// Converts the entry to an RDF triple.
    ///
    /// Returns `None` if the subject is a literal or the predicate is not an IRI.
    pub fn to_triple(&self) -> Option<Triple> {
        let predicate = self.predicate.as_named_node()?.clone();
        let object = Term::from(self.object.clone());
        match self.subject.term() {
            Term::NamedNode(subject) => Some(Triple::new(subject.clone(), predicate, object)),
            Term::BlankNode(subject) => Some(Triple::new(subject.clone(), predicate, object)),
            _ => None,
        }
    }
}

impl PartialEq for TaxonomyEntry {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaxonomyEntry {}

impl Hash for TaxonomyEntry {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TaxonomyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// Whether a taxonomy holds structural, assertional or annotation relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyCategory {
    /// Class and property hierarchies.
    Model,
    /// Relations between facts and literals.
    Data,
    /// Annotations on classes, properties or facts.
    Annotation,
}

/// A deduplicated set of [`TaxonomyEntry`] indexed by subject, predicate and object.
///
/// Entries are keyed by their [`EntryId`]: inserting an entry already present is a no-op.
/// Iteration follows insertion order.
///
/// ```
/// use oxreason::{Resource, Taxonomy, TaxonomyCategory, TaxonomyEntry};
///
/// let mut taxonomy = Taxonomy::new(TaxonomyCategory::Data);
/// let ex = Resource::named("http://example.org/ex")?;
/// let entry = TaxonomyEntry::new(ex.clone(), ex.clone(), ex.clone());
/// assert!(taxonomy.add(entry.clone()));
/// assert!(!taxonomy.add(entry));
/// assert_eq!(taxonomy.select_by_subject(&ex).count(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct Taxonomy {
    category: TaxonomyCategory,
    next_position: u64,
    positions: FxHashMap<EntryId, u64>,
    entries: BTreeMap<u64, TaxonomyEntry>,
    by_subject: FxHashMap<ResourceId, BTreeSet<u64>>,
    by_predicate: FxHashMap<ResourceId, BTreeSet<u64>>,
    by_object: FxHashMap<ResourceId, BTreeSet<u64>>,
}

impl Taxonomy {
    /// Creates an empty taxonomy.
    pub fn new(category: TaxonomyCategory) -> Self {
        Self {
            category,
            next_position: 0,
            positions: FxHashMap::default(),
            entries: BTreeMap::new(),
            by_subject: FxHashMap::default(),
            by_predicate: FxHashMap::default(),
            by_object: FxHashMap::default(),
        }
    }

    /// Whether the taxonomy stores model relations or annotations.
    #[inline]
    pub fn category(&self) -> TaxonomyCategory {
        self.category
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts the entry if no entry with the same key exists.
    ///
    /// Returns `true` if the entry was new.
    pub fn add(&mut self, entry: TaxonomyEntry) -> bool {
        if self.positions.contains_key(&entry.id) {
            return false;
        }
        let position = self.next_position;
        self.next_position += 1;
        self.positions.insert(entry.id, position);
        self.by_subject
            .entry(entry.subject.id())
            .or_default()
            .insert(position);
        self.by_predicate
            .entry(entry.predicate.id())
            .or_default()
            .insert(position);
        self.by_object
            .entry(entry.object.id())
            .or_default()
            .insert(position);
        self.entries.insert(position, entry);
        true
    }

    /// Removes the entry with the given key.
    pub fn remove(&mut self, id: EntryId) -> Option<TaxonomyEntry> {
        let position = self.positions.remove(&id)?;
        let entry = self.entries.remove(&position)?;
        unindex(&mut self.by_subject, entry.subject.id(), position);
        unindex(&mut self.by_predicate, entry.predicate.id(), position);
        unindex(&mut self.by_object, entry.object.id(), position);
        Some(entry)
    }

    /// Checks if an entry with this key is present.
    #[inline]
    pub fn contains(&self, id: EntryId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Checks if the relation `(subject, predicate, object)` is present, whatever its provenance.
    pub fn contains_relation(
        &self,
        subject: &Resource,
        predicate: &Resource,
        object: &Resource,
    ) -> bool {
        self.contains(EntryId::new(subject.id(), predicate.id(), object.id()))
    }

    /// Looks up an entry by key.
    pub fn get(&self, id: EntryId) -> Option<&TaxonomyEntry> {
        self.entries.get(self.positions.get(&id)?)
    }

    /// Returns an iterator over all entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TaxonomyEntry> {
        self.entries.values()
    }

    /// Returns the entries with the given subject, in insertion order.
    ///
    /// ```
    /// use oxreason::{Resource, Taxonomy, TaxonomyCategory, TaxonomyEntry};
    ///
    /// let dog = Resource::named("http://example.org/Dog")?;
    /// let cat = Resource::named("http://example.org/Cat")?;
    /// let animal = Resource::named("http://example.org/Animal")?;
    /// let pet = Resource::named("http://example.org/Pet")?;
    /// let sub_class_of: Resource = oxreason::vocab::rdfs::SUB_CLASS_OF.into();
    /// let mut taxonomy = Taxonomy::new(TaxonomyCategory::Model);
    /// taxonomy.add(TaxonomyEntry::new(dog.clone(), sub_class_of.clone(), animal.clone()));
    /// taxonomy.add(TaxonomyEntry::new(dog.clone(), sub_class_of.clone(), pet));
    /// taxonomy.add(TaxonomyEntry::new(cat, sub_class_of, animal));
    /// assert_eq!(taxonomy.select_by_subject(&dog).count(), 2);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn select_by_subject<'a>(
        &'a self,
        subject: &Resource,
    ) -> impl Iterator<Item = &'a TaxonomyEntry> + use<'a> {
        self.select(&self.by_subject, subject.id())
    }

    /// Returns the entries with the given predicate, in insertion order.
    pub fn select_by_predicate<'a>(
        &'a self,
        predicate: &Resource,
    ) -> impl Iterator<Item = &'a TaxonomyEntry> + use<'a> {
        self.select(&self.by_predicate, predicate.id())
    }

    /// Returns the entries with the given object, in insertion order.
    pub fn select_by_object<'a>(
        &'a self,
        object: &Resource,
    ) -> impl Iterator<Item = &'a TaxonomyEntry> + use<'a> {
        self.select(&self.by_object, object.id())
    }

    fn select<'a>(
        &'a self,
        index: &'a FxHashMap<ResourceId, BTreeSet<u64>>,
        id: ResourceId,
    ) -> impl Iterator<Item = &'a TaxonomyEntry> + use<'a> {
        index
            .get(&id)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .filter_map(|position| self.entries.get(position))
    }

    /// Entries of `self` followed by the entries of `other` missing from `self`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for entry in other {
            result.add(entry.clone());
        }
        result
    }

    /// Entries of `self` also present in `other`, with the provenance stored in `self`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut result = Self::new(self.category);
        for entry in self.iter().filter(|entry| other.contains(entry.id)) {
            result.add(entry.clone());
        }
        result
    }

    /// Entries of `self` not present in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut result = Self::new(self.category);
        for entry in self.iter().filter(|entry| !other.contains(entry.id)) {
            result.add(entry.clone());
        }
        result
    }

    /// Writes the entries into an RDF graph, skipping the ones that are not valid triples.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        self.write_into(&mut graph);
        graph
    }

    pub(crate) fn write_into(&self, graph: &mut Graph) {
        for triple in self.iter().filter_map(TaxonomyEntry::to_triple) {
            graph.insert(&triple);
        }
    }
}

impl<'a> IntoIterator for &'a Taxonomy {
    type Item = &'a TaxonomyEntry;
    type IntoIter = std::collections::btree_map::Values<'a, u64, TaxonomyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

fn unindex(index: &mut FxHashMap<ResourceId, BTreeSet<u64>>, id: ResourceId, position: u64) {
    if let Some(positions) = index.get_mut(&id) {
        positions.remove(&position);
        if positions.is_empty() {
            index.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str) -> Resource {
        Resource::named(format!("http://example.org/{name}")).unwrap()
    }

    fn entry(s: &str, p: &str, o: &str) -> TaxonomyEntry {
        TaxonomyEntry::new(resource(s), resource(p), resource(o))
    }

    #[test]
    fn test_idempotent_insertion() {
        let mut taxonomy = Taxonomy::new(TaxonomyCategory::Model);
        assert!(taxonomy.add(entry("a", "p", "b")));
        assert!(!taxonomy.add(entry("a", "p", "b").with_inference(InferenceType::Reasoner)));
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(
            taxonomy.iter().next().unwrap().inference(),
            InferenceType::None
        );
    }

    #[test]
    fn test_indexes() {
        let mut taxonomy = Taxonomy::new(TaxonomyCategory::Data);
        taxonomy.add(entry("a", "p", "b"));
        taxonomy.add(entry("a", "q", "c"));
        taxonomy.add(entry("d", "p", "b"));
        assert_eq!(taxonomy.select_by_subject(&resource("a")).count(), 2);
        assert_eq!(taxonomy.select_by_predicate(&resource("p")).count(), 2);
        assert_eq!(taxonomy.select_by_object(&resource("b")).count(), 2);
        assert_eq!(taxonomy.select_by_object(&resource("z")).count(), 0);

        let removed = taxonomy.remove(entry("a", "p", "b").id()).unwrap();
        assert_eq!(removed.object(), &resource("b"));
        assert_eq!(taxonomy.select_by_object(&resource("b")).count(), 1);
        assert!(!taxonomy.contains_relation(&resource("a"), &resource("p"), &resource("b")));
    }

    #[test]
    fn test_insertion_order() {
        let mut taxonomy = Taxonomy::new(TaxonomyCategory::Data);
        for name in ["z", "a", "m"] {
            taxonomy.add(entry(name, "p", "o"));
        }
        let subjects: Vec<_> = taxonomy
            .select_by_predicate(&resource("p"))
            .map(|e| e.subject().clone())
            .collect();
        assert_eq!(subjects, [resource("z"), resource("a"), resource("m")]);
    }

    #[test]
    fn test_set_algebra_keeps_provenance() {
        let mut left = Taxonomy::new(TaxonomyCategory::Model);
        left.add(entry("a", "p", "b"));
        left.add(entry("b", "p", "c").with_inference(InferenceType::Reasoner));
        let mut right = Taxonomy::new(TaxonomyCategory::Model);
        right.add(entry("b", "p", "c"));
        right.add(entry("c", "p", "d").with_inference(InferenceType::Api));

        let union = left.union(&right);
        assert_eq!(union.len(), 3);
        assert_eq!(
            union.get(entry("b", "p", "c").id()).unwrap().inference(),
            InferenceType::Reasoner
        );
        assert_eq!(
            union.get(entry("c", "p", "d").id()).unwrap().inference(),
            InferenceType::Api
        );

        let intersection = left.intersect(&right);
        assert_eq!(intersection.len(), 1);
        assert_eq!(
            intersection.iter().next().unwrap().inference(),
            InferenceType::Reasoner
        );

        let difference = left.difference(&right);
        assert_eq!(difference.len(), 1);
        assert!(difference.contains(entry("a", "p", "b").id()));
    }

    #[test]
    fn test_to_graph_skips_literal_subjects() {
        let mut taxonomy = Taxonomy::new(TaxonomyCategory::Data);
        taxonomy.add(entry("a", "p", "b"));
        taxonomy.add(TaxonomyEntry::new(
            Resource::plain_literal("x", None).unwrap(),
            resource("p"),
            resource("b"),
        ));
        assert_eq!(taxonomy.to_graph().len(), 1);
    }
}
