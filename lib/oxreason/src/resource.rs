//! Identity of every nameable element of a knowledge model.

use crate::error::ConstructionError;
use crate::vocab::xsd;
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Term};
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, GDay, GMonth,
    GMonthDay, GYear, GYearMonth, Integer, Time, YearMonthDuration,
};
use siphasher::sip128::{Hasher128, SipHasher24};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Stable content hash of a resource identifier.
///
/// Two resources with the same identifier string always get the same id,
/// whatever the process or the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u128);

impl ResourceId {
    /// Hashes an identifier string.
    pub fn new(identifier: &str) -> Self {
        let mut hasher = SipHasher24::new();
        hasher.write(identifier.as_bytes());
        Self(hasher.finish128().into())
    }

    /// The big-endian bytes of the hash.
    #[inline]
    pub fn to_be_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A named (IRI), anonymous (blank node) or literal element of a knowledge model.
///
/// Classes, properties, facts and literals are all resources: equality and hashing
/// only look at the [`ResourceId`].
///
/// ```
/// use oxreason::Resource;
///
/// let alice = Resource::named("http://example.org/Alice")?;
/// assert_eq!(alice, Resource::named("http://example.org/Alice")?);
/// assert!(Resource::typed_literal("abc", oxrdf::vocab::xsd::INTEGER).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct Resource {
    id: ResourceId,
    term: Term,
}

impl Resource {
    /// Builds a resource identified by an IRI.
    pub fn named(iri: impl Into<String>) -> Result<Self, ConstructionError> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(ConstructionError::EmptyIdentifier);
        }
        Ok(NamedNode::new(iri)?.into())
    }

    /// Builds an anonymous resource from a blank node id.
    pub fn blank(id: impl Into<String>) -> Result<Self, ConstructionError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConstructionError::EmptyIdentifier);
        }
        Ok(BlankNode::new(id)?.into())
    }

    /// Builds an anonymous resource with a fresh random id.
    pub fn fresh_blank() -> Self {
        BlankNode::default().into()
    }

    /// Builds a plain literal, optionally language tagged.
    pub fn plain_literal(
        value: impl Into<String>,
        language: Option<&str>,
    ) -> Result<Self, ConstructionError> {
        Ok(match language {
            Some(language) => Literal::new_language_tagged_literal(value, language)?,
            None => Literal::new_simple_literal(value),
        }
        .into())
    }

    /// Builds a typed literal, checking the value against the lexical space of known XSD datatypes.
    pub fn typed_literal(
        value: impl Into<String>,
        datatype: impl Into<NamedNode>,
    ) -> Result<Self, ConstructionError> {
        let value = value.into();
        let datatype = datatype.into();
        if !is_valid_lexical_form(&value, datatype.as_ref()) {
            return Err(ConstructionError::invalid_lexical_form(
                value,
                datatype.into_string(),
            ));
        }
        Ok(Literal::new_typed_literal(value, datatype).into())
    }

    /// The identity of the resource.
    ///
    /// Two resources are equal if and only if they have the same id.
    #[inline]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The underlying RDF term.
    #[inline]
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// The IRI of a named resource.
    pub fn iri(&self) -> Option<&str> {
        if let Term::NamedNode(node) = &self.term {
            Some(node.as_str())
        } else {
            None
        }
    }

    /// The IRI node of a named resource.
    pub fn as_named_node(&self) -> Option<&NamedNode> {
        if let Term::NamedNode(node) = &self.term {
            Some(node)
        } else {
            None
        }
    }

    /// The literal of a literal resource.
    pub fn as_literal(&self) -> Option<&Literal> {
        if let Term::Literal(literal) = &self.term {
            Some(literal)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self.term, Term::Literal(_))
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self.term, Term::BlankNode(_))
    }

    /// Returns true if the resource is this IRI.
    pub fn is(&self, iri: NamedNodeRef<'_>) -> bool {
        self.iri() == Some(iri.as_str())
    }

    fn from_term(term: Term, identifier: &str) -> Self {
        Self {
            id: ResourceId::new(identifier),
            term,
        }
    }
}

impl PartialEq for Resource {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.term.fmt(f)
    }
}

impl From<NamedNode> for Resource {
    fn from(node: NamedNode) -> Self {
        let identifier = node.as_str().to_owned();
        Self::from_term(node.into(), &identifier)
    }
}

impl From<NamedNodeRef<'_>> for Resource {
    fn from(node: NamedNodeRef<'_>) -> Self {
        node.into_owned().into()
    }
}

impl From<BlankNode> for Resource {
    fn from(node: BlankNode) -> Self {
        let identifier = node.to_string();
        Self::from_term(node.into(), &identifier)
    }
}

impl From<Literal> for Resource {
    fn from(literal: Literal) -> Self {
        let identifier = literal.to_string();
        Self::from_term(literal.into(), &identifier)
    }
}

impl From<Resource> for Term {
    fn from(resource: Resource) -> Self {
        resource.term
    }
}

fn is_valid_lexical_form(value: &str, datatype: NamedNodeRef<'_>) -> bool {
    match datatype {
        xsd::BOOLEAN => Boolean::from_str(value).is_ok(),
        xsd::DECIMAL => Decimal::from_str(value).is_ok(),
        xsd::INTEGER => Integer::from_str(value).is_ok(),
        xsd::LONG => value.parse::<i64>().is_ok(),
        xsd::INT => value.parse::<i32>().is_ok(),
        xsd::SHORT => value.parse::<i16>().is_ok(),
        xsd::BYTE => value.parse::<i8>().is_ok(),
        xsd::UNSIGNED_LONG => value.parse::<u64>().is_ok(),
        xsd::UNSIGNED_INT => value.parse::<u32>().is_ok(),
        xsd::UNSIGNED_SHORT => value.parse::<u16>().is_ok(),
        xsd::UNSIGNED_BYTE => value.parse::<u8>().is_ok(),
        xsd::NON_NEGATIVE_INTEGER => value.parse::<i128>().is_ok_and(|v| v >= 0),
        xsd::POSITIVE_INTEGER => value.parse::<i128>().is_ok_and(|v| v > 0),
        xsd::NON_POSITIVE_INTEGER => value.parse::<i128>().is_ok_and(|v| v <= 0),
        xsd::NEGATIVE_INTEGER => value.parse::<i128>().is_ok_and(|v| v < 0),
        xsd::FLOAT => Float::from_str(value).is_ok(),
        xsd::DOUBLE => Double::from_str(value).is_ok(),
        xsd::DATE => Date::from_str(value).is_ok(),
        xsd::DATE_TIME => DateTime::from_str(value).is_ok(),
        xsd::TIME => Time::from_str(value).is_ok(),
        xsd::DURATION => Duration::from_str(value).is_ok(),
        xsd::DAY_TIME_DURATION => DayTimeDuration::from_str(value).is_ok(),
        xsd::YEAR_MONTH_DURATION => YearMonthDuration::from_str(value).is_ok(),
        xsd::G_YEAR => GYear::from_str(value).is_ok(),
        xsd::G_YEAR_MONTH => GYearMonth::from_str(value).is_ok(),
        xsd::G_MONTH => GMonth::from_str(value).is_ok(),
        xsd::G_MONTH_DAY => GMonthDay::from_str(value).is_ok(),
        xsd::G_DAY => GDay::from_str(value).is_ok(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_content_based() {
        let a = Resource::named("http://example.org/a").unwrap();
        let b = Resource::named("http://example.org/a").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id(), ResourceId::new("http://example.org/a"));
        assert_ne!(a, Resource::named("http://example.org/b").unwrap());
    }

    #[test]
    fn test_empty_identifiers_are_rejected() {
        assert!(matches!(
            Resource::named(""),
            Err(ConstructionError::EmptyIdentifier)
        ));
        assert!(matches!(
            Resource::blank(""),
            Err(ConstructionError::EmptyIdentifier)
        ));
        assert!(Resource::named("not an iri").is_err());
    }

    #[test]
    fn test_literals() {
        let plain = Resource::plain_literal("hello", Some("en")).unwrap();
        assert!(plain.is_literal());
        assert_ne!(plain, Resource::plain_literal("hello", None).unwrap());
        assert!(Resource::plain_literal("hello", Some("not a tag!")).is_err());

        assert!(Resource::typed_literal("42", xsd::INTEGER).is_ok());
        assert!(Resource::typed_literal("-1", xsd::NON_NEGATIVE_INTEGER).is_err());
        assert!(Resource::typed_literal("yesterday", xsd::DATE).is_err());
        assert!(Resource::typed_literal("anything", xsd::STRING).is_ok());
    }
}
