use std::fmt;

use serde::{Deserialize, Serialize};

use fedmap_types::{IdTranslator, ResourceUri, Scalar};

use crate::error::{RdfError, RdfResult};
use crate::vocab::xsd;

/// An RDF term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    Literal {
        lex: String,
        datatype: Option<String>,
        lang: Option<String>,
    },
    Blank(String),
}

impl Term {
    /// An IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// A plain literal with no datatype or language tag.
    pub fn literal(lex: impl Into<String>) -> Self {
        Self::Literal {
            lex: lex.into(),
            datatype: None,
            lang: None,
        }
    }

    /// A literal with an explicit datatype.
    pub fn typed(lex: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            lex: lex.into(),
            datatype: Some(datatype.into()),
            lang: None,
        }
    }

    /// Lexical form of a literal; `None` for IRIs and blank nodes.
    pub fn lexical(&self) -> Option<&str> {
        match self {
            Self::Literal { lex, .. } => Some(lex),
            _ => None,
        }
    }

    /// IRI text; `None` for literals and blank nodes.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Encode an attribute scalar. References become IRIs under the
    /// translator's base.
    pub fn from_scalar(scalar: &Scalar, ids: &IdTranslator) -> Self {
        match scalar {
            Scalar::Text(s) => Self::literal(s.clone()),
            Scalar::Integer(i) => Self::typed(i.to_string(), xsd::INTEGER),
            Scalar::Boolean(b) => Self::typed(b.to_string(), xsd::BOOLEAN),
            Scalar::Reference(id) => Self::Iri(ids.id_to_uri(id).to_string()),
        }
    }

    /// Decode into an attribute scalar.
    ///
    /// IRIs under the translator's base decode as references; other IRIs
    /// decode as their text. Blank nodes have no scalar form.
    pub fn to_scalar(&self, ids: &IdTranslator) -> RdfResult<Scalar> {
        match self {
            Self::Iri(iri) => {
                let id = ResourceUri::new(iri.clone())
                    .ok()
                    .and_then(|uri| ids.uri_to_id(&uri));
                Ok(id.map_or_else(|| Scalar::Text(iri.clone()), Scalar::Reference))
            }
            Self::Literal { lex, datatype, .. } => match datatype.as_deref() {
                Some(xsd::INTEGER) => lex.parse::<i64>().map(Scalar::Integer).map_err(|e| {
                    RdfError::Conversion {
                        term: self.to_string(),
                        reason: e.to_string(),
                    }
                }),
                Some(xsd::BOOLEAN) => match lex.as_str() {
                    "true" | "1" => Ok(Scalar::Boolean(true)),
                    "false" | "0" => Ok(Scalar::Boolean(false)),
                    _ => Err(RdfError::Conversion {
                        term: self.to_string(),
                        reason: "not a boolean".into(),
                    }),
                },
                _ => Ok(Scalar::Text(lex.clone())),
            },
            Self::Blank(_) => Err(RdfError::Conversion {
                term: self.to_string(),
                reason: "blank nodes have no attribute value".into(),
            }),
        }
    }
}

/// Renders the term in N-Triples syntax.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal {
                lex,
                datatype,
                lang,
            } => {
                f.write_str("\"")?;
                for ch in lex.chars() {
                    match ch {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")?;
                if let Some(lang) = lang {
                    write!(f, "@{lang}")
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A subject–predicate–object statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}
