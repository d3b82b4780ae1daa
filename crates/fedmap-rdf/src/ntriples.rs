//! Line-based N-Triples reader and writer.
//!
//! Repository responses (fixity reports, resource descriptions) arrive as
//! N-Triples. The reader accepts one statement per line, `#` comments and
//! blank lines. IRIs are taken verbatim, so relative IRIs such as
//! `<subject>` are accepted.

use crate::error::{RdfError, RdfResult};
use crate::term::{Term, Triple};

/// Parse an N-Triples document.
pub fn parse(body: &str) -> RdfResult<Vec<Triple>> {
    let mut triples = Vec::new();
    for (idx, raw) in body.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut cursor = Cursor::new(line, idx + 1);
        triples.push(cursor.statement()?);
    }
    Ok(triples)
}

/// Serialize triples, one statement per line.
pub fn serialize(triples: &[Triple]) -> String {
    let mut out = String::new();
    for triple in triples {
        out.push_str(&triple.to_string());
        out.push('\n');
    }
    out
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn new(text: &str, line: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line,
        }
    }

    fn error(&self, reason: impl Into<String>) -> RdfError {
        RdfError::Syntax {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn expect(&mut self, want: char) -> RdfResult<()> {
        match self.bump() {
            Some(ch) if ch == want => Ok(()),
            Some(ch) => Err(self.error(format!("expected {want:?}, found {ch:?}"))),
            None => Err(self.error(format!("expected {want:?}, found end of line"))),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c == ' ' || c == '\t') {
            self.pos += 1;
        }
    }

    fn statement(&mut self) -> RdfResult<Triple> {
        let subject = match self.peek() {
            Some('<') => Term::Iri(self.iri()?),
            Some('_') => self.blank()?,
            _ => return Err(self.error("subject must be an IRI or blank node")),
        };
        self.skip_ws();
        if self.peek() != Some('<') {
            return Err(self.error("predicate must be an IRI"));
        }
        let predicate = self.iri()?;
        self.skip_ws();
        let object = match self.peek() {
            Some('<') => Term::Iri(self.iri()?),
            Some('_') => self.blank()?,
            Some('"') => self.literal()?,
            _ => return Err(self.error("object must be an IRI, blank node or literal")),
        };
        self.skip_ws();
        self.expect('.')?;
        self.skip_ws();
        match self.peek() {
            None | Some('#') => Ok(Triple::new(subject, predicate, object)),
            Some(ch) => Err(self.error(format!("trailing input after '.': {ch:?}"))),
        }
    }

    fn iri(&mut self) -> RdfResult<String> {
        self.expect('<')?;
        let mut iri = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(iri),
                Some('\\') => iri.push(self.unicode_escape()?),
                Some(c) if c.is_whitespace() => {
                    return Err(self.error("whitespace inside IRI"));
                }
                Some(c) => iri.push(c),
                None => return Err(self.error("unterminated IRI")),
            }
        }
    }

    fn blank(&mut self) -> RdfResult<Term> {
        self.expect('_')?;
        self.expect(':')?;
        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '.' && self.chars.get(self.pos + 1).is_none() {
                break;
            }
            label.push(c);
            self.pos += 1;
        }
        if label.is_empty() {
            return Err(self.error("empty blank node label"));
        }
        Ok(Term::Blank(label))
    }

    fn literal(&mut self) -> RdfResult<Term> {
        self.expect('"')?;
        let mut lex = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('t') => lex.push('\t'),
                    Some('b') => lex.push('\u{8}'),
                    Some('n') => lex.push('\n'),
                    Some('r') => lex.push('\r'),
                    Some('f') => lex.push('\u{c}'),
                    Some('"') => lex.push('"'),
                    Some('\'') => lex.push('\''),
                    Some('\\') => lex.push('\\'),
                    Some('u') | Some('U') => {
                        self.pos -= 1;
                        lex.push(self.unicode_escape()?);
                    }
                    Some(c) => return Err(self.error(format!("unknown escape \\{c}"))),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => lex.push(c),
                None => return Err(self.error("unterminated literal")),
            }
        }

        match self.peek() {
            Some('@') => {
                self.pos += 1;
                let mut lang = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        lang.push(c);
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                if lang.is_empty() {
                    return Err(self.error("empty language tag"));
                }
                Ok(Term::Literal {
                    lex,
                    datatype: None,
                    lang: Some(lang),
                })
            }
            Some('^') => {
                self.expect('^')?;
                self.expect('^')?;
                let datatype = self.iri()?;
                Ok(Term::Literal {
                    lex,
                    datatype: Some(datatype),
                    lang: None,
                })
            }
            _ => Ok(Term::literal(lex)),
        }
    }

    /// Decode `uXXXX` / `UXXXXXXXX` following a backslash.
    fn unicode_escape(&mut self) -> RdfResult<char> {
        let width = match self.bump() {
            Some('u') => 4,
            Some('U') => 8,
            _ => return Err(self.error("expected unicode escape")),
        };
        let end = self.pos + width;
        if end > self.chars.len() {
            return Err(self.error("truncated unicode escape"));
        }
        let hex: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid code point {hex}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{premis, xsd};
    use proptest::prelude::*;

    #[test]
    fn parses_typed_literal_with_relative_subject() {
        let body = r#"<subject> <http://www.loc.gov/premis/rdf/v1#hasEventOutcome> "SUCCESS"^^<http://www.w3.org/2001/XMLSchema#string> ."#;
        let triples = parse(body).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, Term::iri("subject"));
        assert_eq!(triples[0].predicate, premis::HAS_EVENT_OUTCOME);
        assert_eq!(triples[0].object, Term::typed("SUCCESS", xsd::STRING));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let body = "# header\n\n<a> <b> <c> . # trailing\n";
        let triples = parse(body).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object, Term::iri("c"));
    }

    #[test]
    fn parses_language_tags_and_blank_nodes() {
        let body = "_:b0 <p> \"bonjour\"@fr .\n<s> <p> _:b1 .";
        let triples = parse(body).unwrap();
        assert_eq!(triples[0].subject, Term::Blank("b0".into()));
        assert_eq!(
            triples[0].object,
            Term::Literal {
                lex: "bonjour".into(),
                datatype: None,
                lang: Some("fr".into())
            }
        );
        assert_eq!(triples[1].object, Term::Blank("b1".into()));
    }

    #[test]
    fn decodes_escapes() {
        let body = r#"<s> <p> "tab\there \"q\" é" ."#;
        let triples = parse(body).unwrap();
        assert_eq!(triples[0].object.lexical(), Some("tab\there \"q\" é"));
    }

    #[test]
    fn missing_dot_is_a_syntax_error() {
        let err = parse("<s> <p> <o>").unwrap_err();
        assert!(matches!(err, RdfError::Syntax { line: 1, .. }));
    }

    #[test]
    fn literal_predicate_is_rejected() {
        assert!(parse("<s> \"p\" <o> .").is_err());
    }

    #[test]
    fn error_reports_line_number() {
        let err = parse("<a> <b> <c> .\n<a> <b> \"open .").unwrap_err();
        assert!(matches!(err, RdfError::Syntax { line: 2, .. }));
    }

    proptest! {
        #[test]
        fn serialized_literals_parse_back(lex in "\\PC*") {
            let triple = Triple::new(Term::iri("s"), "p", Term::literal(lex));
            let text = serialize(std::slice::from_ref(&triple));
            let parsed = parse(&text).unwrap();
            prop_assert_eq!(parsed, vec![triple]);
        }
    }
}
