//! Minimal OBO flat-file reader.
//!
//! Extracts `[Term]` stanzas into [`TermRecord`]s. Only the tags the graph
//! uses are read: `id`, `name`, `namespace`, `def`, `alt_id`, `is_a`,
//! `relationship`, and `is_obsolete`. Other stanza types and header tags are
//! skipped, except `default-namespace` when it names one of the three
//! namespaces.
//!
//! ```text
//! [Term]
//! id: GO:0008150
//! name: biological_process
//! namespace: biological_process
//!
//! [Term]
//! id: GO:0009987
//! name: cellular process
//! namespace: biological_process
//! is_a: GO:0008150 ! biological_process
//! relationship: part_of GO:0008150
//! ```

use tracing::{debug, instrument};

use crate::error::OntologyError;
use crate::term::{Namespace, Relation, RelationshipKind, TermRecord};

/// Errors from [`parse_obo`]. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OboError {
    #[error("line {line}: term stanza has no id")]
    MissingId { line: usize },

    #[error("line {line}: term {id} has no namespace")]
    MissingNamespace { line: usize, id: String },

    #[error("line {line}: {source}")]
    InvalidNamespace { line: usize, source: OntologyError },

    #[error("line {line}: malformed relationship `{value}`")]
    MalformedRelationship { line: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StanzaKind {
    Header,
    Term,
    Other,
}

#[derive(Debug)]
struct Stanza {
    kind: StanzaKind,
    line: usize,
    id: Option<String>,
    namespace: Option<(usize, String)>,
    name: Option<String>,
    definition: Option<String>,
    alt_ids: Vec<String>,
    obsolete: bool,
    relations: Vec<Relation>,
}

impl Stanza {
    const fn new(kind: StanzaKind, line: usize) -> Self {
        Self {
            kind,
            line,
            id: None,
            namespace: None,
            name: None,
            definition: None,
            alt_ids: Vec::new(),
            obsolete: false,
            relations: Vec::new(),
        }
    }

    fn into_record(self, default: Option<Namespace>) -> Result<TermRecord, OboError> {
        let id = self.id.ok_or(OboError::MissingId { line: self.line })?;
        let namespace = match self.namespace {
            Some((line, raw)) => raw
                .parse::<Namespace>()
                .map_err(|source| OboError::InvalidNamespace { line, source })?,
            None => default.ok_or_else(|| OboError::MissingNamespace {
                line: self.line,
                id: id.clone(),
            })?,
        };
        Ok(TermRecord {
            id,
            namespace,
            name: self.name,
            definition: self.definition,
            alt_ids: self.alt_ids,
            obsolete: self.obsolete,
            relations: self.relations,
        })
    }
}

/// Parse OBO text into term records, in file order.
///
/// # Errors
///
/// Returns an [`OboError`] for a term stanza without an id, without a usable
/// namespace, or with a `relationship` tag missing its target.
#[instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_obo(input: &str) -> Result<Vec<TermRecord>, OboError> {
    let mut records = Vec::new();
    let mut default_namespace = None;
    let mut stanza = Stanza::new(StanzaKind::Header, 1);

    for (offset, raw) in input.lines().enumerate() {
        let line = offset + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('!') {
            continue;
        }

        if text.starts_with('[') && text.ends_with(']') {
            let kind = if text == "[Term]" {
                StanzaKind::Term
            } else {
                StanzaKind::Other
            };
            let finished = std::mem::replace(&mut stanza, Stanza::new(kind, line));
            if finished.kind == StanzaKind::Term {
                records.push(finished.into_record(default_namespace)?);
            }
            continue;
        }

        let Some((tag, value)) = text.split_once(':') else {
            continue;
        };
        let tag = tag.trim();
        let value = value.trim();

        match stanza.kind {
            StanzaKind::Header => {
                if tag == "default-namespace" {
                    default_namespace = strip_trailing(value).parse().ok();
                }
            }
            StanzaKind::Term => apply_term_tag(&mut stanza, tag, value, line)?,
            StanzaKind::Other => {}
        }
    }

    if stanza.kind == StanzaKind::Term {
        records.push(stanza.into_record(default_namespace)?);
    }

    debug!(terms = records.len(), "parsed OBO terms");
    Ok(records)
}

fn apply_term_tag(
    stanza: &mut Stanza,
    tag: &str,
    value: &str,
    line: usize,
) -> Result<(), OboError> {
    match tag {
        "id" => stanza.id = Some(strip_trailing(value).to_string()),
        "name" => stanza.name = Some(strip_trailing(value).to_string()),
        "namespace" => stanza.namespace = Some((line, strip_trailing(value).to_string())),
        "def" => stanza.definition = Some(quoted_text(value)),
        "alt_id" => stanza.alt_ids.push(strip_trailing(value).to_string()),
        "is_obsolete" => stanza.obsolete = strip_trailing(value) == "true",
        "is_a" => {
            if let Some(target) = strip_trailing(value).split_whitespace().next() {
                stanza.relations.push(Relation::is_a(target));
            }
        }
        "relationship" => {
            let body = strip_trailing(value);
            let mut parts = body.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(kind), Some(target)) => stanza
                    .relations
                    .push(Relation::new(target, RelationshipKind::from(kind))),
                _ => {
                    return Err(OboError::MalformedRelationship {
                        line,
                        value: body.to_string(),
                    });
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Drop a trailing `! comment` and `{qualifier}` block from a tag value.
fn strip_trailing(value: &str) -> &str {
    let mut value = value;
    if let Some(pos) = value.find(" !") {
        value = &value[..pos];
    }
    let trimmed = value.trim_end();
    if trimmed.ends_with('}') {
        if let Some(pos) = trimmed.rfind(" {") {
            return trimmed[..pos].trim_end();
        }
    }
    trimmed
}

/// Text of the first double-quoted string in `value`, with `\"` unescaped.
/// Falls back to the whole value when it is not quoted.
fn quoted_text(value: &str) -> String {
    let Some(body) = value.strip_prefix('"') else {
        return strip_trailing(value).to_string();
    };
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' => break,
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"format-version: 1.2
default-namespace: gene_ontology
! a comment line

[Term]
id: GO:0008150
name: biological_process
namespace: biological_process
alt_id: GO:0000004
def: "A biological process is the \"execution\" of a program." [GOC:pdt]

[Term]
id: GO:0009987
name: cellular process
namespace: biological_process
is_a: GO:0008150 ! biological_process
relationship: part_of GO:0008150 {source="x"} ! biological_process

[Term]
id: GO:0000005
name: obsolete thing
namespace: molecular_function
is_obsolete: true

[Typedef]
id: part_of
name: part of
"#;

    #[test]
    fn parses_term_stanzas() {
        let records = parse_obo(SAMPLE).expect("valid obo");
        assert_eq!(records.len(), 3);

        let root = &records[0];
        assert_eq!(root.id, "GO:0008150");
        assert_eq!(root.namespace, Namespace::BiologicalProcess);
        assert_eq!(root.alt_ids, vec!["GO:0000004".to_string()]);
        assert_eq!(
            root.definition.as_deref(),
            Some("A biological process is the \"execution\" of a program.")
        );

        let child = &records[1];
        assert_eq!(
            child.relations,
            vec![
                Relation::is_a("GO:0008150"),
                Relation::new("GO:0008150", RelationshipKind::PartOf),
            ]
        );

        assert!(records[2].obsolete);
    }

    #[test]
    fn typedef_stanzas_are_ignored() {
        let records = parse_obo(SAMPLE).expect("valid obo");
        assert!(records.iter().all(|r| r.id != "part_of"));
    }

    #[test]
    fn missing_namespace_without_default_is_an_error() {
        let err = parse_obo("[Term]\nid: X:1\nname: x\n").unwrap_err();
        assert_eq!(
            err,
            OboError::MissingNamespace {
                line: 1,
                id: "X:1".into()
            }
        );
    }

    #[test]
    fn default_namespace_applies_when_valid() {
        let records =
            parse_obo("default-namespace: cellular_component\n\n[Term]\nid: X:1\n").expect("valid");
        assert_eq!(records[0].namespace, Namespace::CellularComponent);
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = parse_obo("[Term]\nname: nameless\nnamespace: BP\n").unwrap_err();
        assert_eq!(err, OboError::MissingId { line: 1 });
    }

    #[test]
    fn unknown_namespace_reports_its_line() {
        let err = parse_obo("[Term]\nid: X:1\nnamespace: external\n").unwrap_err();
        assert!(matches!(err, OboError::InvalidNamespace { line: 3, .. }));
    }

    #[test]
    fn malformed_relationship_is_an_error() {
        let err = parse_obo("[Term]\nid: X:1\nnamespace: BP\nrelationship: part_of\n").unwrap_err();
        assert_eq!(
            err,
            OboError::MalformedRelationship {
                line: 4,
                value: "part_of".into()
            }
        );
    }
}
