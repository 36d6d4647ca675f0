use crate::text::{PhraseClass, PhraseText};
use roxmltree::{Document, Node, ParsingOptions};
use std::ops::Range;
use thiserror::Error;

pub const PHRASE_CLASS: &str = "phrase";
pub const TAG_PREFIX: &str = "phrase-";
pub const TEXT_ATTRIBUTE: &str = "data-text";

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Malformed document: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// A phrase element found in the source document, detached from the parsed tree so
/// it can outlive the borrow of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseElement {
    pub class: Option<PhraseClass>,
    pub text: PhraseText,
    range: Range<usize>,
    /// Bytes replaced on splice: the children, or the `/>` of an empty-element tag.
    content: Range<usize>,
    /// Qualified name to close with when the element was self-closing.
    close: Option<String>,
}

impl PhraseElement {
    fn from_node(source: &str, node: Node) -> Self {
        let class = node
            .attribute("class")
            .and_then(|c| c.split_whitespace().find(|t| t.starts_with(TAG_PREFIX)))
            .map(PhraseClass::new);

        let text = match node.attribute(TEXT_ATTRIBUTE) {
            Some(t) => PhraseText::new(t),
            None => {
                let content: String = node
                    .descendants()
                    .filter(|n| n.is_text())
                    .filter_map(|n| n.text())
                    .collect();
                log::warn!(
                    "Phrase element <{}> has no {} attribute, using its text content",
                    node.tag_name().name(),
                    TEXT_ATTRIBUTE
                );
                PhraseText::new(content.trim())
            }
        };

        let range = node.range();
        let element = &source[range.clone()];
        let tag_end = range.start + start_tag_len(element);

        let (content, close) = if element[..tag_end - range.start].ends_with("/>") {
            let qname = element[1..]
                .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
                .next()
                .unwrap_or_default();
            (tag_end - 2..tag_end, Some(qname.to_string()))
        } else {
            let end_tag = element
                .rfind("</")
                .map_or(range.end, |i| range.start + i);
            (tag_end..end_tag, None)
        };

        Self {
            class,
            text,
            range,
            content,
            close,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// Byte length of the start tag at the head of `element`, up to and including its `>`.
fn start_tag_len(element: &str) -> usize {
    let mut quote = None;
    for (i, c) in element.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    element.len()
}

fn is_phrase(node: &Node) -> bool {
    node.is_element()
        && node
            .attribute("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == PHRASE_CLASS))
}

/// Collects the outermost phrase elements of `source` in document order.
pub fn read_phrases(source: &str) -> Result<Vec<PhraseElement>, MarkupError> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(source, opts)?;

    let phrases: Vec<PhraseElement> = doc
        .descendants()
        .filter(is_phrase)
        .filter(|n| !n.ancestors().skip(1).any(|a| is_phrase(&a)))
        .map(|n| PhraseElement::from_node(source, n))
        .collect();

    log::debug!("Found {} phrase elements", phrases.len());
    Ok(phrases)
}

/// Returns `source` with the children of each given element replaced by its
/// fragment. Start tags are kept byte for byte; elements that are not listed
/// are left untouched.
pub fn splice<'a>(
    source: &str,
    edits: impl IntoIterator<Item = (&'a PhraseElement, &'a str)>,
) -> String {
    let mut edits: Vec<_> = edits.into_iter().collect();
    edits.sort_by_key(|(el, _)| el.content.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (el, fragment) in edits {
        if el.range.start < cursor || el.range.end > source.len() {
            log::warn!("Skipping overlapping edit at byte {}", el.range.start);
            continue;
        }
        out.push_str(&source[cursor..el.content.start]);
        match &el.close {
            Some(name) => {
                out.push('>');
                out.push_str(fragment);
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            None => out.push_str(fragment),
        }
        cursor = el.content.end;
    }
    out.push_str(&source[cursor..]);
    out
}
