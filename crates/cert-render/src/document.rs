//! Word-processing main document and placeholder substitution.

use std::collections::HashSet;

use cert_model::PlaceholderMap;

use crate::error::RenderError;
use crate::xml::{Element, Node, XmlError, XmlTree};

const BODY: &str = "w:body";
const PARAGRAPH: &str = "w:p";
const RUN: &str = "w:r";
const RUN_PROPERTIES: &str = "w:rPr";
const TEXT: &str = "w:t";
const TAB: &str = "w:tab";
const POSITIONAL_TAB: &str = "w:ptab";
const BREAK: &str = "w:br";
const CARRIAGE_RETURN: &str = "w:cr";
const NO_BREAK_HYPHEN: &str = "w:noBreakHyphen";
const TABLE: &str = "w:tbl";
const TABLE_ROW: &str = "w:tr";
const TABLE_CELL: &str = "w:tc";

/// The `word/document.xml` part of a template.
#[derive(Debug, Clone)]
pub struct WordDocument {
    tree: XmlTree,
}

impl WordDocument {
    pub(crate) fn parse(xml: &str) -> Result<Self, XmlError> {
        Ok(Self {
            tree: XmlTree::parse(xml)?,
        })
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        self.tree.to_bytes()
    }

    /// Text of every paragraph visited by substitution, in visiting order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        if let Some(body) = self.body() {
            visit_paragraphs(body, &mut |paragraph| texts.push(paragraph_text(paragraph)));
        }
        texts
    }

    /// Tokens of `map` that occur in at least one paragraph.
    pub fn tokens_present<'a>(&self, map: &'a PlaceholderMap) -> Vec<&'a str> {
        let texts = self.paragraph_texts();
        map.tokens()
            .filter(|token| texts.iter().any(|text| text.contains(token)))
            .collect()
    }

    /// Substitute every token of `map` and fail if any token was never found.
    ///
    /// Body paragraphs are visited first, then the paragraphs of every cell
    /// of every top-level table. A paragraph whose text changes loses all run
    /// content except the first run, which receives the whole new text and
    /// keeps its own run properties.
    pub fn replace_placeholders(&mut self, map: &PlaceholderMap) -> Result<(), RenderError> {
        let mut found: HashSet<String> = HashSet::new();
        if let Some(body) = self.body_mut() {
            visit_paragraphs_mut(body, &mut |paragraph| {
                replace_in_paragraph(paragraph, map, &mut found);
            });
        }
        let missing: Vec<String> = map
            .tokens()
            .filter(|token| !found.contains(*token))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RenderError::TemplateMismatch { missing })
        }
    }

    fn body(&self) -> Option<&Element> {
        self.tree.root()?.elements().find(|element| element.is(BODY))
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.tree
            .root_mut()?
            .elements_mut()
            .find(|element| element.is(BODY))
    }
}

fn visit_paragraphs(body: &Element, visit: &mut impl FnMut(&Element)) {
    for paragraph in body.elements().filter(|element| element.is(PARAGRAPH)) {
        visit(paragraph);
    }
    for table in body.elements().filter(|element| element.is(TABLE)) {
        for row in table.elements().filter(|element| element.is(TABLE_ROW)) {
            for cell in row.elements().filter(|element| element.is(TABLE_CELL)) {
                for paragraph in cell.elements().filter(|element| element.is(PARAGRAPH)) {
                    visit(paragraph);
                }
            }
        }
    }
}

fn visit_paragraphs_mut(body: &mut Element, visit: &mut impl FnMut(&mut Element)) {
    for paragraph in body.elements_mut().filter(|element| element.is(PARAGRAPH)) {
        visit(paragraph);
    }
    for table in body.elements_mut().filter(|element| element.is(TABLE)) {
        for row in table.elements_mut().filter(|element| element.is(TABLE_ROW)) {
            for cell in row.elements_mut().filter(|element| element.is(TABLE_CELL)) {
                for paragraph in cell.elements_mut().filter(|element| element.is(PARAGRAPH)) {
                    visit(paragraph);
                }
            }
        }
    }
}

fn replace_in_paragraph(
    paragraph: &mut Element,
    map: &PlaceholderMap,
    found: &mut HashSet<String>,
) {
    let original = paragraph_text(paragraph);
    let mut text = original.clone();
    for (token, value) in map.iter() {
        if text.contains(token) {
            text = text.replace(token, value);
            found.insert(token.to_string());
        }
    }
    if text == original {
        return;
    }

    let mut runs = paragraph.elements_mut().filter(|element| element.is(RUN));
    if let Some(first) = runs.next() {
        set_run_text(first, &text);
    }
    for run in runs {
        set_run_text(run, "");
    }
}

/// Concatenated text of the runs directly under a paragraph.
fn paragraph_text(paragraph: &Element) -> String {
    paragraph
        .elements()
        .filter(|element| element.is(RUN))
        .map(run_text)
        .collect()
}

fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.elements() {
        if child.is(TEXT) {
            text.push_str(&child.text());
        } else if child.is(TAB) || child.is(POSITIONAL_TAB) {
            text.push('\t');
        } else if child.is(BREAK) {
            if is_line_break(child) {
                text.push('\n');
            }
        } else if child.is(CARRIAGE_RETURN) {
            text.push('\n');
        } else if child.is(NO_BREAK_HYPHEN) {
            text.push('-');
        }
    }
    text
}

/// Page and column breaks carry no text.
fn is_line_break(element: &Element) -> bool {
    match element.attribute("w:type") {
        Some(kind) => kind.as_slice() == b"textWrapping",
        None => true,
    }
}

/// Replace the run content with `text`, keeping the run properties.
///
/// Tabs and line feeds become `w:tab` and `w:br` elements.
fn set_run_text(run: &mut Element, text: &str) {
    run.children
        .retain(|node| matches!(node, Node::Element(element) if element.is(RUN_PROPERTIES)));
    let mut pending = String::new();
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush_text(run, &mut pending);
                run.push(Node::Element(Element::empty(TAB)));
            }
            '\n' | '\r' => {
                flush_text(run, &mut pending);
                run.push(Node::Element(Element::empty(BREAK)));
            }
            _ => pending.push(ch),
        }
    }
    flush_text(run, &mut pending);
}

fn flush_text(run: &mut Element, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let value = std::mem::take(pending);
    let mut element = Element::new(TEXT);
    if value.trim().len() < value.len() {
        element = element.with_attribute("xml:space", "preserve");
    }
    element.push(Node::Text(value));
    run.push(Node::Element(element));
}
