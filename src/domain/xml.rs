//! Minimal write-only XML tree.
//!
//! Nodes are appended, never removed. A child named [`COMMENT_TAG`] renders
//! as a comment. Serialization reproduces the CTML layout consumed by plasma
//! chemistry codes:
//!
//! ```text
//! <?xml version="1.0"?>
//! <ctml>
//!   <process id="0" type="ELASTIC">
//!     <reactants>Ar</reactants>
//!     <data>
//!       0.000000E+00 7.500000E-20
//!       </data>
//!   </process>
//! </ctml>
//! ```
//!
//! Each child is written two indentation levels below its parent. Multi-line
//! values start on a new line, indented two spaces past the element.

use std::collections::HashMap;

use crate::domain::error::{DomainError, DomainResult};

/// Node name marking a comment instead of an element.
pub const COMMENT_TAG: &str = "_comment_";

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\"?>\n";

// Entries from level 9 on are one space wider than the level.
const INDENT: [&str; 16] = [
    "",
    " ",
    "  ",
    "   ",
    "    ",
    "     ",
    "      ",
    "       ",
    "        ",
    "          ",
    "           ",
    "            ",
    "             ",
    "              ",
    "               ",
    "                ",
];

/// Deepest level the indentation table covers.
pub const MAX_LEVEL: usize = INDENT.len() - 1;

/// Conversion of node values to their text form.
///
/// Floats use the shortest representation that reads back to the same
/// value, with a signed exponent of at least two digits (`0.02`, `0.0`,
/// `1e-05`, `1e+16`).
pub trait NodeValue {
    fn to_node_value(&self) -> String;
}

impl NodeValue for str {
    fn to_node_value(&self) -> String {
        self.to_string()
    }
}

impl NodeValue for String {
    fn to_node_value(&self) -> String {
        self.clone()
    }
}

impl NodeValue for f64 {
    fn to_node_value(&self) -> String {
        let shortest = format!("{:?}", self);
        match shortest.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => shortest,
        }
    }
}

impl NodeValue for usize {
    fn to_node_value(&self) -> String {
        self.to_string()
    }
}

impl<T: NodeValue + ?Sized> NodeValue for &T {
    fn to_node_value(&self) -> String {
        (**self).to_node_value()
    }
}

/// Element or comment in an XML tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    name: String,
    value: String,
    /// Insertion order, unique keys
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    /// Name to index of the most recently added child with that name
    child_index: HashMap<String, usize>,
}

impl XmlNode {
    /// Create a node. The value loses its leading whitespace.
    pub fn new(name: impl Into<String>, value: impl NodeValue) -> Self {
        Self {
            name: name.into(),
            value: value.to_node_value().trim_start().to_string(),
            ..Default::default()
        }
    }

    /// Create an empty element, typically the document root.
    pub fn element(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_comment(&self) -> bool {
        self.name == COMMENT_TAG
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter()
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a child and return it for further mutation.
    ///
    /// A later child with the same name shadows earlier ones for
    /// [`XmlNode::child`]; all of them are serialized.
    pub fn add_child(&mut self, name: impl Into<String>, value: impl NodeValue) -> &mut XmlNode {
        let child = XmlNode::new(name, value);
        let index = self.children.len();
        self.child_index.insert(child.name.clone(), index);
        self.children.push(child);
        &mut self.children[index]
    }

    pub fn add_comment(&mut self, text: impl NodeValue) -> &mut XmlNode {
        self.add_child(COMMENT_TAG, text)
    }

    /// Set or overwrite an attribute. An overwritten key keeps its position.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    pub fn attribute(&self, key: &str) -> DomainResult<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| DomainError::MissingAttribute {
                node: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Most recently added child with `name`.
    pub fn child(&self, name: &str) -> DomainResult<&XmlNode> {
        self.child_index
            .get(name)
            .map(|&index| &self.children[index])
            .ok_or_else(|| DomainError::MissingChild {
                node: self.name.clone(),
                name: name.to_string(),
            })
    }

    pub fn child_mut(&mut self, name: &str) -> DomainResult<&mut XmlNode> {
        match self.child_index.get(name) {
            Some(&index) => Ok(&mut self.children[index]),
            None => Err(DomainError::MissingChild {
                node: self.name.clone(),
                name: name.to_string(),
            }),
        }
    }

    /// Full document: declaration, this node at level 0, trailing newline.
    pub fn to_document(&self) -> DomainResult<String> {
        let mut out = String::from(XML_DECLARATION);
        self.write(&mut out, 0)?;
        out.push('\n');
        Ok(out)
    }

    /// Fragment for this subtree at `level`, without declaration.
    pub fn to_markup(&self, level: usize) -> DomainResult<String> {
        let mut out = String::new();
        self.write(&mut out, level)?;
        Ok(out)
    }

    fn write(&self, out: &mut String, level: usize) -> DomainResult<()> {
        let indent = INDENT
            .get(level)
            .copied()
            .ok_or(DomainError::UnsupportedNestingDepth {
                level,
                max: MAX_LEVEL,
            })?;

        if self.is_comment() {
            self.write_comment(out, indent);
            return Ok(());
        }

        out.push_str(indent);
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }

        if self.value.is_empty() && self.children.is_empty() {
            out.push_str("/>");
            return Ok(());
        }

        out.push('>');
        if !self.value.is_empty() {
            self.write_value(out, indent);
        }
        for child in &self.children {
            out.push('\n');
            child.write(out, level + 2)?;
        }
        if !self.children.is_empty() {
            out.push('\n');
            out.push_str(indent);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
        Ok(())
    }

    fn write_comment(&self, out: &mut String, indent: &str) {
        out.push('\n');
        out.push_str(indent);
        out.push_str("<!--");
        if !self.value.is_empty() {
            if !self.value.starts_with(' ') {
                out.push(' ');
            }
            out.push_str(&escape_comment(&self.value));
            if !self.value.ends_with(' ') {
                out.push(' ');
            }
        }
        out.push_str("-->");
    }

    /// Single-line values go inline. Otherwise every line goes on its own
    /// output line with its leading whitespace removed.
    fn write_value(&self, out: &mut String, indent: &str) {
        if !self.value.contains('\n') {
            out.push_str(&escape_text(&self.value));
            return;
        }

        let mut rest = self.value.as_str();
        loop {
            out.push_str("\n  ");
            out.push_str(indent);
            match rest.split_once('\n') {
                Some((line, tail)) => {
                    out.push_str(&escape_text(line));
                    rest = tail.trim_start();
                }
                None => {
                    out.push_str(&escape_text(rest));
                    break;
                }
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// `--` may not appear inside a comment; consecutive dashes get a space between them.
fn escape_comment(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut after_dash = false;
    for c in text.chars() {
        if c == '-' && after_dash {
            escaped.push(' ');
        }
        escaped.push(c);
        after_dash = c == '-';
    }
    escaped
}
