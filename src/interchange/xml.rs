//! Minimal deterministic XML tree and writer.
//!
//! Attribute order is insertion order and child order is build order, so the
//! serialized bytes are a pure function of how the tree was built. The
//! writer indents with two spaces, self-closes empty elements, and keeps
//! text-only elements on one line.

use std::fmt;

/// Escape text content: `&`, `<`, `>`.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape attribute values: text entities plus `"` and `'`.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element: name, ordered attributes, ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Build an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute (builder style). Order is preserved.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append an attribute only when `value` is `Some`.
    pub fn attr_opt(self, name: impl Into<String>, value: Option<String>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    /// Append a child element (builder style).
    pub fn child(mut self, el: XmlElement) -> Self {
        self.children.push(XmlNode::Element(el));
        self
    }

    /// Append a text node (builder style).
    pub fn text(mut self, s: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(s.into()));
        self
    }

    /// Append a child element in place.
    pub fn push(&mut self, el: XmlElement) {
        self.children.push(XmlNode::Element(el));
    }

    /// True when the element has any child nodes.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn write_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        let text_only = self
            .children
            .iter()
            .all(|c| matches!(c, XmlNode::Text(_)));
        if text_only {
            out.push('>');
            for node in &self.children {
                if let XmlNode::Text(t) = node {
                    out.push_str(&escape_text(t));
                }
            }
            out.push_str("</");
            out.push_str(&self.name);
            out.push_str(">\n");
            return;
        }
        out.push_str(">\n");
        for node in &self.children {
            match node {
                XmlNode::Element(el) => el.write_into(out, depth + 1),
                XmlNode::Text(t) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&escape_text(t));
                    out.push('\n');
                }
            }
        }
        out.push_str(&indent);
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

/// A complete document: XML declaration, optional doctype, one root element.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlDocument {
    /// The root element.
    pub root: XmlElement,
    doctype: Option<String>,
}

impl XmlDocument {
    /// Build a document without a doctype.
    pub fn new(root: XmlElement) -> Self {
        Self {
            root,
            doctype: None,
        }
    }

    /// Build a document with a `<!DOCTYPE …>` line.
    pub fn with_doctype(root: XmlElement, doctype: impl Into<String>) -> Self {
        Self {
            root,
            doctype: Some(doctype.into()),
        }
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if let Some(doctype) = &self.doctype {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push_str(">\n");
        }
        self.root.write_into(&mut out, 0);
        f.write_str(&out)
    }
}
