//! Minimal SVG text handling.
//!
//! Exports never re-serialize the user's document. They only locate the root
//! `<svg>` element and splice generated layers in front of its closing tag, so
//! everything the user uploaded survives byte-for-byte. Generated markup is
//! built with [`Element`], which takes care of attribute escaping.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use std::fmt::{self, Display, Write as _};

/// Fallbacks the editor applies when the root element omits sizing.
pub const DEFAULT_VIEW_BOX: &str = "0 0 800 600";
pub const DEFAULT_WIDTH: &str = "800";
pub const DEFAULT_HEIGHT: &str = "600";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SvgError {
    #[error("not an SVG document: root element is not <svg>")]
    NotSvg,
    #[error("SVG root element is not closed")]
    Unterminated,
}

/// Byte offsets of the root element within the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Root {
    /// Index of the `<` that opens the root tag.
    open: usize,
    /// Index just past the `>` that ends the root start tag.
    open_end: usize,
    /// Whether the start tag is self-closing (`<svg ... />`).
    self_closing: bool,
}

fn find_root(text: &str) -> Result<Root, SvgError> {
    let mut pos = 0;
    loop {
        let rest = &text[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.starts_with("<?") {
            pos += skip_past(trimmed, "?>")?;
        } else if trimmed.starts_with("<!--") {
            pos += skip_past(trimmed, "-->")?;
        } else if trimmed.starts_with("<!") {
            pos += skip_declaration(trimmed)?;
        } else {
            break;
        }
    }

    let tag = &text[pos..];
    let after_name = tag.strip_prefix("<svg").ok_or(SvgError::NotSvg)?;
    if !after_name.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
        return Err(SvgError::NotSvg);
    }
    let close = tag.find('>').ok_or(SvgError::Unterminated)?;
    Ok(Root { open: pos, open_end: pos + close + 1, self_closing: tag[..close].ends_with('/') })
}

fn skip_past(text: &str, terminator: &str) -> Result<usize, SvgError> {
    text.find(terminator)
        .map(|i| i + terminator.len())
        .ok_or(SvgError::Unterminated)
}

/// Length of a `<!...>` declaration such as a DOCTYPE. A `>` only ends it
/// outside quotes and outside the `[...]` internal subset.
fn skip_declaration(text: &str) -> Result<usize, SvgError> {
    let mut depth = 0usize;
    let mut quote = None;
    for (i, c) in text.char_indices().skip(2) {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 => return Ok(i + 1),
            _ => {}
        }
    }
    Err(SvgError::Unterminated)
}

/// Check that `text` is an SVG document.
///
/// # Errors
///
/// Returns [`SvgError::NotSvg`] if the first element is not `<svg>`, or
/// [`SvgError::Unterminated`] if the root never closes.
pub fn validate(text: &str) -> Result<(), SvgError> {
    let root = find_root(text)?;
    if !root.self_closing && !text.contains("</svg>") {
        return Err(SvgError::Unterminated);
    }
    Ok(())
}

/// Read an attribute from the root `<svg>` start tag.
#[must_use]
pub fn root_attr(text: &str, name: &str) -> Option<String> {
    let Ok(root) = find_root(text) else {
        return None;
    };
    let tag = &text[root.open + "<svg".len()..root.open_end];
    let mut rest = tag;
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].trim();
        let key = key.rsplit(char::is_whitespace).next().unwrap_or(key);
        let value_part = rest[eq + 1..].trim_start();
        let quote = value_part.chars().next()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        let end = value_part[1..].find(quote)?;
        if key == name {
            return Some(value_part[1..=end].to_owned());
        }
        rest = &value_part[end + 2..];
    }
    None
}

/// Insert `markup` as the last children of the root `<svg>` element.
///
/// # Errors
///
/// Same conditions as [`validate`].
pub fn append_to_root(text: &str, markup: &str) -> Result<String, SvgError> {
    let root = find_root(text)?;
    if root.self_closing {
        // `<svg ... />` becomes `<svg ...>markup</svg>`.
        let slash = text[..root.open_end - 1].rfind('/').ok_or(SvgError::Unterminated)?;
        let mut out = String::with_capacity(text.len() + markup.len() + 8);
        out.push_str(text[..slash].trim_end());
        out.push('>');
        out.push_str(markup);
        out.push_str("</svg>");
        out.push_str(&text[root.open_end..]);
        return Ok(out);
    }
    let close = text.rfind("</svg>").ok_or(SvgError::Unterminated)?;
    if close < root.open_end {
        return Err(SvgError::Unterminated);
    }
    let mut out = String::with_capacity(text.len() + markup.len());
    out.push_str(&text[..close]);
    out.push_str(markup);
    out.push_str(&text[close..]);
    Ok(out)
}

/// Escape a string for use inside a double-quoted attribute or text node.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

/// A generated SVG element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, attrs: Vec::new(), children: Vec::new() }
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Display) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Display) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attrs {
            write!(out, " {name}=\"{}\"", escape(value))?;
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return f.write_str(&out);
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => write!(out, "{element}")?,
                Node::Text(text) => out.push_str(&escape(text)),
            }
        }
        write!(out, "</{}>", self.name)?;
        f.write_str(&out)
    }
}
