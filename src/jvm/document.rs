//! A small pretty-printing document tree.
//!
//! This is the interface a Java-source-like renderer builds against to
//! project a parsed [`super::Class`] as text; the actual rendering rules
//! for Java source are not part of this crate. A [`Document`] is a tree of
//! already-indented text fragments: building one never performs I/O, and
//! rendering it is a pure fold into a single string.

/// One node of a pretty-printing document tree.
#[derive(Debug, Clone)]
pub enum Document {
    /// A literal piece of text, with no trailing terminator.
    Text(String),
    /// A line: inline content plus a terminator (e.g. `;`).
    Line {
        /// The line's content.
        content: Box<Document>,
        /// The terminator appended after the content, e.g. `";"`.
        terminator: String,
    },
    /// A `{ ... }`-style block: a header followed by an indented body.
    Block {
        /// The text opening the block, e.g. `" {"`.
        open: String,
        /// The text closing the block, e.g. `"}"`.
        close: String,
        /// The block's header, printed before `open`.
        header: Box<Document>,
        /// The block's body, printed indented between `open` and `close`.
        body: Box<Document>,
    },
    /// A group of children, optionally separated by a blank line.
    Section {
        /// Whether a blank line is inserted between children.
        blank_separator: bool,
        /// The grouped children.
        children: Vec<Document>,
    },
    /// Children joined in sequence with a separator, on a single logical
    /// line.
    Join {
        /// The separator inserted between children.
        separator: String,
        /// The joined children.
        children: Vec<Document>,
    },
    /// A sub-document indented one level relative to its parent.
    Indent(Box<Document>),
}

impl Document {
    /// An empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// A literal piece of text.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Appends `other` after `self`, joined with no separator.
    #[must_use]
    pub fn append(self, other: Self) -> Self {
        Self::Join {
            separator: String::new(),
            children: vec![self, other],
        }
    }

    /// Terminates this document as a line, e.g. with a trailing `;`.
    pub fn line(self, terminator: impl Into<String>) -> Self {
        Self::Line {
            content: Box::new(self),
            terminator: terminator.into(),
        }
    }

    /// Wraps this document (as the header) around `body`, opening and
    /// closing with the given delimiters.
    pub fn block(self, open: impl Into<String>, close: impl Into<String>, body: Self) -> Self {
        Self::Block {
            open: open.into(),
            close: close.into(),
            header: Box::new(self),
            body: Box::new(body),
        }
    }

    /// Groups `children`, optionally separating them with a blank line.
    #[must_use]
    pub fn section(blank_separator: bool, children: Vec<Self>) -> Self {
        Self::Section {
            blank_separator,
            children,
        }
    }

    /// Joins `children` in sequence, separated by `separator`.
    pub fn join(separator: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Join {
            separator: separator.into(),
            children,
        }
    }

    /// Indents this document one level relative to its parent.
    #[must_use]
    pub fn indent(self) -> Self {
        Self::Indent(Box::new(self))
    }

    /// Renders this document as a sequence of already-indented text lines.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.render_into(0, &mut out);
        out
    }

    /// Renders this document as a single string, lines joined by `\n`.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_lines().join("\n")
    }

    fn render_into(&self, depth: usize, out: &mut Vec<String>) {
        match self {
            Self::Text(s) => {
                if !s.is_empty() || out.is_empty() {
                    out.push(format!("{}{}", "    ".repeat(depth), s));
                }
            }
            Self::Line {
                content,
                terminator,
            } => {
                let mut lines = Vec::new();
                content.render_into(0, &mut lines);
                let rendered = lines.join("");
                out.push(format!("{}{}{}", "    ".repeat(depth), rendered, terminator));
            }
            Self::Block {
                open,
                close,
                header,
                body,
            } => {
                let mut header_lines = Vec::new();
                header.render_into(0, &mut header_lines);
                out.push(format!(
                    "{}{}{}",
                    "    ".repeat(depth),
                    header_lines.join(""),
                    open
                ));
                body.render_into(depth + 1, out);
                out.push(format!("{}{}", "    ".repeat(depth), close));
            }
            Self::Section {
                blank_separator,
                children,
            } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 && *blank_separator {
                        out.push(String::new());
                    }
                    child.render_into(depth, out);
                }
            }
            Self::Join {
                separator,
                children,
            } => {
                let mut parts = Vec::new();
                for child in children {
                    let mut lines = Vec::new();
                    child.render_into(0, &mut lines);
                    parts.push(lines.join("\n"));
                }
                out.push(format!("{}{}", "    ".repeat(depth), parts.join(separator)));
            }
            Self::Indent(child) => child.render_into(depth + 1, out),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_a_block() {
        let doc = Document::text("class Foo").block(
            " {",
            "}",
            Document::section(
                false,
                vec![
                    Document::text("int x").line(";"),
                    Document::text("int y").line(";"),
                ],
            ),
        );
        assert_eq!(
            doc.render(),
            "class Foo {\n    int x;\n    int y;\n}"
        );
    }

    #[test]
    fn joins_with_separator() {
        let doc = Document::join(", ", vec![Document::text("a"), Document::text("b")]);
        assert_eq!(doc.render(), "a, b");
    }
}
