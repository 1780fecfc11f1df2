/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reader and writer configuration.

/// Options controlling how text is turned into a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep whitespace-only text nodes between elements.
    ///
    /// Off by default: indentation in the source does not show up as
    /// text children.
    pub keep_blank_text: bool,
}

impl ParseOptions {
    pub fn keep_blank_text(mut self, keep: bool) -> Self {
        self.keep_blank_text = keep;
        self
    }
}

/// Options controlling serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Indentation width per nesting level. `None` writes compact output
    /// with top-level nodes separated by newlines.
    pub indent: Option<usize>,
    /// Byte used for indentation.
    pub indent_char: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: None,
            indent_char: b' ',
        }
    }
}

impl WriteOptions {
    /// Pretty-printed output using `width` spaces per level.
    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
            ..Self::default()
        }
    }

    pub fn indent_char(mut self, c: u8) -> Self {
        self.indent_char = c;
        self
    }
}
