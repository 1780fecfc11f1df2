/*
 * writer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Serialization of a [`Tree`] back to XML text.

use crate::{NodeKind, Result, Tree, TreeError, WriteOptions, is_valid_comment, is_valid_name};
use indextree::NodeId;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

impl Tree {
    /// Serializes the whole document as compact XML.
    ///
    /// ```rust
    /// let tree = xmlkit_tree::parse("<a x='1'><b/>text</a>").unwrap();
    /// assert_eq!(tree.to_xml_string().unwrap(), r#"<a x="1"><b/>text</a>"#);
    /// ```
    pub fn to_xml_string(&self) -> Result<String> {
        self.to_xml_string_with(&WriteOptions::default())
    }

    pub fn to_xml_string_with(&self, options: &WriteOptions) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, options)?;
        String::from_utf8(buf).map_err(TreeError::write)
    }

    /// Serializes a single node and its subtree.
    pub fn node_to_xml_string(&self, id: NodeId, options: &WriteOptions) -> Result<String> {
        let mut writer = new_writer(Vec::new(), options);
        self.write_node(&mut writer, id)?;
        String::from_utf8(writer.into_inner()).map_err(TreeError::write)
    }

    /// Writes the whole document to `out`.
    pub fn write_to<W: Write>(&self, out: W, options: &WriteOptions) -> Result<()> {
        let mut writer = new_writer(out, options);
        for (index, child) in self.children(self.root()).enumerate() {
            if index > 0 && options.indent.is_none() {
                writer.get_mut().write_all(b"\n")?;
            }
            self.write_node(&mut writer, child)?;
        }
        writer.get_mut().flush()?;
        Ok(())
    }

    /// Writes the document to a file, replacing its contents.
    pub fn save_file(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "writing XML document");
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out, options)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        let Some(kind) = self.kind(id) else {
            return Ok(());
        };
        match kind {
            NodeKind::Document => {
                for child in self.children(id) {
                    self.write_node(writer, child)?;
                }
            }
            NodeKind::Element { name, attributes } => {
                check_name(name)?;
                let mut start = BytesStart::new(name.as_str());
                for attr in attributes {
                    check_name(&attr.name)?;
                    start.push_attribute((attr.name.as_str(), attr.value.as_str()));
                }
                if self.first_child(id).is_none() {
                    emit(writer, Event::Empty(start))?;
                } else {
                    emit(writer, Event::Start(start))?;
                    for child in self.children(id) {
                        self.write_node(writer, child)?;
                    }
                    emit(writer, Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            NodeKind::Text { content, cdata } => {
                // A section cannot contain its own terminator, so such
                // content falls back to escaped character data.
                if *cdata && !content.contains("]]>") {
                    emit(writer, Event::CData(BytesCData::new(content.as_str())))?;
                } else {
                    emit(writer, Event::Text(BytesText::new(content)))?;
                }
            }
            NodeKind::Comment { content } => {
                if !is_valid_comment(content) {
                    return Err(TreeError::write(format!(
                        "comment {:?} contains '--' or ends with '-'",
                        content
                    )));
                }
                emit(
                    writer,
                    Event::Comment(BytesText::from_escaped(content.as_str())),
                )?;
            }
            NodeKind::Declaration {
                version,
                encoding,
                standalone,
            } => {
                let decl = BytesDecl::new(
                    version.as_deref().unwrap_or("1.0"),
                    encoding.as_deref(),
                    standalone.as_deref(),
                );
                emit(writer, Event::Decl(decl))?;
            }
            NodeKind::StylesheetReference {
                stylesheet_type,
                href,
            } => {
                let content = format!(
                    "xml-stylesheet {} {}",
                    pseudo_attribute("type", stylesheet_type)?,
                    pseudo_attribute("href", href)?
                );
                emit(writer, Event::PI(BytesPI::new(content)))?;
            }
            NodeKind::DocType { content } => {
                emit(
                    writer,
                    Event::DocType(BytesText::from_escaped(content.as_str())),
                )?;
            }
            NodeKind::ProcessingInstruction { target, data } => {
                let content = if data.is_empty() {
                    target.clone()
                } else {
                    format!("{} {}", target, data)
                };
                emit(writer, Event::PI(BytesPI::new(content)))?;
            }
        }
        Ok(())
    }
}

fn new_writer<W: Write>(out: W, options: &WriteOptions) -> Writer<W> {
    match options.indent {
        Some(width) => Writer::new_with_indent(out, options.indent_char, width),
        None => Writer::new(out),
    }
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(TreeError::write(format!("{:?} is not a valid XML name", name)))
    }
}

/// Quotes a processing instruction pseudo-attribute, switching to single
/// quotes when the value holds a double quote.
fn pseudo_attribute(key: &str, value: &str) -> Result<String> {
    let quote = if value.contains('"') { '\'' } else { '"' };
    if value.contains(quote) || value.contains("?>") {
        return Err(TreeError::write(format!(
            "{} {:?} cannot be written in a processing instruction",
            key, value
        )));
    }
    Ok(format!("{key}={quote}{value}{quote}"))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(TreeError::write)
}
