/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! XML reader that builds a [`Tree`] from quick-xml events.

use crate::{NodeData, NodeKind, ParseOptions, Result, SourceLocation, Tree, TreeError};
use indextree::NodeId;
use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesPI, BytesStart, Event};
use std::borrow::Cow;
use std::path::Path;

/// Parse XML text into a tree using default options.
///
/// # Example
///
/// ```rust
/// use xmlkit_tree::parse;
///
/// let tree = parse("<root><child/></root>").unwrap();
/// let root = tree.root_element().unwrap();
/// assert_eq!(tree.element_name(root), Some("root"));
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed or has no single root element.
pub fn parse(content: &str) -> Result<Tree> {
    parse_with_options(content, &ParseOptions::default())
}

/// Parse XML text into a tree.
pub fn parse_with_options(content: &str, options: &ParseOptions) -> Result<Tree> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let tree = TreeBuilder::new(content, options).parse()?;
    tracing::trace!(nodes = tree.len(), "parsed XML tree");
    Ok(tree)
}

/// Parse UTF-8 encoded bytes into a tree.
pub fn parse_bytes(content: &[u8], options: &ParseOptions) -> Result<Tree> {
    parse_with_options(std::str::from_utf8(content)?, options)
}

/// Read and parse an XML file.
pub fn load_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Tree> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading XML document");
    let bytes = std::fs::read(path)?;
    parse_bytes(&bytes, options)
}

/// Maps byte offsets to line/column positions.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count());
        SourceLocation {
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }
}

/// Internal parser state.
struct TreeBuilder<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineIndex<'a>,
    keep_blank_text: bool,
    tree: Tree,
    /// Open elements, innermost last.
    stack: Vec<NodeId>,
    root_element: Option<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, options: &ParseOptions) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            lines: LineIndex::new(source),
            keep_blank_text: options.keep_blank_text,
            tree: Tree::new(),
            stack: Vec::new(),
            root_element: None,
        }
    }

    fn parse(mut self) -> Result<Tree> {
        loop {
            // Position of the event's first byte, before the reader consumes it.
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let id = self.element(&e, event_start)?;
                    self.stack.push(id);
                }
                Ok(Event::End(e)) => {
                    let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.close(found, event_start)?;
                }
                Ok(Event::Empty(e)) => {
                    self.element(&e, event_start)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| TreeError::XmlSyntax {
                        message: format!("Invalid text content: {}", err),
                        location: Some(self.lines.location(event_start)),
                    })?;
                    self.text(text, false, event_start);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    self.text(Cow::Owned(text), true, event_start);
                }
                Ok(Event::Comment(e)) => {
                    let content = String::from_utf8_lossy(&e).into_owned();
                    self.attach(NodeKind::Comment { content }, event_start);
                }
                Ok(Event::Decl(e)) => {
                    let kind = self.declaration(&e, event_start)?;
                    self.attach(kind, event_start);
                }
                Ok(Event::PI(e)) => {
                    let kind = processing_instruction(&e);
                    self.attach(kind, event_start);
                }
                Ok(Event::DocType(e)) => {
                    let content = String::from_utf8_lossy(&e).trim().to_string();
                    self.attach(NodeKind::DocType { content }, event_start);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(TreeError::XmlSyntax {
                        message: e.to_string(),
                        location: Some(
                            self.lines.location(self.reader.error_position() as usize),
                        ),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(&open) = self.stack.last() {
            let name = self.tree.element_name(open).unwrap_or_default().to_string();
            return Err(TreeError::UnexpectedEof {
                expected: format!("closing tag </{}>", name),
                location: self.tree.get(open).and_then(|data| data.location),
            });
        }

        if self.root_element.is_none() {
            return Err(TreeError::EmptyDocument);
        }

        Ok(self.tree)
    }

    /// Parent for the next node: the innermost open element, or the
    /// document node at top level.
    fn current_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.tree.root())
    }

    fn attach(&mut self, kind: NodeKind, offset: usize) -> NodeId {
        let location = self.lines.location(offset);
        let id = self.tree.new_node(NodeData::with_location(kind, location));
        let parent = self.current_parent();
        self.tree.append_child(parent, id);
        id
    }

    fn element(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<NodeId> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let location = self.lines.location(event_start);

        if self.stack.is_empty() && self.root_element.is_some() {
            return Err(TreeError::MultipleRoots {
                location: Some(location),
            });
        }

        let mut attributes: Vec<crate::Attribute> = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|err| TreeError::XmlSyntax {
                message: format!("Attribute error: {}", err),
                location: Some(location),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|err| TreeError::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                location: Some(location),
            })?;
            match attributes.iter_mut().find(|a| a.name == key) {
                Some(existing) => existing.value = value.into_owned(),
                None => attributes.push(crate::Attribute::new(key, value)),
            }
        }

        let id = self.attach(NodeKind::Element { name, attributes }, event_start);
        if self.stack.is_empty() {
            self.root_element = Some(id);
        }
        Ok(id)
    }

    fn close(&mut self, found: String, event_start: usize) -> Result<()> {
        let open = self.stack.pop().ok_or_else(|| TreeError::XmlSyntax {
            message: format!("Unexpected closing tag </{}>", found),
            location: Some(self.lines.location(event_start)),
        })?;
        let expected = self.tree.element_name(open).unwrap_or_default();
        if expected != found {
            return Err(TreeError::MismatchedEndTag {
                expected: expected.to_string(),
                found,
                location: Some(self.lines.location(event_start)),
            });
        }
        Ok(())
    }

    fn text(&mut self, text: Cow<'_, str>, cdata: bool, event_start: usize) {
        // Character data outside the root element is insignificant.
        if self.stack.is_empty() {
            return;
        }
        if !cdata && !self.keep_blank_text && text.trim().is_empty() {
            return;
        }
        self.attach(
            NodeKind::Text {
                content: text.into_owned(),
                cdata,
            },
            event_start,
        );
    }

    fn declaration(&self, e: &BytesDecl<'_>, event_start: usize) -> Result<NodeKind> {
        let syntax = |err: quick_xml::Error| TreeError::XmlSyntax {
            message: format!("Invalid XML declaration: {}", err),
            location: Some(self.lines.location(event_start)),
        };
        let version = Some(lossy(&e.version().map_err(&syntax)?));
        // Pseudo-attribute failures come back as `AttrError`.
        let encoding = e
            .encoding()
            .transpose()
            .map_err(|err| syntax(err.into()))?
            .map(|v| lossy(&v));
        let standalone = e
            .standalone()
            .transpose()
            .map_err(|err| syntax(err.into()))?
            .map(|v| lossy(&v));
        Ok(NodeKind::Declaration {
            version,
            encoding,
            standalone,
        })
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn processing_instruction(e: &BytesPI<'_>) -> NodeKind {
    let target = lossy(e.target());
    let data = lossy(e.content()).trim().to_string();
    if target == "xml-stylesheet" {
        let pseudo = pseudo_attributes(&data);
        let find = |key: &str| {
            pseudo
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        if let (Some(stylesheet_type), Some(href)) = (find("type"), find("href")) {
            return NodeKind::StylesheetReference {
                stylesheet_type,
                href,
            };
        }
    }
    NodeKind::ProcessingInstruction { target, data }
}

/// Splits `key="value" key2='value'` pairs out of processing instruction data.
fn pseudo_attributes(data: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = data.trim_start();
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].trim().to_string();
        let after = rest[eq + 1..].trim_start();
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            break;
        };
        let Some(end) = after[1..].find(quote) else {
            break;
        };
        pairs.push((key, after[1..1 + end].to_string()));
        rest = after[end + 2..].trim_start();
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, NodeType};

    fn kinds(tree: &Tree, parent: NodeId) -> Vec<NodeType> {
        tree.children(parent)
            .filter_map(|id| tree.node_type(id))
            .collect()
    }

    #[test]
    fn test_parse_simple_element() {
        let tree = parse("<root/>").unwrap();
        let root = tree.root_element().unwrap();
        assert_eq!(tree.element_name(root), Some("root"));
        assert!(tree.first_child(root).is_none());
    }

    #[test]
    fn test_parse_nested_elements_and_text() {
        let tree = parse("<root><child>Hello, world!</child></root>").unwrap();
        let root = tree.root_element().unwrap();
        let child = tree.first_child(root).unwrap();
        assert_eq!(tree.element_name(child), Some("child"));
        let text = tree.first_child(child).unwrap();
        assert_eq!(tree.value(text), Some("Hello, world!"));
    }

    #[test]
    fn test_parse_attributes_in_order() {
        let tree = parse(r#"<root b="2" a="1 &amp; 2"/>"#).unwrap();
        let root = tree.root_element().unwrap();
        assert_eq!(
            tree.attributes(root).unwrap(),
            &[Attribute::new("b", "2"), Attribute::new("a", "1 & 2")]
        );
    }

    #[test]
    fn test_blank_text_is_dropped_by_default() {
        let tree = parse("<root>\n  <a/>\n  <b/>\n</root>").unwrap();
        let root = tree.root_element().unwrap();
        assert_eq!(kinds(&tree, root), vec![NodeType::Element, NodeType::Element]);
    }

    #[test]
    fn test_blank_text_is_kept_on_request() {
        let options = ParseOptions::default().keep_blank_text(true);
        let tree = parse_with_options("<root>\n  <a/>\n</root>", &options).unwrap();
        let root = tree.root_element().unwrap();
        assert_eq!(
            kinds(&tree, root),
            vec![NodeType::Text, NodeType::Element, NodeType::Text]
        );
    }

    #[test]
    fn test_mixed_content_order() {
        let tree = parse("<p><a/>text<b/><!-- note --><c/></p>").unwrap();
        let p = tree.root_element().unwrap();
        assert_eq!(
            kinds(&tree, p),
            vec![
                NodeType::Element,
                NodeType::Text,
                NodeType::Element,
                NodeType::Comment,
                NodeType::Element,
            ]
        );
    }

    #[test]
    fn test_prolog_nodes() {
        let tree = parse(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<?xml-stylesheet type="text/xsl" href="style.xsl"?>
<!DOCTYPE root>
<!-- top -->
<root/>"#,
        )
        .unwrap();
        let doc = tree.root();
        assert_eq!(
            kinds(&tree, doc),
            vec![
                NodeType::Declaration,
                NodeType::StylesheetReference,
                NodeType::Unknown,
                NodeType::Comment,
                NodeType::Element,
            ]
        );
        let decl = tree.first_child(doc).unwrap();
        assert_eq!(
            tree.kind(decl),
            Some(&NodeKind::Declaration {
                version: Some("1.0".to_string()),
                encoding: Some("UTF-8".to_string()),
                standalone: Some("yes".to_string()),
            })
        );
        let stylesheet = tree.next_sibling(decl).unwrap();
        assert_eq!(
            tree.kind(stylesheet),
            Some(&NodeKind::StylesheetReference {
                stylesheet_type: "text/xsl".to_string(),
                href: "style.xsl".to_string(),
            })
        );
    }

    #[test]
    fn test_declaration_optional_fields() {
        let tree = parse("<?xml version='1.1' encoding='ISO-8859-1'?><r/>").unwrap();
        let decl = tree.first_child(tree.root()).unwrap();
        assert_eq!(
            tree.kind(decl),
            Some(&NodeKind::Declaration {
                version: Some("1.1".to_string()),
                encoding: Some("ISO-8859-1".to_string()),
                standalone: None,
            })
        );

        let tree = parse("<?xml version=\"1.0\"?><r/>").unwrap();
        let decl = tree.first_child(tree.root()).unwrap();
        assert!(matches!(
            tree.kind(decl),
            Some(NodeKind::Declaration {
                encoding: None,
                standalone: None,
                ..
            })
        ));
    }

    #[test]
    fn test_other_processing_instruction_is_unknown() {
        let tree = parse("<root><?php echo 1; ?></root>").unwrap();
        let root = tree.root_element().unwrap();
        let pi = tree.first_child(root).unwrap();
        assert_eq!(
            tree.kind(pi),
            Some(&NodeKind::ProcessingInstruction {
                target: "php".to_string(),
                data: "echo 1;".to_string(),
            })
        );
    }

    #[test]
    fn test_cdata_is_text() {
        let tree = parse("<root><![CDATA[a < b]]></root>").unwrap();
        let root = tree.root_element().unwrap();
        let text = tree.first_child(root).unwrap();
        assert_eq!(
            tree.kind(text),
            Some(&NodeKind::Text {
                content: "a < b".to_string(),
                cdata: true,
            })
        );
    }

    #[test]
    fn test_locations() {
        let tree = parse("<root>\n  <child/>\n</root>").unwrap();
        let root = tree.root_element().unwrap();
        let child = tree.first_child(root).unwrap();
        assert_eq!(
            tree.get(root).unwrap().location,
            Some(SourceLocation { line: 1, column: 1 })
        );
        assert_eq!(
            tree.get(child).unwrap().location,
            Some(SourceLocation { line: 2, column: 3 })
        );
    }

    #[test]
    fn test_empty_document_error() {
        assert!(matches!(parse(""), Err(TreeError::EmptyDocument)));
        assert!(matches!(
            parse("<?xml version=\"1.0\"?>"),
            Err(TreeError::EmptyDocument)
        ));
    }

    #[test]
    fn test_multiple_roots_error() {
        assert!(matches!(
            parse("<root/><another/>"),
            Err(TreeError::MultipleRoots { .. })
        ));
    }

    #[test]
    fn test_unclosed_element_error() {
        let result = parse("<root>");
        assert!(
            matches!(
                result,
                Err(TreeError::UnexpectedEof { .. } | TreeError::XmlSyntax { .. })
            ),
            "got: {:?}",
            result
        );
    }

    #[test]
    fn test_mismatched_tags_error() {
        let result = parse("<root></wrong>");
        // quick-xml checks end names itself, so either error is acceptable.
        assert!(
            matches!(
                result,
                Err(TreeError::MismatchedEndTag { .. } | TreeError::XmlSyntax { .. })
            ),
            "got: {:?}",
            result
        );
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let result = parse_bytes(&[b'<', 0xff, b'/', b'>'], &ParseOptions::default());
        assert!(matches!(result, Err(TreeError::Encoding(_))));
    }

    #[test]
    fn test_bom_is_skipped() {
        let tree = parse("\u{FEFF}<root/>").unwrap();
        assert!(tree.root_element().is_some());
    }

    #[test]
    fn test_pseudo_attributes() {
        assert_eq!(
            pseudo_attributes(r#"type="text/css" href='a.css' media="screen""#),
            vec![
                ("type".to_string(), "text/css".to_string()),
                ("href".to_string(), "a.css".to_string()),
                ("media".to_string(), "screen".to_string()),
            ]
        );
        assert!(pseudo_attributes("garbage").is_empty());
    }
}
