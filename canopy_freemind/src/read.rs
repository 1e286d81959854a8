// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event-driven reader: XML events are collected into owned nodes first and the tree is
//! built only once the whole map parsed.

use canopy_tree::{Font, NodeContent, NodeId, NodeTree, RawFragment, Side, TreeError};
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;

use crate::Document;
use crate::error::{DocumentError, Malformed};

const SUPPORTED_VERSIONS: [&str; 4] = ["0.7", "0.8", "0.9", "1.0"];

/// Parse a FreeMind document.
///
/// Elements the model does not interpret are kept verbatim, either on the node they appear
/// in or, at map level, in [`Document::map_extras`].
pub fn read_document(source: &str) -> Result<Document, DocumentError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);
    let mut parser = Parser { reader, source };

    let version = parser.map_version()?;
    let (root, map_extras) = parser.map_body()?;
    let tree = build(root)?;
    debug!(
        version = version.as_str(),
        nodes = tree.node_count(),
        extras = map_extras.len();
        "Read FreeMind document"
    );
    Ok(Document {
        version,
        tree,
        map_extras,
    })
}

#[derive(Debug, Default)]
struct ParsedNode {
    content: NodeContent,
    position: Option<Side>,
    children: Vec<ParsedNode>,
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
    source: &'a str,
}

impl Parser<'_> {
    fn malformed(&self, reason: Malformed) -> DocumentError {
        DocumentError::MalformedDocument {
            reason,
            position: self.reader.buffer_position(),
        }
    }

    /// Skip the prolog and return the version of the opening `<map>`.
    fn map_version(&mut self) -> Result<String, DocumentError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"map" => return self.version_of(&e),
                Event::Empty(e) if e.name().as_ref() == b"map" => {
                    self.version_of(&e)?;
                    return Err(self.malformed(Malformed::MissingRootNode));
                }
                Event::Start(e) | Event::Empty(e) => {
                    let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(self.malformed(Malformed::WrongRootElement(found)));
                }
                Event::Eof => return Err(self.malformed(Malformed::Empty)),
                _ => {}
            }
        }
    }

    fn version_of(&self, map: &BytesStart<'_>) -> Result<String, DocumentError> {
        let Some(version) = attribute(map, b"version")? else {
            return Err(self.malformed(Malformed::MissingAttribute {
                element: "map",
                attribute: "version",
            }));
        };
        if !SUPPORTED_VERSIONS.iter().any(|p| version.starts_with(p)) {
            return Err(self.malformed(Malformed::UnsupportedVersion(version)));
        }
        Ok(version)
    }

    /// Read up to `</map>`: exactly one root node plus anything else kept verbatim.
    fn map_body(&mut self) -> Result<(ParsedNode, Vec<RawFragment>), DocumentError> {
        let mut root = None;
        let mut extras = Vec::new();
        loop {
            let before = self.reader.buffer_position();
            match self.reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"node" => {
                    if root.is_some() {
                        return Err(self.malformed(Malformed::MultipleRootNodes));
                    }
                    root = Some(self.node(&e, 0, false)?);
                }
                Event::Empty(e) if e.name().as_ref() == b"node" => {
                    if root.is_some() {
                        return Err(self.malformed(Malformed::MultipleRootNodes));
                    }
                    root = Some(self.node(&e, 0, true)?);
                }
                Event::Start(e) => extras.push(self.fragment(before, Some(e.name()))?),
                Event::Empty(_) | Event::Comment(_) | Event::CData(_) | Event::PI(_) => {
                    extras.push(self.fragment(before, None)?);
                }
                Event::End(_) => break,
                Event::Eof => return Err(self.malformed(Malformed::UnexpectedEof("map"))),
                Event::Text(text) => {
                    warn!(position = before; "Dropping text directly inside <map>: {:?}", text);
                }
                _ => {}
            }
        }
        let root = root.ok_or_else(|| self.malformed(Malformed::MissingRootNode))?;
        Ok((root, extras))
    }

    /// Read one `<node>` whose start tag was just consumed.
    ///
    /// `depth` is 0 for the root. `POSITION` is interpreted at depth 1 and dropped
    /// elsewhere, since the side of a deeper node follows from its ancestor.
    fn node(
        &mut self,
        start: &BytesStart<'_>,
        depth: usize,
        empty: bool,
    ) -> Result<ParsedNode, DocumentError> {
        let mut node = ParsedNode::default();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let value = attr
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            match attr.key.as_ref() {
                b"TEXT" => node.content.text = value,
                b"FOLDED" => node.content.folded = value == "true",
                b"POSITION" if depth == 1 => {
                    node.position = Some(match value.as_str() {
                        "left" => Side::Left,
                        "right" => Side::Right,
                        _ => {
                            return Err(self.malformed(Malformed::InvalidAttribute {
                                element: "node",
                                attribute: "POSITION",
                                value,
                            }));
                        }
                    });
                }
                b"POSITION" => {
                    debug!(
                        depth,
                        value = value.as_str();
                        "Ignoring POSITION below the first level"
                    );
                }
                key => {
                    let key = String::from_utf8_lossy(key).into_owned();
                    node.content.attributes.push((key, value));
                }
            }
        }
        if empty {
            return Ok(node);
        }

        loop {
            let before = self.reader.buffer_position();
            match self.reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"node" => {
                    node.children.push(self.node(&e, depth + 1, false)?);
                }
                Event::Empty(e) => match e.name().as_ref() {
                    b"node" => node.children.push(self.node(&e, depth + 1, true)?),
                    b"font" if node.content.font.is_none() => match self.font(&e)? {
                        Some(font) => node.content.font = Some(font),
                        None => node.content.unsupported.push(self.fragment(before, None)?),
                    },
                    b"icon" => match self.icon(&e)? {
                        Some(code) => node.content.icons.push(code),
                        None => node.content.unsupported.push(self.fragment(before, None)?),
                    },
                    _ => node.content.unsupported.push(self.fragment(before, None)?),
                },
                Event::Start(e) => {
                    let fragment = self.fragment(before, Some(e.name()))?;
                    node.content.unsupported.push(fragment);
                }
                Event::Comment(_) | Event::CData(_) | Event::PI(_) => {
                    node.content.unsupported.push(self.fragment(before, None)?);
                }
                Event::End(_) => return Ok(node),
                Event::Eof => return Err(self.malformed(Malformed::UnexpectedEof("node"))),
                Event::Text(text) => {
                    warn!(position = before; "Dropping text directly inside <node>: {:?}", text);
                }
                _ => {}
            }
        }
    }

    /// A `<font>` carrying only the modelled attributes, or `None` to keep it verbatim.
    fn font(&self, e: &BytesStart<'_>) -> Result<Option<Font>, DocumentError> {
        let mut name = None;
        let mut size = None;
        let mut bold = false;
        let mut italic = false;
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let value = attr
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            match attr.key.as_ref() {
                b"NAME" => name = Some(value),
                b"SIZE" => {
                    let parsed = value.trim().parse::<f64>().ok().filter(|s| *s > 0.0);
                    let Some(parsed) = parsed else {
                        return Err(self.malformed(Malformed::InvalidAttribute {
                            element: "font",
                            attribute: "SIZE",
                            value,
                        }));
                    };
                    size = Some(parsed);
                }
                b"BOLD" => bold = value == "true",
                b"ITALIC" => italic = value == "true",
                _ => return Ok(None),
            }
        }
        let Some(name) = name else {
            return Err(self.malformed(Malformed::MissingAttribute {
                element: "font",
                attribute: "NAME",
            }));
        };
        let Some(size) = size else {
            return Err(self.malformed(Malformed::MissingAttribute {
                element: "font",
                attribute: "SIZE",
            }));
        };
        Ok(Some(Font {
            family: name,
            size,
            bold,
            italic,
        }))
    }

    /// The `BUILTIN` code of an `<icon>`, or `None` to keep it verbatim.
    fn icon(&self, e: &BytesStart<'_>) -> Result<Option<String>, DocumentError> {
        let mut code = None;
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            if attr.key.as_ref() != b"BUILTIN" {
                return Ok(None);
            }
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            code = Some(value.into_owned());
        }
        code.map(Some).ok_or_else(|| {
            self.malformed(Malformed::MissingAttribute {
                element: "icon",
                attribute: "BUILTIN",
            })
        })
    }

    /// Capture the source text of the item that started at `before`.
    ///
    /// For a start tag, `end` names the element and the reader skips to its matching end tag.
    fn fragment(
        &mut self,
        before: u64,
        end: Option<QName<'_>>,
    ) -> Result<RawFragment, DocumentError> {
        if let Some(end) = end {
            self.reader.read_to_end(end)?;
        }
        let after = self.reader.buffer_position();
        let raw = usize::try_from(before)
            .ok()
            .zip(usize::try_from(after).ok())
            .and_then(|(b, a)| self.source.get(b..a))
            .ok_or_else(|| self.malformed(Malformed::UnexpectedEof("node")))?;
        Ok(RawFragment(raw.trim_start().to_owned()))
    }
}

/// The unescaped value of attribute `key`, if present.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, DocumentError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn build(root: ParsedNode) -> Result<NodeTree, TreeError> {
    let mut tree = NodeTree::new(root.content);
    let id = tree.root();
    attach(&mut tree, id, root.children, true)?;
    Ok(tree)
}

fn attach(
    tree: &mut NodeTree,
    parent: NodeId,
    children: Vec<ParsedNode>,
    at_root: bool,
) -> Result<(), TreeError> {
    for child in children {
        let side = if at_root {
            child.position.unwrap_or_default()
        } else {
            Side::Right
        };
        let (id, _) = tree.push_child(parent, side, child.content)?;
        attach(tree, id, child.children, false)?;
    }
    Ok(())
}
