// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_tree::{Font, NodeId, NodeTree, Side};
use log::debug;
use quick_xml::escape::escape;

use crate::Document;

/// Version written on every `<map>`.
pub const WRITTEN_VERSION: &str = "0.9.0";

/// Serialize a document in canonical form.
///
/// One element per line without indentation. Node attributes come in the order `TEXT`,
/// `FOLDED`, `POSITION`, then the preserved ones. A preserved attribute that reuses one
/// of the three interpreted names is skipped. Inside a node the font comes first, then
/// icons, preserved fragments, right children and left children.
pub fn write_document(document: &Document) -> String {
    let mut out = String::new();
    out.push_str(&format!("<map version=\"{WRITTEN_VERSION}\">\n"));
    write_node(&mut out, &document.tree, document.tree.root(), None);
    for extra in &document.map_extras {
        out.push_str(extra.as_str());
        out.push('\n');
    }
    out.push_str("</map>\n");
    debug!(
        nodes = document.tree.node_count(),
        bytes = out.len();
        "Wrote FreeMind document"
    );
    out
}

/// `side` is `Some` only for direct children of the root.
fn write_node(out: &mut String, tree: &NodeTree, id: NodeId, side: Option<Side>) {
    let Some(node) = tree.node(id) else {
        return;
    };
    out.push_str("<node");
    push_attribute(out, "TEXT", node.text());
    if node.is_folded() {
        push_attribute(out, "FOLDED", "true");
    }
    if side == Some(Side::Left) {
        push_attribute(out, "POSITION", "left");
    }
    for (key, value) in node.attributes() {
        if !matches!(key.as_str(), "TEXT" | "FOLDED" | "POSITION") {
            push_attribute(out, key, value);
        }
    }

    let has_body = node.font().is_some()
        || !node.icons().is_empty()
        || !node.unsupported().is_empty()
        || !node.is_leaf();
    if !has_body {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    if let Some(font) = node.font() {
        write_font(out, font);
    }
    for icon in node.icons() {
        out.push_str("<icon");
        push_attribute(out, "BUILTIN", icon);
        out.push_str("/>\n");
    }
    for fragment in node.unsupported() {
        out.push_str(fragment.as_str());
        out.push('\n');
    }
    let at_root = tree.is_root(id);
    for &child in node.children() {
        write_node(out, tree, child, at_root.then_some(Side::Right));
    }
    for &child in node.left_children() {
        write_node(out, tree, child, Some(Side::Left));
    }
    out.push_str("</node>\n");
}

fn write_font(out: &mut String, font: &Font) {
    out.push_str("<font");
    push_attribute(out, "NAME", &font.family);
    push_attribute(out, "SIZE", &font.size.to_string());
    if font.bold {
        push_attribute(out, "BOLD", "true");
    }
    if font.italic {
        push_attribute(out, "ITALIC", "true");
    }
    out.push_str("/>\n");
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value).replace('\n', "&#xa;"));
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_tree::{NodeContent, RawFragment};

    #[test]
    fn canonical_layout() {
        let mut tree = NodeTree::new(NodeContent::new("Root"));
        let root = tree.root();
        let (a, _) = tree.push_child(root, Side::Right, NodeContent::new("A")).unwrap();
        tree.push_child(root, Side::Left, NodeContent::new("B")).unwrap();
        tree.push_child(a, Side::Right, NodeContent::new("A1")).unwrap();
        tree.set_folded(a, true).unwrap();
        tree.set_font(a, Some(Font::new("Serif", 12.5))).unwrap();
        tree.set_icons(a, vec!["idea".to_owned()]).unwrap();

        let doc = Document {
            version: "0.9.0".to_owned(),
            tree,
            map_extras: vec![RawFragment("<attribute_registry/>".to_owned())],
        };
        let expected = "<map version=\"0.9.0\">\n\
                        <node TEXT=\"Root\">\n\
                        <node TEXT=\"A\" FOLDED=\"true\">\n\
                        <font NAME=\"Serif\" SIZE=\"12.5\"/>\n\
                        <icon BUILTIN=\"idea\"/>\n\
                        <node TEXT=\"A1\"/>\n\
                        </node>\n\
                        <node TEXT=\"B\" POSITION=\"left\"/>\n\
                        </node>\n\
                        <attribute_registry/>\n\
                        </map>\n";
        assert_eq!(write_document(&doc), expected);
    }

    #[test]
    fn interpreted_names_are_not_written_twice() {
        let mut tree = NodeTree::new(NodeContent::new("Root"));
        let root = tree.root();
        let (b, _) = tree.push_child(root, Side::Left, NodeContent::new("B")).unwrap();
        let preserved = ["TEXT", "FOLDED", "POSITION", "ID"]
            .map(|key| (key.to_owned(), "x".to_owned()))
            .to_vec();
        tree.set_attributes(b, preserved).unwrap();
        let doc = Document {
            version: "0.9.0".to_owned(),
            tree,
            map_extras: Vec::new(),
        };
        let written = write_document(&doc);
        assert!(
            written.contains("<node TEXT=\"B\" POSITION=\"left\" ID=\"x\"/>\n"),
            "{written}"
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let mut out = String::new();
        push_attribute(&mut out, "TEXT", "a<b & \"c\"\nd");
        assert_eq!(out, " TEXT=\"a&lt;b &amp; &quot;c&quot;&#xa;d\"");
    }
}
