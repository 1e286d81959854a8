// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Round-trip tests for the FreeMind reader and writer.
//!
//! 1. Canonical documents survive `write(read(doc))` byte for byte.
//! 2. Unsupported elements come back unchanged from hand-written input.
//! 3. A deep node moved under the root keeps its new side through `read(write(doc))`.
//! 4. Generated trees survive `read(write(tree))` with identical content and shape.

use canopy_freemind::{Document, read_document, write_document};
use canopy_tree::{Direction, Font, NodeContent, NodeId, NodeTree, Side};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Content and shape of the subtree at `id`, with the side of root children.
fn shape(tree: &NodeTree, id: NodeId) -> String {
    let node = tree.node(id).unwrap();
    let mut out = format!("{:?}(", node.content());
    for side in [Side::Right, Side::Left] {
        for &child in tree.children_of(id, side) {
            out.push_str(&format!("{side:?}:{}", shape(tree, child)));
        }
    }
    out.push(')');
    out
}

#[derive(Clone, Debug)]
struct NodePlan {
    parent: usize,
    left: bool,
    text: String,
    folded: bool,
    bold: bool,
    icons: Vec<String>,
}

fn plan_strategy() -> impl Strategy<Value = NodePlan> {
    (
        any::<usize>(),
        any::<bool>(),
        "[a-zA-Z0-9 <>&\"'\n]{0,24}",
        any::<bool>(),
        prop::option::of(any::<bool>()),
        prop::collection::vec("[a-z-]{1,8}", 0..3),
    )
        .prop_map(|(parent, left, text, folded, bold, icons)| NodePlan {
            parent,
            left,
            text,
            folded,
            bold: bold.unwrap_or(false),
            icons,
        })
}

fn build(plans: &[NodePlan]) -> NodeTree {
    let mut tree = NodeTree::new(NodeContent::new("Root"));
    let mut ids = vec![tree.root()];
    for plan in plans {
        let parent = ids[plan.parent % ids.len()];
        let side = if plan.left && tree.is_root(parent) {
            Side::Left
        } else {
            Side::Right
        };
        let mut content = NodeContent::new(plan.text.clone());
        content.folded = plan.folded;
        content.icons = plan.icons.clone();
        if plan.bold {
            let mut font = Font::new("SansSerif", 12.0);
            font.bold = true;
            content.font = Some(font);
        }
        let (id, _) = tree.push_child(parent, side, content).unwrap();
        ids.push(id);
    }
    tree
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Canonical documents are fixed points
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn canonical_document_is_a_fixed_point() {
    let source = "<map version=\"0.9.0\">\n\
                  <node TEXT=\"Central&#xa;topic\" ID=\"ID_0\" CREATED=\"1700000000000\">\n\
                  <font NAME=\"Serif\" SIZE=\"18\" BOLD=\"true\"/>\n\
                  <icon BUILTIN=\"idea\"/>\n\
                  <edge STYLE=\"bezier\"/>\n\
                  <node TEXT=\"Right &amp; more\" FOLDED=\"true\">\n\
                  <node TEXT=\"Hidden\"/>\n\
                  </node>\n\
                  <node TEXT=\"Left\" POSITION=\"left\">\n\
                  <richcontent TYPE=\"NOTE\"><html><body><p>note</p></body></html></richcontent>\n\
                  </node>\n\
                  </node>\n\
                  <attribute_registry SHOW_ATTRIBUTES=\"hide\"/>\n\
                  </map>\n";
    let document = read_document(source).unwrap();
    assert_eq!(write_document(&document), source);
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Unsupported elements survive normalization
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn unsupported_elements_survive_hand_written_input() {
    let fragments = [
        "<cloud COLOR=\"#f0f0f0\"/>",
        "<hook NAME=\"accessories/plugins/NodeNote.properties\">\n    <text>remember</text>\n  </hook>",
        "<!-- keep me -->",
        "<arrowlink DESTINATION=\"ID_2\" ENDARROW=\"Default\"/>",
    ];
    let source = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <map version=\"0.8.1\">\n  <node TEXT=\"Root\">\n  {}\n  {}\n  \
         <node TEXT=\"Child\" POSITION=\"right\">\n  {}\n  {}\n  </node>\n  </node>\n</map>",
        fragments[0], fragments[1], fragments[2], fragments[3]
    );
    let document = read_document(&source).unwrap();
    assert_eq!(document.version, "0.8.1");
    let written = write_document(&document);
    for fragment in fragments {
        assert!(written.contains(fragment), "{fragment} missing from:\n{written}");
    }
    assert!(!written.contains("POSITION=\"right\""), "right is the default side");

    let reread = read_document(&written).unwrap();
    assert_eq!(
        shape(&reread.tree, reread.tree.root()),
        shape(&document.tree, document.tree.root())
    );
    assert_eq!(write_document(&reread), written);
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Nodes moved under the root keep their side
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn moved_node_keeps_its_side_after_round_trip() {
    let source = "<map version=\"0.9.0\">\
                  <node TEXT=\"r\">\
                  <node TEXT=\"a\"><node TEXT=\"deep\" POSITION=\"left\"/></node>\
                  </node>\
                  </map>";
    for side in [Side::Right, Side::Left] {
        let mut document = read_document(source).unwrap();
        let root = document.tree.root();
        let a = document.tree.children_of(root, Side::Right)[0];
        let deep = document.tree.children_of(a, Side::Right)[0];
        assert!(document.tree.node(deep).unwrap().attributes().is_empty());
        document.tree.move_nodes(&[deep], root, Direction::Child(side)).unwrap();
        assert_eq!(document.tree.side_of(deep), Some(side));

        let written = write_document(&document);
        for line in written.lines() {
            let count = line.matches("POSITION=").count();
            assert!(count <= 1, "{side:?}: repeated POSITION in {line}");
        }
        let reread = read_document(&written).unwrap();
        let tree = &reread.tree;
        let moved: Vec<_> = tree
            .children_of(tree.root(), side)
            .iter()
            .filter(|&&id| tree.node(id).unwrap().text() == "deep")
            .collect();
        assert_eq!(moved.len(), 1, "{side:?}: deep node not found on its side in:\n{written}");
        assert_eq!(
            shape(tree, tree.root()),
            shape(&document.tree, document.tree.root()),
            "{side:?}"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Generated trees
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn generated_trees_round_trip(plans in prop::collection::vec(plan_strategy(), 0..24)) {
        let tree = build(&plans);
        let expected = shape(&tree, tree.root());
        let document = Document::new(tree);

        let written = write_document(&document);
        let reread = read_document(&written).unwrap();
        prop_assert_eq!(shape(&reread.tree, reread.tree.root()), expected);
        prop_assert_eq!(write_document(&reread), written);
    }
}
