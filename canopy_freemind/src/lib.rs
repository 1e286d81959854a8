// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy FreeMind: read and write `.mm` mind-map documents.
//!
//! [`read_document`] turns FreeMind XML into a [`canopy_tree::NodeTree`], interpreting node
//! text, folding, root-side placement, fonts and icons. Everything else (rich content,
//! edges, clouds, hooks, unknown attributes, map-level registries) is kept verbatim so that
//! [`write_document`] can emit it again unchanged.
//!
//! ```
//! use canopy_freemind::{read_document, write_document};
//!
//! let source = "<map version=\"0.9.0\">\n\
//!               <node TEXT=\"Root\">\n\
//!               <node TEXT=\"Left\" POSITION=\"left\"/>\n\
//!               </node>\n\
//!               </map>\n";
//! let document = read_document(source).unwrap();
//! let root = document.tree.node(document.tree.root()).unwrap();
//! assert_eq!(root.left_children().len(), 1);
//! assert_eq!(write_document(&document), source);
//! ```
//!
//! The writer is canonical rather than byte-preserving: documents it produced read back and
//! write out identically, while hand-written input is normalized (attribute order,
//! whitespace, `POSITION="right"`).

mod error;
mod read;
mod write;

use canopy_tree::{NodeTree, RawFragment};

pub use error::{DocumentError, Malformed};
pub use read::read_document;
pub use write::{WRITTEN_VERSION, write_document};

/// A parsed mind map.
#[derive(Debug)]
pub struct Document {
    /// The `version` declared on `<map>`.
    pub version: String,
    /// The node tree.
    pub tree: NodeTree,
    /// Map-level elements after the root node, kept verbatim.
    pub map_extras: Vec<RawFragment>,
}

impl Document {
    /// A document holding `tree`, stamped with the version the writer emits.
    pub fn new(tree: NodeTree) -> Self {
        Self {
            version: WRITTEN_VERSION.to_owned(),
            tree,
            map_extras: Vec::new(),
        }
    }
}
