// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_tree::TreeError;
use thiserror::Error;

/// Why a document could not be read.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The XML is well formed but is not a mind map this reader understands.
    #[error("malformed document at byte {position}: {reason}")]
    MalformedDocument {
        /// What is wrong.
        reason: Malformed,
        /// Byte offset into the source where the problem was noticed.
        position: u64,
    },
    /// The input is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Building the tree failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// The specific way a document is malformed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Malformed {
    /// The input contains no elements.
    #[error("the document is empty")]
    Empty,
    /// The outermost element is not `<map>`.
    #[error("expected <map> as the root element, found <{0}>")]
    WrongRootElement(String),
    /// A required attribute is absent.
    #[error("<{element}> is missing the {attribute} attribute")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },
    /// An attribute holds a value outside its domain.
    #[error("invalid value {value:?} for {attribute} on <{element}>")]
    InvalidAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// The offending value.
        value: String,
    },
    /// The map declares a schema version this reader does not accept.
    #[error("unsupported map version {0:?}")]
    UnsupportedVersion(String),
    /// The map contains no `<node>`.
    #[error("the map has no root node")]
    MissingRootNode,
    /// The map contains more than one top-level `<node>`.
    #[error("the map has more than one root node")]
    MultipleRootNodes,
    /// Input ended before the element was closed.
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(&'static str),
}
