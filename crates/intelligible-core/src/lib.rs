//! # Intelligible Core
//!
//! Pure primitives for building Akoma Ntoso and metadata documents: the
//! element tree, the template store, the assembler, signatures, the canonical
//! serializer and parser, and identifier lookup.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`DocumentElements`] - Caller input: identification, references, preface, body blocks
//! - [`Template`] - The fixed skeleton a document is built on
//! - [`Document`] - An assembled or parsed document with its conclusions held apart
//! - [`SignatureEntry`] - A personal or software signature in the conclusions
//! - [`Element`] - A node of the tree, convertible to and from object notation
//!
//! ## Flow
//!
//! ```text
//! DocumentElements -> assemble -> Document -> finalize_no_conclusions -> (sign)
//!                                         -> add_signature / add_sw_signature
//!                                         -> finalize -> text -> Document::parse
//! ```
//!
//! Serialized text is deterministic. See [`canonical`].

pub mod assemble;
pub mod canonical;
pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod locate;
pub mod parse;
pub mod signature;
pub mod template;
pub mod token;
pub mod tree;
pub mod types;
pub mod validation;

pub use assemble::assemble;
pub use canonical::{canonical_fragment, canonical_xml};
pub use config::{DocumentConfig, DocumentKind, DuplicateSignaturePolicy};
pub use document::Document;
pub use elements::{BodyBlock, DocumentElements, Identification, OrderedMap, Reference, ResolvedReference};
pub use error::{DocumentError, ParseError};
pub use locate::{descendants, find_by_eid};
pub use parse::parse_element;
pub use signature::{PersonalSignature, SignatureBuilder, SignatureEntry, SoftwareSignature};
pub use template::Template;
pub use token::TokenRef;
pub use tree::{Element, Node};
pub use types::{ReferenceId, ReferenceType};
pub use validation::{validate_elements, duplicate_eids};

/// Result type for document building.
pub type Result<T> = std::result::Result<T, DocumentError>;
