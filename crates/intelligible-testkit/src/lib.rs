//! # Intelligible Testkit
//!
//! Testing utilities for Intelligible documents.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fragments with their exact canonical text
//! - **Generators**: Proptest strategies for document input
//! - **Fixtures**: Sample identity and certificate parties, and an issuer
//!   backed by a memory store
//!
//! ## Golden Vectors
//!
//! The canonical text is what gets signed, so it must never drift:
//!
//! ```rust
//! use intelligible_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, _) in verify_all_vectors() {
//!     assert!(matches, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use intelligible_core::{assemble, Template};
//! use intelligible_testkit::generators::document_elements;
//!
//! proptest! {
//!     #[test]
//!     fn assembly_is_deterministic(elements in document_elements()) {
//!         let a = assemble(&Template::identity(), &elements).unwrap();
//!         let b = assemble(&Template::identity(), &elements).unwrap();
//!         prop_assert_eq!(a.finalize(), b.finalize());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use intelligible_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let software = fixture.issuer.software();
//! assert_eq!(software.eid, "#issuerSoftware");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{alice_elements, TestFixture};
pub use generators::document_elements;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
