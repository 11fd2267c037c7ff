//! Golden vectors for the canonical writer.
//!
//! Each vector pairs a fragment built through the public API with the exact
//! text it must serialize to. Any change to these strings changes what
//! existing signatures were computed over.

use intelligible_core::{assemble, canonical_fragment, Element, SignatureBuilder, SoftwareSignature, Template};

use crate::fixtures::alice_elements;

/// A golden vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Builds the fragment under test.
    pub build: fn() -> Option<Element>,
    /// Expected canonical text.
    pub expected: &'static str,
}

fn software_signature() -> Option<Element> {
    SoftwareSignature::new("#issuerSoftware", "IntelligibleSuite@0.1.0", "ab12")
        .ok()
        .map(|s| s.to_element())
}

fn personal_signature() -> Option<Element> {
    SignatureBuilder::new("#alice", "Alice")
        .role("#receiverRole", "Receiver")
        .public_key("/keys/alice", "0xPUB")
        .timestamp("1700000000000")
        .signature("0xSIG")
        .build()
        .ok()
        .map(|s| s.to_element())
}

fn alice_block() -> Option<Element> {
    let doc = assemble(&Template::identity(), &alice_elements()).ok()?;
    doc.find_by_eid("tblock_1").cloned()
}

fn alice_references() -> Option<Element> {
    let doc = assemble(&Template::identity(), &alice_elements()).ok()?;
    doc.doc()?.child("meta")?.child("references").cloned()
}

fn escaped_paragraph() -> Option<Element> {
    Some(
        Element::new("p")
            .with_attr("title", "a \"b\" & c")
            .with_text("x < y & z"),
    )
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "software signature",
            build: software_signature,
            expected: concat!(
                "<signature>\n",
                "  <object eId=\"conclusion_signature_issuerSoftware_sw\" refersTo=\"#issuerSoftware\">IntelligibleSuite@0.1.0</object>\n",
                "  <digitalSignature eId=\"conclusion_signature_issuerSoftware_sw_signature\">ab12</digitalSignature>\n",
                "</signature>",
            ),
        },
        GoldenVector {
            name: "personal signature",
            build: personal_signature,
            expected: concat!(
                "<signature>\n",
                "  <person eId=\"conclusion_signature_alice_pers\" refersTo=\"#alice\">Alice</person>\n",
                "  <role eId=\"conclusion_signature_alice_pers_role\" refersTo=\"#receiverRole\">Receiver</role>\n",
                "  <publicKey eId=\"conclusion_signature_alice_pk\">\n",
                "    <ref eId=\"conclusion_signature_alice_pk_ref\" href=\"/keys/alice\">0xPUB</ref>\n",
                "  </publicKey>\n",
                "  <timestamp eId=\"conclusion_signature_alice_timestamp\" date=\"1700000000000\">1700000000000</timestamp>\n",
                "  <digitalSignature eId=\"conclusion_signature_alice_signature\">0xSIG</digitalSignature>\n",
                "</signature>",
            ),
        },
        GoldenVector {
            name: "numbered body block",
            build: alice_block,
            expected: concat!(
                "<tblock eId=\"tblock_1\">\n",
                "  <heading eId=\"tblock_1__heading\">Personal Information</heading>\n",
                "  <p eId=\"tblock_1__p_1\">\n",
                "    <name>Alice</name>\n",
                "    <email>a@x.com</email>\n",
                "  </p>\n",
                "</tblock>",
            ),
        },
        GoldenVector {
            name: "grouped references",
            build: alice_references,
            expected: concat!(
                "<references source=\"#issuerSoftware\">\n",
                "  <TLCPerson eId=\"#idIssuer\" href=\"/doc/alice\" showAs=\"Issuer\"/>\n",
                "</references>",
            ),
        },
        GoldenVector {
            name: "escaping",
            build: escaped_paragraph,
            expected: "<p title=\"a &quot;b&quot; &amp; c\">x &lt; y &amp; z</p>",
        },
    ]
}

/// Serialize every vector and compare with its expected text.
///
/// Returns `(name, matches, actual)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = (v.build)().map(|e| canonical_fragment(&e)).unwrap_or_default();
            (v.name.to_string(), actual == v.expected, actual)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelligible_core::parse_element;

    #[test]
    fn test_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{name}' serialized to:\n{actual}");
        }
    }

    #[test]
    fn test_vectors_parse_back() {
        for vector in all_vectors() {
            let built = (vector.build)().unwrap();
            let parsed = parse_element(vector.expected).unwrap();
            assert_eq!(parsed, built, "vector '{}' did not parse back", vector.name);
        }
    }
}
