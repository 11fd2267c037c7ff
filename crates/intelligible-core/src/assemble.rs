//! Document assembler: merges caller elements into a fresh skeleton.

use serde_json::{Map, Value};

use crate::document::Document;
use crate::elements::{BodyBlock, DocumentElements, Identification, OrderedMap, Reference};
use crate::error::DocumentError;
use crate::template::Template;
use crate::tree::Element;
use crate::validation::validate_elements;

/// Build a document from `elements` on a fresh copy of `template`.
///
/// Input is validated before anything is built, so a failure never leaves a
/// partial document. Same input, same output.
pub fn assemble(template: &Template, elements: &DocumentElements) -> Result<Document, DocumentError> {
    validate_elements(elements)?;

    let mut doc = template.doc_skeleton();
    merge_identification(&mut doc, &elements.identification)?;
    group_references(&mut doc, &elements.references)?;
    section(&mut doc, "/preface/longTitle")?
        .insert("p".into(), Value::String(elements.preface_title.clone()));
    number_blocks(&mut doc, &elements.main_body)?;

    let mut root = template.root_element();
    for element in Element::from_object("doc", &doc)? {
        root.push_child(element);
    }
    let config = template.config();
    Ok(Document::new(config.kind, root, config.duplicate_signatures))
}

fn section<'a>(doc: &'a mut Value, pointer: &str) -> Result<&'a mut Map<String, Value>, DocumentError> {
    doc.pointer_mut(pointer)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| DocumentError::fragment(pointer, "missing from template"))
}

/// Shallow key-by-key merge: for a key the template already has, the
/// caller's attributes extend the template's and win on conflict; new keys
/// are appended as given.
fn merge_identification(doc: &mut Value, identification: &Identification) -> Result<(), DocumentError> {
    for (block, fragments) in identification.blocks() {
        let target = section(doc, &format!("/meta/identification/{block}"))?;
        for (key, fragment) in fragments {
            match (target.get_mut(key), fragment) {
                (Some(Value::Object(existing)), Value::Object(overrides)) => {
                    for (k, v) in overrides {
                        existing.insert(k.clone(), v.clone());
                    }
                }
                _ => {
                    target.insert(key.clone(), fragment.clone());
                }
            }
        }
    }
    Ok(())
}

/// Group references by type tag, keeping declaration order within a group.
fn group_references(doc: &mut Value, references: &OrderedMap<Reference>) -> Result<(), DocumentError> {
    let target = section(doc, "/meta/references")?;
    for (name, reference) in references.iter() {
        let resolved = reference.resolve(name)?;
        let mut entry = Map::new();
        entry.insert("@eId".into(), Value::String(resolved.eid));
        entry.insert("@href".into(), Value::String(resolved.href));
        entry.insert("@showAs".into(), Value::String(resolved.show_as));

        let group = target
            .entry(resolved.kind.tag())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = group {
            items.push(Value::Object(entry));
        }
    }
    Ok(())
}

/// One `tblock` per body block, numbered from 1 in declaration order.
fn number_blocks(doc: &mut Value, blocks: &OrderedMap<BodyBlock>) -> Result<(), DocumentError> {
    let tblocks: Vec<Value> = blocks
        .iter()
        .enumerate()
        .map(|(i, (_, block))| tblock(i + 1, block))
        .collect();
    section(doc, "/mainBody")?.insert("tblock".into(), Value::Array(tblocks));
    Ok(())
}

fn tblock(n: usize, block: &BodyBlock) -> Value {
    let mut heading = Map::new();
    heading.insert("@eId".into(), Value::String(format!("tblock_{n}__heading")));
    heading.insert("#".into(), Value::String(block.block_title.clone()));

    // the paragraph eId is positional; a caller-supplied one is ignored
    let mut p = Map::new();
    p.insert("@eId".into(), Value::String(format!("tblock_{n}__p_{n}")));
    for (k, v) in &block.p {
        if k != "@eId" {
            p.insert(k.clone(), v.clone());
        }
    }

    let mut tblock = Map::new();
    tblock.insert("@eId".into(), Value::String(format!("tblock_{n}")));
    tblock.insert("heading".into(), Value::Object(heading));
    tblock.insert("p".into(), Value::Object(p));
    Value::Object(tblock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentKind;
    use crate::locate::find_by_eid;
    use crate::types::ReferenceType;
    use serde_json::json;

    fn alice_elements() -> DocumentElements {
        DocumentElements::new("Alice Identity")
            .reference(
                "idIssuer",
                Reference::new("/doc/alice")
                    .with_kind(ReferenceType::Person)
                    .with_show_as("Issuer"),
            )
            .block(
                "information",
                BodyBlock::new("Personal Information")
                    .field("name", "Alice")
                    .field("email", "a@x.com"),
            )
    }

    fn doc_of(document: &Document) -> &Element {
        document.doc().unwrap()
    }

    #[test]
    fn test_alice_scenario() {
        let document = assemble(&Template::identity(), &alice_elements()).unwrap();
        let text = document.finalize();

        assert!(text.contains("<p>Alice Identity</p>"));
        assert!(text.contains(
            r##"<TLCPerson eId="#idIssuer" href="/doc/alice" showAs="Issuer"/>"##
        ));

        let tblock = find_by_eid(document.root(), "tblock_1").unwrap();
        assert_eq!(tblock.child("heading").unwrap().text(), "Personal Information");
        let p = tblock.child("p").unwrap();
        assert_eq!(p.eid(), Some("tblock_1__p_1"));
        assert_eq!(p.child("name").unwrap().text(), "Alice");
        assert_eq!(p.child("email").unwrap().text(), "a@x.com");

        let references = doc_of(&document).child("meta").unwrap().child("references").unwrap();
        assert_eq!(references.children_named("TLCPerson").count(), 1);
    }

    #[test]
    fn test_section_order() {
        let document = assemble(&Template::identity(), &alice_elements()).unwrap();
        let sections: Vec<_> = doc_of(&document).elements().map(|e| e.name.as_str()).collect();
        assert_eq!(sections, vec!["meta", "preface", "mainBody"]);
        assert_eq!(doc_of(&document).attr("name"), Some("identity"));
    }

    #[test]
    fn test_reference_defaults_and_grouping() {
        let elements = DocumentElements::new("t")
            .reference("bob", Reference::new("/bob").with_kind(ReferenceType::Person))
            .reference("acme", Reference::new("/acme").with_kind(ReferenceType::Organization))
            .reference("carol", Reference::new("/carol").with_kind(ReferenceType::Person))
            .reference("thing", Reference::new("/thing"));
        let document = assemble(&Template::identity(), &elements).unwrap();
        let references = doc_of(&document).child("meta").unwrap().child("references").unwrap();

        let people: Vec<_> = references
            .children_named("TLCPerson")
            .filter_map(Element::eid)
            .collect();
        assert_eq!(people, vec!["#bob", "#carol"]);

        let thing = references.child("TLCReference").unwrap();
        assert_eq!(thing.eid(), Some("#thing"));
        assert_eq!(thing.attr("showAs"), Some("thing"));

        let tags: Vec<_> = references.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(tags, vec!["TLCPerson", "TLCPerson", "TLCOrganization", "TLCReference"]);
    }

    #[test]
    fn test_missing_href_fails() {
        let elements = alice_elements().reference("someRef", Reference::default());
        assert!(matches!(
            assemble(&Template::identity(), &elements),
            Err(DocumentError::MissingRequiredField { ref field, .. }) if field == "href"
        ));
    }

    #[test]
    fn test_identification_merge() {
        let elements = alice_elements()
            .frbr_work("FRBRthis", json!({"@value": "/akn/eu/doc/x/!main"}))
            .frbr_work("FRBRnumber", json!({"@value": "7"}))
            .frbr_manifestation("FRBRdate", json!({"@date": "2024-01-01", "@extra": "y"}));
        let document = assemble(&Template::identity(), &elements).unwrap();
        let identification = doc_of(&document)
            .child("meta")
            .unwrap()
            .child("identification")
            .unwrap();

        let work = identification.child("FRBRWork").unwrap();
        let this = work.child("FRBRthis").unwrap();
        assert_eq!(this.eid(), Some("frbrwork__frbrthis"));
        assert_eq!(this.attr("value"), Some("/akn/eu/doc/x/!main"));
        assert_eq!(work.elements().last().unwrap().name, "FRBRnumber");

        let date = identification
            .child("FRBRManifestation")
            .unwrap()
            .child("FRBRdate")
            .unwrap();
        assert_eq!(
            date.attributes,
            vec![
                ("eId".to_string(), "frbrmanifestation__frbrdate_1".to_string()),
                ("date".to_string(), "2024-01-01".to_string()),
                ("name".to_string(), "instantiation".to_string()),
                ("extra".to_string(), "y".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_numbering() {
        let elements = DocumentElements::new("t")
            .block("a", BodyBlock::new("A"))
            .block("b", BodyBlock::new("B").field("@eId", "ignored"))
            .block("c", BodyBlock::new("C"));
        let document = assemble(&Template::identity(), &elements).unwrap();

        for n in 1..=3 {
            assert!(document.find_by_eid(&format!("tblock_{n}")).is_some());
            assert!(document.find_by_eid(&format!("tblock_{n}__heading")).is_some());
            assert!(document.find_by_eid(&format!("tblock_{n}__p_{n}")).is_some());
        }
        assert!(document.find_by_eid("ignored").is_none());
        assert_eq!(document.value_by_eid("tblock_2__heading").as_deref(), Some("B"));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let template = Template::identity();
        let a = assemble(&template, &alice_elements()).unwrap();
        let b = assemble(&template, &alice_elements()).unwrap();
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_metadata_kind() {
        let template = Template::certificate().with_kind(DocumentKind::Metadata);
        let document = assemble(&template, &alice_elements()).unwrap();
        assert_eq!(document.root().name, "metaDoc");
        assert!(document.finalize().starts_with("<?xml version=\"1.0\"?>\n<metaDoc>"));
    }
}
