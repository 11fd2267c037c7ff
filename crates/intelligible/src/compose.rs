//! Shared pieces of the identity and certificate layouts.

use intelligible_core::{DocumentElements, Identification, ReferenceId};
use serde_json::{json, Map, Value};

use crate::party::Party;

/// FRBR blocks for a work published at `work` with its expression at
/// `expression`. Entries in `overrides` replace the generated ones.
pub(crate) fn frbr_identification(
    work: &str,
    expression: &str,
    date: &str,
    author: &ReferenceId,
    overrides: &Identification,
) -> Identification {
    let level = |this: String, uri: String| {
        let mut block = Map::new();
        block.insert("FRBRthis".into(), json!({ "@value": this }));
        block.insert("FRBRuri".into(), json!({ "@value": uri }));
        block.insert("FRBRdate".into(), json!({ "@date": date }));
        block.insert("FRBRauthor".into(), json!({ "@href": author.as_str() }));
        block
    };

    let mut identification = Identification {
        frbr_work: level(format!("{work}/!main"), format!("{work}/")),
        frbr_expression: level(format!("{expression}/!main"), format!("{expression}/")),
        frbr_manifestation: level(
            format!("{expression}/!main.xml"),
            format!("{expression}.akn"),
        ),
    };
    for (target, source) in [
        (&mut identification.frbr_work, &overrides.frbr_work),
        (&mut identification.frbr_expression, &overrides.frbr_expression),
        (&mut identification.frbr_manifestation, &overrides.frbr_manifestation),
    ] {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    identification
}

/// A body mention of `party`: `{"@eId", "@refersTo", "#": name}`.
pub(crate) fn mention(eid: &str, party: &Party) -> Value {
    json!({
        "@eId": eid,
        "@refersTo": party.eid.as_str(),
        "#": party.name,
    })
}

/// One entry of the identities paragraph: a party and the role it acts in.
///
/// The role mention's eId is the party mention's with `_role` appended.
pub(crate) fn party_block(block_eid: &str, mention_eid: &str, party: &Party, role: &Party) -> Value {
    let party_mention = mention(mention_eid, party);
    let role_mention = mention(&format!("{mention_eid}_role"), role);

    let mut block = Map::new();
    block.insert("@eId".into(), Value::String(block_eid.into()));
    match party.kind.body_tag() {
        "role" => {
            block.insert("role".into(), json!([party_mention, role_mention]));
        }
        tag => {
            block.insert(tag.into(), party_mention);
            block.insert("role".into(), role_mention);
        }
    }
    Value::Object(block)
}

/// Declare `parties` as references, under the given keys, in order.
pub(crate) fn with_references<'a>(
    elements: DocumentElements,
    parties: impl IntoIterator<Item = (&'a str, &'a Party)>,
) -> DocumentElements {
    parties
        .into_iter()
        .fold(elements, |elements, (key, party)| {
            elements.reference(key, party.to_reference())
        })
}

/// Reference key for a party outside the fixed slots.
pub(crate) fn other_key(party: &Party) -> String {
    party.eid.stem().to_string()
}
