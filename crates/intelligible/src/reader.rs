//! Reading assembled identity and certificate documents back.
//!
//! Everything is found through eIds: `tblock_{n}__p_{n}` for paragraphs,
//! then each mention's `refersTo` for its reference entry.

use intelligible_core::{BodyBlock, Document, Element, Identification, OrderedMap};
use serde_json::Value;

use crate::error::{IntelligibleError, Result};
use crate::party::Party;

fn malformed(what: impl std::fmt::Display) -> IntelligibleError {
    IntelligibleError::MalformedDocument(what.to_string())
}

/// The paragraph of the `n`th body block.
pub(crate) fn paragraph(doc: &Document, n: usize) -> Result<&Element> {
    let eid = format!("tblock_{n}__p_{n}");
    doc.find_by_eid(&eid)
        .ok_or_else(|| malformed(format!("no paragraph {eid}")))
}

pub(crate) fn child_text(parent: &Element, name: &str) -> Result<String> {
    parent
        .child(name)
        .map(Element::text)
        .ok_or_else(|| malformed(format!("no {name} in {}", parent.eid().unwrap_or(parent.name.as_str()))))
}

/// The FRBR blocks as written, in object notation.
pub(crate) fn identification(doc: &Document) -> Result<Identification> {
    let section = doc
        .doc()
        .and_then(|d| d.child("meta"))
        .and_then(|m| m.child("identification"))
        .ok_or_else(|| malformed("no identification section"))?;

    let block = |name: &str| match section.child(name).map(Element::to_object) {
        Some(Value::Object(map)) => map,
        _ => Default::default(),
    };
    Ok(Identification {
        frbr_work: block("FRBRWork"),
        frbr_expression: block("FRBRExpression"),
        frbr_manifestation: block("FRBRManifestation"),
    })
}

/// Resolve a body mention to the party it refers to.
pub(crate) fn mentioned_party(doc: &Document, mention: &Element) -> Result<Party> {
    let target = mention
        .attr("refersTo")
        .ok_or_else(|| malformed(format!("{} has no refersTo", mention.name)))?;
    let reference = doc
        .find_by_eid(target)
        .ok_or_else(|| malformed(format!("no reference {target}")))?;
    Party::from_reference_element(reference, mention.text())
        .ok_or_else(|| malformed(format!("{target} is not a reference entry")))
}

/// A party and the role it acts in, as mentioned in one identities block.
#[derive(Debug)]
pub(crate) struct PartyBlock {
    pub eid: String,
    pub party: Party,
    pub role: Party,
}

/// Every block of the identities paragraph (body block `n`). Entries
/// written as `mod` rather than `block` are read the same way.
pub(crate) fn party_blocks(doc: &Document, n: usize) -> Result<Vec<PartyBlock>> {
    let p = paragraph(doc, n)?;
    p.elements()
        .filter(|e| e.name == "block" || e.name == "mod")
        .map(|block| {
            let eid = block.eid().unwrap_or_default().to_string();
            let mut mentions = block.elements().filter(|e| e.attr("refersTo").is_some());
            let (party, role) = match (mentions.next(), mentions.next()) {
                (Some(party), Some(role)) => (party, role),
                _ => return Err(malformed(format!("block {eid} needs a party and a role"))),
            };
            Ok(PartyBlock {
                party: mentioned_party(doc, party)?,
                role: mentioned_party(doc, role)?,
                eid,
            })
        })
        .collect()
}

/// Take the block for `slot` out of `blocks`: the one whose eId is
/// `identities_block_{slot}` (or `identities_mod_{slot}`). Older documents
/// repeat an earlier slot's eIds on the last entry, so when nothing matches
/// the first block left over is taken.
pub(crate) fn take_block(blocks: &mut Vec<PartyBlock>, slot: &str) -> Result<PartyBlock> {
    if blocks.is_empty() {
        return Err(malformed(format!("no identities block for {slot}")));
    }
    let index = blocks
        .iter()
        .position(|b| {
            ["identities_block_", "identities_mod_"]
                .iter()
                .any(|prefix| b.eid.strip_prefix(prefix) == Some(slot))
        })
        .unwrap_or(0);
    Ok(blocks.remove(index))
}

/// Reference entries not claimed by any of `known`. Their names are not
/// mentioned anywhere, so `showAs` stands in.
pub(crate) fn other_parties(doc: &Document, known: &[&Party]) -> Vec<Party> {
    let Some(references) = doc
        .doc()
        .and_then(|d| d.child("meta"))
        .and_then(|m| m.child("references"))
    else {
        return Vec::new();
    };
    references
        .elements()
        .filter(|e| !known.iter().any(|p| Some(p.eid.as_str()) == e.eid()))
        .filter_map(|e| {
            let name = e.attr("showAs").unwrap_or_default().to_string();
            Party::from_reference_element(e, name)
        })
        .collect()
}

/// Body blocks from `first` onwards, keyed by their tblock eId.
pub(crate) fn additional_blocks(doc: &Document, first: usize) -> OrderedMap<BodyBlock> {
    let mut blocks = OrderedMap::new();
    for n in first.. {
        let Some(tblock) = doc.find_by_eid(&format!("tblock_{n}")) else {
            break;
        };
        let title = tblock.child("heading").map(Element::text).unwrap_or_default();
        let mut block = BodyBlock::new(title);
        if let Some(Value::Object(p)) = tblock.child("p").map(Element::to_object) {
            block.p = p.into_iter().filter(|(k, _)| k != "@eId").collect();
        }
        blocks.insert(format!("tblock_{n}"), block);
    }
    blocks
}
