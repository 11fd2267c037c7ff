//! Template store: the fixed document skeleton.
//!
//! The skeleton is rebuilt on every call, so produced documents never share
//! state with each other or with the template.

use serde_json::{json, Map, Value};

use crate::config::{DocumentConfig, DocumentKind};
use crate::tree::Element;

/// eId of the conclusions section.
pub const CONCLUSIONS_EID: &str = "conclusions";

/// A document template: configuration plus the skeleton it produces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    config: DocumentConfig,
}

impl Template {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Template for identity documents.
    pub fn identity() -> Self {
        Self::new(DocumentConfig::default().with_doc_name("identity"))
    }

    /// Template for certificate documents.
    pub fn certificate() -> Self {
        Self::new(DocumentConfig::default().with_doc_name("certificate"))
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.config.kind = kind;
        self
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn kind(&self) -> DocumentKind {
        self.config.kind
    }

    /// The empty root element, namespace attributes included.
    pub fn root_element(&self) -> Element {
        let kind = self.config.kind;
        kind.root_attributes()
            .iter()
            .fold(Element::new(kind.root_tag()), |root, (k, v)| {
                root.with_attr(*k, *v)
            })
    }

    /// The `doc` section in object notation, with placeholder values.
    pub fn doc_skeleton(&self) -> Value {
        let with_components = self.config.kind == DocumentKind::Akn;
        json!({
            "@name": self.config.doc_name,
            "@contains": "originalVersion",
            "meta": {
                "identification": {
                    "@source": self.config.source,
                    "FRBRWork": frbr_block(FrbrLevel::Work, with_components),
                    "FRBRExpression": frbr_block(FrbrLevel::Expression, with_components),
                    "FRBRManifestation": frbr_block(FrbrLevel::Manifestation, with_components),
                },
                "references": {
                    "@source": self.config.source,
                },
            },
            "preface": {
                "@eId": "preface",
                "longTitle": {
                    "@eId": "preface__longTitle_1",
                    "p": "",
                },
            },
            "mainBody": {
                "@eId": "mainBody",
            },
        })
    }

    /// A fresh conclusions section with no signatures.
    pub fn conclusions_skeleton() -> Element {
        Element::new("conclusions").with_attr("eId", CONCLUSIONS_EID)
    }
}

#[derive(Clone, Copy)]
enum FrbrLevel {
    Work,
    Expression,
    Manifestation,
}

impl FrbrLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Work => "frbrwork",
            Self::Expression => "frbrexpression",
            Self::Manifestation => "frbrmanifestation",
        }
    }
}

fn frbr_block(level: FrbrLevel, with_components: bool) -> Value {
    let p = level.prefix();
    let mut block = Map::new();
    block.insert(
        "FRBRthis".into(),
        json!({"@eId": format!("{p}__frbrthis"), "@value": ""}),
    );
    block.insert(
        "FRBRuri".into(),
        json!({"@eId": format!("{p}__frbruri"), "@value": ""}),
    );
    let date_name = match level {
        FrbrLevel::Manifestation => "instantiation",
        _ => "ADP_byCOM",
    };
    block.insert(
        "FRBRdate".into(),
        json!({"@eId": format!("{p}__frbrdate_1"), "@date": "", "@name": date_name}),
    );
    let author = match level {
        FrbrLevel::Expression => json!({"@eId": format!("{p}__frbrauthor_1"), "@href": ""}),
        _ => json!({"@eId": format!("{p}__frbrauthor_1"), "@href": "", "@as": "#author"}),
    };
    block.insert("FRBRauthor".into(), author);

    if with_components {
        let (eid, href) = match level {
            FrbrLevel::Work => ("wmain", "#emain"),
            FrbrLevel::Expression => ("emain", "#mmain"),
            FrbrLevel::Manifestation => ("mmain", "main.xml"),
        };
        block.insert(
            "componentInfo".into(),
            json!({
                "componentData": [{
                    "@eId": eid,
                    "@href": href,
                    "@name": "main",
                    "@showAs": "Main document",
                }],
            }),
        );
    }

    match level {
        FrbrLevel::Work => {
            block.insert(
                "FRBRcountry".into(),
                json!({"@eId": "frbrwork__frbrcountry", "@value": "eu"}),
            );
        }
        FrbrLevel::Expression => {
            block.insert(
                "FRBRlanguage".into(),
                json!({"@eId": "frbrexpression__frbrlanguage_1", "@language": "eng"}),
            );
        }
        FrbrLevel::Manifestation => {}
    }

    Value::Object(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_akn_root_has_namespaces() {
        let root = Template::identity().root_element();
        assert_eq!(root.name, "akomaNtoso");
        assert_eq!(
            root.attr("xmlns"),
            Some("http://docs.oasis-open.org/legaldocml/ns/akn/3.0/CSD06")
        );
        assert_eq!(root.attributes.len(), 3);
    }

    #[test]
    fn test_metadata_root_is_bare() {
        let root = Template::identity()
            .with_kind(DocumentKind::Metadata)
            .root_element();
        assert_eq!(root.name, "metaDoc");
        assert!(root.attributes.is_empty());
    }

    #[test]
    fn test_skeleton_is_fresh_per_call() {
        let template = Template::certificate();
        let mut first = template.doc_skeleton();
        first["preface"]["longTitle"]["p"] = json!("mutated");

        let second = template.doc_skeleton();
        assert_eq!(second["preface"]["longTitle"]["p"], json!(""));
        assert_eq!(second["@name"], json!("certificate"));
    }

    #[test]
    fn test_skeleton_frbr_layout() {
        let skeleton = Template::identity().doc_skeleton();
        let work = skeleton["meta"]["identification"]["FRBRWork"]
            .as_object()
            .unwrap();
        let keys: Vec<_> = work.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["FRBRthis", "FRBRuri", "FRBRdate", "FRBRauthor", "componentInfo", "FRBRcountry"]
        );

        let metadata = Template::identity()
            .with_kind(DocumentKind::Metadata)
            .doc_skeleton();
        assert!(metadata["meta"]["identification"]["FRBRWork"]
            .get("componentInfo")
            .is_none());
    }

    #[test]
    fn test_conclusions_skeleton() {
        let c = Template::conclusions_skeleton();
        assert_eq!(c.eid(), Some("conclusions"));
        assert!(c.children.is_empty());
    }
}
