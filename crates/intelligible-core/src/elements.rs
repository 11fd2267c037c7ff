//! Caller input to the assembler.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::types::ReferenceType;

/// A string-keyed map that keeps insertion order.
///
/// Serializes as a JSON object. Inserting an existing key replaces the value
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> OrderedMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for OrderedMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T> IntoIterator for OrderedMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for OrderedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((k, v)) = access.next_entry::<String, T>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// The three FRBR identification blocks.
///
/// Each maps an element name to its object-notation fragment, for example
/// `{"FRBRthis": {"@value": "/akn/eu/doc/..."}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "FRBRWork", default)]
    pub frbr_work: Map<String, Value>,
    #[serde(rename = "FRBRExpression", default)]
    pub frbr_expression: Map<String, Value>,
    #[serde(rename = "FRBRManifestation", default)]
    pub frbr_manifestation: Map<String, Value>,
}

impl Identification {
    pub const BLOCKS: [&'static str; 3] = ["FRBRWork", "FRBRExpression", "FRBRManifestation"];

    /// Blocks paired with their element names.
    pub fn blocks(&self) -> [(&'static str, &Map<String, Value>); 3] {
        [
            (Self::BLOCKS[0], &self.frbr_work),
            (Self::BLOCKS[1], &self.frbr_expression),
            (Self::BLOCKS[2], &self.frbr_manifestation),
        ]
    }
}

/// A named pointer to an external entity.
///
/// Only `href` is required; see [`Reference::resolve`] for the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReferenceType>,
    #[serde(alias = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(rename = "eId", alias = "@eId", default, skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,
    #[serde(rename = "showAs", alias = "@showAs", default, skip_serializing_if = "Option::is_none")]
    pub show_as: Option<String>,
    /// Display name used by the identity and certificate builders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A reference with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub kind: ReferenceType,
    pub eid: String,
    pub href: String,
    pub show_as: String,
}

impl Reference {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ReferenceType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_eid(mut self, eid: impl Into<String>) -> Self {
        self.eid = Some(eid.into());
        self
    }

    pub fn with_show_as(mut self, show_as: impl Into<String>) -> Self {
        self.show_as = Some(show_as.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Apply defaults for the reference declared as `name`: type
    /// `TLCReference`, eId `#name`, showAs `name`. Fails without `href`.
    pub fn resolve(&self, name: &str) -> Result<ResolvedReference, DocumentError> {
        let href = self
            .href
            .clone()
            .ok_or_else(|| DocumentError::missing("href", format!("references.{name}")))?;
        Ok(ResolvedReference {
            kind: self.kind.unwrap_or_default(),
            eid: self.eid.clone().unwrap_or_else(|| format!("#{name}")),
            href,
            show_as: self.show_as.clone().unwrap_or_else(|| name.to_string()),
        })
    }
}

/// One main-body block: a heading plus a paragraph record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyBlock {
    #[serde(rename = "blockTitle")]
    pub block_title: String,
    #[serde(default)]
    pub p: Map<String, Value>,
}

impl BodyBlock {
    pub fn new(block_title: impl Into<String>) -> Self {
        Self {
            block_title: block_title.into(),
            p: Map::new(),
        }
    }

    /// Add a paragraph field in object notation.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.p.insert(key.into(), value.into());
        self
    }
}

/// Everything the assembler merges into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentElements {
    #[serde(default)]
    pub identification: Identification,
    #[serde(default)]
    pub references: OrderedMap<Reference>,
    #[serde(rename = "prefaceTitle", default)]
    pub preface_title: String,
    #[serde(rename = "mainBody", default)]
    pub main_body: OrderedMap<BodyBlock>,
}

impl DocumentElements {
    pub fn new(preface_title: impl Into<String>) -> Self {
        Self {
            preface_title: preface_title.into(),
            ..Self::default()
        }
    }

    pub fn reference(mut self, name: impl Into<String>, reference: Reference) -> Self {
        self.references.insert(name, reference);
        self
    }

    pub fn block(mut self, name: impl Into<String>, block: BodyBlock) -> Self {
        self.main_body.insert(name, block);
        self
    }

    /// Add or extend a `FRBRWork` fragment.
    pub fn frbr_work(mut self, key: impl Into<String>, fragment: Value) -> Self {
        self.identification.frbr_work.insert(key.into(), fragment);
        self
    }

    pub fn frbr_expression(mut self, key: impl Into<String>, fragment: Value) -> Self {
        self.identification.frbr_expression.insert(key.into(), fragment);
        self
    }

    pub fn frbr_manifestation(mut self, key: impl Into<String>, fragment: Value) -> Self {
        self.identification.frbr_manifestation.insert(key.into(), fragment);
        self
    }

    /// Read elements from their JSON form, reporting absent structure as
    /// [`DocumentError::MissingRequiredField`].
    pub fn from_json(value: &Value) -> Result<Self, DocumentError> {
        let root = value
            .as_object()
            .ok_or_else(|| DocumentError::fragment("$", "expected an object"))?;

        for key in ["identification", "references", "prefaceTitle", "mainBody"] {
            if !root.contains_key(key) {
                return Err(DocumentError::missing(key, "document elements"));
            }
        }
        for block in Identification::BLOCKS {
            if value["identification"].get(block).is_none() {
                return Err(DocumentError::missing(block, "identification"));
            }
        }

        if let Some(references) = root["references"].as_object() {
            for (name, reference) in references {
                if reference.get("href").or_else(|| reference.get("@href")).is_none() {
                    return Err(DocumentError::missing("href", format!("references.{name}")));
                }
                if let Some(kind) = reference.get("type").and_then(Value::as_str) {
                    kind.parse::<ReferenceType>()?;
                }
            }
        }
        if let Some(blocks) = root["mainBody"].as_object() {
            for (name, block) in blocks {
                if block.get("blockTitle").is_none() {
                    return Err(DocumentError::missing("blockTitle", format!("mainBody.{name}")));
                }
            }
        }

        serde_json::from_value(value.clone())
            .map_err(|e| DocumentError::fragment("$", e.to_string()))
    }
}
