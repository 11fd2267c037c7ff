//! Token reference carried in the web3 body block.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a blockchain token backs the document, and which one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TokenRef {
    /// No token has been issued yet.
    #[default]
    Unissued,
    Issued {
        address: String,
        #[serde(rename = "smartContractAddress")]
        contract_address: String,
        #[serde(rename = "tokenId")]
        token_id: String,
    },
}

impl TokenRef {
    pub fn issued(
        address: impl Into<String>,
        contract_address: impl Into<String>,
        token_id: impl Into<String>,
    ) -> Self {
        Self::Issued {
            address: address.into(),
            contract_address: contract_address.into(),
            token_id: token_id.into(),
        }
    }

    pub fn is_issued(&self) -> bool {
        matches!(self, Self::Issued { .. })
    }

    /// Paragraph content for the web3 block.
    pub fn to_object(&self) -> Map<String, Value> {
        let mut p = Map::new();
        match self {
            Self::Unissued => {
                p.insert("status".into(), Value::String("unissued".into()));
            }
            Self::Issued {
                address,
                contract_address,
                token_id,
            } => {
                p.insert("address".into(), Value::String(address.clone()));
                p.insert(
                    "smartContractAddress".into(),
                    Value::String(contract_address.clone()),
                );
                p.insert("tokenId".into(), Value::String(token_id.clone()));
            }
        }
        p
    }

    /// Read a web3 paragraph back. Anything without a token id and a
    /// contract address counts as unissued.
    pub fn from_object(p: &Value) -> Self {
        let field = |key: &str| match p.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        match (field("smartContractAddress"), field("tokenId")) {
            (Some(contract_address), Some(token_id)) => Self::Issued {
                address: field("address").unwrap_or_default(),
                contract_address,
                token_id,
            },
            _ => Self::Unissued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issued_paragraph() {
        let token = TokenRef::issued("0xabc", "0xcontract", "7");
        assert_eq!(
            Value::Object(token.to_object()),
            json!({"address": "0xabc", "smartContractAddress": "0xcontract", "tokenId": "7"})
        );
        assert_eq!(TokenRef::from_object(&Value::Object(token.to_object())), token);
    }

    #[test]
    fn test_unissued_paragraph() {
        let p = Value::Object(TokenRef::Unissued.to_object());
        assert_eq!(p, json!({"status": "unissued"}));
        assert_eq!(TokenRef::from_object(&p), TokenRef::Unissued);
    }

    #[test]
    fn test_numeric_token_id() {
        let token = TokenRef::from_object(&json!({"smartContractAddress": "0xc", "tokenId": 12}));
        assert_eq!(token, TokenRef::issued("", "0xc", "12"));
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(TokenRef::issued("a", "c", "1")).unwrap();
        assert_eq!(
            json,
            json!({"status": "issued", "address": "a", "smartContractAddress": "c", "tokenId": "1"})
        );
        let back: TokenRef = serde_json::from_value(json!({"status": "unissued"})).unwrap();
        assert!(!back.is_issued());
    }
}
