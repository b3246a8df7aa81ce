//! In-memory model of an apex document.
//!
//! The document is read wholesale at the start of a compile and never
//! mutated during it. Field payloads stay raw JSON at rest; the type
//! grammar is decoded per field by [`FieldType::from_value`], which is
//! total — a malformed payload decodes to [`FieldType::Unknown`] instead
//! of failing the compile.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The entire apex document: endpoints, named schemas, operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApexDocument {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub schemas: Vec<Schema>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// An API route with its available HTTP methods and which of those
/// methods require authentication. Invariant: `secured` is a subset of
/// `methods`; this is an authoring concern and is not enforced at load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub secured: Vec<String>,
}

/// A named record type, used both as a wire payload shape and as a
/// generated type/structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub schema_type: String,
    /// Field name to raw type payload. A BTreeMap keeps field iteration
    /// deterministic across runs.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// Binds one HTTP verb at one endpoint to optional query/body/response
/// schemas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub endpoint: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<String>,
}

impl Operation {
    /// Declared query schema, treating an empty string as absent.
    pub fn query(&self) -> Option<&str> {
        non_empty(&self.query_schema)
    }

    pub fn body(&self) -> Option<&str> {
        non_empty(&self.body_schema)
    }

    pub fn response(&self) -> Option<&str> {
        non_empty(&self.response_schema)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl ApexDocument {
    /// Names of all declared schemas.
    pub fn schema_names(&self) -> BTreeSet<String> {
        self.schemas.iter().map(|s| s.name.clone()).collect()
    }

    /// Look up a declared schema by name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// True when `method` on `path` is declared as requiring
    /// authentication by the matching endpoint.
    pub fn is_secured(&self, path: &str, method: &str) -> bool {
        self.endpoints
            .iter()
            .filter(|ep| ep.path == path)
            .any(|ep| ep.secured.iter().any(|m| m == method))
    }
}

/// One HTTP verb the generators understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Parse the document's verb string. Returns `None` for anything the
    /// generators cannot dispatch on.
    pub fn parse(s: &str) -> Option<HttpVerb> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpVerb::Get),
            "POST" => Some(HttpVerb::Post),
            "PUT" => Some(HttpVerb::Put),
            "DELETE" => Some(HttpVerb::Delete),
            "PATCH" => Some(HttpVerb::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        }
    }

    /// Name of the client dispatch primitive in the request transport
    /// module (`get`, `post`, ...).
    pub fn client_fn(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
        }
    }

    /// Name of the chi registration method (`Get`, `Post`, ...).
    pub fn router_method(&self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Put => "Put",
            HttpVerb::Delete => "Delete",
            HttpVerb::Patch => "Patch",
        }
    }
}

/// The field type grammar. Decoded from raw JSON by [`FieldType::from_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Primitive(Primitive),
    Reference(String),
    Array(Box<FieldType>),
    /// Anything the grammar does not recognize. Resolves to the target's
    /// dynamic fallback type, never to an error.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl FieldType {
    /// Decode a raw field payload. Total over arbitrary JSON: a string is
    /// a primitive keyword or a schema reference, an object with
    /// `type: "array"` is an array whose element may itself be a string
    /// or a nested array object, and everything else is [`FieldType::Unknown`].
    pub fn from_value(value: &Value) -> FieldType {
        match value {
            Value::String(s) => FieldType::named(s),
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) != Some("array") {
                    return FieldType::Unknown;
                }
                match map.get("arrayType") {
                    Some(Value::String(s)) => FieldType::Array(Box::new(FieldType::named(s))),
                    Some(nested @ Value::Object(_)) => {
                        FieldType::Array(Box::new(FieldType::from_value(nested)))
                    }
                    _ => FieldType::Unknown,
                }
            }
            _ => FieldType::Unknown,
        }
    }

    /// A bare name in type position: one of the three primitive keywords,
    /// or a reference to a schema by name.
    pub fn named(name: &str) -> FieldType {
        match name {
            "string" => FieldType::Primitive(Primitive::String),
            "number" => FieldType::Primitive(Primitive::Number),
            "boolean" => FieldType::Primitive(Primitive::Boolean),
            other => FieldType::Reference(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_primitives_and_references() {
        assert_eq!(
            FieldType::from_value(&json!("string")),
            FieldType::Primitive(Primitive::String)
        );
        assert_eq!(
            FieldType::from_value(&json!("number")),
            FieldType::Primitive(Primitive::Number)
        );
        assert_eq!(
            FieldType::from_value(&json!("boolean")),
            FieldType::Primitive(Primitive::Boolean)
        );
        assert_eq!(
            FieldType::from_value(&json!("Widget")),
            FieldType::Reference("Widget".to_string())
        );
    }

    #[test]
    fn decode_flat_array() {
        let ty = FieldType::from_value(&json!({"type": "array", "arrayType": "number"}));
        assert_eq!(
            ty,
            FieldType::Array(Box::new(FieldType::Primitive(Primitive::Number)))
        );
    }

    #[test]
    fn decode_nested_array() {
        let ty = FieldType::from_value(&json!({
            "type": "array",
            "arrayType": {"type": "array", "arrayType": "string"}
        }));
        assert_eq!(
            ty,
            FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Primitive(
                Primitive::String
            )))))
        );
    }

    #[test]
    fn malformed_payloads_decode_to_unknown() {
        assert_eq!(FieldType::from_value(&json!(42)), FieldType::Unknown);
        assert_eq!(FieldType::from_value(&json!(null)), FieldType::Unknown);
        assert_eq!(FieldType::from_value(&json!([1, 2])), FieldType::Unknown);
        assert_eq!(
            FieldType::from_value(&json!({"type": "object"})),
            FieldType::Unknown
        );
        assert_eq!(
            FieldType::from_value(&json!({"type": "array"})),
            FieldType::Unknown
        );
    }

    #[test]
    fn document_deserializes_from_wire_shape() {
        let doc: ApexDocument = serde_json::from_value(json!({
            "endpoints": [
                {"path": "/api/v1/widgets", "methods": ["GET", "POST"], "secured": ["POST"]}
            ],
            "schemas": [
                {"name": "Widget", "type": "object", "fields": {"name": "string", "count": "number"}}
            ],
            "operations": [
                {"name": "ListWidgets", "endpoint": "/api/v1/widgets", "method": "GET", "responseSchema": "Widget"}
            ]
        }))
        .unwrap();

        assert_eq!(doc.endpoints.len(), 1);
        assert_eq!(doc.schemas[0].fields.len(), 2);
        assert_eq!(doc.operations[0].response(), Some("Widget"));
        assert!(doc.operations[0].query().is_none());
        assert!(doc.is_secured("/api/v1/widgets", "POST"));
        assert!(!doc.is_secured("/api/v1/widgets", "GET"));
    }

    #[test]
    fn empty_schema_strings_read_as_absent() {
        let op = Operation {
            query_schema: Some(String::new()),
            ..Default::default()
        };
        assert!(op.query().is_none());
    }

    #[test]
    fn verb_parsing() {
        assert_eq!(HttpVerb::parse("get"), Some(HttpVerb::Get));
        assert_eq!(HttpVerb::parse("PATCH"), Some(HttpVerb::Patch));
        assert_eq!(HttpVerb::parse("TRACE"), None);
    }
}
