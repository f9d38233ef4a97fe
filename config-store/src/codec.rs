use shared_types::Document;

use crate::error::{Result, StorageError};

/// An encode/decode pair for one document format.
pub trait Codec: Send + Sync {
    fn encode(&self, document: &Document) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<Document>;
}

/// Pretty-printed JSON with keys in insertion order.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(document)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Block-style YAML; also accepts the `yml` extension.
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(serde_yaml::to_string(document)?.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        Ok(serde_yaml::from_slice(bytes)?)
    }
}

/// Look up the codec for a format extension.
pub fn codec_for(extension: &str) -> Result<&'static dyn Codec> {
    match extension {
        "json" => Ok(&JsonCodec),
        "yaml" | "yml" => Ok(&YamlCodec),
        other => Err(StorageError::UnknownExtension(other.to_string())),
    }
}

/// The document's version field value, if any. Numeric versions (a bare
/// `1.0` in YAML parses as a number) are stringified.
pub fn document_version(document: &Document, field: &str) -> Option<String> {
    match document.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
