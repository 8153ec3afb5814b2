//! Serialization strategy for checkpoint payloads.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::checkpointer::CheckpointError;

/// Type tag byte prefixed to a [`TypedSerializer`] payload.
pub const TYPE_NULL: u8 = 0;
pub const TYPE_JSON: u8 = 1;
pub const TYPE_BYTES: u8 = 2;

/// Converts checkpoint state to and from bytes for storage.
///
/// Implementations must round-trip: `deserialize(serialize(v)?)? == v`.
pub trait Serializer<S>: Send + Sync {
    fn serialize(&self, value: &S) -> Result<Vec<u8>, CheckpointError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<S, CheckpointError>;
}

/// Plain JSON serializer. The default for [`super::SqliteSaver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl<S> Serializer<S> for JsonSerializer
where
    S: Serialize + DeserializeOwned + Send + Sync,
{
    fn serialize(&self, value: &S) -> Result<Vec<u8>, CheckpointError> {
        serde_json::to_vec(value).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<S, CheckpointError> {
        serde_json::from_slice(bytes).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }
}

/// A value tagged with its wire representation, for serializers that need to
/// distinguish "no value", JSON, and opaque bytes in one envelope (e.g. a
/// store that persists both structured items and raw blobs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedData {
    Null,
    Json(Vec<u8>),
    Bytes(Vec<u8>),
}

impl TypedData {
    fn tag(&self) -> u8 {
        match self {
            TypedData::Null => TYPE_NULL,
            TypedData::Json(_) => TYPE_JSON,
            TypedData::Bytes(_) => TYPE_BYTES,
        }
    }

    fn payload(&self) -> &[u8] {
        match self {
            TypedData::Null => &[],
            TypedData::Json(b) | TypedData::Bytes(b) => b,
        }
    }

    fn from_tagged(tag: u8, payload: &[u8]) -> Result<Self, CheckpointError> {
        match tag {
            TYPE_NULL => Ok(TypedData::Null),
            TYPE_JSON => Ok(TypedData::Json(payload.to_vec())),
            TYPE_BYTES => Ok(TypedData::Bytes(payload.to_vec())),
            other => Err(CheckpointError::Serialization(format!(
                "unknown type tag: {other}"
            ))),
        }
    }
}

/// Serializer for [`TypedData`]: one leading tag byte, then the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedSerializer;

impl Serializer<TypedData> for TypedSerializer {
    fn serialize(&self, value: &TypedData) -> Result<Vec<u8>, CheckpointError> {
        let mut out = Vec::with_capacity(1 + value.payload().len());
        out.push(value.tag());
        out.extend_from_slice(value.payload());
        Ok(out)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<TypedData, CheckpointError> {
        let (tag, payload) = bytes
            .split_first()
            .ok_or_else(|| CheckpointError::Serialization("empty payload".into()))?;
        TypedData::from_tagged(*tag, payload)
    }
}
