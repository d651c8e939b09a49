use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A value that can be written to and read back from a cache store.
pub trait CacheValue: Sized + Send + Sync {
    fn to_bytes(&self) -> Result<Vec<u8>, CacheError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}

/// JSON-encoded cache payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn inner(self) -> T { self.0 }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self { Json(value) }
}

impl<T> CacheValue for Json<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    fn to_bytes(&self) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(&self.0)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError> {
        serde_json::from_slice(bytes)
            .map(Json)
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct Counter {
        name: String,
        hits: u64,
    }

    #[test]
    fn test_json_roundtrip() {
        let counter = Counter {
            name: "click".into(),
            hits: 3,
        };
        let json = Json(counter.clone());

        let bytes = json.to_bytes().unwrap();
        let recovered = Json::<Counter>::from_bytes(&bytes).unwrap();

        assert_eq!(recovered.inner(), counter);
    }

    #[test]
    fn test_json_rejects_corrupt_payload() {
        let result = Json::<Counter>::from_bytes(b"{\"name\": 1");

        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }
}
