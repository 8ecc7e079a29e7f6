use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strata_types::{Chunk, ContentHash, Hints};

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// A binary request or response body.
///
/// Each message type carries a distinct tag byte so a body decoded as the
/// wrong type fails loudly instead of being misread.
pub trait WireMessage: Serialize + DeserializeOwned {
    const TAG: u8;
    const NAME: &'static str;
}

/// Body of a write-value request: chunks in scheduling order plus the hashes
/// the sender asserts are already durable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteValueRequest {
    pub chunks: Vec<Chunk>,
    pub hints: Hints,
}

/// Body of a 429 write-value response: the chunks the service did not persist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackpressureResponse {
    pub rejected: Vec<ContentHash>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRefsRequest {
    pub hashes: Vec<ContentHash>,
}

/// Chunks found for a get-refs request, in request order. Absent hashes are
/// skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRefsResponse {
    pub chunks: Vec<Chunk>,
}

impl WireMessage for WriteValueRequest {
    const TAG: u8 = 1;
    const NAME: &'static str = "WriteValueRequest";
}

impl WireMessage for BackpressureResponse {
    const TAG: u8 = 2;
    const NAME: &'static str = "BackpressureResponse";
}

impl WireMessage for GetRefsRequest {
    const TAG: u8 = 3;
    const NAME: &'static str = "GetRefsRequest";
}

impl WireMessage for GetRefsResponse {
    const TAG: u8 = 4;
    const NAME: &'static str = "GetRefsResponse";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let mut tags = vec![
            WriteValueRequest::TAG,
            BackpressureResponse::TAG,
            GetRefsRequest::TAG,
            GetRefsResponse::TAG,
        ];
        let len = tags.len();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), len, "type tags should be unique");
    }

    #[test]
    fn write_value_request_json_shape() {
        let req = WriteValueRequest {
            chunks: vec![Chunk::new(b"abc".to_vec())],
            hints: Hints::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("chunks").is_some());
        assert!(json.get("hints").is_some());
    }
}
