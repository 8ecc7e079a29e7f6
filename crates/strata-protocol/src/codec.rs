use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{WireMessage, MAX_MESSAGE_SIZE};

/// Codec for request and response bodies.
///
/// Layout: `[1 byte tag][bincode payload]`. HTTP already delimits the body, so
/// there is no length prefix.
pub struct WireCodec;

impl WireCodec {
    pub fn encode<M: WireMessage>(msg: &M) -> ProtocolResult<Vec<u8>> {
        let payload =
            bincode::serialize(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let mut buf = Vec::with_capacity(1 + payload.len());
        buf.push(M::TAG);
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    pub fn decode<M: WireMessage>(data: &[u8]) -> ProtocolResult<M> {
        let (&tag, payload) = data
            .split_first()
            .ok_or_else(|| ProtocolError::FramingError("empty body".into()))?;
        if tag != M::TAG {
            return Err(ProtocolError::UnexpectedMessageType {
                expected: M::NAME,
                actual: tag,
            });
        }
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        bincode::deserialize(payload).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}
