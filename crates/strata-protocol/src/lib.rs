//! Wire protocol for Strata.
//!
//! Defines the vocabulary shared by the client and the remote store service:
//! endpoint paths, the transport-neutral [`RequestFrame`]/[`ResponseFrame`]
//! pair, the forwarded [`QueryParams`], and the binary body encoding used for
//! chunk batches.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod frame;
pub mod message;
pub mod params;

pub use codec::WireCodec;
pub use endpoint::{endpoints, root_params, ServiceInfo};
pub use error::{ProtocolError, ProtocolResult};
pub use frame::{status, Method, RequestFrame, ResponseFrame};
pub use message::{
    BackpressureResponse, GetRefsRequest, GetRefsResponse, WireMessage, WriteValueRequest,
    MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};
pub use params::{QueryParams, ACCESS_TOKEN_PARAM};
