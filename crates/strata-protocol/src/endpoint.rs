/// Endpoint paths of the remote store service.
pub mod endpoints {
    pub const WRITE_VALUE: &str = "/writeValue/";
    pub const GET_REFS: &str = "/getRefs/";
    pub const ROOT: &str = "/root/";
    /// Prefix for single-chunk reads; the hex hash follows.
    pub const REF: &str = "/ref/";
    pub const INFO: &str = "/info";

    pub fn chunk_path(hash: &strata_types::ContentHash) -> String {
        format!("{REF}{}", hash.to_hex())
    }
}

/// Query parameter names used by the root compare-and-swap request.
pub mod root_params {
    /// The root the caller believes is current.
    pub const CURRENT: &str = "current";
    /// The root to install if `current` still holds.
    pub const PROPOSED: &str = "proposed";
}

/// Service description returned by the info endpoint.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::ContentHash;

    #[test]
    fn service_info_defaults() {
        let info = ServiceInfo::default();
        assert_eq!(info.status, "ok");
        assert_eq!(info.protocol_version, 1);
    }

    #[test]
    fn chunk_path_embeds_hex() {
        let hash = ContentHash::of(b"abc");
        let path = endpoints::chunk_path(&hash);
        assert!(path.starts_with(endpoints::REF));
        assert!(path.ends_with(&hash.to_hex()));
    }
}
