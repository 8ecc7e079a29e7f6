use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Name of the query parameter carrying the caller's access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Query parameters forwarded verbatim on every request.
///
/// Order is preserved and duplicate keys are kept, so whatever the caller
/// configured reaches the service unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `a=1&b=2` query string (no leading `?`).
    pub fn parse(query: &str) -> Self {
        Self(
            form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// Parameters from a URL's query string.
    pub fn from_url(url: &url::Url) -> Self {
        Self(
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.with(ACCESS_TOKEN_PARAM, token)
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_PARAM)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_order_and_duplicates() {
        let params = QueryParams::parse("access_token=aToken123&other=19&other=20");
        assert_eq!(params.len(), 3);
        assert_eq!(params.access_token(), Some("aToken123"));
        assert_eq!(params.get("other"), Some("19"));
        assert_eq!(params.pairs()[2], ("other".to_string(), "20".to_string()));
    }

    #[test]
    fn encoding_escapes_reserved_characters() {
        let params = QueryParams::new().with("token", "a&b=c d");
        let encoded = params.to_query_string();
        assert_eq!(encoded, "token=a%26b%3Dc+d");
        assert_eq!(QueryParams::parse(&encoded), params);
    }

    #[test]
    fn from_url_reads_query() {
        let url = url::Url::parse("http://localhost:9000?access_token=tok&other=19").unwrap();
        let params = QueryParams::from_url(&url);
        assert_eq!(params.access_token(), Some("tok"));
        assert_eq!(params.get("other"), Some("19"));
    }

    #[test]
    fn empty_by_default() {
        let params = QueryParams::default();
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
        assert!(params.access_token().is_none());
    }
}
