//! Structured-data codec trait and the JSON implementation.
//!
//! A [`Codec`] converts between raw bytes and values. Failures are reported
//! as [`PipelineError`]s already tagged with a [`Kind`](crate::Kind), so the
//! pipeline never has to inspect the underlying error type.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::error::Category;

use crate::error::PipelineError;

/// Codec trait for request decoding and response encoding.
///
/// # Example
///
/// ```ignore
/// use respond_core::{Codec, PipelineError};
/// use bytes::Bytes;
///
/// struct YamlCodec;
///
/// impl Codec for YamlCodec {
///     fn name(&self) -> &'static str { "yaml" }
///     fn content_type(&self) -> &'static str { "application/yaml" }
///
///     fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PipelineError> {
///         // ... classify parser errors into DecodeSyntax / DecodeSchema
///     }
///
///     fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, PipelineError> {
///         // ...
///     }
/// }
/// ```
pub trait Codec {
    /// Short name used in logs (e.g., "json").
    fn name(&self) -> &'static str;

    /// Content type of encoded responses.
    fn content_type(&self) -> &'static str;

    /// Decode a value from bytes.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PipelineError>;

    /// Encode a value to bytes.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, PipelineError>;
}

/// JSON codec using serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PipelineError> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| PipelineError::DecodeEncoding(Box::new(e)))?;

        serde_json::from_str(text).map_err(|e| match e.classify() {
            Category::Syntax | Category::Eof => PipelineError::DecodeSyntax(Box::new(e)),
            Category::Data | Category::Io => PipelineError::DecodeSchema(Box::new(e)),
        })
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, PipelineError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(PipelineError::encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Login {
        username: String,
        password: String,
    }

    #[test]
    fn test_json_codec_names() {
        assert_eq!(JsonCodec.name(), "json");
        assert_eq!(JsonCodec.content_type(), "application/json");
    }

    #[test]
    fn test_json_decode() {
        let login: Login = JsonCodec
            .decode(br#"{"username":"testing","password":"password"}"#)
            .unwrap();
        assert_eq!(login.username, "testing");
        assert_eq!(login.password, "password");
    }

    #[test]
    fn test_json_round_trip() {
        let original = Login {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let bytes = JsonCodec.encode(&original).unwrap();
        let decoded: Login = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_json_encode_string_is_quoted() {
        let bytes = JsonCodec.encode("session-token").unwrap();
        assert_eq!(&bytes[..], br#""session-token""#);
    }

    #[test]
    fn test_json_decode_syntax_error() {
        let err = JsonCodec
            .decode::<Login>(br#"{"username":"invalid" "password":json}"#)
            .unwrap_err();
        assert_eq!(err.kind(), Kind::DecodeSyntax);
    }

    #[test]
    fn test_json_decode_empty_is_syntax_error() {
        let err = JsonCodec.decode::<Login>(b"").unwrap_err();
        assert_eq!(err.kind(), Kind::DecodeSyntax);

        let err = JsonCodec.decode::<Login>(b"{\"username\":").unwrap_err();
        assert_eq!(err.kind(), Kind::DecodeSyntax);
    }

    #[test]
    fn test_json_decode_invalid_utf8() {
        let err = JsonCodec
            .decode::<Login>(b"{\"username\":\"\xff\xfe\",\"password\":\"x\"}")
            .unwrap_err();
        assert_eq!(err.kind(), Kind::DecodeEncoding);
        assert!(err.to_string().contains("invalid utf-8"));
    }

    #[test]
    fn test_json_decode_schema_error() {
        let err = JsonCodec
            .decode::<Login>(br#"{"username":42,"password":"x"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), Kind::DecodeSchema);

        let err = JsonCodec.decode::<Login>(br#""just a string""#).unwrap_err();
        assert_eq!(err.kind(), Kind::DecodeSchema);
    }

    #[test]
    fn test_json_encode_error() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "tuple keys are not strings");
        let err = JsonCodec.encode(&map).unwrap_err();
        assert_eq!(err.kind(), Kind::Encode);
        assert!(err.to_string().contains("key must be a string"));
    }
}
