//! Request body decoding.
//!
//! Bodies are read with a hard size limit and decoded into a loose JSON
//! object. Typed request values are built from that object by the models,
//! so nothing downstream of a handler ever sees the untyped map.

use axum::body::Body;
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Loosely-typed JSON object as sent by the bot.
pub type JsonObject = Map<String, Value>;

/// Collect the whole request body, refusing anything above `limit` bytes.
///
/// # Errors
///
/// - `PayloadTooLarge`: The body is longer than `limit`
/// - `PayloadDecode`: The body could not be read (e.g. the client went away)
pub async fn read_body(body: Body, limit: usize) -> Result<Vec<u8>, AppError> {
    axum::body::to_bytes(body, limit)
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|err| {
            let err = err.into_inner();
            if err.downcast_ref::<LengthLimitError>().is_some() {
                tracing::debug!(limit, "request body over limit");
                AppError::PayloadTooLarge
            } else {
                tracing::debug!(error = %err, "failed to read request body");
                AppError::PayloadDecode
            }
        })
}

/// Decode a body as a JSON object.
///
/// Values keep their JSON types: numbers stay numbers, strings stay strings.
///
/// # Errors
///
/// `PayloadDecode` if the bytes are not valid JSON or the top-level value is
/// not an object.
pub fn decode_object(bytes: &[u8]) -> Result<JsonObject, AppError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "request body is not valid JSON");
        AppError::PayloadDecode
    })?;

    let Value::Object(object) = value else {
        tracing::debug!("request body is JSON but not an object");
        return Err(AppError::PayloadDecode);
    };

    tracing::debug!(payload = ?object, "decoded request payload");

    Ok(object)
}

/// Read and decode in one step.
pub async fn read_object(body: Body, limit: usize) -> Result<JsonObject, AppError> {
    let bytes = read_body(body, limit).await?;
    decode_object(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use futures_util::stream;
    use std::io;

    #[test]
    fn decodes_object_keeping_value_types() {
        let object =
            decode_object(br#"{"UserID":"u1","QuestionCount":5,"Nested":{"a":[1,2]},"Flag":true}"#)
                .unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["UserID"], Value::String("u1".to_string()));
        assert_eq!(object["QuestionCount"].as_f64(), Some(5.0));
        assert!(object["Nested"].is_object());
        assert_eq!(object["Flag"], Value::Bool(true));
    }

    #[test]
    fn empty_object_is_accepted() {
        assert!(decode_object(b"{}").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_objects() {
        for body in [&b"[]"[..], b"\"text\"", b"42", b"null", b"true"] {
            assert!(matches!(decode_object(body), Err(AppError::PayloadDecode)));
        }
    }

    #[test]
    fn rejects_invalid_json() {
        for body in [&b""[..], b"{", b"{\"UserID\":}", b"not json"] {
            assert!(matches!(decode_object(body), Err(AppError::PayloadDecode)));
        }
    }

    #[tokio::test]
    async fn read_body_enforces_limit() {
        let body = Body::from(vec![b' '; 64]);

        assert!(matches!(
            read_body(body, 16).await,
            Err(AppError::PayloadTooLarge)
        ));
    }

    #[tokio::test]
    async fn interrupted_body_is_a_decode_error() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"UserID\":")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        assert!(matches!(
            read_body(body, 1024).await,
            Err(AppError::PayloadDecode)
        ));
    }

    #[tokio::test]
    async fn read_object_within_limit() {
        let body = Body::from(r#"{"UserID":"u1"}"#);

        let object = read_object(body, 1024).await.unwrap();

        assert_eq!(object["UserID"], "u1");
    }
}
