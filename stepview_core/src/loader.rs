//! Payload ingestion: recorded traces arrive either as plain JSON5 text or
//! wrapped in a base64 data-URI by the capture tooling.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::TraceError;
use crate::trace::{RawTrace, Trace};

/// Prefix the capture tooling puts on embedded payloads.
pub const EMBEDDED_PAYLOAD_PREFIX: &str = "data:application/x-javascript;base64,";

/// Decodes a dropped payload into trace text.
///
/// Accepts the embedded base64 encoding or plain text. Any other data-URI
/// aborts the load with `UnknownFileKind`; undecodable base64 is treated as
/// a malformed trace.
pub fn decode_payload(payload: &str) -> Result<String, TraceError> {
    if let Some(encoded) = payload.strip_prefix(EMBEDDED_PAYLOAD_PREFIX) {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| TraceError::malformed(format!("invalid base64 payload: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| TraceError::malformed(format!("payload is not UTF-8: {e}")))
    } else if payload.starts_with("data:") {
        let kind = payload.split(',').next().unwrap_or(payload);
        Err(TraceError::unknown_file(kind))
    } else {
        Ok(payload.to_owned())
    }
}

/// Parses decoded trace text into a normalized `Trace`.
pub fn parse_trace(text: &str) -> Result<Trace, TraceError> {
    let raw: RawTrace = json5::from_str(text)
        .map_err(|e| TraceError::malformed(format!("unparseable trace text: {e}")))?;
    Trace::from_raw(raw)
}

/// Full ingestion: decode, parse, normalize.
pub fn load_trace(payload: &str) -> Result<Trace, TraceError> {
    parse_trace(&decode_payload(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{ steps: [{ name: "tick start", ball: { shape_type: { id: 0, label: "circle" }, shape: { p: [0, 0], r: 5 }, pos: [1, 2] } }] }"#;

    // PLAIN, base64-encoded behind the embedded-payload prefix.
    const EMBEDDED: &str = "data:application/x-javascript;base64,eyBzdGVwczogW3sgbmFtZTogInRpY2sgc3RhcnQiLCBiYWxsOiB7IHNoYXBlX3R5cGU6IHsgaWQ6IDAsIGxhYmVsOiAiY2lyY2xlIiB9LCBzaGFwZTogeyBwOiBbMCwgMF0sIHI6IDUgfSwgcG9zOiBbMSwgMl0gfSB9XSB9";

    #[test]
    fn test_plain_text_loads() {
        let trace = load_trace(PLAIN).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.frames[0].label, "tick start");
    }

    #[test]
    fn test_embedded_payload_matches_plain_text() {
        let embedded = load_trace(EMBEDDED).unwrap();
        let plain = load_trace(PLAIN).unwrap();
        assert_eq!(embedded, plain);
    }

    #[test]
    fn test_foreign_data_uri_is_unknown_file_kind() {
        let err = load_trace("data:image/png;base64,AAAA").unwrap_err();
        assert!(matches!(err, TraceError::UnknownFileKind(_)));
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn test_corrupt_base64_is_malformed() {
        let payload = format!("{EMBEDDED_PAYLOAD_PREFIX}!!not-base64!!");
        assert!(matches!(
            load_trace(&payload),
            Err(TraceError::MalformedTrace(_))
        ));
    }

    #[test]
    fn test_unparseable_text_is_malformed() {
        assert!(matches!(
            load_trace("steps everywhere"),
            Err(TraceError::MalformedTrace(_))
        ));
    }

    #[test]
    fn test_payload_without_steps_is_malformed() {
        assert!(matches!(
            load_trace("{ static_bodies: [] }"),
            Err(TraceError::MalformedTrace(_))
        ));
    }
}
