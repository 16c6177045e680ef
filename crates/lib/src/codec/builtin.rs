//! Encoders, recognizers and decoders for the built-in extension types.
//!
//! Each built-in type has one canonical text form, shared by implicit encoding
//! (the bare string) and explicit encoding (the wrapper payload).

use serde_json::Value as Json;
use uuid::Uuid;

use super::{CodecError, TimeOfDay, Timestamp, TypeCodec, temporal};
use crate::{
    Value,
    constants::{DATE_MARKER, DATETIME_MARKER, TIME_MARKER, UUID_MARKER},
};

/// Built-in markers in recognition priority order.
///
/// The datetime form contains a date and a time, so it must be tried before
/// either of them.
pub(crate) const MARKERS: [&str; 4] = [DATETIME_MARKER, DATE_MARKER, TIME_MARKER, UUID_MARKER];

/// Recognizes the canonical text of the built-in type named by `marker`.
pub(crate) fn recognize(marker: &str, text: &str) -> Option<Value> {
    match marker {
        DATETIME_MARKER => Timestamp::parse(text).map(Value::DateTime),
        DATE_MARKER => temporal::parse_date_str(text).map(Value::Date),
        TIME_MARKER => TimeOfDay::parse(text).map(Value::Time),
        UUID_MARKER => parse_uuid(text).map(Value::Uuid),
        _ => None,
    }
}

/// Strict `8-4-4-4-12` hex form. `Uuid::try_parse` alone would also accept
/// the simple, braced and URN forms.
fn parse_uuid(text: &str) -> Option<Uuid> {
    if !temporal::matches_shape(text.as_bytes(), b"xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx") {
        return None;
    }
    Uuid::try_parse(text).ok()
}

/// Implicit encoder shared by the built-in types.
pub(crate) fn encode_text(value: &Value) -> Option<String> {
    value.canonical_text()
}

/// Explicit encoder shared by the built-in types: the payload is the
/// canonical text.
pub(crate) fn encode_payload(value: &Value, _codec: &TypeCodec) -> Result<Json, CodecError> {
    value
        .canonical_text()
        .map(Json::String)
        .ok_or_else(|| CodecError::UnsupportedType {
            type_name: value.type_name().to_string(),
        })
}

/// Builds the explicit decoder for a built-in marker.
pub(crate) fn decoder(
    marker: &'static str,
) -> impl Fn(Json, &TypeCodec) -> Result<Value, CodecError> + Send + Sync + 'static {
    move |payload: Json, _codec: &TypeCodec| {
        let text = match payload {
            Json::String(text) => text,
            other => {
                return Err(CodecError::invalid_payload(
                    marker,
                    format!("expected a string, found {other}"),
                ));
            }
        };
        recognize(marker, &text).ok_or_else(|| {
            CodecError::invalid_payload(marker, format!("'{text}' is not a valid {marker}"))
        })
    }
}
