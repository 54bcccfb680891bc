//! Body codec seam for token endpoint payloads.
//!
//! [`DefaultBodyCodec`] decodes JSON, form-encoded, and (with the `xml` feature) XML bodies into
//! a flat field map and encodes outgoing token requests as `application/x-www-form-urlencoded`.

// crates.io
use serde_json::{Map, Value};
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::DecodeError};

/// Media type of every outgoing token request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Converts raw bodies to and from flat string maps.
pub trait BodyCodec
where
	Self: 'static + Send + Sync,
{
	/// Decodes `body` according to `content_type` (`None` when the header is absent).
	fn decode(
		&self,
		body: &[u8],
		content_type: Option<&str>,
	) -> Result<BTreeMap<String, String>, DecodeError>;

	/// Encodes ordered parameters as a form body.
	fn encode(&self, parameters: &[(String, String)]) -> String {
		encode_form(parameters)
	}
}

/// Content-negotiating codec covering the token response formats seen in practice.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBodyCodec;
impl BodyCodec for DefaultBodyCodec {
	fn decode(
		&self,
		body: &[u8],
		content_type: Option<&str>,
	) -> Result<BTreeMap<String, String>, DecodeError> {
		match BodyFormat::negotiate(body, content_type)? {
			BodyFormat::Json => decode_json(body),
			BodyFormat::Form => Ok(decode_form(body)),
			#[cfg(feature = "xml")]
			BodyFormat::Xml => decode_xml(body),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BodyFormat {
	Json,
	Form,
	#[cfg(feature = "xml")]
	Xml,
}
impl BodyFormat {
	fn negotiate(body: &[u8], content_type: Option<&str>) -> Result<Self, DecodeError> {
		let essence = content_type
			.and_then(|raw| raw.split(';').next())
			.map(|raw| raw.trim().to_ascii_lowercase())
			.unwrap_or_default();

		match essence.as_str() {
			"" | "text/plain" | "application/octet-stream" => Ok(Self::sniff(body)),
			"application/json" | "text/json" => Ok(Self::Json),
			FORM_CONTENT_TYPE => Ok(Self::Form),
			#[cfg(feature = "xml")]
			"application/xml" | "text/xml" => Ok(Self::Xml),
			other if other.ends_with("+json") => Ok(Self::Json),
			#[cfg(feature = "xml")]
			other if other.ends_with("+xml") => Ok(Self::Xml),
			other => Err(DecodeError::UnsupportedContentType { content_type: other.into() }),
		}
	}

	fn sniff(body: &[u8]) -> Self {
		match body.iter().find(|byte| !byte.is_ascii_whitespace()) {
			Some(b'{') => Self::Json,
			#[cfg(feature = "xml")]
			Some(b'<') => Self::Xml,
			_ => Self::Form,
		}
	}
}

/// Serializes parameters with `+` for spaces, preserving their order.
pub fn encode_form(parameters: &[(String, String)]) -> String {
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	for (key, value) in parameters {
		serializer.append_pair(key, value);
	}

	serializer.finish()
}

/// Parses a form-encoded payload (a body, a query, or a URI fragment); later duplicates win.
pub fn decode_form(raw: &[u8]) -> BTreeMap<String, String> {
	form_urlencoded::parse(raw).into_owned().collect()
}

fn decode_json(body: &[u8]) -> Result<BTreeMap<String, String>, DecodeError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let object: Map<String, Value> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { source })?;

	Ok(object
		.into_iter()
		.filter_map(|(key, value)| flatten_json(value).map(|value| (key, value)))
		.collect())
}

fn flatten_json(value: Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(s) => Some(s),
		Value::Array(items) => Some(
			items.into_iter().filter_map(flatten_json).collect::<Vec<_>>().join(" "),
		),
		other => Some(other.to_string()),
	}
}

#[cfg(feature = "xml")]
fn decode_xml(body: &[u8]) -> Result<BTreeMap<String, String>, DecodeError> {
	let text = std::str::from_utf8(body)?;
	let fields: HashMap<String, String> =
		quick_xml::de::from_str(text).map_err(|source| DecodeError::Xml { source })?;

	Ok(fields.into_iter().collect())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_values_are_flattened_to_strings() {
		let fields = DefaultBodyCodec
			.decode(
				br#"{"access_token":"aaa111","expires_in":3600,"scope":["read","write"],"refresh_token":null,"active":true}"#,
				Some("application/json;charset=UTF-8"),
			)
			.expect("JSON body should decode.");

		assert_eq!(fields.get("access_token").map(String::as_str), Some("aaa111"));
		assert_eq!(fields.get("expires_in").map(String::as_str), Some("3600"));
		assert_eq!(fields.get("scope").map(String::as_str), Some("read write"));
		assert_eq!(fields.get("active").map(String::as_str), Some("true"));
		assert!(!fields.contains_key("refresh_token"));
	}

	#[test]
	fn malformed_json_reports_a_decode_error() {
		let err = DefaultBodyCodec
			.decode(b"{\"access_token\":", Some("application/json"))
			.expect_err("Truncated JSON must fail.");

		assert!(matches!(err, DecodeError::Json { .. }));
	}

	#[test]
	fn form_bodies_decode_plus_as_space() {
		let fields = DefaultBodyCodec
			.decode(b"access_token=abc&scope=read+write", Some(FORM_CONTENT_TYPE))
			.expect("Form body should decode.");

		assert_eq!(fields.get("scope").map(String::as_str), Some("read write"));
	}

	#[test]
	fn missing_content_type_is_sniffed() {
		let json = DefaultBodyCodec.decode(b"  {\"access_token\":\"j\"}", None).expect("Sniffed JSON.");
		let form = DefaultBodyCodec.decode(b"access_token=f", None).expect("Sniffed form.");

		assert_eq!(json.get("access_token").map(String::as_str), Some("j"));
		assert_eq!(form.get("access_token").map(String::as_str), Some("f"));
	}

	#[test]
	fn unknown_content_type_is_rejected() {
		let err = DefaultBodyCodec
			.decode(b"...", Some("image/png"))
			.expect_err("Binary content types must be rejected.");

		assert!(matches!(err, DecodeError::UnsupportedContentType { .. }));
	}

	#[cfg(feature = "xml")]
	#[test]
	fn xml_child_elements_become_fields() {
		let fields = DefaultBodyCodec
			.decode(
				b"<OAuth><access_token>xml-token</access_token><expires_in>60</expires_in></OAuth>",
				Some("application/xml"),
			)
			.expect("XML body should decode.");

		assert_eq!(fields.get("access_token").map(String::as_str), Some("xml-token"));
		assert_eq!(fields.get("expires_in").map(String::as_str), Some("60"));
	}

	#[test]
	fn form_encoding_uses_plus_for_spaces() {
		let body = encode_form(&[
			("grant_type".into(), "client_credentials".into()),
			("scope".into(), "read write".into()),
		]);

		assert_eq!(body, "grant_type=client_credentials&scope=read+write");
	}
}
