//! Redacting wrapper for identity tokens.

// self
use crate::_prelude::*;

/// Identity token (scoped or unscoped) that never prints its value.
///
/// Tokens are capabilities: format them freely, but only call [`TokenSecret::expose`] when
/// writing the `X-Auth-Token` header or handing the value back to the session store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the wrapped token is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("gAAAAABl-scoped");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "gAAAAABl-scoped");
	}

	#[test]
	fn secret_serializes_as_plain_string() {
		let secret: TokenSecret = serde_json::from_str("\"gAAAAABl-unscoped\"")
			.expect("Token secret should deserialize from a JSON string.");

		assert_eq!(secret.expose(), "gAAAAABl-unscoped");
		assert_eq!(
			serde_json::to_string(&secret).expect("Token secret should serialize."),
			"\"gAAAAABl-unscoped\""
		);
	}
}
