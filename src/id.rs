//! Validated client identifiers used to key per-client buckets.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Client key cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Client key contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Client key exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier of a logical client (remote address, agent id, API key id).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientKey(String);
impl ClientKey {
	/// Creates a new key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl AsRef<str> for ClientKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ClientKey> for String {
	fn from(value: ClientKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientKey {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ClientKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientKey({})", self.0)
	}
}
impl Display for ClientKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_reject_whitespace_and_empty_values() {
		assert_eq!(ClientKey::new(""), Err(IdentifierError::Empty));
		assert_eq!(ClientKey::new(" 10.0.0.1"), Err(IdentifierError::ContainsWhitespace));
		assert_eq!(
			ClientKey::new(format!("a{}b", '\u{00A0}')),
			Err(IdentifierError::ContainsWhitespace)
		);

		let key = ClientKey::new("10.0.0.1").expect("IPv4 address should be a valid key.");

		assert_eq!(key.as_ref(), "10.0.0.1");
		assert_eq!(format!("{key:?}"), "ClientKey(10.0.0.1)");
	}

	#[test]
	fn length_limit_is_inclusive() {
		ClientKey::new("k".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert_eq!(
			ClientKey::new("k".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN })
		);
	}

	#[test]
	fn serde_enforces_validation() {
		let key: ClientKey =
			serde_json::from_str("\"agent-7\"").expect("Key should deserialize successfully.");

		assert_eq!(key.as_ref(), "agent-7");
		assert!(serde_json::from_str::<ClientKey>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_str_lookup() {
		let map = HashMap::from([(
			ClientKey::new("agent-7").expect("Key used for lookup should be valid."),
			1_u8,
		)]);

		assert_eq!(map.get("agent-7"), Some(&1));
	}
}
