use crate::Error;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque comment identifier, only ever compared and echoed back to the backend.
///
/// The backend hands out numeric datastore keys, but nothing here depends on that:
/// both JSON strings and JSON integers are accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentId(String);
impl CommentId {
	#[must_use]
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for CommentId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for CommentId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<u64> for CommentId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl<'de> Deserialize<'de> for CommentId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Wire {
			Text(String),
			Unsigned(u64),
			Signed(i64),
		}

		Ok(match Wire::deserialize(deserializer)? {
			Wire::Text(text) => Self(text),
			Wire::Unsigned(number) => Self(number.to_string()),
			Wire::Signed(number) => Self(number.to_string()),
		})
	}
}

impl Serialize for CommentId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

/// One guestbook entry as served by the comments backend.
///
/// The backend's encoder drops `null` properties, so the display fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
	pub id: CommentId,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub date: String,
	#[serde(default)]
	pub message: String,
}

impl Comment {
	#[must_use]
	pub fn new(id: impl Into<CommentId>, name: impl Into<String>, date: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			date: date.into(),
			message: message.into(),
		}
	}
}

/// Parses a comment list response body. Order is kept as served.
///
/// # Errors
///
/// Iff `body` is not a JSON array of comment records.
pub fn parse_comments(body: &str) -> Result<Vec<Comment>, Error> {
	Ok(serde_json::from_str(body)?)
}
