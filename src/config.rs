use crate::Error;
use serde::Deserialize;

/// `id` of the optional `<script type="application/json">` element the browser entry point reads its [`Config`] from.
pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";

/// Endpoints and container ids for one page.
///
/// Every key is optional; omitted ones keep their [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	pub comments_url: String,
	pub delete_url: String,
	pub greeting_container: String,
	pub messages_container: String,
	pub map_container: String,
	pub delete_label: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			comments_url: "/data".to_owned(),
			delete_url: "/delete-data".to_owned(),
			greeting_container: "greeting-container".to_owned(),
			messages_container: "messages-container".to_owned(),
			map_container: "map".to_owned(),
			delete_label: "Delete".to_owned(),
		}
	}
}

impl Config {
	/// # Errors
	///
	/// Iff `json` isn't an object of known configuration keys.
	pub fn from_json(json: &str) -> Result<Self, Error> {
		Ok(serde_json::from_str(json)?)
	}

	/// Like [`Config::from_json`], but falls back to the defaults with a warning.
	#[must_use]
	pub fn from_json_or_default(json: &str) -> Self {
		Self::from_json(json).unwrap_or_else(|error| {
			tracing::warn!("Ignoring malformed page configuration: {}", error);
			Self::default()
		})
	}
}
