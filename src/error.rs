use thiserror::Error;

/// Everything that can go wrong between the page, its DOM host and the comments backend.
///
/// None of these are fatal: the page logs them and carries on with whatever it already shows.
#[derive(Debug, Error)]
pub enum Error {
	#[error("element #{0} not found")]
	MissingElement(String),

	#[error("request to {url} failed: {message}")]
	Network { url: String, message: String },

	#[error("{url} responded with HTTP {status}")]
	Status { url: String, status: u16 },

	#[error("malformed comment list: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("DOM operation failed: {0}")]
	Dom(String),

	#[error("map widget failed: {0}")]
	Map(String),
}

#[cfg(target_arch = "wasm32")]
impl Error {
	/// Wraps a thrown [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) value from a DOM call.
	pub(crate) fn dom(error: &wasm_bindgen::JsValue) -> Self {
		Self::Dom(js_message(error))
	}
}

/// Best-effort human readable rendition of a thrown value.
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_message(error: &wasm_bindgen::JsValue) -> String {
	use wasm_bindgen::JsCast;

	if let Some(error) = error.dyn_ref::<js_sys::Error>() {
		String::from(error.message())
	} else if let Some(string) = error.as_string() {
		string
	} else {
		format!("{:?}", error)
	}
}
