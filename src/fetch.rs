use crate::{
	comment::{parse_comments, CommentId},
	error::{js_message, Error},
	service::CommentsService,
	Comment, Config,
};
use futures::future::LocalBoxFuture;
use tracing::{debug, instrument, trace, trace_span, Instrument};
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{RequestInit, Response, UrlSearchParams, Window};

/// [`CommentsService`] over [***fetch***](https://developer.mozilla.org/en-US/docs/Web/API/Fetch_API).
#[derive(Debug, Clone)]
pub struct FetchService {
	window: Window,
	comments_url: String,
	delete_url: String,
}

impl FetchService {
	#[must_use]
	pub fn new(window: Window, config: &Config) -> Self {
		Self {
			window,
			comments_url: config.comments_url.clone(),
			delete_url: config.delete_url.clone(),
		}
	}

	/// # Panics
	///
	/// Throws into JavaScript outside of a window context.
	#[must_use]
	pub fn current(config: &Config) -> Self {
		Self::new(web_sys::window().expect_throw("portfolio-dom: No `window` found."), config)
	}

	async fn get_text(&self, url: &str) -> Result<String, Error> {
		let network = |error: JsValue| Error::Network {
			url: url.to_owned(),
			message: js_message(&error),
		};

		let response: Response = JsFuture::from(self.window.fetch_with_str(url)).await.map_err(network)?.unchecked_into();
		if !response.ok() {
			return Err(Error::Status {
				url: url.to_owned(),
				status: response.status(),
			});
		}
		let text = JsFuture::from(response.text().map_err(network)?).await.map_err(network)?;
		text.as_string().ok_or_else(|| Error::Network {
			url: url.to_owned(),
			message: "response body is not text".to_owned(),
		})
	}
}

/// The `application/x-www-form-urlencoded` body of a delete request: a single `id` field.
///
/// # Errors
///
/// Iff [***URLSearchParams***](https://developer.mozilla.org/en-US/docs/Web/API/URLSearchParams) is unavailable.
pub fn delete_body(id: &CommentId) -> Result<UrlSearchParams, Error> {
	let params = UrlSearchParams::new().map_err(|error| Error::dom(&error))?;
	params.append("id", id.as_str());
	Ok(params)
}

impl CommentsService for FetchService {
	fn fetch_comments(&self) -> LocalBoxFuture<'_, Result<Vec<Comment>, Error>> {
		let span = trace_span!("fetch_comments", url = %self.comments_url);
		Box::pin(
			async move {
				let body = self.get_text(&self.comments_url).await?;
				trace!("Received {} byte(s).", body.len());
				parse_comments(&body)
			}
			.instrument(span),
		)
	}

	#[instrument(skip(self), fields(url = %self.delete_url))]
	fn delete_comment(&self, id: &CommentId) {
		let body = match delete_body(id) {
			Ok(body) => body,
			Err(error) => return debug!("Not sending delete request: {}", error),
		};

		let init = RequestInit::new();
		init.set_method("POST");
		init.set_body(&body.into());

		let request = self.window.fetch_with_str_and_init(&self.delete_url, &init);
		spawn_local(async move {
			// Not inspected: any outcome counts as done.
			let settled = JsFuture::from(request).await;
			trace!(rejected = settled.is_err(), "Delete request settled.");
		});
	}
}
