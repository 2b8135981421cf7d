use crate::{dom::Dom, Error};
use tracing::{debug, instrument};

/// Dolphin animations, one of which greets each visitor.
pub const GREETINGS: [&str; 4] = [
	r#"<iframe class="embed-responsive-item" src="https://giphy.com/embed/jvucQj4J72dPO" width="480" height="270" frameBorder="0" class="giphy-embed" allowFullScreen></iframe>"#,
	r#"<iframe class="embed-responsive-item" src="https://giphy.com/embed/JwvHIPKRcK4lG" width="480" height="270" frameBorder="0" class="giphy-embed" allowFullScreen></iframe>"#,
	r#"<iframe class="embed-responsive-item" src="https://giphy.com/embed/26BkLyDcbBJ8lTBS0" width="480" height="270" frameBorder="0" class="giphy-embed" allowFullScreen></iframe>"#,
	r#"<iframe class="embed-responsive-item" src="https://giphy.com/embed/dvWHVxunxwimQ" width="480" height="270" frameBorder="0" class="giphy-embed" allowFullScreen></iframe>"#,
];

/// Picks one of [`GREETINGS`] uniformly.
///
/// `random` yields a sample in `[0, 1)`, like [***Math.random()***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Math/random).
/// Samples outside that range are clamped, so the result is always one of [`GREETINGS`].
#[must_use]
pub fn pick_greeting(random: impl FnOnce() -> f64) -> &'static str {
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
	let index = (random() * GREETINGS.len() as f64) as usize; // Saturating, NaN becomes 0.
	GREETINGS[index.min(GREETINGS.len() - 1)]
}

/// Replaces the content of `#container_id` with a [`pick_greeting`] choice.
///
/// # Errors
///
/// Iff there is no such container.
#[instrument(skip(dom, random))]
pub fn show_greeting<D: Dom>(dom: &D, container_id: &str, random: impl FnOnce() -> f64) -> Result<&'static str, Error> {
	let container = dom.element_by_id(container_id).ok_or_else(|| Error::MissingElement(container_id.to_owned()))?;
	let greeting = pick_greeting(random);
	dom.set_inner_html(&container, greeting);
	debug!("Greeting injected.");
	Ok(greeting)
}
