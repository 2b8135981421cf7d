use crate::{
	closure_map::{ClosureMap, ListenerKey},
	dom::Dom,
	error::Error,
	load, snapshot,
};
use tracing::{error, instrument, trace};
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{Document, Element};

const LISTENER_ATTRIBUTE: &str = "data-listener";

/// [`Dom`] over the browser's [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// Click handlers are owned by this instance. Dropping it while its elements are still
/// in the document makes their listeners throw into [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) when activated.
pub struct WebDom {
	document: Document,
	closures: ClosureMap,
}

impl WebDom {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self {
			document,
			closures: ClosureMap::default(),
		}
	}

	/// The current page's document.
	///
	/// # Panics
	///
	/// Throws into JavaScript outside of a window context.
	#[must_use]
	pub fn current() -> Self {
		let document = web_sys::window()
			.expect_throw("portfolio-dom: No `window` found.")
			.document()
			.expect_throw("portfolio-dom: No document found.");
		Self::new(document)
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Number of click handlers currently kept alive.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.closures.len()
	}

	/// Number of released click handlers that haven't been dropped yet.
	///
	/// They are dropped in a microtask after their release.
	#[must_use]
	pub fn retired_listener_count(&self) -> usize {
		self.closures.retired_len()
	}

	fn release_descendant_listeners(&self, element: &Element) {
		match element.query_selector_all(&format!("[{}]", LISTENER_ATTRIBUTE)) {
			Ok(listening) => {
				for i in 0..listening.length() {
					if let Some(element) = listening.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
						self.release_listener(&element)
					}
				}
			}
			Err(error) => error!("Failed to find listeners below {:?}; Leaking them: {:?}", element.tag_name(), error),
		}
	}

	fn release_listener(&self, element: &Element) {
		if let Some(key) = element.get_attribute(LISTENER_ATTRIBUTE) {
			match key.parse::<ListenerKey>() {
				Ok(key) => self.closures.unpublish(key),
				Err(_) => error!("Unexpected {} value {:?}; Leaking its closure (if any).", LISTENER_ATTRIBUTE, key),
			}
		}
	}
}

impl Dom for WebDom {
	type Node = Element;

	fn element_by_id(&self, id: &str) -> Option<Element> {
		self.document.get_element_by_id(id)
	}

	fn create_element(&self, tag: &str) -> Result<Element, Error> {
		self.document.create_element(tag).map_err(|error| Error::dom(&error))
	}

	fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), Error> {
		node.set_attribute(name, value).map_err(|error| Error::dom(&error))
	}

	fn append_text(&self, parent: &Element, text: &str) -> Result<(), Error> {
		let text = self.document.create_text_node(text);
		parent.append_child(text.as_ref()).map(drop).map_err(|error| Error::dom(&error))
	}

	fn append_child(&self, parent: &Element, child: &Element) -> Result<(), Error> {
		parent.append_child(child.as_ref()).map(drop).map_err(|error| Error::dom(&error))
	}

	#[instrument(skip(self, markup))]
	fn set_inner_html(&self, node: &Element, markup: &str) {
		self.release_descendant_listeners(node);
		node.set_inner_html(markup)
	}

	#[instrument(skip(self, handler))]
	fn on_click(&self, node: &Element, handler: Box<dyn Fn()>) -> Result<(), Error> {
		if node.has_attribute(LISTENER_ATTRIBUTE) {
			return Err(Error::Dom(format!("<{}> already has a click handler", node.tag_name())));
		}

		let (key, function) = self.closures.publish(handler);
		if let Err(error) = node.set_attribute(LISTENER_ATTRIBUTE, &key.to_string()) {
			self.closures.unpublish(key);
			return Err(Error::dom(&error));
		}
		if let Err(error) = node.add_event_listener_with_callback("click", &function) {
			self.closures.unpublish(key);
			if let Err(remove_error) = node.remove_attribute(LISTENER_ATTRIBUTE) {
				error!("Failed to remove {} after a failed registration: {:?}", LISTENER_ATTRIBUTE, remove_error);
			}
			return Err(Error::dom(&error));
		}
		Ok(())
	}

	#[instrument(skip(self))]
	fn remove(&self, node: &Element) {
		self.release_listener(node);
		self.release_descendant_listeners(node);
		node.remove();
		trace!("Remaining listeners: {}", self.closures.len());
	}

	fn snapshot(&self, node: &Element) -> snapshot::Element {
		load::load_element(node)
	}
}
