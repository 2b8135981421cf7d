//! The document the page renders into.
//!
//! Components only talk to the [`Dom`] trait, so the same rendering code drives the
//! browser's document ([`WebDom`](`crate::web_dom::WebDom`), `wasm32` only) and the
//! headless [`MemoryDom`](`crate::headless::MemoryDom`), not `wasm32`.

use crate::{snapshot, Error};

pub trait Dom {
	/// Cheap handle to one element.
	type Node: Clone + 'static;

	fn element_by_id(&self, id: &str) -> Option<Self::Node>;

	/// Creates a detached element.
	///
	/// # Errors
	///
	/// Iff the host rejects `tag`.
	fn create_element(&self, tag: &str) -> Result<Self::Node, Error>;

	/// # Errors
	///
	/// Iff the host rejects the attribute name.
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), Error>;

	/// Appends `text` as a text node, never as markup.
	///
	/// # Errors
	///
	/// Iff the host fails to insert the node.
	fn append_text(&self, parent: &Self::Node, text: &str) -> Result<(), Error>;

	/// # Errors
	///
	/// Iff the host fails to insert the node.
	fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Error>;

	/// Replaces all children of `node` with `markup`, which is **not** escaped.
	fn set_inner_html(&self, node: &Self::Node, markup: &str);

	/// Registers `handler` to run whenever `node` is clicked.
	///
	/// The handler lives until `node` (or an ancestor) is [`remove`](`Dom::remove`)d through this host.
	///
	/// # Errors
	///
	/// Iff the host can't attach the listener.
	fn on_click(&self, node: &Self::Node, handler: Box<dyn Fn()>) -> Result<(), Error>;

	/// Detaches `node` from its parent and releases the click handlers of its whole subtree.
	fn remove(&self, node: &Self::Node);

	fn snapshot(&self, node: &Self::Node) -> snapshot::Element;
}
