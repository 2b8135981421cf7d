//! In-memory stand-ins for the browser: a [`Dom`], a [`CommentsService`] and a [`MapWidget`].
//!
//! They behave like their browser counterparts where the page can observe it,
//! and record what happened for inspection.

use crate::{
	comment::{parse_comments, CommentId},
	dom::Dom,
	map::{Landmark, MapWidget},
	service::CommentsService,
	snapshot, Comment, Error,
};
use core::cell::{Cell, RefCell};
use futures::future::{self, LocalBoxFuture};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{trace, warn};

/// Handle to a [`MemoryDom`] element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum Content {
	Element { name: String, attributes: Vec<(String, String)> },
	Text(String),
	Markup(String),
}

#[derive(Debug)]
struct NodeData {
	content: Content,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// Arena-backed document with a single `<body>` root.
///
/// Nodes are never freed, only detached, so stale [`NodeId`]s stay valid to inspect.
pub struct MemoryDom {
	nodes: RefCell<Vec<NodeData>>,
	listeners: RefCell<HashMap<NodeId, Vec<Rc<dyn Fn()>>>>,
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDom {
	const BODY: NodeId = NodeId(0);

	#[must_use]
	pub fn new() -> Self {
		Self {
			nodes: RefCell::new(vec![NodeData {
				content: Content::Element {
					name: "body".to_owned(),
					attributes: vec![],
				},
				parent: None,
				children: vec![],
			}]),
			listeners: RefCell::default(),
		}
	}

	#[must_use]
	pub fn body(&self) -> NodeId {
		Self::BODY
	}

	/// Appends `<div id="{id}">` to the body.
	pub fn add_container(&self, id: &str) -> NodeId {
		let container = self.push(Content::Element {
			name: "div".to_owned(),
			attributes: vec![("id".to_owned(), id.to_owned())],
		});
		self.attach(Self::BODY, container);
		container
	}

	/// Runs the click handlers of `node` like a user activation would.
	/// Returns how many ran.
	pub fn click(&self, node: NodeId) -> usize {
		// Handlers may remove their own node, so they can't run under the borrow.
		let handlers = self.listeners.borrow().get(&node).cloned().unwrap_or_default();
		for handler in &handlers {
			handler()
		}
		handlers.len()
	}

	/// Number of click handlers currently registered.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().values().map(Vec::len).sum()
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes.borrow()[node.0].parent
	}

	/// Whether `node` is (transitively) inside the body.
	#[must_use]
	pub fn is_attached(&self, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(node) = current {
			if node == Self::BODY {
				return true;
			}
			current = self.parent(node);
		}
		false
	}

	/// Child elements of `node`, skipping text and markup.
	#[must_use]
	pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
		let nodes = self.nodes.borrow();
		nodes[node.0].children.iter().copied().filter(|child| matches!(nodes[child.0].content, Content::Element { .. })).collect()
	}

	/// Descendant elements of `node` named `name`, in document order.
	#[must_use]
	pub fn elements_by_tag(&self, node: NodeId, name: &str) -> Vec<NodeId> {
		let mut found = vec![];
		for child in self.child_elements(node) {
			if matches!(&self.nodes.borrow()[child.0].content, Content::Element { name: n, .. } if n == name) {
				found.push(child)
			}
			found.extend(self.elements_by_tag(child, name))
		}
		found
	}

	fn push(&self, content: Content) -> NodeId {
		let mut nodes = self.nodes.borrow_mut();
		nodes.push(NodeData {
			content,
			parent: None,
			children: vec![],
		});
		NodeId(nodes.len() - 1)
	}

	fn attach(&self, parent: NodeId, child: NodeId) {
		self.detach(child);
		let mut nodes = self.nodes.borrow_mut();
		nodes[child.0].parent = Some(parent);
		nodes[parent.0].children.push(child);
	}

	fn detach(&self, node: NodeId) {
		let mut nodes = self.nodes.borrow_mut();
		if let Some(parent) = nodes[node.0].parent.take() {
			nodes[parent.0].children.retain(|&child| child != node);
		}
	}

	fn subtree(&self, node: NodeId) -> Vec<NodeId> {
		let nodes = self.nodes.borrow();
		let mut subtree = vec![node];
		let mut i = 0;
		while i < subtree.len() {
			subtree.extend(nodes[subtree[i].0].children.iter().copied());
			i += 1;
		}
		subtree
	}

	fn check_element(&self, node: NodeId) -> Result<(), Error> {
		match self.nodes.borrow().get(node.0).map(|data| &data.content) {
			Some(Content::Element { .. }) => Ok(()),
			Some(_) => Err(Error::Dom(format!("{:?} is not an element", node))),
			None => Err(Error::Dom(format!("{:?} does not exist", node))),
		}
	}

	fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(node) = current {
			if node == ancestor {
				return true;
			}
			current = self.parent(node);
		}
		false
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;

	fn element_by_id(&self, id: &str) -> Option<NodeId> {
		self.subtree(Self::BODY).into_iter().find(|node| match &self.nodes.borrow()[node.0].content {
			Content::Element { attributes, .. } => attributes.iter().any(|(name, value)| name == "id" && value == id),
			Content::Text(_) | Content::Markup(_) => false,
		})
	}

	fn create_element(&self, tag: &str) -> Result<NodeId, Error> {
		if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
			return Err(Error::Dom(format!("invalid tag name {:?}", tag)));
		}
		Ok(self.push(Content::Element {
			name: tag.to_ascii_lowercase(),
			attributes: vec![],
		}))
	}

	fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), Error> {
		if name.is_empty() || name.chars().any(|c| c.is_whitespace() || "\"'>/=".contains(c)) {
			return Err(Error::Dom(format!("invalid attribute name {:?}", name)));
		}
		match &mut self.nodes.borrow_mut()[node.0].content {
			Content::Element { attributes, .. } => {
				match attributes.iter_mut().find(|(n, _)| n == name) {
					Some((_, v)) => *v = value.to_owned(),
					None => attributes.push((name.to_owned(), value.to_owned())),
				}
				Ok(())
			}
			Content::Text(_) | Content::Markup(_) => Err(Error::Dom(format!("{:?} is not an element", node))),
		}
	}

	fn append_text(&self, parent: &NodeId, text: &str) -> Result<(), Error> {
		self.check_element(*parent)?;
		let text = self.push(Content::Text(text.to_owned()));
		self.attach(*parent, text);
		Ok(())
	}

	fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), Error> {
		self.check_element(*parent)?;
		self.check_element(*child)?;
		if self.contains(*child, *parent) {
			return Err(Error::Dom("the new child is an ancestor of the parent".to_owned()));
		}
		self.attach(*parent, *child);
		Ok(())
	}

	fn set_inner_html(&self, node: &NodeId, markup: &str) {
		let children = self.nodes.borrow().get(node.0).map(|data| data.children.clone()).unwrap_or_default();
		for child in children {
			self.remove(&child)
		}
		let markup = self.push(Content::Markup(markup.to_owned()));
		self.attach(*node, markup);
	}

	fn on_click(&self, node: &NodeId, handler: Box<dyn Fn()>) -> Result<(), Error> {
		self.check_element(*node)?;
		self.listeners.borrow_mut().entry(*node).or_default().push(Rc::from(handler));
		Ok(())
	}

	fn remove(&self, node: &NodeId) {
		let mut listeners = self.listeners.borrow_mut();
		for node in self.subtree(*node) {
			if let Some(released) = listeners.remove(&node) {
				trace!("Released {} listener(s) of {:?}.", released.len(), node);
			}
		}
		drop(listeners);
		self.detach(*node);
	}

	fn snapshot(&self, node: &NodeId) -> snapshot::Element {
		let nodes = self.nodes.borrow();
		if !matches!(nodes[node.0].content, Content::Element { .. }) {
			warn!("Snapshotting non-element {:?} as a nameless element.", node);
		}
		snapshot_of(&nodes, *node)
	}
}

fn snapshot_of(nodes: &[NodeData], node: NodeId) -> snapshot::Element {
	let data = &nodes[node.0];
	let (name, attributes) = match &data.content {
		Content::Element { name, attributes } => (name.clone(), attributes.clone()),
		Content::Text(_) | Content::Markup(_) => (String::new(), vec![]),
	};
	snapshot::Element {
		name,
		attributes,
		children: data
			.children
			.iter()
			.map(|&child| match &nodes[child.0].content {
				Content::Element { .. } => snapshot::Node::Element(snapshot_of(nodes, child)),
				Content::Text(text) => snapshot::Node::Text(text.clone()),
				Content::Markup(markup) => snapshot::Node::Markup(markup.clone()),
			})
			.collect(),
	}
}

/// What a [`StaticComments`] answers comment list requests with.
#[derive(Debug, Clone)]
pub enum Canned {
	/// A `200 OK` with this body.
	Body(String),
	/// A non-2xx status.
	Status(u16),
	/// The request never completes successfully.
	Unreachable(String),
}

/// [`CommentsService`] that serves a canned response and records deletes.
///
/// Deleting doesn't change what later fetches return, like a backend whose deletes fail silently.
#[derive(Debug)]
pub struct StaticComments {
	url: String,
	response: RefCell<Canned>,
	fetches: Cell<usize>,
	deleted: RefCell<Vec<CommentId>>,
}

impl StaticComments {
	#[must_use]
	pub fn new(response: Canned) -> Self {
		Self {
			url: "/data".to_owned(),
			response: RefCell::new(response),
			fetches: Cell::new(0),
			deleted: RefCell::default(),
		}
	}

	/// Serves `comments` as a JSON array.
	///
	/// # Panics
	///
	/// Never; comments always serialise.
	#[must_use]
	pub fn with_comments(comments: &[Comment]) -> Self {
		Self::new(Canned::Body(serde_json::to_string(comments).expect("comments serialise")))
	}

	pub fn set_response(&self, response: Canned) {
		*self.response.borrow_mut() = response
	}

	#[must_use]
	pub fn fetch_count(&self) -> usize {
		self.fetches.get()
	}

	/// Ids of the delete requests received so far, in order.
	#[must_use]
	pub fn deleted_ids(&self) -> Vec<CommentId> {
		self.deleted.borrow().clone()
	}
}

impl CommentsService for StaticComments {
	fn fetch_comments(&self) -> LocalBoxFuture<'_, Result<Vec<Comment>, Error>> {
		self.fetches.set(self.fetches.get() + 1);
		let result = match &*self.response.borrow() {
			Canned::Body(body) => parse_comments(body),
			Canned::Status(status) => Err(Error::Status {
				url: self.url.clone(),
				status: *status,
			}),
			Canned::Unreachable(message) => Err(Error::Network {
				url: self.url.clone(),
				message: message.clone(),
			}),
		};
		Box::pin(future::ready(result))
	}

	fn delete_comment(&self, id: &CommentId) {
		self.deleted.borrow_mut().push(id.clone())
	}
}

/// [`MapWidget`] that keeps its markers in a list.
#[derive(Debug, Default)]
pub struct MemoryMap {
	markers: RefCell<Vec<Landmark>>,
	open_popup: RefCell<Option<&'static str>>,
}

impl MemoryMap {
	#[must_use]
	pub fn markers(&self) -> Vec<Landmark> {
		self.markers.borrow().clone()
	}

	/// Clicks the `index`th marker, opening its popup. Returns the popup's text.
	pub fn click_marker(&self, index: usize) -> Option<&'static str> {
		let label = self.markers.borrow().get(index)?.label;
		*self.open_popup.borrow_mut() = Some(label);
		Some(label)
	}

	#[must_use]
	pub fn open_popup(&self) -> Option<&'static str> {
		*self.open_popup.borrow()
	}
}

impl MapWidget for MemoryMap {
	fn place_marker(&self, landmark: &Landmark) -> Result<(), Error> {
		if !landmark.latitude.is_finite() || !landmark.longitude.is_finite() {
			return Err(Error::Map(format!("{:?} has no finite position", landmark.label)));
		}
		self.markers.borrow_mut().push(*landmark);
		Ok(())
	}
}
