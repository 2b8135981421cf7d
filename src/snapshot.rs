//! Owned, host-independent copies of rendered subtrees.
//!
//! Both [`Dom`](`crate::dom::Dom`) hosts can [`snapshot`](`crate::dom::Dom::snapshot`) a node,
//! which is what the tests compare against instead of poking at host internals.

use html_escape::{encode_double_quoted_attribute, encode_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(Element),
	Text(String),
	/// Markup injected verbatim that the host didn't parse.
	Markup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	/// Lower-case tag name.
	pub name: String,
	pub attributes: Vec<(String, String)>,
	pub children: Vec<Node>,
}

impl Element {
	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
	}

	/// Concatenated text of all descendant text nodes, like [***textContent***](https://developer.mozilla.org/en-US/docs/Web/API/Node/textContent).
	#[must_use]
	pub fn text_content(&self) -> String {
		let mut text = String::new();
		self.collect_text(&mut text);
		text
	}

	fn collect_text(&self, text: &mut String) {
		for child in &self.children {
			match child {
				Node::Element(element) => element.collect_text(text),
				Node::Text(data) => text.push_str(data),
				Node::Markup(_) => (),
			}
		}
	}

	/// Direct child elements, skipping text.
	pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
		self.children.iter().filter_map(|child| match child {
			Node::Element(element) => Some(element),
			Node::Text(_) | Node::Markup(_) => None,
		})
	}

	/// Descendant elements named `name`, in document order.
	#[must_use]
	pub fn elements_by_tag(&self, name: &str) -> Vec<&Element> {
		let mut found = vec![];
		self.collect_by_tag(name, &mut found);
		found
	}

	fn collect_by_tag<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
		for element in self.child_elements() {
			if element.name.eq_ignore_ascii_case(name) {
				found.push(element)
			}
			element.collect_by_tag(name, found)
		}
	}

	/// Serialises the subtree. Text is escaped, [`Node::Markup`] is written as-is.
	#[must_use]
	pub fn to_html(&self) -> String {
		let mut html = String::new();
		self.write_html(&mut html);
		html
	}

	fn write_html(&self, html: &mut String) {
		html.push('<');
		html.push_str(&self.name);
		for (name, value) in &self.attributes {
			html.push(' ');
			html.push_str(name);
			html.push_str("=\"");
			html.push_str(&encode_double_quoted_attribute(value));
			html.push('"');
		}
		html.push('>');
		for child in &self.children {
			match child {
				Node::Element(element) => element.write_html(html),
				Node::Text(text) => html.push_str(&encode_text(text)),
				Node::Markup(markup) => html.push_str(markup),
			}
		}
		html.push_str("</");
		html.push_str(&self.name);
		html.push('>');
	}
}
