//! Builds [`snapshot`](`crate::snapshot`)s from live [`web_sys`] nodes.

use crate::snapshot::{Element, Node};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Attr, Element as wElement, NamedNodeMap, NodeList, Text};

#[must_use]
pub fn load_child_nodes(child_nodes: &NodeList) -> Vec<Node> {
	(0..child_nodes.length())
		.filter_map(|i| child_nodes.item(i))
		.filter_map(|child| {
			if let Some(element) = child.dyn_ref::<wElement>() {
				Some(Node::Element(load_element(element)))
			} else if let Some(text) = child.dyn_ref::<Text>() {
				Some(Node::Text(text.data()))
			} else {
				warn!("Skipping unrecognised child node: {:?}", child);
				None
			}
		})
		.collect()
}

#[must_use]
pub fn load_element(element: &wElement) -> Element {
	let node: &web_sys::Node = element.as_ref();
	Element {
		name: element.tag_name().to_ascii_lowercase(),
		attributes: load_attributes(&element.attributes()),
		children: load_child_nodes(&node.child_nodes()),
	}
}

#[must_use]
pub fn load_attributes(attributes: &NamedNodeMap) -> Vec<(String, String)> {
	(0..attributes.length()).filter_map(|i| attributes.item(i)).map(|attribute| load_attribute(&attribute)).collect()
}

#[must_use]
pub fn load_attribute(attribute: &Attr) -> (String, String) {
	(attribute.local_name(), attribute.value())
}
