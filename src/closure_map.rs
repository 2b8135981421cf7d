use core::cell::{Cell, RefCell};
use hashbrown::{hash_map::Entry, HashMap};
use std::rc::Rc;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;

/// Key under which a listener [`Closure`] is published. Stored on the element as `data-listener`.
pub(crate) type ListenerKey = u32;

/// Keeps event listener [`Closure`]s alive while their elements are in the document.
#[derive(Default)]
pub(crate) struct ClosureMap {
	next_key: Cell<ListenerKey>,
	closures: RefCell<HashMap<ListenerKey, Closure<dyn Fn()>>>,
	/// Unpublished closures that may still be on the call stack. Dropped from a microtask.
	retired: Rc<RefCell<Vec<Closure<dyn Fn()>>>>,
}

impl ClosureMap {
	pub(crate) fn publish(&self, handler: Box<dyn Fn()>) -> (ListenerKey, js_sys::Function) {
		let key = self.next_key.get();
		self.next_key.set(key.wrapping_add(1));

		let js_closure = Closure::wrap(handler);
		let function = js_closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
		match self.closures.borrow_mut().entry(key) {
			Entry::Vacant(vacant) => {
				vacant.insert(js_closure);
			}
			Entry::Occupied(mut occupied) => {
				error!("Listener key {} wrapped around onto a live closure. Replacing it.", key);
				self.retire(occupied.insert(js_closure));
			}
		}
		trace!("Created Closure {}.", key);
		(key, function)
	}

	/// Stops keeping the closure alive.
	///
	/// The closure may be the one currently executing (a delete button removing its own row),
	/// so it is parked instead of dropped right away.
	pub(crate) fn unpublish(&self, key: ListenerKey) {
		match self.closures.borrow_mut().remove(&key) {
			Some(js_closure) => {
				self.retire(js_closure);
				trace!("Retired Closure {}.", key);
			}
			None => error!("Unpublished listener key {} not found.", key),
		}
	}

	fn retire(&self, js_closure: Closure<dyn Fn()>) {
		let mut retired = self.retired.borrow_mut();
		if retired.is_empty() {
			// Microtasks only run once the JavaScript stack has unwound, so no retired closure is executing then.
			let retired = Rc::clone(&self.retired);
			spawn_local(async move {
				let dropped = retired.borrow_mut().drain(..).count();
				trace!("Dropped {} retired Closure(s).", dropped);
			});
		}
		retired.push(js_closure);
	}

	pub(crate) fn len(&self) -> usize {
		self.closures.borrow().len()
	}

	pub(crate) fn retired_len(&self) -> usize {
		self.retired.borrow().len()
	}
}
