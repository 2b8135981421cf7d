//! Browser entry point.

use crate::{
	config::CONFIG_ELEMENT_ID,
	fetch::FetchService,
	google_maps::{self, GoogleMap},
	map::MapView,
	page::Page,
	web_dom::WebDom,
	Config,
};
use core::cell::RefCell;
use std::rc::Rc;
use tracing::{info, instrument};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

/// What [`mount`] shows. Kept for the rest of the page's lifetime, since the DOM's listeners live in here.
struct Mounted {
	_page: Rc<Page<WebDom, FetchService>>,
	_map: Option<MapView<GoogleMap>>,
}

thread_local! {
	static MOUNTED: RefCell<Option<Mounted>> = RefCell::new(None);
}

/// Reads the page's [`Config`] from `<script type="application/json" id="portfolio-config">`, if present.
#[must_use]
pub fn read_config(document: &Document) -> Config {
	match document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|element| element.text_content()) {
		Some(json) => Config::from_json_or_default(&json),
		None => Config::default(),
	}
}

#[wasm_bindgen(start)]
pub fn start() {
	console_error_panic_hook::set_once();
	// Already set if the embedding page (or a test harness) installed its own subscriber.
	let _ = tracing_wasm::try_set_as_global_default();
	mount();
}

/// Shows the greeting, starts loading the guestbook and places the map markers.
///
/// Mounting again replaces the previous page, whose delete buttons stop working.
#[instrument]
pub fn mount() {
	let dom = Rc::new(WebDom::current());
	let config = read_config(dom.document());
	let service = Rc::new(FetchService::current(&config));
	let page = Rc::new(Page::new(config, Rc::clone(&dom), service));

	page.show_greeting(js_sys::Math::random);

	let map = match page.map_container() {
		Some(element) if google_maps::is_loaded() => match GoogleMap::new(&element) {
			Ok(widget) => Some(page.show_landmarks(widget)),
			Err(error) => {
				info!("Not showing the map: {}", error);
				None
			}
		},
		Some(_) => {
			info!("Not showing the map: `google.maps` is not loaded.");
			None
		}
		None => None,
	};

	{
		let page = Rc::clone(&page);
		spawn_local(async move {
			page.load_comments().await;
		});
	}

	MOUNTED.with(|mounted| {
		*mounted.borrow_mut() = Some(Mounted { _page: page, _map: map });
	});
}
