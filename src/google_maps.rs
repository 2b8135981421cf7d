//! [`MapWidget`] over the [Google Maps JavaScript API](https://developers.google.com/maps/documentation/javascript).
//!
//! The API script has to be loaded by the page itself.

use crate::{
	error::js_message,
	map::{Landmark, MapWidget, MAP_CENTER, MAP_ZOOM},
	Error,
};
use core::cell::RefCell;
use js_sys::{Object, Reflect};
use tracing::{instrument, trace};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Map)]
	#[derive(Debug, Clone)]
	type GMap;

	#[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Map", catch)]
	fn new(element: &web_sys::Element, options: &Object) -> Result<GMap, JsValue>;

	#[wasm_bindgen(js_namespace = ["google", "maps"])]
	#[derive(Debug, Clone)]
	type Marker;

	#[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Marker", catch)]
	fn new(options: &Object) -> Result<Marker, JsValue>;

	#[wasm_bindgen(method, js_name = addListener)]
	fn add_listener(this: &Marker, event: &str, handler: &js_sys::Function);

	#[wasm_bindgen(js_namespace = ["google", "maps"])]
	#[derive(Debug, Clone)]
	type InfoWindow;

	#[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "InfoWindow", catch)]
	fn new(options: &Object) -> Result<InfoWindow, JsValue>;

	#[wasm_bindgen(method)]
	fn open(this: &InfoWindow, map: &GMap, anchor: &Marker);
}

/// Whether `google.maps` is available on the page.
#[must_use]
pub fn is_loaded() -> bool {
	Reflect::get(&js_sys::global(), &"google".into())
		.ok()
		.filter(|google| google.is_object())
		.and_then(|google| Reflect::get(&google, &"maps".into()).ok())
		.map_or(false, |maps| maps.is_object())
}

fn object(properties: &[(&str, JsValue)]) -> Result<Object, Error> {
	let object = Object::new();
	for (key, value) in properties {
		Reflect::set(&object, &JsValue::from_str(key), value).map_err(|error| Error::Map(js_message(&error)))?;
	}
	Ok(object)
}

fn lat_lng(latitude: f64, longitude: f64) -> Result<Object, Error> {
	object(&[("lat", latitude.into()), ("lng", longitude.into())])
}

/// A Google map with one popup per marker.
///
/// Owns the marker click handlers, so it has to outlive the map element's time on the page.
pub struct GoogleMap {
	map: GMap,
	listeners: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl GoogleMap {
	/// Creates the map inside `element`, centred on [`MAP_CENTER`].
	///
	/// # Errors
	///
	/// Iff the Maps API is missing or rejects the options.
	#[instrument]
	pub fn new(element: &web_sys::Element) -> Result<Self, Error> {
		if !is_loaded() {
			return Err(Error::Map("`google.maps` is not loaded".to_owned()));
		}

		let (latitude, longitude) = MAP_CENTER;
		let options = object(&[("center", lat_lng(latitude, longitude)?.into()), ("zoom", f64::from(MAP_ZOOM).into())])?;
		let map = GMap::new(element, &options).map_err(|error| Error::Map(js_message(&error)))?;
		Ok(Self {
			map,
			listeners: RefCell::default(),
		})
	}
}

impl MapWidget for GoogleMap {
	#[instrument(skip(self))]
	fn place_marker(&self, landmark: &Landmark) -> Result<(), Error> {
		let to_error = |error: JsValue| Error::Map(js_message(&error));

		let position = lat_lng(landmark.latitude, landmark.longitude)?;
		let marker = Marker::new(&object(&[("position", position.into()), ("map", self.map.clone().into()), ("title", landmark.label.into())])?).map_err(to_error)?;
		let popup = InfoWindow::new(&object(&[("content", landmark.label.into())])?).map_err(to_error)?;

		let listener = {
			let map = self.map.clone();
			let marker = marker.clone();
			Closure::wrap(Box::new(move || popup.open(&map, &marker)) as Box<dyn Fn()>)
		};
		marker.add_listener("click", listener.as_ref().unchecked_ref());
		self.listeners.borrow_mut().push(listener);
		trace!("Marker placed.");
		Ok(())
	}
}
