use crate::Error;
use tracing::{debug, error, instrument};

/// A labelled map marker position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
	pub label: &'static str,
	pub latitude: f64,
	pub longitude: f64,
}

impl Landmark {
	#[must_use]
	pub const fn new(label: &'static str, latitude: f64, longitude: f64) -> Self {
		Self { label, latitude, longitude }
	}
}

/// The places shown on the portfolio's map.
pub const LANDMARKS: &[Landmark] = &[
	Landmark::new("Googleplex", 37.422, -122.0841),
	Landmark::new("Golden Gate Bridge", 37.8199, -122.4783),
	Landmark::new("Monterey Bay Aquarium", 36.6181, -121.9018),
	Landmark::new("Yosemite Valley", 37.7456, -119.5936),
	Landmark::new("Lake Tahoe", 39.0968, -120.0324),
];

/// Initial `(latitude, longitude)` of the map viewport.
pub const MAP_CENTER: (f64, f64) = (37.5, -121.0);
pub const MAP_ZOOM: u8 = 6;

/// A third-party map showing markers with a popup each.
pub trait MapWidget {
	/// Places a marker at `landmark` that shows its [`label`](`Landmark::label`) in a popup when clicked.
	///
	/// # Errors
	///
	/// Iff the widget rejects the marker.
	fn place_marker(&self, landmark: &Landmark) -> Result<(), Error>;
}

/// The page's one map widget handle.
#[derive(Debug)]
pub struct MapView<W> {
	widget: W,
	markers: usize,
}

impl<W: MapWidget> MapView<W> {
	#[must_use]
	pub fn new(widget: W) -> Self {
		Self { widget, markers: 0 }
	}

	/// Places one marker per landmark, skipping (and logging) the ones the widget rejects.
	///
	/// Returns the number of markers placed by this call.
	#[instrument(skip(self, landmarks), fields(count = landmarks.len()))]
	pub fn place_landmarks(&mut self, landmarks: &[Landmark]) -> usize {
		let mut placed = 0;
		for landmark in landmarks {
			match self.widget.place_marker(landmark) {
				Ok(()) => placed += 1,
				Err(error) => error!("Failed to place marker {:?}: {}", landmark.label, error),
			}
		}
		self.markers += placed;
		debug!("Placed {} of {} marker(s).", placed, landmarks.len());
		placed
	}

	/// Markers placed over this view's lifetime.
	#[must_use]
	pub fn marker_count(&self) -> usize {
		self.markers
	}

	#[must_use]
	pub fn widget(&self) -> &W {
		&self.widget
	}
}
