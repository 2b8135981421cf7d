use crate::{
	dom::Dom,
	greeting,
	map::{MapView, MapWidget, LANDMARKS},
	service::CommentsService,
	view::CommentListView,
	Config,
};
use std::rc::Rc;
use tracing::{info, instrument, warn};

/// Everything the portfolio page shows, wired to one [`Dom`] and one [`CommentsService`].
pub struct Page<D, S> {
	config: Config,
	dom: Rc<D>,
	comments: CommentListView<D, S>,
}

impl<D, S> Page<D, S>
where
	D: Dom + 'static,
	S: CommentsService + 'static,
{
	#[must_use]
	pub fn new(config: Config, dom: Rc<D>, service: Rc<S>) -> Self {
		let comments = CommentListView::new(Rc::clone(&dom), service, config.messages_container.clone()).with_delete_label(config.delete_label.clone());
		Self { config, dom, comments }
	}

	/// Shows a random greeting, if the page has a place for it.
	///
	/// Returns the injected markup.
	#[instrument(skip(self, random))]
	pub fn show_greeting(&self, random: impl FnOnce() -> f64) -> Option<&'static str> {
		match greeting::show_greeting(&*self.dom, &self.config.greeting_container, random) {
			Ok(greeting) => Some(greeting),
			Err(error) => {
				warn!("Not showing a greeting: {}", error);
				None
			}
		}
	}

	/// Loads the guestbook once. See [`CommentListView::load_comments`].
	pub async fn load_comments(&self) -> usize {
		self.comments.load_comments().await
	}

	/// Places [`LANDMARKS`] on `widget`, which the returned view then owns.
	#[instrument(skip(self, widget))]
	pub fn show_landmarks<W: MapWidget>(&self, widget: W) -> MapView<W> {
		let mut map = MapView::new(widget);
		let placed = map.place_landmarks(LANDMARKS);
		info!("Map shows {} landmark(s).", placed);
		map
	}

	/// The page's element for the map, if it has one.
	#[must_use]
	pub fn map_container(&self) -> Option<D::Node> {
		self.dom.element_by_id(&self.config.map_container)
	}
}
