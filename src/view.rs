use crate::{comment::CommentId, dom::Dom, service::CommentsService, Comment, Error};
use std::rc::Rc;
use tracing::{debug, error, info, instrument, trace};

/// Renders the guestbook into one container and keeps it in step with user deletes.
///
/// The rendered rows are the only client-side copy of the comments. Deletes are optimistic:
/// a row disappears as soon as its button is clicked, whatever the backend makes of the request.
pub struct CommentListView<D, S> {
	dom: Rc<D>,
	service: Rc<S>,
	container_id: String,
	delete_label: String,
}

impl<D, S> CommentListView<D, S>
where
	D: Dom + 'static,
	S: CommentsService + 'static,
{
	#[must_use]
	pub fn new(dom: Rc<D>, service: Rc<S>, container_id: impl Into<String>) -> Self {
		Self {
			dom,
			service,
			container_id: container_id.into(),
			delete_label: "Delete".to_owned(),
		}
	}

	#[must_use]
	pub fn with_delete_label(mut self, delete_label: impl Into<String>) -> Self {
		self.delete_label = delete_label.into();
		self
	}

	/// Fetches the comment list once and appends one row per comment.
	///
	/// Failures are logged and leave the container as it was.
	/// Returns the number of rows added.
	pub async fn load_comments(&self) -> usize {
		match self.try_load_comments().await {
			Ok(rendered) => rendered,
			Err(error) => {
				error!("Failed to load comments: {}", error);
				0
			}
		}
	}

	/// Like [`load_comments`](`CommentListView::load_comments`), but reports why nothing was rendered.
	///
	/// Rows that fail to build individually are still only logged.
	///
	/// # Errors
	///
	/// Iff the container is missing or the comment list can't be fetched.
	pub async fn try_load_comments(&self) -> Result<usize, Error> {
		let container = self.container()?;
		let comments = self.service.fetch_comments().await?;
		info!("Fetched {} comment(s).", comments.len());

		let mut rendered = 0;
		for comment in &comments {
			match self.render_comment(&container, comment) {
				Ok(_) => rendered += 1,
				Err(error) => error!(id = %comment.id, "Failed to render comment: {}", error),
			}
		}
		Ok(rendered)
	}

	fn container(&self) -> Result<D::Node, Error> {
		self.dom.element_by_id(&self.container_id).ok_or_else(|| Error::MissingElement(self.container_id.clone()))
	}

	/// Builds the row for `comment` and appends it to `container`.
	///
	/// ```html
	/// <div class="comment">
	///   <p><b>{name}</b> | <i>{date}</i></p>
	///   <p>{message}</p>
	///   <button type="button">Delete</button>
	/// </div>
	/// ```
	///
	/// All three fields go in as text, never as markup.
	///
	/// # Errors
	///
	/// Iff the DOM host fails. Nothing is appended in that case.
	#[instrument(skip(self, container, comment), fields(id = %comment.id))]
	pub fn render_comment(&self, container: &D::Node, comment: &Comment) -> Result<D::Node, Error> {
		if cfg!(feature = "dangerous-logging") {
			trace!(name = %comment.name, date = %comment.date, message = %comment.message, "Rendering comment.");
		}

		let dom = &*self.dom;
		let row = dom.create_element("div")?;
		dom.set_attribute(&row, "class", "comment")?;

		let byline = dom.create_element("p")?;
		let name = dom.create_element("b")?;
		dom.append_text(&name, &comment.name)?;
		let date = dom.create_element("i")?;
		dom.append_text(&date, &comment.date)?;
		dom.append_child(&byline, &name)?;
		dom.append_text(&byline, " | ")?;
		dom.append_child(&byline, &date)?;

		let message = dom.create_element("p")?;
		dom.append_text(&message, &comment.message)?;

		let button = dom.create_element("button")?;
		dom.set_attribute(&button, "type", "button")?;
		dom.append_text(&button, &self.delete_label)?;

		dom.append_child(&row, &byline)?;
		dom.append_child(&row, &message)?;

		// From here on, failures have to release the click handler again.
		dom.on_click(&button, self.delete_handler(row.clone(), comment.id.clone()))?;
		if let Err(error) = dom.append_child(&row, &button).and_then(|()| dom.append_child(container, &row)) {
			dom.remove(&button);
			dom.remove(&row);
			return Err(error);
		}
		Ok(row)
	}

	/// The handler owns a copy of the id and a handle to its own row, nothing else of the list.
	fn delete_handler(&self, row: D::Node, id: CommentId) -> Box<dyn Fn()> {
		let dom = Rc::downgrade(&self.dom);
		let service = Rc::downgrade(&self.service);
		Box::new(move || match (dom.upgrade(), service.upgrade()) {
			(Some(dom), Some(service)) => delete_comment(&*dom, &*service, &row, &id),
			_ => debug!(%id, "Delete clicked after the view was dropped. Ignoring."),
		})
	}

	/// Sends the delete request for `id` and removes `row` right away.
	pub fn delete_comment(&self, row: &D::Node, id: &CommentId) {
		delete_comment(&*self.dom, &*self.service, row, id)
	}
}

#[instrument(skip(dom, service, row))]
fn delete_comment<D: Dom, S: CommentsService>(dom: &D, service: &S, row: &D::Node, id: &CommentId) {
	service.delete_comment(id);
	dom.remove(row);
	debug!("Comment row removed.");
}
