use crate::{comment::CommentId, Comment, Error};
use futures::future::LocalBoxFuture;

/// Client side of the comments backend.
///
/// Implemented by [`FetchService`](`crate::fetch::FetchService`) in the browser and
/// [`StaticComments`](`crate::headless::StaticComments`) headless.
pub trait CommentsService {
	/// Reads the whole comment list, in the order the backend stores it.
	fn fetch_comments(&self) -> LocalBoxFuture<'_, Result<Vec<Comment>, Error>>;

	/// Asks the backend to delete one comment.
	///
	/// Fire-and-forget: the outcome is never reported back.
	fn delete_comment(&self, id: &CommentId);
}
