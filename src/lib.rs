#![doc(html_root_url = "https://docs.rs/portfolio-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod comment;
pub mod config;
pub mod dom;
mod error;
pub mod greeting;
#[cfg(not(target_arch = "wasm32"))]
pub mod headless;
pub mod map;
pub mod page;
pub mod service;
pub mod snapshot;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod closure_map;
#[cfg(target_arch = "wasm32")]
pub mod fetch;
#[cfg(target_arch = "wasm32")]
pub mod google_maps;
#[cfg(target_arch = "wasm32")]
pub mod load;
#[cfg(target_arch = "wasm32")]
pub mod web;
#[cfg(target_arch = "wasm32")]
pub mod web_dom;

pub use comment::{Comment, CommentId};
pub use config::Config;
pub use error::Error;
