//! The post entity and its repository

pub mod model;
pub mod repository;

pub use model::{Post, PostForm, empty_tag_placeholder};
pub use repository::PostRepository;
