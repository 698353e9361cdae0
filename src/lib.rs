pub mod batch;
pub mod content;
pub mod error;

pub use content::{ContentBlock, CoverImage, Post, PostBuilder, PostHeader};
pub use error::{Error, Result};
