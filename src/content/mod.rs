mod block;
mod front_matter;
mod media;
mod post;
mod segmenter;

pub use self::{
    block::ContentBlock,
    front_matter::{CoverImage, PostHeader},
    media::resolve as resolve_media,
    post::{NoContent, Post, PostBuilder, RawContent},
    segmenter::segment,
};
