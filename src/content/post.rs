use std::path::Path;

use crate::error::Result;

use super::{block::ContentBlock, front_matter, front_matter::PostHeader, media, segmenter};

/// A fully parsed post document.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    slug: String,
    header: PostHeader,
    body: Vec<ContentBlock>,
}

pub struct NoContent;
pub struct RawContent(String);

/// Typestate builder: a slug alone can identify a document in reports, the
/// raw text is attached before parsing.
pub struct PostBuilder<T> {
    slug: String,
    content: T,
}

impl PostBuilder<NoContent> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let slug = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            slug,
            content: NoContent,
        }
    }

    pub fn content(self, document: impl Into<String>) -> PostBuilder<RawContent> {
        PostBuilder {
            slug: self.slug,
            content: RawContent(document.into()),
        }
    }
}

impl<T> PostBuilder<T> {
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl PostBuilder<RawContent> {
    pub fn build(self) -> Result<Post> {
        let (header, body_text) = front_matter::parse(&self.content.0)?;
        let body = segmenter::segment(body_text)?;

        Ok(Post {
            slug: self.slug,
            header,
            body,
        })
    }
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn header(&self) -> &PostHeader {
        &self.header
    }

    pub fn body(&self) -> &[ContentBlock] {
        &self.body
    }

    /// Serializes the post back to document form. Reparsing the result
    /// yields an equal post.
    pub fn to_document(&self) -> Result<String> {
        let mut out = String::from("---\n");
        out.push_str(&self.header.to_yaml()?);
        out.push_str("---\n");

        for block in &self.body {
            out.push('\n');
            block.write_markdown(&mut out);
            out.push('\n');
        }

        Ok(out)
    }

    /// Resolves the cover image and every image embed against the post's
    /// media subpath, returning the resolved paths in body order.
    pub fn resolve_media(&self) -> Result<Vec<String>> {
        let base = self.header.media_subpath.as_deref();
        let mut resolved = Vec::new();

        if let Some(cover) = &self.header.image {
            resolved.push(media::resolve(base, &cover.path)?);
        }

        for block in &self.body {
            if let ContentBlock::ImageEmbed { path, .. } = block {
                resolved.push(media::resolve(base, path)?);
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    fn sample_document() -> String {
        r#"---
title: React Server Components in Practice
description: What actually changes when components render on the server.
date: 2024-06-29 12:00:00 -0300
categories: [react, frameworks]
tags: [react, rsc]
media_subpath: /assets/img/posts/rsc
image:
  path: cover.png
  alt: Server and client component boundary
---

Server components let you keep data access on the server.

```jsx
async function PostList() {
    const posts = await db.post.findMany();
    return posts.map((p) => <PostCard key={p.id} post={p} />);
}
```
{: file="post-list.jsx" }

![Rendering flow](flow.png){: width="700" }

{% include embed/youtube.html id='Dkx5ydvtpCA' %}
"#
        .to_string()
    }

    #[test]
    fn builder_derives_slug_from_file_stem() {
        let builder = PostBuilder::new("posts/2024-06-29-react-server-components.md");

        assert_eq!(builder.slug(), "2024-06-29-react-server-components");
    }

    #[test]
    fn full_document_parses_in_order() {
        let post = PostBuilder::new("rsc.md")
            .content(sample_document())
            .build()
            .expect("document should parse");

        assert_eq!(post.header().title(), "React Server Components in Practice");
        assert_eq!(post.body().len(), 4);
        assert!(matches!(post.body()[0], ContentBlock::Paragraph { .. }));
        assert!(matches!(post.body()[1], ContentBlock::CodeSample { .. }));
        assert!(matches!(post.body()[2], ContentBlock::ImageEmbed { .. }));
        assert!(matches!(post.body()[3], ContentBlock::VideoEmbed { .. }));
    }

    #[test]
    fn parse_serialize_parse_is_identity() {
        let post = PostBuilder::new("rsc.md")
            .content(sample_document())
            .build()
            .expect("document should parse");

        let serialized = post.to_document().expect("post should serialize");
        let reparsed = PostBuilder::new("rsc.md")
            .content(serialized)
            .build()
            .expect("serialized document should reparse");

        assert_eq!(reparsed, post);
    }

    #[test]
    fn code_sample_round_trips_byte_for_byte() {
        let post = PostBuilder::new("rsc.md")
            .content(sample_document())
            .build()
            .expect("document should parse");

        let serialized = post.to_document().expect("post should serialize");
        let reparsed = PostBuilder::new("rsc.md")
            .content(serialized)
            .build()
            .expect("serialized document should reparse");

        let sources = |p: &Post| {
            p.body()
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::CodeSample { source, .. } => Some(source.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(sources(&reparsed), sources(&post));
    }

    #[test]
    fn media_resolves_against_the_subpath() {
        let post = PostBuilder::new("rsc.md")
            .content(sample_document())
            .build()
            .expect("document should parse");

        let resolved = post.resolve_media().expect("media should resolve");

        assert_eq!(
            resolved,
            vec![
                "/assets/img/posts/rsc/cover.png".to_string(),
                "/assets/img/posts/rsc/flow.png".to_string(),
            ]
        );
    }

    #[test]
    fn relative_media_without_subpath_fails() {
        let doc = "---\ntitle: t\ndate: 2024-06-29 12:00:00 -0300\n---\n\n![alt](banner.png)\n";

        let post = PostBuilder::new("t.md")
            .content(doc)
            .build()
            .expect("document should parse");
        let err = post.resolve_media().unwrap_err();

        assert!(matches!(err, Error::UnresolvableMediaReference(p) if p == "banner.png"));
    }
}
