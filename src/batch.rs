use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    content::{Post, PostBuilder},
    error::{Error, Result},
};

#[derive(Debug)]
pub struct ParsedDoc {
    pub path: PathBuf,
    pub post: Post,
}

#[derive(Debug)]
pub struct FailedDoc {
    pub path: PathBuf,
    pub error: Error,
}

/// Per-document outcome of a batch run. One bad document never aborts the
/// rest of the batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub parsed: Vec<ParsedDoc>,
    pub failures: Vec<FailedDoc>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses every `*.md` document directly under `dir`, in path order.
/// Documents are independent; each failure is recorded against its path and
/// processing continues.
pub fn parse_dir(dir: impl AsRef<Path>) -> Result<BatchOutcome> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    let mut outcome = BatchOutcome::default();

    for path in paths {
        match load_document(&path) {
            Ok(post) => {
                tracing::debug!(path = %path.display(), slug = post.slug(), "document parsed");
                outcome.parsed.push(ParsedDoc { path, post });
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "document rejected");
                outcome.failures.push(FailedDoc { path, error });
            }
        }
    }

    Ok(outcome)
}

fn load_document(path: &Path) -> Result<Post> {
    let text = fs::read_to_string(path)?;
    let post = PostBuilder::new(path).content(text).build()?;

    // Media references must resolve for the document to be publishable.
    post.resolve_media()?;

    Ok(post)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_doc(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("fixture write should succeed");
    }

    fn valid_doc(title: &str) -> String {
        format!("---\ntitle: {title}\ndate: 2024-06-29 12:00:00 -0300\n---\n\nSome prose.\n")
    }

    #[test]
    fn good_documents_all_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_doc(dir.path(), "a.md", &valid_doc("First"));
        write_doc(dir.path(), "b.md", &valid_doc("Second"));

        let outcome = parse_dir(dir.path()).expect("batch should run");

        assert!(outcome.is_clean());
        assert_eq!(outcome.parsed.len(), 2);
        assert_eq!(outcome.parsed[0].post.slug(), "a");
        assert_eq!(outcome.parsed[1].post.slug(), "b");
    }

    #[test]
    fn one_bad_document_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_doc(dir.path(), "good.md", &valid_doc("Fine"));
        write_doc(dir.path(), "no-date.md", "---\ntitle: Broken\n---\nbody\n");
        write_doc(
            dir.path(),
            "unclosed.md",
            "---\ntitle: t\ndate: 2024-06-29 12:00:00 -0300\n---\n\n```rust\nfn f() {}\n",
        );

        let outcome = parse_dir(dir.path()).expect("batch should run");

        assert_eq!(outcome.parsed.len(), 1);
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome
            .failures
            .iter()
            .any(|f| f.path.ends_with("no-date.md")
                && matches!(f.error, Error::MissingField("date"))));
        assert!(outcome
            .failures
            .iter()
            .any(|f| f.path.ends_with("unclosed.md")
                && matches!(f.error, Error::UnterminatedBlock { .. })));
    }

    #[test]
    fn unresolvable_media_is_a_per_document_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_doc(
            dir.path(),
            "img.md",
            "---\ntitle: t\ndate: 2024-06-29 12:00:00 -0300\n---\n\n![alt](banner.png)\n",
        );

        let outcome = parse_dir(dir.path()).expect("batch should run");

        assert_eq!(outcome.parsed.len(), 0);
        assert!(matches!(
            outcome.failures[0].error,
            Error::UnresolvableMediaReference(_)
        ));
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_doc(dir.path(), "notes.txt", "not a post");
        write_doc(dir.path(), "post.md", &valid_doc("Only one"));

        let outcome = parse_dir(dir.path()).expect("batch should run");

        assert_eq!(outcome.parsed.len(), 1);
        assert!(outcome.is_clean());
    }
}
