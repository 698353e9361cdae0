use crate::error::{Error, Result};

/// Resolves a media reference against a post's media subpath. Absolute paths
/// and URLs pass through unchanged; a relative reference needs a base.
pub fn resolve(base: Option<&str>, path: &str) -> Result<String> {
    if path.starts_with('/') || path.contains("://") {
        return Ok(path.to_string());
    }

    match base {
        Some(base) if !base.is_empty() => {
            Ok(format!("{}/{}", base.trim_end_matches('/'), path))
        }
        _ => Err(Error::UnresolvableMediaReference(path.to_string())),
    }
}
