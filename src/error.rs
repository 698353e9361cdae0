use std::io;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required front matter field `{0}`")]
    MissingField(&'static str),

    #[error("malformed date `{0}`: expected a timestamp with an explicit UTC offset")]
    MalformedDate(String),

    #[error("unterminated {kind} opened at line {line}")]
    UnterminatedBlock { kind: &'static str, line: usize },

    #[error("cannot resolve media reference `{0}`: no media_subpath set")]
    UnresolvableMediaReference(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
