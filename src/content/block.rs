/// One unit of post body content, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Heading {
        level: u8,
        text: String,
    },
    /// A fenced code sample. `source` is the fence interior, byte-exact.
    CodeSample {
        source: String,
        language: Option<String>,
        file_label: Option<String>,
        hint: Option<String>,
    },
    ImageEmbed {
        path: String,
        alt: String,
        width: Option<u32>,
        height: Option<u32>,
    },
    VideoEmbed {
        provider: String,
        id: String,
    },
    /// A line consisting solely of one Markdown link.
    Link {
        text: String,
        href: String,
    },
}

impl ContentBlock {
    /// Writes the block back in its Markdown source form.
    pub(crate) fn write_markdown(&self, out: &mut String) {
        match self {
            ContentBlock::Paragraph { text } => out.push_str(text),

            ContentBlock::Heading { level, text } => {
                for _ in 0..*level {
                    out.push('#');
                }
                out.push(' ');
                out.push_str(text);
            }

            ContentBlock::CodeSample {
                source,
                language,
                file_label,
                hint,
            } => {
                out.push_str("```");
                if let Some(lang) = language {
                    out.push_str(lang);
                }
                out.push('\n');
                out.push_str(source);
                out.push_str("\n```");

                if file_label.is_some() || hint.is_some() {
                    out.push_str("\n{:");
                    if let Some(file) = file_label {
                        out.push_str(" file=\"");
                        out.push_str(file);
                        out.push('"');
                    }
                    if let Some(hint) = hint {
                        out.push_str(" .");
                        out.push_str(hint);
                    }
                    out.push_str(" }");
                }
            }

            ContentBlock::ImageEmbed {
                path,
                alt,
                width,
                height,
            } => {
                out.push_str("![");
                out.push_str(alt);
                out.push_str("](");
                out.push_str(path);
                out.push(')');

                if width.is_some() || height.is_some() {
                    out.push_str("{:");
                    if let Some(w) = width {
                        out.push_str(&format!(" width=\"{w}\""));
                    }
                    if let Some(h) = height {
                        out.push_str(&format!(" height=\"{h}\""));
                    }
                    out.push_str(" }");
                }
            }

            ContentBlock::VideoEmbed { provider, id } => {
                out.push_str(&format!("{{% include embed/{provider}.html id='{id}' %}}"));
            }

            ContentBlock::Link { text, href } => {
                out.push('[');
                out.push_str(text);
                out.push_str("](");
                out.push_str(href);
                out.push(')');
            }
        }
    }
}
