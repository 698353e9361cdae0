use crate::error::{Error, Result};

use super::block::ContentBlock;

/// Splits body text into content blocks in a single pass, preserving source
/// order. Fence interiors are copied verbatim.
pub fn segment(body: &str) -> Result<Vec<ContentBlock>> {
    let lines: Vec<&str> = body.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end();

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some(info) = line.strip_prefix("```") {
            let (block, next) = read_code_sample(&lines, i, info)?;
            blocks.push(block);
            i = next;
            continue;
        }

        if line.starts_with("{%") {
            if let Some(block) = read_embed_directive(line, i + 1)? {
                blocks.push(block);
                i += 1;
                continue;
            }
            // Terminated but unrecognized directive: keep it as prose.
        }

        if let Some((level, text)) = parse_heading(line) {
            blocks.push(ContentBlock::Heading {
                level,
                text: text.to_string(),
            });
            i += 1;
            continue;
        }

        if line.starts_with("![") {
            if let Some(block) = parse_image_line(line) {
                blocks.push(block);
                i += 1;
                continue;
            }
        }

        if let Some((text, href)) = parse_sole_link(line) {
            blocks.push(ContentBlock::Link { text, href });
            i += 1;
            continue;
        }

        let (paragraph, next) = read_paragraph(&lines, i);
        blocks.push(paragraph);
        i = next;
    }

    Ok(blocks)
}

/// Reads a fenced code block opened at `open` and any trailing `{: … }`
/// attribute line. Returns the block and the index of the next unread line.
fn read_code_sample(
    lines: &[&str],
    open: usize,
    info: &str,
) -> Result<(ContentBlock, usize)> {
    let language = match info.trim() {
        "" => None,
        lang => Some(lang.to_string()),
    };

    let close = (open + 1..lines.len())
        .find(|&j| lines[j].trim_end() == "```")
        .ok_or(Error::UnterminatedBlock {
            kind: "code fence",
            line: open + 1,
        })?;

    let source = lines[open + 1..close].join("\n");

    let mut next = close + 1;
    let mut file_label = None;
    let mut hint = None;

    if next < lines.len() {
        if let Some(attrs) = parse_attr_list(lines[next].trim()) {
            file_label = attrs.file;
            hint = attrs.class;
            next += 1;
        }
    }

    Ok((
        ContentBlock::CodeSample {
            source,
            language,
            file_label,
            hint,
        },
        next,
    ))
}

/// Recognizes `{% include embed/<provider>.html id='<id>' %}`. A directive
/// line without its closing `%}` is an error; any other terminated directive
/// is left to the caller as prose.
fn read_embed_directive(line: &str, lineno: usize) -> Result<Option<ContentBlock>> {
    let Some(end) = line.find("%}") else {
        return Err(Error::UnterminatedBlock {
            kind: "embed directive",
            line: lineno,
        });
    };

    let inner = line[2..end].trim();

    let Some(rest) = inner.strip_prefix("include embed/") else {
        return Ok(None);
    };
    let Some((provider, args)) = rest.split_once(".html") else {
        return Ok(None);
    };

    let args = args.trim();
    let id = args
        .strip_prefix("id=")
        .map(strip_quotes)
        .filter(|id| !id.is_empty());

    Ok(id.map(|id| ContentBlock::VideoEmbed {
        provider: provider.to_string(),
        id: id.to_string(),
    }))
}

fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }

    let text = line[level..].strip_prefix(' ')?;
    Some((level as u8, text.trim_start()))
}

/// `![alt](path)` with an optional trailing `{: width="…" height="…" }`.
fn parse_image_line(line: &str) -> Option<ContentBlock> {
    let rest = line.strip_prefix("![")?;
    let alt_end = rest.find("](")?;
    let alt = &rest[..alt_end];

    let rest = &rest[alt_end + 2..];
    let path_end = rest.find(')')?;
    let path = &rest[..path_end];

    let tail = rest[path_end + 1..].trim();
    let (mut width, mut height) = (None, None);

    if !tail.is_empty() {
        let attrs = parse_attr_list(tail)?;
        width = attrs.width;
        height = attrs.height;
    }

    Some(ContentBlock::ImageEmbed {
        path: path.to_string(),
        alt: alt.to_string(),
        width,
        height,
    })
}

fn parse_sole_link(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix('[')?;
    let mid = rest.find("](")?;
    let text = &rest[..mid];
    let href = rest[mid + 2..].strip_suffix(')')?;

    if text.contains(']') || href.contains(['(', ')']) {
        return None;
    }

    Some((text.to_string(), href.to_string()))
}

/// Consecutive prose lines up to a blank line or the start of a structural
/// block. Line breaks inside the paragraph are kept. The first line is
/// always consumed; it already failed every structural match.
fn read_paragraph(lines: &[&str], start: usize) -> (ContentBlock, usize) {
    let mut end = start + 1;

    while end < lines.len() {
        let line = lines[end].trim_end();
        if line.trim().is_empty()
            || line.starts_with("```")
            || line.starts_with("{%")
            || line.starts_with("![")
            || parse_heading(line).is_some()
        {
            break;
        }
        end += 1;
    }

    let text = lines[start..end]
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    (ContentBlock::Paragraph { text }, end)
}

#[derive(Debug, Default)]
struct AttrList {
    file: Option<String>,
    class: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Parses a `{: … }` attribute list: `.class` tokens and `key="value"`
/// pairs. Returns `None` when the line is not an attribute list.
fn parse_attr_list(line: &str) -> Option<AttrList> {
    let inner = line.strip_prefix("{:")?.strip_suffix('}')?;
    let mut attrs = AttrList::default();

    for token in attr_tokens(inner) {
        if let Some(class) = token.strip_prefix('.') {
            attrs.class = Some(class.to_string());
        } else if let Some((key, value)) = token.split_once('=') {
            let value = strip_quotes(value);
            match key {
                "file" => attrs.file = Some(value.to_string()),
                "width" => attrs.width = value.parse().ok(),
                "height" => attrs.height = value.parse().ok(),
                _ => {}
            }
        }
    }

    Some(attrs)
}

/// Whitespace-separated tokens, except inside quoted values.
fn attr_tokens(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(s)
}
