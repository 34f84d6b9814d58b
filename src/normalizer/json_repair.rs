use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

pub const FALLBACK_SKILL: &str = "General";
pub const LEVELS: [&str; 3] = ["Level 1", "Level 2", "Level 3"];

// Group 1 is the language tag, group 2 the body.
pub(crate) fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```([A-Za-z0-9_-]*)[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
    })
}

/// Always returns a mapping, falling back to [`fallback_structure`].
pub fn repair_json(text: &str) -> Map<String, Value> {
    try_repair_json(text).unwrap_or_else(|| {
        log::debug!("No JSON object recoverable from {} chars of model text", text.len());
        fallback_structure(text)
    })
}

pub fn try_repair_json(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    let fenced = fenced_blocks(trimmed);

    if let Some(map) = fenced.iter().find_map(|block| parse_object(block)) {
        return Some(map);
    }

    if let Some(map) = parse_object(trimmed) {
        return Some(map);
    }

    let candidates: Vec<&str> = fenced.iter().copied().chain(std::iter::once(trimmed)).collect();

    for span in candidates.iter().flat_map(|candidate| balanced_objects(candidate)) {
        if let Some(map) = parse_object(span).or_else(|| parse_object(&structural_repair(span))) {
            return Some(map);
        }
    }

    for candidate in candidates {
        if let Some(slice) = object_slice(candidate) {
            if let Some(map) = parse_object(&structural_repair(slice)) {
                log::debug!("Recovered JSON object after structural repair");
                return Some(map);
            }
        }
    }

    None
}

pub fn fallback_structure(raw: &str) -> Map<String, Value> {
    let mut levels = Map::new();
    for (i, level) in LEVELS.iter().enumerate() {
        let questions = if i == LEVELS.len() - 1 {
            json!([raw])
        } else {
            json!([])
        };
        levels.insert(level.to_string(), questions);
    }

    let mut map = Map::new();
    map.insert(FALLBACK_SKILL.to_string(), Value::Object(levels));
    map
}

/// Interiors of every fenced code block, `json`-tagged ones first. With no
/// closed fence, an unterminated one yields everything after its opening line.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut tagged = Vec::new();
    let mut other = Vec::new();
    for captures in fence_pattern().captures_iter(text) {
        let Some(body) = captures.get(2) else {
            continue;
        };
        let is_json = captures
            .get(1)
            .is_some_and(|tag| tag.as_str().eq_ignore_ascii_case("json"));
        if is_json {
            tagged.push(body.as_str().trim());
        } else {
            other.push(body.as_str().trim());
        }
    }
    if !tagged.is_empty() || !other.is_empty() {
        tagged.extend(other);
        return tagged;
    }

    let Some(start) = text.find("```") else {
        return Vec::new();
    };
    let rest = &text[start + 3..];
    let body = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains('{') => &rest[newline + 1..],
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    vec![body.trim()]
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

// From the first `{` to the last `}`; a missing closer keeps the tail so the
// repair pass can close it.
fn object_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}

// Top-level balanced `{...}` spans in order. Stops at the first brace that
// never closes: what follows is nested in a truncated object.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut next = 0;
    for (start, _) in text.char_indices().filter(|(_, ch)| *ch == '{') {
        if start < next {
            continue;
        }
        match balanced_end(&text[start..]) {
            Some(len) => {
                spans.push(&text[start..start + len]);
                next = start + len;
            }
            None => break,
        }
    }
    spans
}

// Byte length of the object opening at the first char, ignoring braces in strings.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn structural_repair(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '{' => {
                closers.push('}');
                out.push(ch);
            }
            '[' => {
                closers.push(']');
                out.push(ch);
            }
            '}' | ']' => {
                if !closers.contains(&ch) {
                    // stray closer
                    continue;
                }
                while let Some(closer) = closers.pop() {
                    close_value(&mut out);
                    out.push(closer);
                    if closer == ch {
                        break;
                    }
                }
            }
            _ => out.push(ch),
        }
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }

    while let Some(closer) = closers.pop() {
        close_value(&mut out);
        out.push(closer);
    }

    out
}

// Prepares `out` to receive a closing bracket.
fn close_value(out: &mut String) {
    let len = out.trim_end().len();
    out.truncate(len);
    if out.ends_with(',') {
        out.pop();
    } else if out.ends_with(':') {
        out.push_str(" null");
    }
}
