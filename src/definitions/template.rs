use crate::errors::AgentError;

/// A prompt with `{name}` placeholders filled by direct substitution.
/// `{{` and `}}` render as literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

impl PromptTemplate {
    pub fn new(source: &str) -> Self {
        Self {
            segments: parse(source),
        }
    }

    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render<'a, F>(&self, lookup: F) -> Result<String, AgentError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = lookup(name).ok_or_else(|| AgentError::MissingPlaceholder {
                        placeholder: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = source;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with("{{") {
            text.push('{');
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with("}}") {
            text.push('}');
            rest = &rest[2..];
            continue;
        }
        if ch == '{' {
            if let Some(end) = rest[1..].find('}') {
                let name = &rest[1..1 + end];
                if is_identifier(name) {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                    rest = &rest[end + 2..];
                    continue;
                }
            }
        }
        text.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = PromptTemplate::new("Resume:\n{resume_content}\nJD:\n{jd_content}");
        let rendered = template
            .render(|name| match name {
                "resume_content" => Some("Python, SQL"),
                "jd_content" => Some("Data engineer"),
                _ => None,
            })
            .unwrap();
        assert_eq!(rendered, "Resume:\nPython, SQL\nJD:\nData engineer");
    }

    #[test]
    fn test_missing_placeholder() {
        let template = PromptTemplate::new("{resume_content} vs {jd_content}");
        let err = template
            .render(|name| (name == "resume_content").then_some("cv"))
            .unwrap_err();
        assert_eq!(
            err,
            AgentError::MissingPlaceholder {
                placeholder: "jd_content".to_string()
            }
        );
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let template = PromptTemplate::new(r#"{{"Python": {{"Level 1": []}}}} for {resume_content}"#);
        assert_eq!(template.placeholders(), vec!["resume_content"]);
        let rendered = template.render(|_| Some("me")).unwrap();
        assert_eq!(rendered, r#"{"Python": {"Level 1": []}} for me"#);
    }

    #[test]
    fn test_non_identifier_braces_are_text() {
        let template = PromptTemplate::new("keep {this one} and { } and {");
        assert!(template.placeholders().is_empty());
        assert_eq!(
            template.render(|_| None).unwrap(),
            "keep {this one} and { } and {"
        );
    }

    #[test]
    fn test_placeholders_are_distinct() {
        let template = PromptTemplate::new("{a} {b} {a}");
        assert_eq!(template.placeholders(), vec!["a", "b"]);
    }
}
