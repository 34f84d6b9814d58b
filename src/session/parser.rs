use std::path::Path;

use crate::errors::ParseError;

pub trait DocumentParser: Send + Sync {
    fn parse(&self, filename: &str, bytes: &[u8]) -> Result<String, ParseError>;
}

pub const TEXT_EXTENSIONS: [&str; 5] = ["txt", "md", "markdown", "csv", "json"];

/// Accepts UTF-8 text files. Binary formats such as PDF or DOCX need an
/// external converter and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse(&self, filename: &str, bytes: &[u8]) -> Result<String, ParseError> {
        if let Some(ext) = Path::new(filename).extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
                return Err(ParseError::UnsupportedFormat(ext));
            }
        }

        let text = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_formats() {
        let parser = PlainTextParser;
        assert_eq!(parser.parse("cv.txt", b"Python, SQL").unwrap(), "Python, SQL");
        assert_eq!(parser.parse("CV.MD", b"# Me").unwrap(), "# Me");
        assert_eq!(parser.parse("pasted", b"no extension").unwrap(), "no extension");
        assert_eq!(
            parser.parse("jd.txt", "\u{feff}Senior role".as_bytes()).unwrap(),
            "Senior role"
        );
    }

    #[test]
    fn test_rejects_binary_formats() {
        let parser = PlainTextParser;
        assert_eq!(
            parser.parse("resume.pdf", b"%PDF-1.7"),
            Err(ParseError::UnsupportedFormat("pdf".to_string()))
        );
        assert_eq!(
            parser.parse("resume.txt", &[0xff, 0xfe, 0x00]),
            Err(ParseError::InvalidEncoding)
        );
        assert_eq!(parser.parse("empty.txt", b"  \n"), Err(ParseError::Empty));
    }
}
