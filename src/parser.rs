use tracing::trace;

use crate::error::ParseError;
use crate::section::Section;
use crate::{COMMENT_MARKERS, KEY_SEPARATOR, SECTION_END, SECTION_START};

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: LineBreaks<'a>,
    line: usize,
}

/// Splits text on `\r\n`, `\n` or a lone `\r`. A trailing line break does not start another
/// line.
#[derive(Debug, Clone)]
struct LineBreaks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for LineBreaks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(end) = self.rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut self.rest));
        };

        let line = &self.rest[..end];
        let width = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
        self.rest = &self.rest[end + width..];
        Some(line)
    }
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: LineBreaks { rest: text },
            line: 0,
        }
    }
}

impl Parser<'_> {
    /// Consume every line, collecting sections in the order their headers appear.
    ///
    /// Headers with the same name produce separate sections. Keys before the first header are
    /// collected into a single section without a name.
    pub fn into_sections(mut self) -> Result<Vec<Section>, ParseError> {
        let mut sections = Vec::<Section>::with_capacity(16);
        let mut current = None::<Section>;

        for raw in self.lines.by_ref() {
            self.line += 1;
            let line = raw.trim();

            if line.is_empty() || is_comment(line) {
                continue;
            }

            if let Some(name) = parse_section_header(line) {
                if let Some(done) = current.take() {
                    commit(&mut sections, done);
                }
                current = Some(Section::new(name));
                continue;
            }

            let (key, value) = parse_key(line).ok_or_else(|| ParseError::Syntax {
                line: self.line,
                content: line.to_owned(),
            })?;

            current
                .get_or_insert_with(Section::anonymous)
                .insert(key, value);
        }

        if let Some(done) = current {
            commit(&mut sections, done);
        }

        Ok(sections)
    }
}

fn commit(sections: &mut Vec<Section>, section: Section) {
    trace!(name = ?section.name(), keys = section.len(), "parsed section");
    sections.push(section);
}

fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_MARKERS)
}

/// Returns the trimmed text between the brackets if `line` is a section header.
fn parse_section_header(line: &str) -> Option<&str> {
    line.strip_prefix(SECTION_START)?
        .strip_suffix(SECTION_END)
        .map(str::trim)
}

/// Split on the first separator; later separators belong to the value.
fn parse_key(line: &str) -> Option<(&str, &str)> {
    line.split_once(KEY_SEPARATOR)
        .map(|(key, value)| (key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Section> {
        Parser::new(text)
            .into_sections()
            .expect("failed to parse hardcoded INI text")
    }

    fn pairs(section: &Section) -> Vec<(&str, &str)> {
        section
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n; only comments\n# here\n").is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let sections = parse("; comment\n\n[A]\nk=v\n");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name(), Some("A"));
        assert_eq!(pairs(&sections[0]), [("k", "v")]);
    }

    #[test]
    fn preamble_keys_go_to_anonymous_section() {
        let sections = parse("x=1\n[A]\ny=2\n");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name(), None);
        assert_eq!(pairs(&sections[0]), [("x", "1")]);
        assert_eq!(sections[1].name(), Some("A"));
        assert_eq!(pairs(&sections[1]), [("y", "2")]);
    }

    #[test]
    fn missing_separator_reports_line() {
        let result = Parser::new("[A]\nfoo\n").into_sections();

        assert_eq!(
            result,
            Err(ParseError::Syntax {
                line: 2,
                content: "foo".to_owned()
            })
        );
    }

    #[test]
    fn line_numbers_count_skipped_lines() {
        let result = Parser::new("; header\n\n[A]\n  a = 1\n\n  broken  \r\n").into_sections();

        assert_eq!(
            result,
            Err(ParseError::Syntax {
                line: 6,
                content: "broken".to_owned()
            })
        );
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let sections = parse("[A]\rk=v\r\r[B]\r\nx=1\r");

        assert_eq!(sections.len(), 2);
        assert_eq!(pairs(&sections[0]), [("k", "v")]);
        assert_eq!(pairs(&sections[1]), [("x", "1")]);

        let result = Parser::new("[A]\rk=v\r\nbroken\n").into_sections();
        assert_eq!(
            result,
            Err(ParseError::Syntax {
                line: 3,
                content: "broken".to_owned()
            })
        );
    }

    #[test]
    fn mixed_case_duplicate_keys_overwrite() {
        let sections = parse("[A]\nKey=1\nKEY=2\n");

        assert_eq!(pairs(&sections[0]), [("Key", "2")]);
    }

    #[test]
    fn whitespace_is_trimmed_everywhere() {
        let sections = parse("  [  Server  ]  \r\n\thost   =  example.com  \r\n");

        assert_eq!(sections[0].name(), Some("Server"));
        assert_eq!(pairs(&sections[0]), [("host", "example.com")]);
    }

    #[test]
    fn only_first_separator_splits() {
        let sections = parse("[A]\nexpr = 1+1=2\nempty=\n=novalue\n");

        assert_eq!(
            pairs(&sections[0]),
            [("expr", "1+1=2"), ("empty", ""), ("", "novalue")]
        );
    }

    #[test]
    fn duplicate_headers_stay_separate() {
        let sections = parse("[A]\nk=1\n[a]\nk=2\n");

        assert_eq!(sections.len(), 2);
        assert_eq!(pairs(&sections[0]), [("k", "1")]);
        assert_eq!(pairs(&sections[1]), [("k", "2")]);
    }

    #[test]
    fn duplicate_keys_overwrite() {
        let sections = parse("[A]\nk=1\nk=2\n");

        assert_eq!(pairs(&sections[0]), [("k", "2")]);
    }

    #[test]
    fn empty_header_and_empty_sections() {
        let sections = parse("[]\nk=v\n[Empty]\n");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name(), Some(""));
        assert_eq!(sections[1].name(), Some("Empty"));
        assert!(sections[1].is_empty());
    }

    #[test]
    fn hash_comment_inside_section() {
        let sections = parse("[A]\n# note\nk=v ; kept\n");

        assert_eq!(pairs(&sections[0]), [("k", "v ; kept")]);
    }
}
