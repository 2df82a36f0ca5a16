//! Path templates
//!
//! Input and output paths are written as templates with `{{.Field}}`
//! placeholders, e.g. `dist/{{.Dir}}_{{.OS}}_{{.Arch}}.{{.Archive}}`.
//!
//! # Fields
//!
//! - `{{.Dir}}` - base name of the source directory
//! - `{{.OS}}` - target operating system
//! - `{{.Arch}}` - target architecture
//! - `{{.Archive}}` - archive format, as the user spelled it
//!
//! Field names are case-sensitive. Whitespace inside the braces is allowed
//! (`{{ .OS }}`). A lone `}}` outside a placeholder is literal text.
//!
//! # Example
//!
//! ```
//! use relpak_core::template::{PathTemplate, TemplateValues};
//!
//! let template = PathTemplate::parse("{{.Dir}}_{{.OS}}_{{.Arch}}").unwrap();
//! let values = TemplateValues {
//!     dir: "test",
//!     os: "linux",
//!     arch: "x64",
//!     archive: "zip",
//! };
//! assert_eq!(template.render(&values), "test_linux_x64");
//! ```

use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const FIELD_PREFIX: char = '.';

/// A field a placeholder can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `{{.Dir}}`
    Dir,
    /// `{{.OS}}`
    Os,
    /// `{{.Arch}}`
    Arch,
    /// `{{.Archive}}`
    Archive,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Dir" => Some(Self::Dir),
            "OS" => Some(Self::Os),
            "Arch" => Some(Self::Arch),
            "Archive" => Some(Self::Archive),
            _ => None,
        }
    }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// A field to substitute
    Field(Field),
}

/// Errors that can occur while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{{` without a matching `}}`; carries the byte offset of the `{{`.
    #[error("unclosed placeholder at position {0}")]
    Unclosed(usize),

    /// A well-formed placeholder naming a field that does not exist.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A placeholder that is empty or lacks the leading `.`.
    #[error("malformed placeholder: {{{{{0}}}}}")]
    Malformed(String),
}

/// Values bound to the template fields for one render.
#[derive(Debug, Clone, Copy)]
pub struct TemplateValues<'a> {
    /// Source directory base name.
    pub dir: &'a str,
    /// Operating system.
    pub os: &'a str,
    /// Architecture.
    pub arch: &'a str,
    /// Archive format.
    pub archive: &'a str,
}

impl TemplateValues<'_> {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::Dir => self.dir,
            Field::Os => self.os,
            Field::Arch => self.arch,
            Field::Archive => self.archive,
        }
    }
}

/// A parsed path template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse `input` into literal and field segments.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder is unclosed, malformed, or names an
    /// unknown field.
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = input;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            literal.push_str(&rest[..start]);
            let body_start = start + OPEN.len();
            let Some(len) = rest[body_start..].find(CLOSE) else {
                return Err(TemplateError::Unclosed(offset + start));
            };
            let body = &rest[body_start..body_start + len];
            let field = parse_field(body)?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));

            let consumed = body_start + len + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Substitute `values` into the template.
    pub fn render(&self, values: &TemplateValues<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(values.get(*field)),
            }
        }
        out
    }
}

impl std::str::FromStr for PathTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_field(body: &str) -> Result<Field, TemplateError> {
    let trimmed = body.trim();
    let Some(name) = trimmed.strip_prefix(FIELD_PREFIX) else {
        return Err(TemplateError::Malformed(body.to_string()));
    };
    if name.is_empty() {
        return Err(TemplateError::Malformed(body.to_string()));
    }
    Field::from_name(name).ok_or_else(|| TemplateError::UnknownField(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: TemplateValues<'static> = TemplateValues {
        dir: "exe",
        os: "linux",
        arch: "amd64",
        archive: "tar.gz",
    };

    #[test]
    fn test_parse_segments() {
        let template = PathTemplate::parse("bin/{{.Dir}}-{{.OS}}").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("bin/".to_string()),
                Segment::Field(Field::Dir),
                Segment::Literal("-".to_string()),
                Segment::Field(Field::Os),
            ]
        );
    }

    #[test]
    fn test_render_all_fields() {
        let template: PathTemplate = "{{.Dir}}_{{.OS}}_{{.Arch}}.{{.Archive}}".parse().unwrap();
        assert_eq!(template.render(&VALUES), "exe_linux_amd64.tar.gz");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let template = PathTemplate::parse("{{ .OS }}/{{.Arch }}").unwrap();
        assert_eq!(template.render(&VALUES), "linux/amd64");
    }

    #[test]
    fn test_plain_text() {
        let template = PathTemplate::parse("dist/app}}").unwrap();
        assert_eq!(template.render(&VALUES), "dist/app}}");
        assert_eq!(PathTemplate::parse("").unwrap().render(&VALUES), "");
    }

    #[test]
    fn test_unclosed() {
        assert_eq!(
            PathTemplate::parse("ab{{.OS}}/{{.Arch"),
            Err(TemplateError::Unclosed(10))
        );
        assert_eq!(PathTemplate::parse("{{"), Err(TemplateError::Unclosed(0)));
    }

    #[test]
    fn test_unknown_field_is_case_sensitive() {
        assert_eq!(
            PathTemplate::parse("{{.os}}"),
            Err(TemplateError::UnknownField("os".to_string()))
        );
        assert!(matches!(
            PathTemplate::parse("{{.Version}}"),
            Err(TemplateError::UnknownField(_))
        ));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            PathTemplate::parse("{{OS}}"),
            Err(TemplateError::Malformed(_))
        ));
        assert!(matches!(
            PathTemplate::parse("{{ }}"),
            Err(TemplateError::Malformed(_))
        ));
        assert!(matches!(
            PathTemplate::parse("{{.}}"),
            Err(TemplateError::Malformed(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TemplateError::Malformed("OS".to_string()).to_string(),
            "malformed placeholder: {{OS}}"
        );
        assert_eq!(
            TemplateError::Unclosed(3).to_string(),
            "unclosed placeholder at position 3"
        );
    }
}
