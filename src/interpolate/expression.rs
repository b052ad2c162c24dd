// ABOUTME: Placeholder matcher for {{identifier | filter}} templates
// ABOUTME: Splits a template into literal and placeholder segments and detects bare expressions

use regex::Regex;
use std::sync::LazyLock;

const NAME: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\{{\{{\s*({NAME})\s*((?:\|\s*{NAME}\s*)*)\}}\}}");
    Regex::new(&pattern).expect("placeholder pattern is valid")
});

static VALID_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME}$")).expect("name pattern is valid"));

/// A `{{ identifier | filter | ... }}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub identifier: String,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Template split into segments, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    source: String,
    segments: Vec<Segment>,
    bare: bool,
}

impl ParsedTemplate {
    /// Parse a template. Never fails: anything that is not a well-formed
    /// placeholder stays literal text.
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for captures in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = captures.get(0) else {
                continue;
            };

            if whole.start() > cursor {
                segments.push(Segment::Literal(template[cursor..whole.start()].to_string()));
            }

            let identifier = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let filters = captures
                .get(2)
                .map(|m| {
                    m.as_str()
                        .split('|')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            segments.push(Segment::Placeholder(Placeholder {
                identifier,
                filters,
            }));
            cursor = whole.end();
        }

        if cursor < template.len() {
            segments.push(Segment::Literal(template[cursor..].to_string()));
        }

        let bare = is_bare_expression(template);

        Self {
            source: template.to_string(),
            segments,
            bare,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the trimmed template is exactly one placeholder
    pub fn is_bare(&self) -> bool {
        self.bare
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Distinct identifiers in order of first appearance
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = Vec::new();
        for placeholder in self.placeholders() {
            if !identifiers.contains(&placeholder.identifier.as_str()) {
                identifiers.push(&placeholder.identifier);
            }
        }
        identifiers
    }

    /// Every filter name referenced, in order of first appearance
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.placeholders().flat_map(|p| p.filters.iter()) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

fn is_bare_expression(template: &str) -> bool {
    let trimmed = template.trim();
    PLACEHOLDER
        .find(trimmed)
        .is_some_and(|m| m.start() == 0 && m.end() == trimmed.len())
}

pub fn parse(template: &str) -> ParsedTemplate {
    ParsedTemplate::parse(template)
}

/// Check if a string contains at least one well-formed placeholder
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Whether `name` can be used as an identifier or filter name
pub fn is_valid_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}
