//! Rule rendering and marker-anchored insertion.
//!
//! Pure text operations; all file I/O lives in the mutator.

use crate::config::schema::ADDRESS_PLACEHOLDER;

/// Renders the rule line for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTemplate {
    template: String,
}

impl RuleTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, address: &str) -> String {
        self.template.replace(ADDRESS_PLACEHOLDER, address)
    }
}

impl Default for RuleTemplate {
    fn default() -> Self {
        Self::new(format!("\t\t\tnot remote_ip {}", ADDRESS_PLACEHOLDER))
    }
}

/// Result of inserting a rule line into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// A line identical to the rule already exists.
    AlreadyPresent,
    /// No line contains the marker.
    MarkerNotFound,
    /// New document with one rule line after each of `markers` marker lines.
    Inserted { content: String, markers: usize },
}

/// Preferred line separator of the document: CRLF if any line uses it.
///
/// Only needed when a marker sits on a final line with no ending of its own.
pub fn line_separator(document: &str) -> &'static str {
    if document.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Walk the document line by line as `(content, ending)` pairs.
///
/// `ending` is `"\r\n"`, `"\n"` or empty for a final unterminated line, so
/// files with mixed line endings round-trip byte for byte.
pub fn document_lines<'a>(document: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    document.split_inclusive('\n').map(|line| {
        if let Some(content) = line.strip_suffix("\r\n") {
            (content, "\r\n")
        } else if let Some(content) = line.strip_suffix('\n') {
            (content, "\n")
        } else {
            (line, "")
        }
    })
}

/// Number of lines containing `marker`.
pub fn count_markers(document: &str, marker: &str) -> usize {
    document_lines(document)
        .filter(|(content, _)| content.contains(marker))
        .count()
}

/// Insert `rule` directly after every line containing `marker`.
///
/// The rule line reuses the marker line's own ending. Duplicate detection is
/// an exact whole-line match against the rendered rule, so `10.0.0.5` never
/// collides with `10.0.0.50`.
pub fn insert_rule(document: &str, marker: &str, rule: &str) -> Insertion {
    if document_lines(document).any(|(content, _)| content == rule) {
        return Insertion::AlreadyPresent;
    }

    let mut content = String::with_capacity(document.len() + rule.len() + 2);
    let mut markers = 0;

    for (line, ending) in document_lines(document) {
        content.push_str(line);
        if !line.contains(marker) {
            content.push_str(ending);
            continue;
        }

        markers += 1;
        if ending.is_empty() {
            content.push_str(line_separator(document));
            content.push_str(rule);
        } else {
            content.push_str(ending);
            content.push_str(rule);
            content.push_str(ending);
        }
    }

    if markers == 0 {
        return Insertion::MarkerNotFound;
    }

    Insertion::Inserted { content, markers }
}
