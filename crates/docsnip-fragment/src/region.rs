//! Marker-delimited region extraction
//!
//! Regions are delimited by comment lines carrying `START SNIPPET: <name>` and
//! `END SNIPPET: <name>`. The scan is purely line-based and knows nothing about
//! the language the source is written in.

const START_TAG: &str = "START SNIPPET:";
const END_TAG: &str = "END SNIPPET:";

/// Lines extracted from a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<'a> {
    /// 1-based line number of the line following the start marker
    pub start_line: usize,
    /// Extracted lines, marker lines excluded
    pub lines: Vec<&'a str>,
}

impl Region<'_> {
    /// Extracted lines joined with `\n`
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Why a region could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionDefect {
    /// No start marker with this name
    #[error("no start marker found")]
    NotFound,

    /// Start marker never closed
    #[error("start marker on line {start} has no matching end marker")]
    Unterminated { start: usize },

    /// Same region opened again before being closed
    #[error("region re-opened on line {line} before being closed")]
    Nested { line: usize },

    /// End marker seen before any start marker
    #[error("end marker on line {line} precedes any start marker")]
    EndWithoutStart { line: usize },

    /// Another region crosses this region's boundary
    #[error("region overlaps '{other}' at line {line}")]
    Overlapping { other: String, line: usize },
}

#[derive(Debug, PartialEq, Eq)]
enum Marker<'a> {
    Start(&'a str),
    End(&'a str),
}

fn marker_name<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let idx = line.find(tag)?;
    let rest = line[idx + tag.len()..].trim_start();
    let name = rest.split_whitespace().next()?;
    Some(name)
}

fn parse_marker(line: &str) -> Option<Marker<'_>> {
    if let Some(name) = marker_name(line, START_TAG) {
        return Some(Marker::Start(name));
    }
    marker_name(line, END_TAG).map(Marker::End)
}

/// Extract the region called `name` from `source`
///
/// The result starts on the line after the start marker and ends on the line
/// before the end marker. Marker lines of other regions nested inside are
/// dropped from the result.
///
/// # Errors
/// Returns the [`RegionDefect`] found while scanning.
pub fn extract_region<'a>(source: &'a str, name: &str) -> Result<Region<'a>, RegionDefect> {
    let mut lines = source.lines().enumerate();

    let start = loop {
        let Some((idx, line)) = lines.next() else {
            return Err(RegionDefect::NotFound);
        };
        match parse_marker(line) {
            Some(Marker::Start(n)) if n == name => break idx + 1,
            Some(Marker::End(n)) if n == name => {
                return Err(RegionDefect::EndWithoutStart { line: idx + 1 });
            }
            _ => {}
        }
    };

    let mut open: Vec<&str> = Vec::new();
    let mut body = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        match parse_marker(line) {
            Some(Marker::Start(n)) if n == name => {
                return Err(RegionDefect::Nested { line: line_no });
            }
            Some(Marker::End(n)) if n == name => {
                if let Some(other) = open.first() {
                    return Err(RegionDefect::Overlapping {
                        other: (*other).to_string(),
                        line: line_no,
                    });
                }
                return Ok(Region {
                    start_line: start + 1,
                    lines: body,
                });
            }
            Some(Marker::Start(other)) => open.push(other),
            Some(Marker::End(other)) => {
                let Some(pos) = open.iter().position(|n| *n == other) else {
                    return Err(RegionDefect::Overlapping {
                        other: other.to_string(),
                        line: line_no,
                    });
                };
                open.remove(pos);
            }
            None => body.push(line),
        }
    }

    Err(RegionDefect::Unterminated { start })
}

/// The whole source as a region starting on line 1
#[must_use]
pub fn whole_source(source: &str) -> Region<'_> {
    Region {
        start_line: 1,
        lines: source.lines().collect(),
    }
}
