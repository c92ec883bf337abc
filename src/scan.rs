//! Line classification for single-line-comment configuration files.
//!
//! A file is read line by line. Each line is trimmed and classified as
//! [`LineKind::Empty`], [`LineKind::Comment`] or [`LineKind::Value`]; value
//! lines are handed to a caller-supplied callback which decides whether the
//! scan continues, stops early or fails.

use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, trace};

/// Boxed error returned by a value-line callback.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Classification of a single trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    Comment,
    Value,
}

/// A classified line of a scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    kind: LineKind,
    text: String,
    ordinal: usize,
}

impl Line {
    fn classify(raw: &str, ordinal: usize, comment_prefix: &str) -> Self {
        let text = raw.trim();
        let kind = if text.is_empty() {
            LineKind::Empty
        } else if text.starts_with(comment_prefix) {
            LineKind::Comment
        } else {
            LineKind::Value
        };
        Self {
            kind,
            text: text.to_owned(),
            ordinal,
        }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Line content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based position of the line in its source.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// The lines read from one configuration source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFile {
    lines: Vec<Line>,
}

impl ScannedFile {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the value lines only.
    pub fn value_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.kind == LineKind::Value)
    }

    /// Return the first non-empty line whose text starts with `prefix`.
    ///
    /// Comment lines are considered too, so a prefix such as `"#"` finds the
    /// first comment.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineconf::scan::{Flow, scan_reader};
    ///
    /// let input = "# chrony\n\nlogdir /var/log/chrony\n";
    /// let file = scan_reader("inline", input.as_bytes(), "#", |_| {
    ///     Ok::<_, std::io::Error>(Flow::Continue)
    /// })
    /// .expect("scan succeeds");
    /// let line = file.line_by_prefix("logdir").expect("line present");
    /// assert_eq!(line.ordinal(), 2);
    /// ```
    pub fn line_by_prefix(&self, prefix: &str) -> Option<&Line> {
        self.lines
            .iter()
            .filter(|l| l.kind != LineKind::Empty)
            .find(|l| l.text.starts_with(prefix))
    }
}

/// Decision returned by a value-line callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading.
    Continue,
    /// Stop now and return the lines read so far.
    Stop,
}

/// Errors raised while scanning a configuration source.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The comment prefix was empty.
    #[error("comment prefix must not be empty")]
    EmptyCommentPrefix,
    /// The source could not be opened.
    #[error("failed to open {location}: {source}")]
    Open {
        location: String,
        #[source]
        source: io::Error,
    },
    /// Reading a line failed.
    #[error("error while reading {location} at line {ordinal}: {source}")]
    Read {
        location: String,
        ordinal: usize,
        #[source]
        source: io::Error,
    },
    /// The value-line callback failed.
    #[error("error while processing {location} at line {ordinal}: {source}")]
    Callback {
        location: String,
        ordinal: usize,
        #[source]
        source: BoxError,
    },
}

impl ScanError {
    /// Whether the source did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Open { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Scan the file at `path`.
///
/// The file is closed before this function returns on every path.
///
/// # Errors
///
/// Returns [`ScanError::Open`] if the file cannot be opened, and otherwise
/// the errors described for [`scan_reader`].
pub fn scan<P, F, E>(path: P, comment_prefix: &str, on_value_line: F) -> Result<ScannedFile, ScanError>
where
    P: AsRef<Path>,
    F: FnMut(&Line) -> Result<Flow, E>,
    E: Into<BoxError>,
{
    let path = path.as_ref();
    let location = path.display().to_string();
    if comment_prefix.is_empty() {
        return Err(ScanError::EmptyCommentPrefix);
    }
    let file = File::open(path).map_err(|source| ScanError::Open {
        location: location.clone(),
        source,
    })?;
    scan_reader(&location, BufReader::new(file), comment_prefix, on_value_line)
}

/// Scan lines from `reader`, using `location` to describe it in errors.
///
/// `on_value_line` runs once per value line, in source order, before the next
/// line is read. Returning [`Flow::Stop`] ends the scan successfully with the
/// lines read so far, including the current one.
///
/// # Errors
///
/// - [`ScanError::EmptyCommentPrefix`] if `comment_prefix` is empty.
/// - [`ScanError::Read`] if a line cannot be read.
/// - [`ScanError::Callback`] if `on_value_line` returns an error. No partial
///   result is returned.
pub fn scan_reader<R, F, E>(
    location: &str,
    reader: R,
    comment_prefix: &str,
    mut on_value_line: F,
) -> Result<ScannedFile, ScanError>
where
    R: BufRead,
    F: FnMut(&Line) -> Result<Flow, E>,
    E: Into<BoxError>,
{
    if comment_prefix.is_empty() {
        return Err(ScanError::EmptyCommentPrefix);
    }

    let mut result = ScannedFile::default();
    for (ordinal, raw) in reader.lines().enumerate() {
        let raw = raw.map_err(|source| ScanError::Read {
            location: location.to_owned(),
            ordinal,
            source,
        })?;
        let line = Line::classify(&raw, ordinal, comment_prefix);
        trace!(ordinal, kind = ?line.kind, "classified line");

        let flow = if line.kind == LineKind::Value {
            on_value_line(&line).map_err(|e| ScanError::Callback {
                location: location.to_owned(),
                ordinal,
                source: e.into(),
            })?
        } else {
            Flow::Continue
        };
        result.lines.push(line);

        if flow == Flow::Stop {
            debug!(location, lines = result.len(), "scan stopped early");
            return Ok(result);
        }
    }

    debug!(location, lines = result.len(), "scan complete");
    Ok(result)
}
