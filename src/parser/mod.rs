//! Stateful line parser: turns a stream of log lines into raw commit records.
//!
//! One line at a time, with the last record as the only lookback:
//! 1. boundary line → start a new record,
//! 2. field rule (first match in table order) → assign that field,
//! 3. parent rule → append to the record's parent list (max 2),
//! 4. anything else → append to the comment verbatim.

use std::io::BufRead;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::grammar::{Boundary, FieldWrite, Grammar};
use crate::source::{drive, Encoding, LineSink, LineSource};
use crate::BranchflowError;

/// Maximum number of parents a record may declare.
pub const MAX_PARENTS: usize = 2;

// ─── Raw record ─────────────────────────────────────────────────────

/// A commit record exactly as the log described it, before entity resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub hash: String,
    pub revision: Option<i64>,
    pub author: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    /// Branch as written in the log; `None` means the dialect's default branch.
    pub branch: Option<String>,
    pub tag: Option<String>,
    /// Declared parent references, first parent first.
    pub parents: Vec<String>,
    pub comment: String,
    /// 1-based line number of the boundary line.
    pub line_no: usize,
    pub boundary_line: String,
}

impl RawRecord {
    fn from_boundary(boundary: Boundary, line_no: usize, line: &str) -> Self {
        Self {
            hash: boundary.hash,
            revision: boundary.revision,
            branch: boundary.branch,
            tag: boundary.tag,
            line_no,
            boundary_line: line.to_string(),
            ..Default::default()
        }
    }

    /// Assign a typed field value.
    fn apply(&mut self, write: FieldWrite) -> Result<(), String> {
        match write {
            FieldWrite::Author(author) => self.author = Some(author),
            FieldWrite::Date(date) => self.date = Some(date),
            FieldWrite::Branch(branch) => self.branch = Some(branch),
            // A filtered sentinel never clears a real tag seen on an earlier line.
            FieldWrite::Tag(Some(tag)) => self.tag = Some(tag),
            FieldWrite::Tag(None) => {}
            FieldWrite::Merge { to, from } => self.parents = vec![to, from],
            FieldWrite::Parent(hash) => {
                if self.parents.len() >= MAX_PARENTS {
                    return Err(format!(
                        "commit {} declares more than {} parents",
                        self.hash, MAX_PARENTS
                    ));
                }
                self.parents.push(hash);
            }
        }
        Ok(())
    }
}

// ─── Parser ─────────────────────────────────────────────────────────

/// Accumulates raw records for one log file. Single-use.
pub struct LogParser<'g> {
    grammar: &'g Grammar,
    records: Vec<RawRecord>,
    line_no: usize,
}

impl<'g> LogParser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            records: Vec::new(),
            line_no: 0,
        }
    }

    /// Process the next physical line.
    pub fn feed_line(&mut self, line: &str) -> Result<(), BranchflowError> {
        self.line_no += 1;
        let line_no = self.line_no;

        if let Some(boundary) = self.grammar.match_boundary(line) {
            self.records.push(RawRecord::from_boundary(boundary, line_no, line));
            return Ok(());
        }

        let Some(current) = self.records.last_mut() else {
            if line.trim().is_empty() {
                return Ok(());
            }
            return Err(BranchflowError::structure(
                line_no,
                line,
                format!("content before the first {} commit line", self.grammar.kind),
            ));
        };

        if let Some(write) = self.grammar.match_field(line) {
            let write = write.map_err(|msg| BranchflowError::structure(line_no, line, msg))?;
            return current
                .apply(write)
                .map_err(|msg| BranchflowError::structure(line_no, line, msg));
        }

        if let Some(write) = self.grammar.match_parent(line) {
            return current
                .apply(write)
                .map_err(|msg| BranchflowError::structure(line_no, line, msg));
        }

        current.comment.push_str(self.grammar.comment_text(line));
        Ok(())
    }

    /// Records accumulated so far, in log order.
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn finish(self) -> Vec<RawRecord> {
        debug!(
            format = %self.grammar.kind,
            lines = self.line_no,
            records = self.records.len(),
            "Finished parsing log"
        );
        self.records
    }
}

impl LineSink for LogParser<'_> {
    type Output = Vec<RawRecord>;

    fn on_line(&mut self, line: &str) -> Result<(), BranchflowError> {
        self.feed_line(line)
    }

    fn on_end(self) -> Result<Self::Output, BranchflowError> {
        Ok(self.finish())
    }

    fn on_error(&mut self, error: &BranchflowError) {
        debug!(
            format = %self.grammar.kind,
            lines = self.line_no,
            records = self.records.len(),
            error = %error,
            "Read failed, discarding partial records"
        );
        self.records.clear();
    }
}

/// Parse a whole log from a reader.
pub fn parse_log(
    reader: impl BufRead,
    encoding: Encoding,
    grammar: &Grammar,
) -> Result<Vec<RawRecord>, BranchflowError> {
    drive(LineSource::new(reader, encoding), LogParser::new(grammar))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
