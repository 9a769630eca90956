//! Line-oriented case reader.
//!
//! Per case: a tree line count (0 terminates the input), that many tree lines,
//! an instruction count, that many instruction names and one blank line.

use std::io::{BufRead, ErrorKind, Lines};

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{BuildEvent, Instruction};

/// One case as read from the input, before its tree is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseInput {
    /// 1-based case number
    pub number: usize,
    /// Line on which the case starts
    pub line: usize,
    pub events: Vec<BuildEvent>,
    pub instructions: Vec<Instruction>,
}

/// Reads [`CaseInput`]s until the terminating zero count.
pub struct CaseReader<R> {
    lines: Lines<R>,
    line_no: usize,
    cases_read: usize,
    finished: bool,
    pop_marker: String,
    value_regex: Regex,
    count_regex: Regex,
}

impl<R: BufRead> CaseReader<R> {
    pub fn new(input: R, pop_marker: impl Into<String>) -> Self {
        Self {
            lines: input.lines(),
            line_no: 0,
            cases_read: 0,
            finished: false,
            pop_marker: pop_marker.into(),
            // greedy: first quote to last quote
            value_regex: Regex::new(r"'(.*)'").unwrap(),
            count_regex: Regex::new(r"^\s*(\d+)").unwrap(),
        }
    }

    /// Number of input lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn read_line(&mut self, expected: &str) -> ApplicationResult<String> {
        match self.lines.next() {
            Some(Err(e)) if e.kind() == ErrorKind::InvalidData => Err(ApplicationError::format(
                self.line_no + 1,
                format!("{expected} is not valid UTF-8"),
            )),
            Some(line) => {
                let line = line.with_context("read input line")?;
                self.line_no += 1;
                Ok(line.trim_end_matches('\r').to_string())
            }
            None => Err(ApplicationError::format(
                self.line_no + 1,
                format!("unexpected end of input, expected {expected}"),
            )),
        }
    }

    fn read_count(&mut self, expected: &str) -> ApplicationResult<usize> {
        let line = self.read_line(expected)?;
        self.count_regex
            .captures(&line)
            .and_then(|caps| caps[1].parse().ok())
            .ok_or_else(|| {
                ApplicationError::format(self.line_no, format!("expected {expected}, got '{line}'"))
            })
    }

    /// Extracts the value between the first and the last `'` of a tree line.
    pub fn parse_value<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.value_regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn read_event(&mut self) -> ApplicationResult<BuildEvent> {
        let line = self.read_line("tree line")?;
        if line.trim() == self.pop_marker {
            return Ok(BuildEvent::Pop);
        }
        match self.parse_value(&line) {
            Some(value) => Ok(BuildEvent::create(value)),
            None => Err(ApplicationError::format(
                self.line_no,
                format!("tree line without quoted value: '{line}'"),
            )),
        }
    }

    fn read_instruction(&mut self) -> ApplicationResult<Instruction> {
        let line = self.read_line("instruction")?;
        line.trim()
            .parse()
            .map_err(|e: crate::domain::UnknownInstruction| {
                ApplicationError::format(self.line_no, e.to_string())
            })
    }

    /// Reads the next case, or `None` at the terminator.
    #[instrument(level = "debug", skip(self))]
    pub fn next_case(&mut self) -> ApplicationResult<Option<CaseInput>> {
        if self.finished {
            return Ok(None);
        }
        let tree_lines = self.read_count("tree line count")?;
        if tree_lines == 0 {
            debug!(line = self.line_no, "terminator reached");
            self.finished = true;
            return Ok(None);
        }
        let line = self.line_no;

        let events = (0..tree_lines)
            .map(|_| self.read_event())
            .collect::<ApplicationResult<Vec<_>>>()?;

        let instruction_count = self.read_count("instruction count")?;
        let instructions = (0..instruction_count)
            .map(|_| self.read_instruction())
            .collect::<ApplicationResult<Vec<_>>>()?;

        let separator = self.read_line("blank line after case")?;
        if !separator.trim().is_empty() {
            return Err(ApplicationError::format(
                self.line_no,
                format!("expected blank line after case, got '{separator}'"),
            ));
        }

        self.cases_read += 1;
        debug!(
            case = self.cases_read,
            events = events.len(),
            instructions = instructions.len(),
            "case read"
        );
        Ok(Some(CaseInput {
            number: self.cases_read,
            line,
            events,
            instructions,
        }))
    }
}

impl<R: BufRead> Iterator for CaseReader<R> {
    type Item = ApplicationResult<CaseInput>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_case() {
            Ok(Some(case)) => Some(Ok(case)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> CaseReader<Cursor<&str>> {
        CaseReader::new(Cursor::new(input), "</n>")
    }

    #[test]
    fn given_quoted_line_when_parsing_value_then_takes_outermost_quotes() {
        let r = reader("");
        assert_eq!(r.parse_value("<n value='A'>"), Some("A"));
        assert_eq!(r.parse_value("<n value='it's'>"), Some("it's"));
        assert_eq!(r.parse_value("<n value=''>"), Some(""));
        assert_eq!(r.parse_value("<n value='A>"), None);
        assert_eq!(r.parse_value("<n>"), None);
    }

    #[test]
    fn given_single_case_when_reading_then_events_and_instructions_in_order() {
        let mut r = reader("4\n<n value='A'>\n<n value='B'>\n</n>\n</n>\n2\nfirst_child\nparent\n\n0\n");

        let case = r.next_case().unwrap().unwrap();

        assert_eq!(case.number, 1);
        assert_eq!(case.line, 1);
        assert_eq!(
            case.events,
            vec![
                BuildEvent::create("A"),
                BuildEvent::create("B"),
                BuildEvent::Pop,
                BuildEvent::Pop
            ]
        );
        assert_eq!(
            case.instructions,
            vec![Instruction::FirstChild, Instruction::Parent]
        );
        assert!(r.next_case().unwrap().is_none());
        assert!(r.next_case().unwrap().is_none());
    }

    #[test]
    fn given_crlf_input_when_reading_then_carriage_returns_ignored() {
        let mut r = reader("2\r\n<n value='A'>\r\n</n>\r\n1\r\nparent\r\n\r\n0\r\n");
        let case = r.next_case().unwrap().unwrap();
        assert_eq!(case.events, vec![BuildEvent::create("A"), BuildEvent::Pop]);
        assert_eq!(case.instructions, vec![Instruction::Parent]);
    }

    #[test]
    fn given_unknown_instruction_when_reading_then_format_error_with_line() {
        let mut r = reader("2\n<n value='A'>\n</n>\n1\nlast_child\n\n0\n");
        match r.next_case() {
            Err(ApplicationError::Format { line, message }) => {
                assert_eq!(line, 5);
                assert!(message.contains("last_child"));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn given_truncated_input_when_reading_then_format_error() {
        let mut r = reader("3\n<n value='A'>\n</n>\n");
        assert!(matches!(
            r.next_case(),
            Err(ApplicationError::Format { line: 4, .. })
        ));
    }

    #[test]
    fn given_missing_blank_line_when_reading_then_format_error() {
        let mut r = reader("2\n<n value='A'>\n</n>\n0\n0\n");
        assert!(matches!(
            r.next_case(),
            Err(ApplicationError::Format { line: 5, .. })
        ));
    }

    #[test]
    fn given_invalid_utf8_when_reading_then_format_error_with_line() {
        let input: &[u8] = b"2\n<n value='\xff\xfe'>\n</n>\n1\nparent\n\n0\n";
        let mut r = CaseReader::new(input, "</n>");
        match r.next_case() {
            Err(ApplicationError::Format { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("UTF-8"));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn given_error_when_iterating_then_iteration_stops() {
        let r = reader("x\n");
        let results: Vec<_> = r.collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
