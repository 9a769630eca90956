//! Comparison of a rendered run against an expected transcript.

use tracing::debug;

/// Outcome of [`compare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptDiff {
    Match,
    /// First differing line (1-based); `None` where one side has ended
    Mismatch {
        line: usize,
        actual: Option<String>,
        expected: Option<String>,
    },
}

impl TranscriptDiff {
    pub fn is_match(&self) -> bool {
        matches!(self, TranscriptDiff::Match)
    }
}

/// Compares two transcripts, ignoring trailing whitespace at their ends.
pub fn compare(actual: &str, expected: &str) -> TranscriptDiff {
    let actual = actual.trim_end();
    let expected = expected.trim_end();
    if actual == expected {
        return TranscriptDiff::Match;
    }

    let mut actual_lines = actual.lines();
    let mut expected_lines = expected.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (actual_lines.next(), expected_lines.next()) {
            (Some(a), Some(e)) if a.trim_end_matches('\r') == e.trim_end_matches('\r') => continue,
            (None, None) => return TranscriptDiff::Match,
            (a, e) => {
                debug!(line, "transcript mismatch");
                return TranscriptDiff::Mismatch {
                    line,
                    actual: a.map(str::to_string),
                    expected: e.map(str::to_string),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_trailing_whitespace_difference_when_comparing_then_match() {
        assert!(compare("Case 1:\nA\n", "Case 1:\nA\n\n\n").is_match());
    }

    #[test]
    fn given_crlf_expected_when_comparing_then_match() {
        assert!(compare("Case 1:\nA\nB\n", "Case 1:\r\nA\r\nB\r\n").is_match());
    }

    #[test]
    fn given_different_value_when_comparing_then_reports_first_line() {
        assert_eq!(
            compare("Case 1:\nA\nB", "Case 1:\nA\nC"),
            TranscriptDiff::Mismatch {
                line: 3,
                actual: Some("B".into()),
                expected: Some("C".into()),
            }
        );
    }

    #[test]
    fn given_shorter_actual_when_comparing_then_actual_side_absent() {
        assert_eq!(
            compare("Case 1:", "Case 1:\nA"),
            TranscriptDiff::Mismatch {
                line: 2,
                actual: None,
                expected: Some("A".into()),
            }
        );
    }
}
