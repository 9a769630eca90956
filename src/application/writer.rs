//! Renders answered cases: a header line, then one visited value per line.

use std::io::Write;

use crate::application::error_ext::IoResultExt;
use crate::application::ApplicationResult;
use crate::config::Settings;

pub struct CaseWriter<W> {
    out: W,
    settings: Settings,
}

impl<W: Write> CaseWriter<W> {
    pub fn new(out: W, settings: &Settings) -> Self {
        Self {
            out,
            settings: settings.clone(),
        }
    }

    pub fn write_case<S: AsRef<str>>(&mut self, number: usize, values: &[S]) -> ApplicationResult<()> {
        let header = self.settings.header_for(number);
        writeln!(self.out, "{header}").with_context("write case header")?;
        for value in values {
            writeln!(self.out, "{}", value.as_ref()).with_context("write case value")?;
        }
        self.out.flush().with_context("flush output")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_cases_when_writing_then_no_blank_line_between() {
        let mut writer = CaseWriter::new(Vec::new(), &Settings::default());
        writer.write_case(1, &["B", "D"]).unwrap();
        writer.write_case(2, &["A"]).unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "Case 1:\nB\nD\nCase 2:\nA\n");
    }

    #[test]
    fn given_empty_values_when_writing_then_only_header() {
        let mut writer = CaseWriter::new(Vec::new(), &Settings::default());
        writer.write_case::<&str>(4, &[]).unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "Case 4:\n");
    }
}
