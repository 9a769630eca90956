//! Session service: drives every case of an input through build, traverse and write.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::reader::{CaseInput, CaseReader};
use crate::application::writer::CaseWriter;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{MismatchPolicy, Settings};
use crate::domain::{traverse_values, DomainError, TreeArena, TreeBuilder, TreeNodeConvert};

/// Totals of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Cases whose output was written
    pub answered: usize,
    /// Numbers of cases dropped under [`MismatchPolicy::Skip`]
    pub skipped: Vec<usize>,
}

/// Diagram and shape of one case tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTree {
    pub case: usize,
    pub diagram: String,
    pub depth: usize,
    /// Childless node values, left to right
    pub leaves: Vec<String>,
}

/// Service answering navigation cases.
pub struct SessionService {
    settings: Arc<Settings>,
}

impl SessionService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds the case tree.
    pub fn build_tree(&self, case: &CaseInput) -> Result<TreeArena, DomainError> {
        TreeBuilder::from_events(case.events.iter().cloned())
    }

    /// Values visited by the case's instructions, starting at the root.
    #[instrument(level = "debug", skip(self, case), fields(case = case.number))]
    pub fn answer_case(&self, case: &CaseInput) -> Result<Vec<String>, DomainError> {
        let tree = self.build_tree(case)?;
        let root = tree.root().ok_or(DomainError::EmptyTree)?;
        Ok(traverse_values(&tree, root, &case.instructions)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Applies the mismatch policy to a case that failed to build.
    /// Returns `Ok(())` when the case is to be skipped.
    fn on_broken_case(&self, case: &CaseInput, source: DomainError) -> ApplicationResult<()> {
        match self.settings.on_mismatch {
            MismatchPolicy::Abort => Err(ApplicationError::Domain {
                case: case.number,
                source,
            }),
            MismatchPolicy::Skip => {
                warn!(case = case.number, line = case.line, "skipping case: {source}");
                Ok(())
            }
        }
    }

    /// Answers every case of `input`, writing each one as soon as it is complete.
    #[instrument(level = "debug", skip_all)]
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: W) -> ApplicationResult<SessionSummary> {
        let mut reader = CaseReader::new(input, self.settings.pop_marker.clone());
        let mut writer = CaseWriter::new(output, &self.settings);
        let mut summary = SessionSummary::default();

        while let Some(case) = reader.next_case()? {
            match self.answer_case(&case) {
                Ok(values) => {
                    writer.write_case(case.number, &values)?;
                    summary.answered += 1;
                }
                Err(e) => {
                    self.on_broken_case(&case, e)?;
                    summary.skipped.push(case.number);
                }
            }
        }

        info!(
            answered = summary.answered,
            skipped = summary.skipped.len(),
            lines = reader.line_no(),
            policy = %self.settings.on_mismatch,
            "session finished"
        );
        Ok(summary)
    }

    /// Like [`run`](Self::run) but collects the output.
    pub fn run_to_string<R: BufRead>(&self, input: R) -> ApplicationResult<(String, SessionSummary)> {
        let mut out = Vec::new();
        let summary = self.run(input, &mut out)?;
        Ok((String::from_utf8_lossy(&out).into_owned(), summary))
    }

    /// Renders each case tree as a diagram.
    pub fn render_trees<R: BufRead>(&self, input: R) -> ApplicationResult<Vec<RenderedTree>> {
        let reader = CaseReader::new(input, self.settings.pop_marker.clone());
        let mut rendered = Vec::new();
        for case in reader {
            let case = case?;
            match self.build_tree(&case) {
                Ok(tree) => {
                    let depth = tree.depth();
                    debug!(case = case.number, depth, "rendering tree");
                    rendered.push(RenderedTree {
                        case: case.number,
                        diagram: tree.render(),
                        depth,
                        leaves: tree.leaf_nodes(),
                    });
                }
                Err(e) => self.on_broken_case(&case, e)?,
            }
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_CASES: &str = "\
8
<n value='A'>
<n value='B'>
<n value='D'>
</n>
</n>
<n value='C'>
</n>
</n>
4
first_child
first_child
parent
next_sibling

2
<n value='X'>
</n>
1
parent

0
";

    fn service(policy: MismatchPolicy) -> SessionService {
        SessionService::new(Arc::new(Settings {
            on_mismatch: policy,
            ..Settings::default()
        }))
    }

    #[test]
    fn given_two_cases_when_running_then_each_case_is_answered() {
        let (out, summary) = service(MismatchPolicy::Abort)
            .run_to_string(Cursor::new(TWO_CASES))
            .unwrap();

        assert_eq!(out, "Case 1:\nB\nD\nB\nC\nCase 2:\nX\n");
        assert_eq!(summary.answered, 2);
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn given_unbalanced_case_when_skipping_then_next_case_keeps_its_number() {
        let input = "2\n<n value='A'>\n<n value='B'>\n1\nparent\n\n2\n<n value='X'>\n</n>\n0\n\n0\n";

        let (out, summary) = service(MismatchPolicy::Skip)
            .run_to_string(Cursor::new(input))
            .unwrap();

        assert_eq!(out, "Case 2:\n");
        assert_eq!(summary.skipped, vec![1]);
    }

    #[test]
    fn given_unbalanced_case_when_aborting_then_domain_error_and_no_output() {
        let input = "1\n<n value='A'>\n0\n\n0\n";
        let mut out = Vec::new();

        let err = service(MismatchPolicy::Abort)
            .run(Cursor::new(input), &mut out)
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Domain { case: 1, .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn given_input_when_rendering_trees_then_one_diagram_per_case() {
        let trees = service(MismatchPolicy::Abort)
            .render_trees(Cursor::new(TWO_CASES))
            .unwrap();

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].case, 1);
        assert!(trees[0].diagram.starts_with("A\n"));
        assert_eq!(trees[0].depth, 3);
        assert_eq!(trees[0].leaves, ["D", "C"]);
        assert_eq!(trees[1].diagram, "X\n");
        assert_eq!(trees[1].leaves, ["X"]);
    }
}
