//! Exam document template
//!
//! Rendering is plain placeholder substitution:
//! - `{{ COURSE }}` - course identifier
//! - `{{ UNIT }}` - unit or chapter name
//! - `{{ QUESTIONS }}` - selected questions' LaTeX, one block per line

use crate::domain::question::Question;

pub const COURSE_PLACEHOLDER: &str = "{{ COURSE }}";
pub const UNIT_PLACEHOLDER: &str = "{{ UNIT }}";
pub const QUESTIONS_PLACEHOLDER: &str = "{{ QUESTIONS }}";

/// Template used when no template file is configured
pub const DEFAULT_TEMPLATE: &str = r"\documentclass[11pt]{exam}
\usepackage{amsmath,amssymb}

\begin{document}

\begin{center}
  {\Large {{ COURSE }}}\\[0.5em]
  {\large {{ UNIT }}}
\end{center}

\vspace{1em}
Name: \rule{3in}{0.4pt}
\vspace{1em}

\begin{questions}
{{ QUESTIONS }}
\end{questions}

\end{document}
";

/// A LaTeX exam template with the three placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamTemplate {
    content: String,
}

impl Default for ExamTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl ExamTemplate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Substitute course, unit and the ordered question blocks
    pub fn render(&self, course: &str, unit: &str, questions: &[Question]) -> String {
        let question_block = questions
            .iter()
            .map(Question::latex)
            .collect::<Vec<_>>()
            .join("\n");

        self.content
            .replace(COURSE_PLACEHOLDER, course)
            .replace(UNIT_PLACEHOLDER, unit)
            .replace(QUESTIONS_PLACEHOLDER, &question_block)
    }
}
