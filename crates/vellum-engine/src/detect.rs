//! Diagram-type detection.
//!
//! Mermaid text names its diagram type with the first keyword after an
//! optional preamble. This module skips that preamble and identifies the
//! keyword. It does not parse the diagram body; the renderer does that.
//!
//! The preamble may contain, in order:
//!
//! 1. A front-matter block delimited by `---` lines (only at the very start).
//! 2. Any mix of blank lines, `%%` comment lines and `%%{ ... }%%` directives.

use std::fmt;

use thiserror::Error;
use winnow::{
    Parser as _,
    ascii::{line_ending, space0, till_line_ending},
    combinator::{alt, cut_err, eof, opt, preceded, repeat, repeat_till, terminated},
    error::{ContextError, ErrMode, ModalResult, StrContext},
    token::{take_until, take_while},
};

/// A malformed preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("Front-matter block is not closed with `---`")]
    UnterminatedFrontMatter,

    #[error("Directive is not closed with `}}%%`")]
    UnterminatedDirective,
}

/// The kinds of diagram Mermaid understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Class,
    State,
    EntityRelationship,
    Journey,
    Gantt,
    Pie,
    Quadrant,
    Requirement,
    GitGraph,
    C4,
    Mindmap,
    Timeline,
    ZenUml,
    Sankey,
    XyChart,
    Block,
    Packet,
    Kanban,
    Architecture,
    Radar,
}

impl DiagramKind {
    /// Map a header keyword to its diagram kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "graph" | "flowchart" | "flowchart-v2" | "flowchart-elk" => DiagramKind::Flowchart,
            "sequenceDiagram" => DiagramKind::Sequence,
            "classDiagram" | "classDiagram-v2" => DiagramKind::Class,
            "stateDiagram" | "stateDiagram-v2" => DiagramKind::State,
            "erDiagram" => DiagramKind::EntityRelationship,
            "journey" => DiagramKind::Journey,
            "gantt" => DiagramKind::Gantt,
            "pie" => DiagramKind::Pie,
            "quadrantChart" => DiagramKind::Quadrant,
            "requirementDiagram" => DiagramKind::Requirement,
            "gitGraph" => DiagramKind::GitGraph,
            "C4Context" | "C4Container" | "C4Component" | "C4Dynamic" | "C4Deployment" => {
                DiagramKind::C4
            }
            "mindmap" => DiagramKind::Mindmap,
            "timeline" => DiagramKind::Timeline,
            "zenuml" => DiagramKind::ZenUml,
            "sankey" | "sankey-beta" => DiagramKind::Sankey,
            "xychart" | "xychart-beta" => DiagramKind::XyChart,
            "block" | "block-beta" => DiagramKind::Block,
            "packet" | "packet-beta" => DiagramKind::Packet,
            "kanban" => DiagramKind::Kanban,
            "architecture" | "architecture-beta" => DiagramKind::Architecture,
            "radar-beta" => DiagramKind::Radar,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Class => "class",
            DiagramKind::State => "state",
            DiagramKind::EntityRelationship => "entity-relationship",
            DiagramKind::Journey => "journey",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Pie => "pie",
            DiagramKind::Quadrant => "quadrant",
            DiagramKind::Requirement => "requirement",
            DiagramKind::GitGraph => "git-graph",
            DiagramKind::C4 => "c4",
            DiagramKind::Mindmap => "mindmap",
            DiagramKind::Timeline => "timeline",
            DiagramKind::ZenUml => "zenuml",
            DiagramKind::Sankey => "sankey",
            DiagramKind::XyChart => "xychart",
            DiagramKind::Block => "block",
            DiagramKind::Packet => "packet",
            DiagramKind::Kanban => "kanban",
            DiagramKind::Architecture => "architecture",
            DiagramKind::Radar => "radar",
        };
        f.write_str(name)
    }
}

type Input<'a> = &'a str;

const FRONT_MATTER: &str = "front-matter";
const DIRECTIVE: &str = "directive";

/// A line holding only spaces or tabs.
fn blank_line(input: &mut Input<'_>) -> ModalResult<()> {
    (space0, line_ending).void().parse_next(input)
}

/// A `%%` comment running to the end of the line.
fn comment_line(input: &mut Input<'_>) -> ModalResult<()> {
    (space0, "%%", till_line_ending, alt((line_ending, eof)))
        .void()
        .parse_next(input)
}

/// A `%%{ ... }%%` directive, possibly spanning several lines.
fn directive(input: &mut Input<'_>) -> ModalResult<()> {
    (
        space0,
        "%%{",
        cut_err((take_until(0.., "}%%"), "}%%")).context(StrContext::Label(DIRECTIVE)),
        space0,
        alt((line_ending, eof)),
    )
        .void()
        .parse_next(input)
}

/// A line consisting of `---`, closing the front-matter block.
fn front_matter_fence(input: &mut Input<'_>) -> ModalResult<()> {
    ("---", space0, alt((line_ending, eof)))
        .void()
        .parse_next(input)
}

/// A `---` delimited front-matter block.
fn front_matter(input: &mut Input<'_>) -> ModalResult<()> {
    preceded(
        ("---", space0, line_ending),
        cut_err(repeat_till(
            0..,
            terminated(till_line_ending, line_ending).void(),
            front_matter_fence,
        ))
        .context(StrContext::Label(FRONT_MATTER))
        .map(|((), ())| ()),
    )
    .parse_next(input)
}

/// Everything before the diagram keyword.
fn preamble(input: &mut Input<'_>) -> ModalResult<()> {
    (
        opt(front_matter),
        repeat(0.., alt((blank_line, directive, comment_line))).map(|()| ()),
    )
        .void()
        .parse_next(input)
}

/// The diagram keyword, e.g. `flowchart` or `stateDiagram-v2`.
fn keyword<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    preceded(
        space0,
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    )
    .parse_next(input)
}

/// Identify the diagram type of `text`.
///
/// Returns `Ok(None)` when the text does not start with a known diagram
/// keyword.
///
/// # Errors
///
/// Returns [`DetectError`] when a front-matter block or directive is opened
/// but never closed.
pub fn detect(text: &str) -> Result<Option<DiagramKind>, DetectError> {
    let mut input = text;

    preamble(&mut input).map_err(classify)?;

    let kind = keyword
        .parse_next(&mut input)
        .ok()
        .and_then(DiagramKind::from_keyword);
    Ok(kind)
}

fn classify(err: ErrMode<ContextError>) -> DetectError {
    let in_directive = match &err {
        ErrMode::Cut(ctx) | ErrMode::Backtrack(ctx) => ctx
            .context()
            .any(|c| matches!(c, StrContext::Label(label) if *label == DIRECTIVE)),
        ErrMode::Incomplete(_) => false,
    };

    if in_directive {
        DetectError::UnterminatedDirective
    } else {
        DetectError::UnterminatedFrontMatter
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_plain_keywords() {
        assert_eq!(detect("graph TD;\nA-->B;"), Ok(Some(DiagramKind::Flowchart)));
        assert_eq!(detect("sequenceDiagram\n  A->>B: hi"), Ok(Some(DiagramKind::Sequence)));
        assert_eq!(detect("stateDiagram-v2\n[*] --> A"), Ok(Some(DiagramKind::State)));
        assert_eq!(detect("pie title Pets"), Ok(Some(DiagramKind::Pie)));
        assert_eq!(detect("C4Context\n title x"), Ok(Some(DiagramKind::C4)));
    }

    #[test]
    fn test_unknown_keyword() {
        assert_eq!(detect("not a diagram"), Ok(None));
        assert_eq!(detect("{ \"json\": true }"), Ok(None));
        assert_eq!(detect(""), Ok(None));
        assert_eq!(detect("graphs TD"), Ok(None));
    }

    #[test]
    fn test_front_matter_is_skipped() {
        let text = "---\ntitle: Node with text\n---\nflowchart LR\n    id1[box]";
        assert_eq!(detect(text), Ok(Some(DiagramKind::Flowchart)));

        let empty = "---\n---\ngantt\n  title A";
        assert_eq!(detect(empty), Ok(Some(DiagramKind::Gantt)));
    }

    #[test]
    fn test_unterminated_front_matter() {
        assert_eq!(
            detect("---\ntitle: oops\nflowchart LR"),
            Err(DetectError::UnterminatedFrontMatter)
        );
    }

    #[test]
    fn test_comments_and_directives_are_skipped() {
        let text = "%% a comment\n\n%%{init: {\"theme\": \"dark\"}}%%\n  %% indented\nerDiagram\n";
        assert_eq!(detect(text), Ok(Some(DiagramKind::EntityRelationship)));

        let multiline = "%%{\n  init: { \"theme\": \"forest\" }\n}%%\nmindmap\n  root";
        assert_eq!(detect(multiline), Ok(Some(DiagramKind::Mindmap)));
    }

    #[test]
    fn test_unterminated_directive() {
        assert_eq!(
            detect("%%{init: {\"theme\": \"dark\"}\ngraph TD"),
            Err(DetectError::UnterminatedDirective)
        );
    }

    #[test]
    fn test_front_matter_only_at_start() {
        // A fence after a comment is not front-matter, and not a keyword either.
        assert_eq!(detect("%% note\n---\ngraph TD"), Ok(None));
    }

    fn keyword_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "graph",
            "flowchart",
            "sequenceDiagram",
            "classDiagram-v2",
            "gantt",
            "timeline",
            "xychart-beta",
        ])
    }

    fn check_comment_lines_never_change_kind(
        keyword: &str,
        comments: Vec<String>,
    ) -> Result<(), TestCaseError> {
        let mut text = String::new();
        for comment in &comments {
            text.push_str("%% ");
            text.push_str(comment);
            text.push('\n');
        }
        text.push_str(keyword);
        text.push_str(" TD\n");

        prop_assert_eq!(detect(&text), Ok(DiagramKind::from_keyword(keyword)));
        Ok(())
    }

    proptest! {
        #[test]
        fn comment_lines_never_change_kind(
            keyword in keyword_strategy(),
            comments in prop::collection::vec("[a-zA-Z0-9 :;.,]{0,30}", 0..5),
        ) {
            check_comment_lines_never_change_kind(keyword, comments)?;
        }
    }
}
