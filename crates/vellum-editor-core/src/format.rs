//! Toolbar formatting operations.
//!
//! Each operation rewrites the current selection (or inserts a placeholder
//! at a collapsed cursor) and leaves the editable part selected, so the
//! user can immediately type over it.

use crate::session::EditorSession;
use crate::text::TextBuffer;
use crate::types::Selection;

/// A formatting command from the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    Heading,
    BulletList,
    OrderedList,
    TaskList,
    CodeBlock,
    Quote,
}

/// Apply a toolbar command at the session's selection or cursor.
pub fn apply_format<T: TextBuffer>(session: &mut EditorSession<T>, action: FormatAction) {
    match action {
        FormatAction::Bold => wrap(session, "**", "strong text"),
        FormatAction::Italic => wrap(session, "_", "emphasized text"),
        FormatAction::Strikethrough => wrap(session, "~~", "deleted text"),
        FormatAction::InlineCode => wrap(session, "`", "code text"),
        FormatAction::Heading => prefix(session, "### ", "heading text"),
        FormatAction::BulletList => prefix_lines(session, "-", "list text here"),
        FormatAction::OrderedList => prefix_lines(session, "1.", "list text here"),
        FormatAction::TaskList => prefix_lines(session, "- [ ]", "task text here"),
        FormatAction::CodeBlock => code_block(session),
        FormatAction::Quote => prefix(session, "> ", "quote here"),
    }
}

/// Range being operated on: the non-collapsed selection, or the collapsed
/// cursor position.
fn target_range<T: TextBuffer>(session: &EditorSession<T>) -> std::ops::Range<usize> {
    session
        .selection()
        .filter(|s| !s.is_collapsed())
        .map(|s| s.to_range())
        .unwrap_or_else(|| session.cursor()..session.cursor())
}

fn select<T: TextBuffer>(session: &mut EditorSession<T>, start: usize, end: usize) {
    session.set_selection(Some(Selection::new(start, end)));
    session.set_cursor(end);
}

/// Wrap the selection in a symmetric delimiter, selecting the inner text.
fn wrap<T: TextBuffer>(session: &mut EditorSession<T>, delim: &str, placeholder: &str) {
    let range = target_range(session);
    let start = range.start;
    let delim_len = delim.chars().count();

    let inner = session
        .slice(range.clone())
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
        .unwrap_or_else(|| placeholder.to_string());
    let inner_len = inner.chars().count();

    session.replace(range, &format!("{delim}{inner}{delim}"));
    select(session, start + delim_len, start + delim_len + inner_len);
}

/// Put a one-shot prefix before the selection, selecting the text after it.
fn prefix<T: TextBuffer>(session: &mut EditorSession<T>, prefix: &str, placeholder: &str) {
    let range = target_range(session);
    let start = range.start;
    let prefix_len = prefix.chars().count();

    let text = session
        .slice(range.clone())
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
        .unwrap_or_else(|| placeholder.to_string());
    let text_len = text.chars().count();

    session.replace(range, &format!("{prefix}{text}"));
    select(session, start + prefix_len, start + prefix_len + text_len);
}

/// Put a list marker before every selected line, selecting the first
/// line's text afterwards.
fn prefix_lines<T: TextBuffer>(session: &mut EditorSession<T>, leading: &str, placeholder: &str) {
    let range = target_range(session);
    let start = range.start;
    let leading_len = leading.chars().count();

    let Some(selected) = session.slice(range.clone()).filter(|text| !text.is_empty()) else {
        session.replace(range, &format!("{leading} {placeholder}"));
        select(
            session,
            start + leading_len + 1,
            start + leading_len + 1 + placeholder.chars().count(),
        );
        return;
    };

    let rewritten = selected
        .split('\n')
        .map(|line| format!("{leading} {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    let first_line_len = selected
        .split('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or(0);

    session.replace(range, &rewritten);
    select(
        session,
        start + leading_len + 1,
        start + leading_len + 1 + first_line_len,
    );
}

/// Fence the selection as a code block, selecting the language hint.
fn code_block<T: TextBuffer>(session: &mut EditorSession<T>) {
    let lang_hint = "programming language";
    let range = target_range(session);
    let start = range.start;

    let body = session
        .slice(range.clone())
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
        .unwrap_or_else(|| "code text here".to_string());

    session.replace(range, &format!("\n```{lang_hint}\n{body}\n```\n"));
    select(session, start + 4, start + 4 + lang_hint.chars().count());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(content: &str) -> EditorSession<crate::EditorRope> {
        let mut session = EditorSession::from_str(content);
        session.set_cursor(content.chars().count());
        session
    }

    fn selected(session: &EditorSession<crate::EditorRope>) -> String {
        session
            .selected_text()
            .map(|t| t.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_bold_wraps_selection() {
        let mut session = make_session("make this strong");
        session.set_selection(Some(Selection::new(5, 9)));
        apply_format(&mut session, FormatAction::Bold);
        assert_eq!(session.content_string(), "make **this** strong");
        assert_eq!(selected(&session), "this");
    }

    #[test]
    fn test_bold_placeholder_at_cursor() {
        let mut session = make_session("note: ");
        apply_format(&mut session, FormatAction::Bold);
        assert_eq!(session.content_string(), "note: **strong text**");
        assert_eq!(selected(&session), "strong text");
    }

    #[test]
    fn test_italic_wraps_selection() {
        let mut session = make_session("so subtle");
        session.set_selection(Some(Selection::new(3, 9)));
        apply_format(&mut session, FormatAction::Italic);
        assert_eq!(session.content_string(), "so _subtle_");
        assert_eq!(selected(&session), "subtle");
    }

    #[test]
    fn test_strikethrough_and_inline_code_wrap() {
        let mut session = make_session("old value");
        session.set_selection(Some(Selection::new(0, 3)));
        apply_format(&mut session, FormatAction::Strikethrough);
        assert_eq!(session.content_string(), "~~old~~ value");
        assert_eq!(selected(&session), "old");

        let mut session = make_session("run cargo here");
        session.set_selection(Some(Selection::new(4, 9)));
        apply_format(&mut session, FormatAction::InlineCode);
        assert_eq!(session.content_string(), "run `cargo` here");
        assert_eq!(selected(&session), "cargo");
    }

    #[test]
    fn test_heading_prefixes_selection() {
        let mut session = make_session("Title");
        session.set_selection(Some(Selection::new(0, 5)));
        apply_format(&mut session, FormatAction::Heading);
        assert_eq!(session.content_string(), "### Title");
        assert_eq!(selected(&session), "Title");

        let mut empty = make_session("");
        apply_format(&mut empty, FormatAction::Heading);
        assert_eq!(empty.content_string(), "### heading text");
        assert_eq!(selected(&empty), "heading text");
    }

    #[test]
    fn test_bullet_list_prefixes_each_line() {
        let mut session = make_session("one\ntwo\nthree");
        session.set_selection(Some(Selection::new(0, 13)));
        apply_format(&mut session, FormatAction::BulletList);
        assert_eq!(session.content_string(), "- one\n- two\n- three");
        // First line's text stays selected for immediate editing.
        assert_eq!(selected(&session), "one");
    }

    #[test]
    fn test_ordered_list_placeholder() {
        let mut session = make_session("");
        apply_format(&mut session, FormatAction::OrderedList);
        assert_eq!(session.content_string(), "1. list text here");
        assert_eq!(selected(&session), "list text here");
    }

    #[test]
    fn test_task_list_prefixes_lines() {
        let mut session = make_session("wash\ndry");
        session.set_selection(Some(Selection::new(0, 8)));
        apply_format(&mut session, FormatAction::TaskList);
        assert_eq!(session.content_string(), "- [ ] wash\n- [ ] dry");
        assert_eq!(selected(&session), "wash");
    }

    #[test]
    fn test_code_block_selects_language_hint() {
        let mut session = make_session("fn main() {}");
        session.set_selection(Some(Selection::new(0, 12)));
        apply_format(&mut session, FormatAction::CodeBlock);
        assert_eq!(
            session.content_string(),
            "\n```programming language\nfn main() {}\n```\n"
        );
        assert_eq!(selected(&session), "programming language");
    }

    #[test]
    fn test_quote_prefix() {
        let mut session = make_session("wise words");
        session.set_selection(Some(Selection::new(0, 10)));
        apply_format(&mut session, FormatAction::Quote);
        assert_eq!(session.content_string(), "> wise words");
        assert_eq!(selected(&session), "wise words");
    }
}
