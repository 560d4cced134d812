//! Structure-aware line continuation on Enter.
//!
//! Replaces the default newline insertion: when the current line carries a
//! list marker, the next line is opened with a fresh marker; a line that is
//! only a marker is collapsed instead; plain lines keep their indentation.

use crate::session::EditorSession;
use crate::text::TextBuffer;

/// List marker parsed from the prefix of a line, after leading spaces.
///
/// Classification priority is task > bullet > ordered, so a line matching
/// several patterns gets exactly one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `- ` or `* `
    Bullet(char),
    /// `1. `, `2. `, ...
    Ordered(u64),
    /// `- [ ] ` / `* [x] `
    Task { bullet: char, checked: bool },
}

impl ListMarker {
    /// Marker text opening the continuation line.
    ///
    /// The bullet character is carried over unchanged (mixed bullets are
    /// never normalized across lines), ordered markers increment the parsed
    /// number without looking at any other line (saturating at `u64::MAX`),
    /// and tasks always continue unchecked.
    pub fn continuation_text(&self) -> String {
        match self {
            ListMarker::Bullet(c) => format!("{c} "),
            ListMarker::Ordered(n) => format!("{}. ", n.saturating_add(1)),
            ListMarker::Task { bullet, .. } => format!("{bullet} [ ] "),
        }
    }
}

/// What `on_enter` did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterEdit {
    /// A line break (plus continuation text) was inserted.
    Continued { inserted: String },
    /// An empty marker line was collapsed away.
    Collapsed,
}

/// Classify the non-space prefix of a line.
///
/// Returns the marker and its length in chars. Lines matching no pattern
/// return None and fall through to indentation-preserving continuation -
/// never an error.
pub fn classify_marker(line: &str) -> Option<(ListMarker, usize)> {
    parse_task(line)
        .or_else(|| parse_bullet(line))
        .or_else(|| parse_ordered(line))
}

fn parse_task(line: &str) -> Option<(ListMarker, usize)> {
    let mut it = line.chars().peekable();
    let bullet = it.next()?;
    if bullet != '-' && bullet != '*' {
        return None;
    }
    let mut len = 1;
    let mut ws = 0;
    while it.peek().is_some_and(|c| c.is_whitespace()) {
        it.next();
        len += 1;
        ws += 1;
    }
    if ws == 0 || it.next()? != '[' {
        return None;
    }
    let checked = match it.next()? {
        'x' => true,
        ' ' => false,
        _ => return None,
    };
    if it.next()? != ']' || !it.next()?.is_whitespace() {
        return None;
    }
    Some((ListMarker::Task { bullet, checked }, len + 4))
}

fn parse_bullet(line: &str) -> Option<(ListMarker, usize)> {
    if line.starts_with("- ") {
        Some((ListMarker::Bullet('-'), 2))
    } else if line.starts_with("* ") {
        Some((ListMarker::Bullet('*'), 2))
    } else {
        None
    }
}

fn parse_ordered(line: &str) -> Option<(ListMarker, usize)> {
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let mut it = line.chars().skip(digits.len());
    if it.next()? != '.' || !it.next()?.is_whitespace() {
        return None;
    }
    let number: u64 = digits.parse().ok()?;
    Some((ListMarker::Ordered(number), digits.len() + 2))
}

/// Handle the Enter keystroke.
///
/// The current line is the slice from the line break preceding the cursor
/// (exclusive) to the cursor; its leading run of spaces is the indent, the
/// remainder is classified against the marker patterns.
///
/// - Marker with content after it: continue with a fresh marker on the next
///   line, same indent.
/// - Bare marker: collapse the empty item - truncate at the prior line
///   break and leave a blank line, or reduce to a single newline at the
///   start of the document. The cursor lands immediately before the text
///   that followed it.
/// - No marker: plain line break, carrying the indent when the line has
///   non-space content.
///
/// The caller keeps the new cursor line visible, see
/// [`crate::scroll::ensure_caret_visible`].
pub fn on_enter<T: TextBuffer>(session: &mut EditorSession<T>) -> EnterEdit {
    let cursor = session.cursor();
    let line_start = session.line_start(cursor);

    let mut indent_len = 0;
    while line_start + indent_len < cursor
        && session.char_at(line_start + indent_len) == Some(' ')
    {
        indent_len += 1;
    }
    let indent = " ".repeat(indent_len);
    let non_space = session
        .slice(line_start + indent_len..cursor)
        .unwrap_or_default();

    if let Some((marker, marker_len)) = classify_marker(&non_space) {
        if non_space.chars().count() > marker_len {
            let inserted = format!("\n{}{}", indent, marker.continuation_text());
            session.insert(cursor, &inserted);
            EnterEdit::Continued { inserted }
        } else if line_start > 0 {
            session.replace(line_start - 1..cursor, "\n\n");
            EnterEdit::Collapsed
        } else {
            session.replace(0..cursor, "\n");
            EnterEdit::Collapsed
        }
    } else if non_space.is_empty() {
        session.insert(cursor, "\n");
        EnterEdit::Continued {
            inserted: "\n".to_string(),
        }
    } else {
        let inserted = format!("\n{}", indent);
        session.insert(cursor, &inserted);
        EnterEdit::Continued { inserted }
    }
}
