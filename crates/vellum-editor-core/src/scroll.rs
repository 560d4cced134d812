//! Preview scroll synchronization.
//!
//! Keeps the rendered block nearest the caret visible in the preview, at
//! roughly the same height as the caret sits in the edit surface.

use crate::platform::CaretMetrics;
use crate::render::{RenderedBlock, RenderedDocument};
use crate::session::EditorSession;
use crate::text::TextBuffer;

/// Caret position used to drive the preview scroll.
///
/// Captured live while the edit surface is focused, or cached the last
/// time the preview became visible (the buffer may be unfocused by then).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretAnchor {
    /// Char offset of the caret in the source buffer.
    pub offset: usize,
    /// Vertical px distance from the caret to the edit viewport's top,
    /// i.e. measured caret top minus the current edit scroll.
    pub offset_from_top: f64,
}

impl CaretAnchor {
    /// Capture the anchor from a live session.
    ///
    /// Returns None when the text preceding the caret is all whitespace:
    /// near the document start the preview is pinned to the top rather
    /// than scrolled around distractingly.
    pub fn capture<T, M>(
        session: &EditorSession<T>,
        metrics: &M,
        edit_scroll_top: f64,
    ) -> Option<Self>
    where
        T: TextBuffer,
        M: CaretMetrics + ?Sized,
    {
        let offset = session.cursor();
        let before = session.slice(0..offset)?;
        if before.trim().is_empty() {
            return None;
        }
        let point = metrics.caret_position(&session.content_string(), offset);
        Some(Self {
            offset,
            offset_from_top: point.top - edit_scroll_top,
        })
    }

    /// Rebuild a previously captured anchor.
    pub fn cached(offset: usize, offset_from_top: f64) -> Self {
        Self {
            offset,
            offset_from_top,
        }
    }
}

/// The rendered block with the greatest `source_start` not exceeding the
/// caret offset.
pub fn nearest_preceding_block(
    rendered: &RenderedDocument,
    offset: usize,
) -> Option<&RenderedBlock> {
    rendered
        .blocks
        .iter()
        .filter(|b| b.source_start.is_some_and(|start| start <= offset))
        .max_by_key(|b| b.source_start)
}

/// Compute the preview's vertical scroll offset for a caret anchor.
///
/// A None anchor (caret in the leading whitespace) pins the preview to the
/// top, as does a document with no block preceding the caret. Otherwise
/// the nearest preceding block is aligned with the caret's height in the
/// edit viewport:
///
/// - caret past the block (`source_end <= offset`): its bottom sits
///   `offset_from_top` below the viewport top, clamped so the bottom stays
///   inside the viewport;
/// - caret inside or before the block: its top sits `offset_from_top`
///   below the viewport top, clamped so the top never scrolls above the
///   viewport.
///
/// The exact clamps keep the relevant block visible; the constants carry
/// no deeper contract and are tunable.
pub fn compute_scroll_offset(
    anchor: Option<&CaretAnchor>,
    rendered: &RenderedDocument,
    viewport_height: f64,
) -> f64 {
    let Some(anchor) = anchor else {
        return 0.0;
    };
    let Some(block) = nearest_preceding_block(rendered, anchor.offset) else {
        return 0.0;
    };

    let past_block = block.source_end.is_some_and(|end| end <= anchor.offset);
    let target = if past_block {
        let mut target = block.bottom() - anchor.offset_from_top;
        if block.bottom() - target > viewport_height {
            target = block.bottom() - viewport_height;
        }
        target
    } else {
        let mut target = block.top - anchor.offset_from_top;
        if target > block.top {
            target = block.top;
        }
        target
    };

    tracing::trace!(
        target: "vellum::scroll",
        offset = anchor.offset,
        past_block,
        scroll = target.max(0.0),
        "preview scroll"
    );
    target.max(0.0)
}

/// Scroll needed to keep the caret line visible after an edit.
///
/// Returns the new edit scroll: unchanged while the line's bottom edge is
/// inside the viewport, otherwise scrolled down by the overflow amount.
pub fn ensure_caret_visible(caret_bottom: f64, scroll_top: f64, viewport_height: f64) -> f64 {
    if caret_bottom > scroll_top + viewport_height {
        caret_bottom - viewport_height
    } else {
        scroll_top
    }
}
