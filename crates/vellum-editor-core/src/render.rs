//! Rendered preview document model.
//!
//! The host renders markdown out of band and delivers the result as a
//! `RenderedDocument`: block nodes annotated with the char range of the
//! source text they came from, plus their measured geometry, and image
//! nodes identified by their serialized markup.

use std::collections::HashMap;
use std::collections::VecDeque;

/// Opaque handle to a host-side element (DOM node, native view, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// A block-level node of the rendered preview.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    /// Char offset in the source buffer where this block starts.
    pub source_start: Option<usize>,
    /// Char offset in the source buffer where this block ends.
    /// Invariant: `source_start <= source_end` when both are present.
    pub source_end: Option<usize>,
    /// Top edge in px, relative to the top of the rendered document.
    pub top: f64,
    /// Height in px.
    pub height: f64,
}

impl RenderedBlock {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            source_start: None,
            source_end: None,
            top,
            height,
        }
    }

    pub fn with_source(mut self, start: usize, end: usize) -> Self {
        self.source_start = Some(start);
        self.source_end = Some(end);
        self
    }

    /// Bottom edge in px.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// An image in the rendered preview, keyed by its serialized markup.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    /// Serialized element markup, byte-compared during reconciliation.
    pub markup: String,
    /// Host element backing this image.
    pub element: ElementId,
}

/// Annotated tree delivered by the external renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedDocument {
    pub blocks: Vec<RenderedBlock>,
    pub images: Vec<ImageNode>,
}

/// Carry unchanged images over from the previous render.
///
/// A new image whose markup is byte-identical to a previous one adopts the
/// previous element instead of a freshly created one, so the host neither
/// reloads nor refetches it. Duplicates are matched first-available to
/// first-new (FIFO). Returns the number of elements reused.
pub fn reconcile_images(previous: &RenderedDocument, next: &mut RenderedDocument) -> usize {
    let mut available: HashMap<&str, VecDeque<ElementId>> = HashMap::new();
    for image in &previous.images {
        available
            .entry(image.markup.as_str())
            .or_default()
            .push_back(image.element);
    }

    let mut reused = 0;
    for image in &mut next.images {
        if let Some(element) = available
            .get_mut(image.markup.as_str())
            .and_then(|queue| queue.pop_front())
        {
            image.element = element;
            reused += 1;
        }
    }

    tracing::debug!(
        target: "vellum::render",
        reused,
        total = next.images.len(),
        "image reconcile"
    );
    reused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(markup: &str, id: u64) -> ImageNode {
        ImageNode {
            markup: markup.to_string(),
            element: ElementId(id),
        }
    }

    #[test]
    fn test_identical_markup_reuses_element() {
        let previous = RenderedDocument {
            blocks: vec![],
            images: vec![image("<img src='a.png'>", 1)],
        };
        let mut next = RenderedDocument {
            blocks: vec![],
            images: vec![image("<img src='a.png'>", 9)],
        };

        assert_eq!(reconcile_images(&previous, &mut next), 1);
        assert_eq!(next.images[0].element, ElementId(1));
    }

    #[test]
    fn test_changed_markup_keeps_fresh_element() {
        let previous = RenderedDocument {
            blocks: vec![],
            images: vec![image("<img src='a.png'>", 1)],
        };
        let mut next = RenderedDocument {
            blocks: vec![],
            images: vec![image("<img src='b.png'>", 9)],
        };

        assert_eq!(reconcile_images(&previous, &mut next), 0);
        assert_eq!(next.images[0].element, ElementId(9));
    }

    #[test]
    fn test_duplicates_match_fifo() {
        let previous = RenderedDocument {
            blocks: vec![],
            images: vec![image("<img src='a.png'>", 1), image("<img src='a.png'>", 2)],
        };
        let mut next = RenderedDocument {
            blocks: vec![],
            images: vec![
                image("<img src='a.png'>", 10),
                image("<img src='a.png'>", 11),
                image("<img src='a.png'>", 12),
            ],
        };

        assert_eq!(reconcile_images(&previous, &mut next), 2);
        assert_eq!(next.images[0].element, ElementId(1));
        assert_eq!(next.images[1].element, ElementId(2));
        assert_eq!(next.images[2].element, ElementId(12));
    }
}
