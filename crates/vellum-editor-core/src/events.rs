//! Lifecycle notifications exposed to the host.
//!
//! Every notification carries the buffer state at call time so the host
//! can react (autosave, dirty tracking, toolbar state) without reaching
//! back into the session.

use crate::session::EditorSession;
use crate::text::TextBuffer;

/// Buffer state at the moment an event fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub content: String,
    pub cursor: usize,
}

impl SessionSnapshot {
    pub fn of<T: TextBuffer>(session: &EditorSession<T>) -> Self {
        Self {
            content: session.content_string(),
            cursor: session.cursor(),
        }
    }
}

/// Editor lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Ready(SessionSnapshot),
    ContentChanged(SessionSnapshot),
    RenderRequested(SessionSnapshot),
    UploadStarted(SessionSnapshot),
    UploadFinished(SessionSnapshot),
}

/// Receiver for lifecycle events.
pub trait EventSink {
    fn emit(&self, event: EditorEvent);
}

/// Unit type implementation - events are dropped.
impl EventSink for () {
    fn emit(&self, _event: EditorEvent) {}
}

impl<T: EventSink> EventSink for &T {
    fn emit(&self, event: EditorEvent) {
        (*self).emit(event)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;

    /// Collects events for assertions; single-threaded, like the model.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: RefCell<Vec<EditorEvent>>,
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: EditorEvent) {
            self.events.borrow_mut().push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;

    #[test]
    fn test_snapshot_captures_state() {
        let mut session = EditorSession::from_str("hello");
        session.set_cursor(3);
        let snap = SessionSnapshot::of(&session);
        assert_eq!(snap.content, "hello");
        assert_eq!(snap.cursor, 3);
    }

    #[test]
    fn test_recording_sink_collects() {
        let sink = RecordingSink::default();
        let session = EditorSession::from_str("x");
        sink.emit(EditorEvent::Ready(SessionSnapshot::of(&session)));
        assert_eq!(sink.events.borrow().len(), 1);
    }
}
