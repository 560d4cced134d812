//! vellum-editor-core: framework-free logic for a markdown editing surface.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage abstraction, with a ropey-backed
//!   `EditorRope` implementation
//! - `EditorSession<T>` - explicit buffer + cursor + selection state passed
//!   into and returned from every engine operation
//! - Line continuation on Enter, preview scroll synchronization, and
//!   attachment upload orchestration - all generic over TextBuffer

pub mod continuation;
pub mod events;
pub mod format;
pub mod platform;
pub mod render;
pub mod schedule;
pub mod scroll;
pub mod session;
pub mod text;
pub mod types;
pub mod upload;

pub use continuation::{on_enter, EnterEdit, ListMarker};
pub use events::{EditorEvent, EventSink, SessionSnapshot};
pub use format::{apply_format, FormatAction};
pub use platform::{CaretMetrics, CaretPoint};
pub use render::{reconcile_images, ElementId, ImageNode, RenderedBlock, RenderedDocument};
pub use schedule::{RenderScheduler, ScheduleConfig};
pub use scroll::{compute_scroll_offset, ensure_caret_visible, CaretAnchor};
pub use session::EditorSession;
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use types::Selection;
pub use upload::{
    replace_token, ReplaceKind, UploadConfig, UploadCoordinator, UploadError, UploadFile,
    UploadHandle, UploadRequest, UploadResponse, UploadState,
};
