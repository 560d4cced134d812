//! Attachment upload orchestration.
//!
//! An upload puts a unique placeholder token into the buffer, hands the
//! host a transport request, and on completion rewrites that token into a
//! markdown reference or an inline error. The replace protocol works
//! against the buffer's content at completion time, so user edits made
//! while the transfer was in flight are respected - including deleting the
//! token entirely.

use std::collections::HashMap;

use crate::events::{EditorEvent, EventSink, SessionSnapshot};
use crate::session::EditorSession;
use crate::text::TextBuffer;
use crate::types::Selection;

/// Upload limits and transport headers.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum file size in bytes; larger files fail locally without
    /// contacting the network.
    pub max_size: usize,
    /// Attachment-scope identifier sent with every request.
    pub scope: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size: 20 * 1024 * 1024,
            scope: String::new(),
        }
    }
}

/// A file picked, dropped or pasted into the editor.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Image detection by file-name extension; decides whether the
    /// markdown reference gets the `!` prefix.
    pub fn is_image(&self) -> bool {
        let name = self.name.to_ascii_lowercase();
        ["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"]
            .iter()
            .any(|ext| name.ends_with(&format!(".{ext}")))
    }
}

/// Transport request handed to the host; the host performs the transfer
/// out of band and reports back through [`UploadCoordinator::finish`].
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// URL-encoded file name, carried as a request header.
    pub file_name: String,
    /// Attachment-scope identifier, carried as a request header.
    pub scope: String,
    /// Raw file bytes, carried as the request body.
    pub bytes: Vec<u8>,
}

/// Plain-text transport response: the reference URL on success, an error
/// description otherwise. Status 200 is success, anything else failure.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

/// Lifecycle of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

/// Why an upload failed. All variants surface as inline `!!…!!` text in
/// the buffer; none are retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// Local pre-flight rejection, no network contact.
    #[error("Upload should be less than {limit_mb} Mb")]
    SizeExceeded { limit_mb: u64 },
    /// Connectivity failure.
    #[error("Unable to connect to server")]
    Transport,
    /// Non-success response, with the server-supplied description.
    #[error("{0}")]
    Server(String),
}

/// Identifies one in-flight transfer. Independent of any buffer snapshot;
/// handles with distinct tokens may coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandle {
    pub id: u64,
    /// The placeholder token this handle will replace on completion.
    pub token: String,
    pub file_name: String,
    pub is_image: bool,
}

/// Success or error path of the message-update protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceKind {
    Success,
    Error,
}

/// Manages upload lifecycles and their placeholder tokens.
#[derive(Debug, Default)]
pub struct UploadCoordinator {
    config: UploadConfig,
    next_id: u64,
    states: HashMap<u64, UploadState>,
}

impl UploadCoordinator {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            next_id: 0,
            states: HashMap::new(),
        }
    }

    pub fn state(&self, handle: &UploadHandle) -> Option<UploadState> {
        self.states.get(&handle.id).copied()
    }

    /// Begin an upload: insert a unique placeholder token at the
    /// cursor/selection and hand back the transport request.
    ///
    /// Oversized files fail immediately as [`UploadError::SizeExceeded`],
    /// writing the inline error without contacting the network.
    pub fn start_upload<T: TextBuffer, E: EventSink>(
        &mut self,
        file: UploadFile,
        session: &mut EditorSession<T>,
        sink: &E,
    ) -> Result<(UploadHandle, UploadRequest), UploadError> {
        if file.size() > self.config.max_size {
            let limit_mb = (self.config.max_size as f64 / 1024.0 / 1024.0).round() as u64;
            let err = UploadError::SizeExceeded { limit_mb };
            tracing::debug!(
                target: "vellum::upload",
                name = %file.name,
                size = file.size(),
                "rejected oversized upload"
            );
            insert_feedback(session, &format!("!!{err}!!"), ReplaceKind::Error);
            return Err(err);
        }

        let token = placeholder_token(&session.content_string());
        match session.selection().filter(|s| !s.is_collapsed()) {
            Some(sel) => session.replace(sel.to_range(), &token),
            None => session.insert_at_cursor(&token),
        }
        session.set_selection(None);

        let id = self.next_id;
        self.next_id += 1;
        self.states.insert(id, UploadState::Pending);

        let handle = UploadHandle {
            id,
            token,
            file_name: file.name.clone(),
            is_image: file.is_image(),
        };
        let request = UploadRequest {
            file_name: urlencoding::encode(&file.name).into_owned(),
            scope: self.config.scope.clone(),
            bytes: file.bytes,
        };

        tracing::debug!(target: "vellum::upload", id, token = %handle.token, "upload started");
        sink.emit(EditorEvent::UploadStarted(SessionSnapshot::of(session)));
        Ok((handle, request))
    }

    /// Record that the host has dispatched the transfer.
    pub fn mark_dispatched(&mut self, handle: &UploadHandle) {
        self.states.insert(handle.id, UploadState::InFlight);
    }

    /// Apply a transfer completion against the buffer's current content.
    ///
    /// `response` is None on a transport failure. Status 200 rewrites the
    /// token into `[name](url)` (or `![name](url)` for images); anything
    /// else rewrites it into `!!<description>!!`. Terminal either way -
    /// re-initiation is a fresh user action.
    pub fn finish<T: TextBuffer, E: EventSink>(
        &mut self,
        handle: &UploadHandle,
        response: Option<UploadResponse>,
        session: &mut EditorSession<T>,
        sink: &E,
    ) -> Result<(), UploadError> {
        let outcome = match response {
            Some(r) if r.status == 200 => Ok(r.body),
            Some(r) => Err(UploadError::Server(r.body)),
            None => Err(UploadError::Transport),
        };

        let result = match outcome {
            Ok(url) => {
                let reference =
                    markdown_reference(&handle.file_name, &url, handle.is_image);
                replace_token(session, &reference, &handle.token, ReplaceKind::Success);
                self.states.insert(handle.id, UploadState::Succeeded);
                tracing::debug!(target: "vellum::upload", id = handle.id, "upload succeeded");
                Ok(())
            }
            Err(err) => {
                replace_token(
                    session,
                    &format!("!!{err}!!"),
                    &handle.token,
                    ReplaceKind::Error,
                );
                self.states.insert(handle.id, UploadState::Failed);
                tracing::debug!(target: "vellum::upload", id = handle.id, %err, "upload failed");
                Err(err)
            }
        };

        sink.emit(EditorEvent::UploadFinished(SessionSnapshot::of(session)));
        result
    }
}

/// Generate a placeholder absent from the current content: `[Uploading
/// file...]`, then `[Uploading file2...]`, `file3`, ...
fn placeholder_token(content: &str) -> String {
    let mut token = "[Uploading file...]".to_string();
    let mut n = 1u32;
    while content.contains(&token) {
        n += 1;
        token = format!("[Uploading file{n}...]");
    }
    token
}

fn markdown_reference(name: &str, url: &str, is_image: bool) -> String {
    let name = if name.is_empty() {
        "Enter description here"
    } else {
        name
    };
    let reference = format!("[{name}]({url})");
    if is_image {
        format!("!{reference}")
    } else {
        reference
    }
}

/// Message-update protocol: rewrite `token` into `new_text`.
///
/// When the token still occurs verbatim, that occurrence is replaced and
/// the cursor adjusted: untouched when strictly before the token; on the
/// success path shifted by the length delta when after it, or placed past
/// the replacement when inside it; on the error path any cursor not
/// before the token lands right after the markers.
///
/// When the user has deleted the token, feedback is not dropped: the text
/// is inserted at (or replacing) the current selection instead - success
/// text with the cursor moved past it, error text left selected so the
/// markers stay visible at the edit point.
pub fn replace_token<T: TextBuffer>(
    session: &mut EditorSession<T>,
    new_text: &str,
    token: &str,
    kind: ReplaceKind,
) {
    let pos = if token.is_empty() {
        None
    } else {
        session.buffer().find(token)
    };

    let Some(pos) = pos else {
        tracing::debug!(target: "vellum::upload", token, "token gone, inserting feedback inline");
        insert_feedback(session, new_text, kind);
        return;
    };

    let token_len = token.chars().count();
    let new_len = new_text.chars().count();
    let cursor = session.cursor();

    session.replace(pos..pos + token_len, new_text);

    let adjusted = match kind {
        ReplaceKind::Success => {
            if cursor < pos {
                cursor
            } else if cursor > pos + token_len {
                cursor - token_len + new_len
            } else {
                pos + new_len
            }
        }
        ReplaceKind::Error => {
            if cursor < pos {
                cursor
            } else {
                pos + new_len
            }
        }
    };
    session.set_cursor(adjusted);
    session.set_selection(None);
}

fn insert_feedback<T: TextBuffer>(session: &mut EditorSession<T>, text: &str, kind: ReplaceKind) {
    let range = session
        .selection()
        .filter(|s| !s.is_collapsed())
        .map(|s| s.to_range())
        .unwrap_or_else(|| session.cursor()..session.cursor());
    let start = range.start;

    session.replace(range, text);

    match kind {
        ReplaceKind::Success => session.set_selection(None),
        ReplaceKind::Error => {
            session.set_selection(Some(Selection::new(start, start + text.chars().count())));
        }
    }
}
