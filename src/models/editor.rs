// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor state management.
//!
//! All editable state lives in [`EditorState`] and changes only through
//! [`EditorAction`]s passed to [`EditorState::apply`]. The UI reads the
//! state and emits actions; nothing mutates it behind the reducer's back.

use super::text_element::{TextElement, TextUpdate};
use crate::io::media::{MediaLocator, UploadedMedia};
use std::sync::Arc;

/// A user-triggered change to the editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    AddText,
    UpdateText { id: String, update: TextUpdate },
    /// Position update from a drag session. Bounds are enforced by the
    /// drag controller, not here.
    MoveText { id: String, x: f32, y: f32 },
    DeleteText(String),
    SelectText(String),
    SelectTemplate(MediaLocator),
    UploadMedia(UploadedMedia),
    ClearUpload,
}

/// Complete editor state: text overlays, selection and background.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// Copy-on-write so render snapshots are never affected by later edits.
    elements: Arc<Vec<TextElement>>,
    selected_id: String,
    selected_template: Option<MediaLocator>,
    uploaded_media: Option<UploadedMedia>,
    /// Next id to hand out; ids are never reused.
    next_id: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Create the initial state: "TOP TEXT" and "BOTTOM TEXT", the first
    /// one selected, no background.
    pub fn new() -> Self {
        let elements = vec![
            TextElement::new("1", "TOP TEXT", 50.0, 20.0, 32),
            TextElement::new("2", "BOTTOM TEXT", 50.0, 80.0, 32),
        ];

        Self {
            elements: Arc::new(elements),
            selected_id: "1".to_string(),
            selected_template: None,
            uploaded_media: None,
            next_id: 3,
        }
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    /// Shared snapshot of the element list for off-thread rendering.
    pub fn snapshot(&self) -> Arc<Vec<TextElement>> {
        Arc::clone(&self.elements)
    }

    pub fn selected_id(&self) -> &str {
        &self.selected_id
    }

    pub fn selected(&self) -> Option<&TextElement> {
        self.element(&self.selected_id)
    }

    pub fn element(&self, id: &str) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn selected_template(&self) -> Option<&MediaLocator> {
        self.selected_template.as_ref()
    }

    pub fn uploaded_media(&self) -> Option<&UploadedMedia> {
        self.uploaded_media.as_ref()
    }

    /// The active background: an upload wins over a selected template.
    pub fn background(&self) -> Option<&MediaLocator> {
        self.uploaded_media
            .as_ref()
            .map(|media| &media.locator)
            .or(self.selected_template.as_ref())
    }

    /// Apply an action. Returns true if the state changed.
    pub fn apply(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::AddText => {
                let id = self.next_id.to_string();
                self.next_id += 1;
                Arc::make_mut(&mut self.elements).push(TextElement::new(
                    id.clone(),
                    "NEW TEXT",
                    50.0,
                    50.0,
                    24,
                ));
                self.selected_id = id;
                log::info!("Added text element {}, total: {}", self.selected_id, self.elements.len());
                true
            }
            EditorAction::UpdateText { id, update } => self.update(&id, &update),
            EditorAction::MoveText { id, x, y } => self.update(&id, &TextUpdate::position(x, y)),
            EditorAction::DeleteText(id) => self.delete(&id),
            EditorAction::SelectText(id) => {
                if self.selected_id == id || self.element(&id).is_none() {
                    return false;
                }
                self.selected_id = id;
                true
            }
            EditorAction::SelectTemplate(locator) => {
                if self.selected_template.as_ref() == Some(&locator) {
                    return false;
                }
                log::info!("Selected template {}", locator);
                self.selected_template = Some(locator);
                true
            }
            EditorAction::UploadMedia(media) => {
                log::info!("Using uploaded {} as background", media.locator);
                self.uploaded_media = Some(media);
                true
            }
            EditorAction::ClearUpload => self.uploaded_media.take().is_some(),
        }
    }

    fn update(&mut self, id: &str, update: &TextUpdate) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id == id) else {
            return false;
        };
        // Skip the copy when nothing would change.
        let mut candidate = self.elements[index].clone();
        if !candidate.apply(update) {
            return false;
        }
        Arc::make_mut(&mut self.elements)[index] = candidate;
        true
    }

    fn delete(&mut self, id: &str) -> bool {
        if self.elements.len() <= 1 {
            return false;
        }
        let Some(index) = self.elements.iter().position(|e| e.id == id) else {
            return false;
        };

        let elements = Arc::make_mut(&mut self.elements);
        elements.remove(index);
        if self.selected_id == id {
            self.selected_id = elements[0].id.clone();
        }
        log::info!("Deleted text element {}, total: {}", id, elements.len());
        true
    }
}
