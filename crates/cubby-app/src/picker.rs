// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::ItemDraft;

pub const IMAGE_DENIED_MESSAGE: &str = "Permission to access images was denied";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePick {
    Picked(String),
    Denied,
}

/// Source of image references for the item form. One call per request;
/// callers never retry a denial.
pub trait ImagePicker {
    fn pick_image(&mut self, request: &str) -> Result<ImagePick>;
}

impl ItemDraft {
    /// Store a granted image on the draft. A denial leaves the current image
    /// untouched and hands back the alert text to show.
    pub fn apply_image_pick(&mut self, pick: ImagePick) -> Option<&'static str> {
        match pick {
            ImagePick::Picked(uri) => {
                self.image = Some(uri);
                None
            }
            ImagePick::Denied => Some(IMAGE_DENIED_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IMAGE_DENIED_MESSAGE, ImagePick};
    use crate::ItemDraft;

    #[test]
    fn granted_pick_sets_image() {
        let mut draft = ItemDraft::default();
        let alert = draft.apply_image_pick(ImagePick::Picked("file:///tmp/a.png".to_owned()));
        assert_eq!(alert, None);
        assert_eq!(draft.image.as_deref(), Some("file:///tmp/a.png"));
    }

    #[test]
    fn denied_pick_leaves_image_unset() {
        let mut draft = ItemDraft::default();
        let alert = draft.apply_image_pick(ImagePick::Denied);
        assert_eq!(alert, Some(IMAGE_DENIED_MESSAGE));
        assert_eq!(draft.image, None);
    }
}
