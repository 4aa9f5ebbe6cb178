//! Holder for the loaded image and the latest transform result.

use crate::buffer::ImageBuffer;

/// Owns the original and modified buffers.
///
/// `modified` is always the output of one transform applied to the current
/// `original`; loading a new original therefore drops it. The store never
/// rejects a buffer and hands out read-only borrows only.
#[derive(Debug, Default, Clone)]
pub struct ImageStore {
    original: Option<ImageBuffer>,
    modified: Option<ImageBuffer>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the original and clear any previous result.
    pub fn load(&mut self, buffer: ImageBuffer) {
        self.original = Some(buffer);
        self.modified = None;
    }

    pub fn original(&self) -> Option<&ImageBuffer> {
        self.original.as_ref()
    }

    /// Replace the latest result.
    pub fn commit_modified(&mut self, buffer: ImageBuffer) {
        self.modified = Some(buffer);
    }

    pub fn modified(&self) -> Option<&ImageBuffer> {
        self.modified.as_ref()
    }

    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    pub fn has_modified(&self) -> bool {
        self.modified.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::test_support::{gradient_rgb, solid_gray};

    #[test]
    fn test_empty_store() {
        let store = ImageStore::new();
        assert!(!store.has_original());
        assert!(!store.has_modified());
        assert!(store.original().is_none());
        assert!(store.modified().is_none());
    }

    #[test]
    fn test_load_then_commit() {
        let mut store = ImageStore::new();
        store.load(gradient_rgb(4, 4));
        assert!(store.has_original());
        assert!(!store.has_modified());

        store.commit_modified(solid_gray(4, 4, 1));
        assert_eq!(store.modified(), Some(&solid_gray(4, 4, 1)));
        assert_eq!(store.original(), Some(&gradient_rgb(4, 4)));
    }

    #[test]
    fn test_load_clears_modified() {
        let mut store = ImageStore::new();
        store.load(gradient_rgb(4, 4));
        store.commit_modified(solid_gray(4, 4, 1));
        store.load(gradient_rgb(6, 2));
        assert!(!store.has_modified());
        assert_eq!(store.original().map(|b| b.dimensions()), Some((6, 2)));
    }

    #[test]
    fn test_commit_replaces() {
        let mut store = ImageStore::new();
        store.load(gradient_rgb(3, 3));
        store.commit_modified(solid_gray(3, 3, 1));
        store.commit_modified(solid_gray(3, 3, 2));
        assert_eq!(store.modified(), Some(&solid_gray(3, 3, 2)));
    }
}
