//! Upload hand-off between the toolbar and the canvas.
//!
//! [`PendingUploads`] is a single-slot mailbox: the toolbar posts files into
//! it and the canvas takes them out in one consuming step. [`UploadRegistry`]
//! remembers every sticker picked this session so it can be placed again.
use std::mem;

/// Mailbox state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxState {
    Empty,
    Posted,
    /// The last delivery was taken and nothing new has been posted
    Consumed,
}

/// Files handed over in one take
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery<F> {
    pub background: Option<F>,
    pub assets: Vec<F>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingUploads<F> {
    background: Option<F>,
    assets: Vec<F>,
    state: MailboxState,
}

impl<F> Default for PendingUploads<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> PendingUploads<F> {
    pub fn new() -> Self {
        Self {
            background: None,
            assets: Vec::new(),
            state: MailboxState::Empty,
        }
    }

    pub fn state(&self) -> MailboxState {
        self.state
    }

    /// Only the latest background is kept
    pub fn post_background(&mut self, file: F) {
        self.background = Some(file);
        self.state = MailboxState::Posted;
    }

    pub fn post_assets(&mut self, files: impl IntoIterator<Item = F>) {
        let before = self.assets.len();
        self.assets.extend(files);
        if self.assets.len() > before {
            self.state = MailboxState::Posted;
        }
    }

    /// Take everything posted since the last take
    pub fn take(&mut self) -> Option<Delivery<F>> {
        if self.state != MailboxState::Posted {
            return None;
        }
        self.state = MailboxState::Consumed;
        Some(Delivery {
            background: self.background.take(),
            assets: mem::take(&mut self.assets),
        })
    }

    /// Drop anything posted but not yet taken
    pub fn clear(&mut self) {
        self.background = None;
        self.assets.clear();
        self.state = MailboxState::Empty;
    }
}

pub type UploadId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct UploadEntry<F> {
    pub id: UploadId,
    pub name: String,
    pub file: F,
}

/// Append-only list of previously picked files. Duplicates are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRegistry<F> {
    entries: Vec<UploadEntry<F>>,
}

impl<F> Default for UploadRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> UploadRegistry<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, file: F) -> UploadId {
        let id = self.entries.len();
        self.entries.push(UploadEntry {
            id,
            name: name.into(),
            file,
        });
        id
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadEntry<F>> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> &[UploadEntry<F>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_is_one_shot() {
        let mut pending = PendingUploads::new();
        assert_eq!(pending.take(), None);

        pending.post_background("a.jpg");
        pending.post_assets(["s1.png", "s2.png"]);
        assert_eq!(pending.state(), MailboxState::Posted);

        let delivery = pending.take().unwrap();
        assert_eq!(delivery.background, Some("a.jpg"));
        assert_eq!(delivery.assets, vec!["s1.png", "s2.png"]);
        assert_eq!(pending.state(), MailboxState::Consumed);
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_latest_background_wins() {
        let mut pending = PendingUploads::new();
        pending.post_background("old.jpg");
        pending.post_background("new.jpg");
        assert_eq!(pending.take().unwrap().background, Some("new.jpg"));
    }

    #[test]
    fn test_empty_asset_post_is_ignored() {
        let mut pending: PendingUploads<&str> = PendingUploads::new();
        pending.post_assets([]);
        assert_eq!(pending.state(), MailboxState::Empty);
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut pending = PendingUploads::new();
        pending.post_assets(["s.png"]);
        pending.clear();
        assert_eq!(pending.state(), MailboxState::Empty);
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_registry_keeps_duplicates() {
        let mut registry = UploadRegistry::new();
        let a = registry.register("star.png", 1);
        let b = registry.register("star.png", 1);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(b).unwrap().name, "star.png");
        assert!(registry.get(7).is_none());
    }
}
