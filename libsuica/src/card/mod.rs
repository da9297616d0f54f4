// libsuica/src/card/mod.rs

use derive_more::Display;

mod info;
pub use info::FelicaTag;

/// Balance Decoder.
pub mod balance;
pub use balance::{SuicaRecord, UseDate};

/// Opaque identifier of a tag object owned by the hardware layer.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "tag#{}", _0)]
pub struct TagHandle(pub u32);

/// Protocol family a detected tag exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// FeliCa (ISO 18092); the only kind a scan can read.
    Felica(FelicaTag),
    /// ISO 7816 smart card.
    Iso7816,
    /// ISO 15693 vicinity tag.
    Iso15693,
    /// MIFARE tag.
    Mifare,
}

/// One candidate reported by a tag-detected notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTag {
    /// Hardware tag object.
    pub handle: TagHandle,
    /// What the tag speaks.
    pub kind: TagKind,
}

impl DetectedTag {
    /// Tag of any kind.
    pub fn new(handle: TagHandle, kind: TagKind) -> Self {
        Self { handle, kind }
    }

    /// FeliCa tag sharing the view's handle.
    pub fn felica(tag: FelicaTag) -> Self {
        Self::new(tag.handle, TagKind::Felica(tag))
    }

    /// FeliCa view of the tag, if it speaks FeliCa.
    pub fn as_felica(&self) -> Option<&FelicaTag> {
        match &self.kind {
            TagKind::Felica(tag) => Some(tag),
            _ => None,
        }
    }
}
