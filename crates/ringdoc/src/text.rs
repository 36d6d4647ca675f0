use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Position tag carried by a phrase element, e.g. `phrase-2`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PhraseClass(String);

crate::impl_string_newtype!(PhraseClass);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PhraseText(String);

crate::impl_string_newtype!(PhraseText);

impl PhraseText {
    /// Number of characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}
