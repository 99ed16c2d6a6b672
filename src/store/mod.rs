use anyhow::*;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::quiz::row::QuizDocument;

pub mod firestore;
pub mod json_file;
pub mod memory;

pub use firestore::{FirestoreCollection, FirestoreConfig};
pub use json_file::JsonFileCollection;
pub use memory::MemoryCollection;

const GENERATED_ID_LENGTH: usize = 20;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocumentId(id.into())
    }

    /// Random id in the same shape as Firestore auto-ids.
    pub fn generate() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_ID_LENGTH)
            .collect();
        DocumentId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote or local collection of quiz documents.
///
/// Handles are created explicitly by each implementation and must be
/// `close`d once the run is over.
pub trait Collection {
    fn insert(&mut self, document: &QuizDocument) -> Result<DocumentId>;

    /// Documents whose text `field` equals `value` exactly, in store order.
    fn find_equal(&self, field: &str, value: &str) -> Result<Vec<(DocumentId, QuizDocument)>>;

    /// Replaces the whole document stored under `id`.
    fn overwrite(&mut self, id: &DocumentId, document: &QuizDocument) -> Result<()>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
