use anyhow::*;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::quiz::row::QuizDocument;
use crate::store::{Collection, DocumentId};

#[cfg(test)]
mod tests;

/// In-process collection. Clones share the same documents, so a test can
/// keep a handle and inspect what a pipeline wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryCollection {
    documents: Arc<RwLock<Vec<(DocumentId, QuizDocument)>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_documents(documents: Vec<(DocumentId, QuizDocument)>) -> Self {
        MemoryCollection {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    pub fn get(&self, id: &DocumentId) -> Option<QuizDocument> {
        self.documents
            .read()
            .iter()
            .find(|(existing_id, _)| existing_id == id)
            .map(|(_, document)| document.clone())
    }

    pub fn documents(&self) -> Vec<(DocumentId, QuizDocument)> {
        self.documents.read().clone()
    }
}

impl Collection for MemoryCollection {
    fn insert(&mut self, document: &QuizDocument) -> Result<DocumentId> {
        let mut documents = self.documents.write();
        let mut id = DocumentId::generate();
        while documents.iter().any(|(existing_id, _)| *existing_id == id) {
            id = DocumentId::generate();
        }
        documents.push((id.clone(), document.clone()));
        Ok(id)
    }

    fn find_equal(&self, field: &str, value: &str) -> Result<Vec<(DocumentId, QuizDocument)>> {
        let documents = self.documents.read();
        let mut matches = Vec::new();
        for (id, document) in documents.iter() {
            if document.text_field(field) == Some(value) {
                matches.push((id.clone(), document.clone()));
            }
        }
        Ok(matches)
    }

    fn overwrite(&mut self, id: &DocumentId, document: &QuizDocument) -> Result<()> {
        let mut documents = self.documents.write();
        let slot = documents
            .iter_mut()
            .find(|(existing_id, _)| existing_id == id)
            .with_context(|| format!("No document with id {}", id))?;
        slot.1 = document.clone();
        Ok(())
    }
}
