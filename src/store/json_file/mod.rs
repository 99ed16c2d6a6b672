use anyhow::*;
use directories_next::BaseDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::quiz::row::QuizDocument;
use crate::store::{Collection, DocumentId, MemoryCollection};


#[derive(Deserialize, Serialize)]
struct StoredDocument {
    id: DocumentId,
    #[serde(flatten)]
    document: QuizDocument,
}

fn get_data_dir() -> Result<PathBuf> {
    let mut dir = BaseDirs::new()
        .context("could not locate system directories")?
        .data_dir()
        .to_path_buf();
    dir.push("quiz-loader");
    Ok(dir)
}

/// Collection persisted as a JSON array. Changes stay in memory until `close`.
pub struct JsonFileCollection {
    path: PathBuf,
    documents: MemoryCollection,
    dirty: bool,
}

impl JsonFileCollection {
    pub fn default_path(collection_name: &str) -> Result<PathBuf> {
        let mut path = get_data_dir()?;
        path.push(format!("{}.json", collection_name));
        Ok(path)
    }

    pub fn open(path: &Path) -> Result<JsonFileCollection> {
        let documents = if path.exists() {
            let file = File::open(path).with_context(|| format!("Could not open {:?}", path))?;
            let stored: Vec<StoredDocument> = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Could not parse documents in {:?}", path))?;
            stored.into_iter().map(|s| (s.id, s.document)).collect()
        } else {
            Vec::new()
        };
        info!("Opened {:?} with {} documents", path, documents.len());

        Ok(JsonFileCollection {
            path: path.to_path_buf(),
            documents: MemoryCollection::from_documents(documents),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create directory {:?}", parent))?;
        }
        let stored: Vec<StoredDocument> = self
            .documents
            .documents()
            .into_iter()
            .map(|(id, document)| StoredDocument { id, document })
            .collect();
        let file = File::create(&self.path)
            .with_context(|| format!("Could not create {:?}", self.path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &stored)?;
        writer.flush()?;
        Ok(())
    }
}

impl Collection for JsonFileCollection {
    fn insert(&mut self, document: &QuizDocument) -> Result<DocumentId> {
        let id = self.documents.insert(document)?;
        self.dirty = true;
        Ok(id)
    }

    fn find_equal(&self, field: &str, value: &str) -> Result<Vec<(DocumentId, QuizDocument)>> {
        self.documents.find_equal(field, value)
    }

    fn overwrite(&mut self, id: &DocumentId, document: &QuizDocument) -> Result<()> {
        self.documents.overwrite(id, document)?;
        self.dirty = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
            self.dirty = false;
            info!("Saved {} documents to {:?}", self.len(), self.path);
        }
        Ok(())
    }
}
