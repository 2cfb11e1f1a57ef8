use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::types::{LawIndexEntry, ParsedDocument};
use crate::error::{KolexError, Result};

/// Directory of per-document seed files, plus the cached discovery index
#[derive(Debug, Clone)]
pub struct SeedStore {
    seed_dir: PathBuf,
    index_path: PathBuf,
}

impl SeedStore {
    pub fn new(seed_dir: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            seed_dir: seed_dir.into(),
            index_path: index_path.into(),
        }
    }

    pub fn seed_dir(&self) -> &Path {
        &self.seed_dir
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Seed files are named by upstream internal id
    pub fn seed_path(&self, source_id: &str) -> PathBuf {
        self.seed_dir.join(format!("{}.json", source_id))
    }

    pub fn exists(&self, source_id: &str) -> bool {
        self.seed_path(source_id).is_file()
    }

    pub fn write(&self, source_id: &str, document: &ParsedDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.seed_dir)?;
        let path = self.seed_path(source_id);
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&path, json)?;
        debug!("Wrote seed {}", path.display());
        Ok(path)
    }

    pub fn read(&self, source_id: &str) -> Result<ParsedDocument> {
        read_seed_file(&self.seed_path(source_id))
    }

    /// All seed files in lexical filename order
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        list_seed_files(&self.seed_dir)
    }

    pub fn save_index(&self, entries: &[LawIndexEntry]) -> Result<()> {
        if let Some(parent) = self.index_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.index_path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    pub fn load_index(&self) -> Result<Vec<LawIndexEntry>> {
        let contents = fs::read_to_string(&self.index_path).map_err(|e| {
            KolexError::Config(format!(
                "Cannot read discovery index {} (run without --skip-discovery first): {}",
                self.index_path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

pub fn list_seed_files(seed_dir: &Path) -> Result<Vec<PathBuf>> {
    if !seed_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(seed_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn read_seed_file(path: &Path) -> Result<ParsedDocument> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| KolexError::InvalidSeed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{DocumentStatus, DocumentType};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SeedStore {
        SeedStore::new(dir.path().join("seed"), dir.path().join("law-index.json"))
    }

    fn stub(id: &str) -> ParsedDocument {
        ParsedDocument {
            id: id.to_string(),
            document_type: DocumentType::Statute,
            title: "전자정부법".to_string(),
            title_en: None,
            short_name: "전자정부법".to_string(),
            law_number: String::new(),
            status: DocumentStatus::InForce,
            issued_date: String::new(),
            effective_date: String::new(),
            canonical_url: String::new(),
            provisions: vec![],
        }
    }

    #[test]
    fn test_write_read_and_list() {
        let dir = TempDir::new().unwrap();
        let seeds = store(&dir);
        assert!(!seeds.exists("2"));
        assert!(seeds.list().unwrap().is_empty());

        seeds.write("2", &stub("act-2")).unwrap();
        seeds.write("10", &stub("act-10")).unwrap();
        fs::write(seeds.seed_dir().join("notes.txt"), "ignored").unwrap();

        assert!(seeds.exists("2"));
        assert_eq!(seeds.read("2").unwrap().id, "act-2");

        let names: Vec<String> = seeds
            .list()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["10.json", "2.json"]);
    }

    #[test]
    fn test_index_round_trip_and_missing_index() {
        let dir = TempDir::new().unwrap();
        let seeds = store(&dir);
        assert!(matches!(seeds.load_index(), Err(KolexError::Config(_))));

        let entry = LawIndexEntry {
            title: "전자정부법".to_string(),
            source_id: "1".to_string(),
            law_number: String::new(),
            promulgation_date: String::new(),
            effective_date: String::new(),
            document_type_hint: String::new(),
            canonical_url: String::new(),
        };
        seeds.save_index(&[entry.clone()]).unwrap();
        assert_eq!(seeds.load_index().unwrap(), vec![entry]);
    }

    #[test]
    fn test_invalid_seed_reports_path() {
        let dir = TempDir::new().unwrap();
        let seeds = store(&dir);
        fs::create_dir_all(seeds.seed_dir()).unwrap();
        fs::write(seeds.seed_path("bad"), "{").unwrap();

        match seeds.read("bad") {
            Err(KolexError::InvalidSeed { path, .. }) => assert!(path.ends_with("bad.json")),
            other => panic!("expected InvalidSeed, got {other:?}"),
        }
    }
}
