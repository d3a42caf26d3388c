//! On-disk store for named calculations.
//!
//! Files are Summa JSON documents written atomically (tmp file, then rename)
//! under a base directory, and every load goes through the validating parser
//! rather than trusting stored totals.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::errors::SummaError;
use crate::ledger::engine::Calculation;
use crate::persist;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const APP_DIR: &str = "summa";

pub type Result<T> = std::result::Result<T, SummaError>;

#[derive(Debug, Clone)]
pub struct CalculationStore {
    root: PathBuf,
}

impl CalculationStore {
    /// Opens a store rooted at `root`, or at the platform data directory
    /// when none is given. Creates the directory if needed.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(default_base_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn open_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn calculation_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn save_named(&self, calculation: &Calculation, name: &str) -> Result<PathBuf> {
        let path = self.calculation_path(name);
        self.save_to_path(calculation, &path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, calculation: &Calculation, path: &Path) -> Result<()> {
        let json = persist::to_json(calculation)?;
        let tmp = tmp_path(path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), "saved calculation");
        Ok(())
    }

    pub fn load_named(&self, name: &str) -> Result<Calculation> {
        self.load_from_path(&self.calculation_path(name))
    }

    pub fn load_from_path(&self, path: &Path) -> Result<Calculation> {
        let text = fs::read_to_string(path)?;
        let calculation = persist::parse(&text)?;
        info!(path = %path.display(), "loaded calculation");
        Ok(calculation)
    }

    /// Names of every saved calculation in the store, sorted.
    pub fn list_saved(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "calculation".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
