//! Local filesystem source

use std::path::{Path, PathBuf};

use super::error::ExtractError;
use super::formats::{self, CsvOptions};
use super::source::{
    FieldDescriptor, Selection, SessionOptions, SourceConnector, SourceFormat, SourceSession,
    SourceUnit,
};

/// Connector reading files from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct LocalFileSource {
    csv: CsvOptions,
}

impl LocalFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csv_options(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    pub fn csv_options(&self) -> &CsvOptions {
        &self.csv
    }
}

impl SourceConnector for LocalFileSource {
    type Session = LocalSession;

    fn open(&self, options: &SessionOptions) -> Result<LocalSession, ExtractError> {
        if let Some(timeout) = options.timeout {
            tracing::debug!(?timeout, "Local reads ignore the session timeout");
        }
        Ok(LocalSession {
            csv: self.csv,
            sample_size: options.sample_size,
            closed: false,
        })
    }
}

/// Session over the local filesystem
#[derive(Debug)]
pub struct LocalSession {
    csv: CsvOptions,
    sample_size: usize,
    closed: bool,
}

impl LocalSession {
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Unit for one file: identified by its path, named after its stem
fn file_unit(path: &Path) -> SourceUnit {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    SourceUnit::new(path.display().to_string(), name)
}

/// Files matching a glob pattern, sorted by path
fn discover_files(pattern: &str) -> Result<Vec<PathBuf>, ExtractError> {
    let entries = glob::glob(pattern).map_err(|e| ExtractError::access(pattern, e))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("Error accessing path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

impl SourceSession for LocalSession {
    fn list_units(&mut self, selection: &Selection) -> Result<Vec<SourceUnit>, ExtractError> {
        match selection {
            Selection::Path(path) => {
                if !path.exists() {
                    return Err(ExtractError::access(path, "path does not exist"));
                }
                if path.is_dir() {
                    return Err(ExtractError::access(
                        path,
                        "path is a directory; use a pattern to select files",
                    ));
                }
                Ok(vec![file_unit(path)])
            }
            Selection::Pattern(pattern) => {
                let files = discover_files(pattern)?;
                if files.is_empty() {
                    return Err(ExtractError::no_match(pattern.as_str()));
                }
                Ok(files.iter().map(|path| file_unit(path)).collect())
            }
        }
    }

    fn describe(
        &mut self,
        unit: &SourceUnit,
        format: SourceFormat,
    ) -> Result<Vec<FieldDescriptor>, ExtractError> {
        let path = Path::new(&unit.id);
        match format {
            SourceFormat::Csv => formats::read_csv(path, &self.csv, self.sample_size),
            SourceFormat::Json => formats::read_json(path, self.sample_size),
            SourceFormat::Jsonl => formats::read_jsonl(path, self.sample_size),
            SourceFormat::Yaml => formats::read_yaml(path, self.sample_size),
            #[cfg(feature = "parquet")]
            SourceFormat::Parquet => formats::read_parquet(path),
            #[cfg(not(feature = "parquet"))]
            SourceFormat::Parquet => Err(ExtractError::access(
                path,
                "parquet support is not enabled (build with the `parquet` feature)",
            )),
        }
    }

    fn close(&mut self) -> Result<(), ExtractError> {
        self.closed = true;
        Ok(())
    }
}
