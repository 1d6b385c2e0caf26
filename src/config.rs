// src/config.rs

use std::path::PathBuf;
use url::Url;

use crate::declaration::DocumentTemplate;
use crate::fetch::Retry;

/// Everything a scrape run needs; built by the binary from its arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Site root the index, profile and PDF paths are resolved against.
    pub base_url: Url,
    /// One JSON record per member plus `_index.json`.
    pub data_dir: PathBuf,
    /// Downloaded PDFs, removed after parsing unless `keep_pdfs`.
    pub raw_dir: PathBuf,
    /// Members processed at the same time.
    pub concurrency: usize,
    /// Leading members of the index to leave out.
    pub skip: usize,
    /// Reuse records already present in `data_dir` instead of refetching.
    pub resume: bool,
    pub keep_pdfs: bool,
    pub retry: Retry,
    pub template: DocumentTemplate,
}

impl Config {
    pub fn new(base_url: Url, data_dir: impl Into<PathBuf>, raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url,
            data_dir: data_dir.into(),
            raw_dir: raw_dir.into(),
            concurrency: 3,
            skip: 0,
            resume: false,
            keep_pdfs: false,
            retry: Retry::default(),
            template: DocumentTemplate::europarl(),
        }
    }
}
