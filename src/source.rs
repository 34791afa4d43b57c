//! Data root classification (local directory vs HTTP/HTTPS base) and the
//! fixed `data/...` resource convention.

use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::catalog::{SelectionKey, SetTag};

/// Where the static data files live. Resources are joined onto the root using
/// the fixed convention: candidate lists at `data/namesSimple.tsv` /
/// `data/namesComplex.tsv`, per-name series at `data/{simple|complex}/{id}.json`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataSource {
    Local(PathBuf),
    Http(String),
}

/// Classifies the root as local or HTTP/HTTPS using string parsing only
/// (no filesystem calls). Unknown schemes stay local.
pub fn data_source(root: &Path) -> DataSource {
    let s = root.as_os_str().to_string_lossy();
    if let Some(scheme_end) = s.find("://") {
        let scheme = s[..scheme_end].to_lowercase();
        if scheme == "http" || scheme == "https" {
            return DataSource::Http(s.trim_end_matches('/').to_string());
        }
    }
    DataSource::Local(root.to_path_buf())
}

impl DataSource {
    /// Relative path of a set's candidate list.
    pub fn catalog_resource(set: SetTag) -> String {
        format!("data/{}", set.catalog_resource())
    }

    /// Relative path of a name's per-year series.
    pub fn series_resource(key: SelectionKey) -> String {
        format!("data/{}/{}.json", key.set.data_dir(), key.id)
    }

    /// Fetch a resource as text, relative to the data root.
    pub fn fetch_text(&self, resource: &str) -> Result<String> {
        match self {
            DataSource::Local(root) => {
                let path = root.join(resource);
                std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("reading {}: {}", path.display(), e))
            }
            DataSource::Http(base) => {
                let url = format!("{}/{}", base, resource);
                let body = ureq::get(&url)
                    .call()
                    .map_err(|e| eyre!("fetching {}: {}", url, e))?
                    .into_string()
                    .map_err(|e| eyre!("reading body of {}: {}", url, e))?;
                Ok(body)
            }
        }
    }

    pub fn fetch_catalog(&self, set: SetTag) -> Result<String> {
        self.fetch_text(&Self::catalog_resource(set))
    }

    pub fn fetch_series(&self, key: SelectionKey) -> Result<String> {
        self.fetch_text(&Self::series_resource(key))
    }
}
