use std::fs;
use std::path::Path;

use jmena::catalog::SetTag;
use tempfile::TempDir;

/// Build a data root on disk: candidate lists plus any series files the test
/// writes afterwards with [`write_series`].
pub fn data_root(simple: &[(&str, u64)], complex: &[(&str, u64)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    write_catalog(dir.path(), SetTag::Simple, simple);
    write_catalog(dir.path(), SetTag::Complex, complex);
    dir
}

pub fn write_catalog(root: &Path, set: SetTag, names: &[(&str, u64)]) {
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).expect("data dir");
    let tsv: String = names
        .iter()
        .map(|(name, freq)| format!("{}\t{}\n", name, freq))
        .collect();
    fs::write(data_dir.join(set.catalog_resource()), tsv).expect("catalog file");
}

/// Write one per-name series resource. `years` lists only nonzero years.
pub fn write_series(
    root: &Path,
    set: SetTag,
    id: u32,
    name: &str,
    count: u64,
    years: &[(u16, u64)],
) {
    let dir = root.join("data").join(set.data_dir());
    fs::create_dir_all(&dir).expect("series dir");
    let mut object = serde_json::Map::new();
    object.insert("processedName".to_string(), serde_json::json!(name));
    object.insert("count".to_string(), serde_json::json!(count));
    for (year, value) in years {
        object.insert(year.to_string(), serde_json::json!(value));
    }
    let text = serde_json::Value::Object(object).to_string();
    fs::write(dir.join(format!("{}.json", id)), text).expect("series file");
}
