use crate::catalog::{Catalog, Course};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_courses: u32,
    pub created_at: String,
    pub version: u32,
}

/// Layout of a catalog snapshot directory.
pub struct SnapshotPaths {
    pub root: PathBuf,
}

impl SnapshotPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn catalog(&self) -> PathBuf { self.root.join("catalog.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    pub fn exists(&self) -> bool {
        self.catalog().is_file() && self.meta().is_file()
    }
}

pub fn save_courses(paths: &SnapshotPaths, courses: &[Course]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.catalog())?;
    let bytes = bincode::serialize(courses)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_courses(paths: &SnapshotPaths) -> Result<Vec<Course>> {
    let mut f = File::open(paths.catalog())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let courses = bincode::deserialize(&buf)?;
    Ok(courses)
}

pub fn save_meta(paths: &SnapshotPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &SnapshotPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Write courses and a fresh meta file.
pub fn save_snapshot(paths: &SnapshotPaths, courses: &[Course]) -> Result<()> {
    save_courses(paths, courses)?;
    let meta = MetaFile {
        num_courses: courses.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: SNAPSHOT_VERSION,
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_courses = meta.num_courses, "catalog snapshot saved");
    Ok(())
}

/// Load a snapshot directory into a fresh catalog.
pub fn load_snapshot(paths: &SnapshotPaths) -> Result<Catalog> {
    let meta = load_meta(paths)?;
    if meta.version != SNAPSHOT_VERSION {
        bail!("unsupported snapshot version {} (expected {SNAPSHOT_VERSION})", meta.version);
    }
    let courses = load_courses(paths)?;
    if courses.len() != meta.num_courses as usize {
        tracing::warn!(expected = meta.num_courses, found = courses.len(), "snapshot course count mismatch");
    }
    tracing::info!(root = %paths.root.display(), num_courses = courses.len(), created_at = %meta.created_at, "catalog snapshot loaded");
    Ok(Catalog::from_courses(courses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CourseDraft;
    use tempfile::tempdir;

    #[test]
    fn snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let paths = SnapshotPaths::new(dir.path());
        assert!(!paths.exists());

        let catalog = Catalog::new();
        catalog.insert(CourseDraft {
            title: "Complete Python Bootcamp".into(),
            price: Some("$19.99".into()),
            platform: "Udemy".into(),
            ..Default::default()
        });
        save_snapshot(&paths, &catalog.snapshot()).unwrap();
        assert!(paths.exists());

        let loaded = load_snapshot(&paths).unwrap();
        assert_eq!(*loaded.snapshot(), *catalog.snapshot());
        assert_eq!(load_meta(&paths).unwrap().num_courses, 1);
    }

    #[test]
    fn rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let paths = SnapshotPaths::new(dir.path());
        save_snapshot(&paths, &[]).unwrap();
        save_meta(&paths, &MetaFile { num_courses: 0, created_at: String::new(), version: 99 }).unwrap();
        assert!(load_snapshot(&paths).is_err());
    }
}
