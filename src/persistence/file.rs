//! A subscriber registry stored as a plain text file.
//!
//! One subscriber per line, either a bare id or `id<TAB>rfc3339-timestamp`.
//! Blank lines are ignored and duplicate ids collapse to the first occurrence.
//! The whole file is rewritten on every mutation through a temporary file that
//! is renamed over the original.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{error::PersistenceError, traits::SubscriberRegistry};
use crate::models::Subscriber;

type Entries = BTreeMap<String, Option<DateTime<Utc>>>;

/// File-backed [`SubscriberRegistry`].
pub struct FileSubscriberRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSubscriberRegistry {
    /// Creates a registry over `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// The file backing this registry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every subscriber, ordered by id.
    pub async fn load(&self) -> Result<Vec<Subscriber>, PersistenceError> {
        let _guard = self.lock.lock().await;
        Ok(into_subscribers(self.read_entries().await?))
    }

    /// Replaces the file contents with `subscribers`.
    ///
    /// Ids that would not read back unchanged are rejected and nothing is
    /// written.
    pub async fn save(&self, subscribers: &[Subscriber]) -> Result<(), PersistenceError> {
        let mut entries = Entries::new();
        for subscriber in subscribers {
            if validate_id(&subscriber.id)? != subscriber.id {
                return Err(PersistenceError::InvalidInput(format!(
                    "subscriber id {:?} has surrounding whitespace",
                    subscriber.id
                )));
            }
            entries.entry(subscriber.id.clone()).or_insert(subscriber.registered_at);
        }
        let _guard = self.lock.lock().await;
        self.write_entries(&entries).await
    }

    async fn read_entries(&self) -> Result<Entries, PersistenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Registry file missing, treating as empty.");
                return Ok(Entries::new());
            }
            Err(e) => return Err(PersistenceError::io(&self.path, e)),
        };
        Ok(parse_entries(&content))
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| PersistenceError::io(parent, e))?;
            }
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, render_entries(entries))
            .await
            .map_err(|e| PersistenceError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| PersistenceError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), count = entries.len(), "Registry file written.");
        Ok(())
    }
}

fn validate_id(id: &str) -> Result<&str, PersistenceError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['\t', '\n', '\r']) {
        return Err(PersistenceError::InvalidInput(format!("invalid subscriber id {id:?}")));
    }
    Ok(id)
}

fn parse_entries(content: &str) -> Entries {
    let mut entries = Entries::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (id, registered_at) = match line.split_once('\t') {
            Some((id, stamp)) => {
                let registered_at = DateTime::parse_from_rfc3339(stamp.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        tracing::warn!(id, stamp, error = %e, "Ignoring unreadable registration time.");
                    })
                    .ok();
                (id.trim(), registered_at)
            }
            None => (line, None),
        };
        entries.entry(id.to_string()).or_insert(registered_at);
    }
    entries
}

fn render_entries(entries: &Entries) -> String {
    let mut out = String::new();
    for (id, registered_at) in entries {
        out.push_str(id);
        if let Some(ts) = registered_at {
            out.push('\t');
            out.push_str(&ts.to_rfc3339());
        }
        out.push('\n');
    }
    out
}

fn into_subscribers(entries: Entries) -> Vec<Subscriber> {
    entries.into_iter().map(|(id, registered_at)| Subscriber { id, registered_at }).collect()
}

#[async_trait]
impl SubscriberRegistry for FileSubscriberRegistry {
    async fn list(&self) -> Result<BTreeSet<String>, PersistenceError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.into_keys().collect())
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>, PersistenceError> {
        self.load().await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn add(&self, id: &str) -> Result<bool, PersistenceError> {
        let id = validate_id(id)?;
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.contains_key(id) {
            return Ok(false);
        }
        entries.insert(id.to_string(), Some(Utc::now()));
        self.write_entries(&entries).await?;
        tracing::info!(id, total = entries.len(), "Subscriber registered.");
        Ok(true)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn remove(&self, id: &str) -> Result<bool, PersistenceError> {
        let id = validate_id(id)?;
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(id).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        tracing::info!(id, total = entries.len(), "Subscriber unregistered.");
        Ok(true)
    }

    async fn contains(&self, id: &str) -> Result<bool, PersistenceError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.contains_key(id.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerates_blanks_duplicates_and_bad_stamps() {
        let entries = parse_entries("111\n\n222\t2024-05-01T10:00:00Z\n111\n333\tnot-a-date\n");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries["111"], None);
        assert!(entries["222"].is_some());
        assert_eq!(entries["333"], None);
    }

    #[test]
    fn test_render_then_parse_keeps_timestamps() {
        let mut entries = Entries::new();
        entries.insert("42".into(), Some(Utc::now()));
        entries.insert("7".into(), None);
        let rendered = render_entries(&entries);
        assert_eq!(parse_entries(&rendered).len(), 2);
        assert!(rendered.starts_with("42\t"));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileSubscriberRegistry::new(dir.path().join("nope.txt"));
        assert!(registry.list().await.unwrap().is_empty());
        assert!(!registry.contains("1").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_and_remove_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileSubscriberRegistry::new(dir.path().join("ids.txt"));

        assert!(registry.add("1001").await.unwrap());
        assert!(!registry.add("1001").await.unwrap());
        assert!(registry.contains("1001").await.unwrap());
        assert_eq!(registry.list().await.unwrap().len(), 1);

        assert!(registry.remove("1001").await.unwrap());
        assert!(!registry.remove("1001").await.unwrap());
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_leave_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ids.txt");
        let registry = FileSubscriberRegistry::new(&path);

        registry.add("5").await.unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("ids.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileSubscriberRegistry::new(dir.path().join("ids.txt"));
        assert!(matches!(registry.add("  ").await, Err(PersistenceError::InvalidInput(_))));
    }
}
