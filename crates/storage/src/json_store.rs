//! JSON file board storage.
//!
//! The whole board lives in a single pretty-printed JSON document. Saves go
//! through a sibling temp file and a rename so a crash never leaves a
//! half-written board behind.

use std::path::{Path, PathBuf};

use eventdesk_core::Board;
use tokio::fs;
use tracing::debug;

use super::{BoardStore, Result};

/// File-based JSON board storage.
#[derive(Debug, Clone)]
pub struct JsonBoardStore {
    path: PathBuf,
}

impl JsonBoardStore {
    /// Use the board file at `path`. Nothing is read until [`BoardStore::load`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the board file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "board.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl BoardStore for JsonBoardStore {
    async fn load(&self) -> Result<Board> {
        let raw = fs::read_to_string(&self.path).await?;
        let board: Board = serde_json::from_str(&raw)?;
        board.validate()?;

        debug!(
            path = %self.path.display(),
            members = board.members.len(),
            tasks = board.tasks.len(),
            "Loaded board"
        );
        Ok(board)
    }

    async fn save(&self, board: &Board) -> Result<()> {
        board.validate()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        let json = serde_json::to_string_pretty(board)?;
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "Saved board");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use chrono::NaiveDate;
    use eventdesk_core::{MemberId, Priority, Task, TaskId, TeamMember};

    fn board() -> Board {
        Board::new(
            vec![TeamMember::new("u1", "John").with_skills(["Design"])],
            vec![Task::new("t1", "Poster", Priority::High, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
                .with_skills(["Design"])],
        )
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonBoardStore::new(dir.path().join("nested").join("board.json"));

        let mut b = board();
        store.save(&b).await.unwrap();
        b.apply_assignment(&TaskId::new("t1"), &[MemberId::new("u1")]).unwrap();
        store.save(&b).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, b);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"members":[{"id":"u1","name":"A"},{"id":"u1","name":"B"}],"tasks":[]}"#,
        )
        .unwrap();

        let err = JsonBoardStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_hours() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"tasks":[{"id":"t1","title":"x","priority":"High","deadline":"2024-01-01",
                "status":"Not Started","estimatedHours":-4}]}"#,
        )
        .unwrap();

        let err = JsonBoardStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonBoardStore::new(dir.path().join("absent.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
