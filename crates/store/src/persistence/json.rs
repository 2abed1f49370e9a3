//! JSON file backend.
//!
//! Layout under the data directory:
//! - `budgets.json` - array of budgets
//! - `expenses.json` - array of expenses
//! - `users.json` - array of users
//!
//! Each file is rewritten through a `.tmp` sibling and a rename, so a crash
//! mid-write leaves the previous version in place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use budgein_core::{auth::User, budget::Snapshot};
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;
use tracing::{debug, warn};

use super::Persistence;
use crate::StoreError;

const BUDGETS_FILE: &str = "budgets.json";
const EXPENSES_FILE: &str = "expenses.json";
const USERS_FILE: &str = "users.json";
const TMP_SUFFIX: &str = "tmp";

/// Stores each collection as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    root: PathBuf,
}

impl JsonFilePersistence {
    /// Uses `root` as the data directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

async fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `items` to the temp sibling of `path` and returns the temp path.
async fn stage_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<PathBuf, StoreError> {
    let json = serde_json::to_string_pretty(items).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension(TMP_SUFFIX);
    fs::write(&tmp, json)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    Ok(tmp)
}

async fn commit_collection(tmp: &Path, path: &Path) -> Result<(), StoreError> {
    fs::rename(tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Best-effort removal of temp files from an aborted write.
async fn discard_staged(tmps: &[&Path]) {
    for tmp in tmps {
        if let Err(e) = fs::remove_file(tmp).await {
            warn!(path = %tmp.display(), error = %e, "Failed to remove staged file");
        }
    }
}

#[async_trait]
impl Persistence for JsonFilePersistence {
    async fn load_snapshot(&self) -> Result<Snapshot, StoreError> {
        let budgets = read_collection(&self.path(BUDGETS_FILE)).await?;
        let expenses = read_collection(&self.path(EXPENSES_FILE)).await?;
        Ok(Snapshot { budgets, expenses })
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let budgets_path = self.path(BUDGETS_FILE);
        let expenses_path = self.path(EXPENSES_FILE);

        // Stage both files before replacing either one.
        let budgets_tmp = stage_collection(&budgets_path, &snapshot.budgets).await?;
        let expenses_tmp = match stage_collection(&expenses_path, &snapshot.expenses).await {
            Ok(tmp) => tmp,
            Err(e) => {
                discard_staged(&[budgets_tmp.as_path()]).await;
                return Err(e);
            }
        };
        if let Err(e) = commit_collection(&expenses_tmp, &expenses_path).await {
            discard_staged(&[budgets_tmp.as_path(), expenses_tmp.as_path()]).await;
            return Err(e);
        }
        commit_collection(&budgets_tmp, &budgets_path).await?;

        debug!(
            budgets = snapshot.budgets.len(),
            expenses = snapshot.expenses.len(),
            "Snapshot written"
        );
        Ok(())
    }

    async fn load_users(&self) -> Result<Vec<User>, StoreError> {
        read_collection(&self.path(USERS_FILE)).await
    }

    async fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        let path = self.path(USERS_FILE);
        let tmp = stage_collection(&path, users).await?;
        commit_collection(&tmp, &path).await
    }
}
