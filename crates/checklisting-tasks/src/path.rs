//! Filesystem existence checks

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use checklisting_core::{Result, Task, TaskResult};

use crate::registry::parse_params;

#[derive(Debug, Deserialize)]
struct PathParams {
    path: PathBuf,
}

/// What a path currently points at
enum Kind {
    File,
    Directory,
    Missing,
}

async fn probe(path: &Path) -> Kind {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Kind::Directory,
        Ok(_) => Kind::File,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "path metadata unavailable");
            Kind::Missing
        }
    }
}

/// Succeeds when the path is an existing regular file
#[derive(Debug, Clone)]
pub struct FileExistsTask {
    path: PathBuf,
}

impl FileExistsTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let params: PathParams = parse_params("file_exists", params)?;
        Ok(Self::new(params.path))
    }
}

#[async_trait]
impl Task for FileExistsTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let path = self.path.display();
        Ok(match probe(&self.path).await {
            Kind::File => TaskResult::success(format!("File [{}] exists", path)),
            Kind::Directory => {
                TaskResult::warning(format!("Path [{}] is a directory, not a file", path))
            }
            Kind::Missing => TaskResult::failure(format!("File [{}] does NOT exist", path)),
        })
    }
}

/// Succeeds when the path is an existing directory
#[derive(Debug, Clone)]
pub struct DirectoryExistsTask {
    path: PathBuf,
}

impl DirectoryExistsTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let params: PathParams = parse_params("directory_exists", params)?;
        Ok(Self::new(params.path))
    }
}

#[async_trait]
impl Task for DirectoryExistsTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let path = self.path.display();
        Ok(match probe(&self.path).await {
            Kind::Directory => TaskResult::success(format!("Directory [{}] exists", path)),
            Kind::File => {
                TaskResult::warning(format!("Path [{}] is a file, not a directory", path))
            }
            Kind::Missing => TaskResult::failure(format!("Directory [{}] does NOT exist", path)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklisting_core::ResultStatus;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let result = FileExistsTask::new(&file).execute().await;
        assert_eq!(result.status(), ResultStatus::Success);
        assert_eq!(result.message(), format!("File [{}] exists", file.display()));

        let result = FileExistsTask::new(temp.path()).execute().await;
        assert_eq!(result.status(), ResultStatus::Warning);

        let result = FileExistsTask::new(temp.path().join("missing"))
            .execute()
            .await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert!(result.message().ends_with("does NOT exist"));
    }

    #[tokio::test]
    async fn test_directory_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let result = DirectoryExistsTask::new(temp.path()).execute().await;
        assert_eq!(result.status(), ResultStatus::Success);

        let result = DirectoryExistsTask::new(&file).execute().await;
        assert_eq!(
            result,
            TaskResult::warning(format!("Path [{}] is a file, not a directory", file.display()))
        );

        let result = DirectoryExistsTask::new(temp.path().join("nope"))
            .execute()
            .await;
        assert_eq!(result.status(), ResultStatus::Failure);
    }

    #[test]
    fn test_from_params_requires_path() {
        assert!(FileExistsTask::from_params(&json!({"path": "/tmp"})).is_ok());
        assert!(DirectoryExistsTask::from_params(&json!({"dir": "/tmp"})).is_err());
    }
}
