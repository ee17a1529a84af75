use crate::metrics::RepositoryRecord;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Repository name {0:?} is not of the form owner/name")]
    InvalidName(String),
    #[error("Cannot create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
    #[error("Cannot serialize repository {name}")]
    Serialize {
        name: String,
        #[source]
        cause: serde_json::Error,
    },
    #[error("Cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Persister {
    output_dir: PathBuf,
}

impl Persister {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Persister {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, record: &RepositoryRecord) -> Result<PathBuf, PersistError> {
        let (owner, name) = record
            .owner_and_name()
            .ok_or_else(|| PersistError::InvalidName(record.name_with_owner.to_owned()))?;

        Ok(self.output_dir.join(format!("{}_{}.json", owner, name)))
    }

    pub async fn persist(&self, record: &RepositoryRecord) -> Result<PathBuf, PersistError> {
        let path = self.path_for(record)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|cause| PersistError::CreateDir {
                path: self.output_dir.to_owned(),
                cause,
            })?;

        let content =
            serde_json::to_string_pretty(record).map_err(|cause| PersistError::Serialize {
                name: record.name_with_owner.to_owned(),
                cause,
            })?;

        log::info!("Writing {}", path.display());
        tokio::fs::write(&path, content)
            .await
            .map_err(|cause| PersistError::Write {
                path: path.to_owned(),
                cause,
            })?;

        Ok(path)
    }
}
