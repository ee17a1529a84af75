use itertools::Itertools;
use serde_json::Value;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio_stream::{wrappers::ReadDirStream, StreamExt};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Cannot list {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
    #[error("Cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
    #[error("{} does not hold a valid JSON document", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        cause: serde_json::Error,
    },
    #[error("Cannot serialize merged documents")]
    Serialize {
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

pub async fn merge(output_file: &Path, source_dir: &Path) -> Result<usize, MergeError> {
    let documents = read_documents(source_dir).await?;

    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|cause| MergeError::Write {
                path: parent.to_owned(),
                cause,
            })?;
    }

    let body =
        serde_json::to_vec_pretty(&documents).map_err(|cause| MergeError::Serialize { cause })?;

    tokio::fs::write(output_file, body)
        .await
        .map_err(|cause| MergeError::Write {
            path: output_file.to_owned(),
            cause,
        })?;

    log::info!(
        "Merged {} documents into {}",
        documents.len(),
        output_file.display()
    );

    Ok(documents.len())
}

async fn read_documents(source_dir: &Path) -> Result<Vec<Value>, MergeError> {
    let paths = match list_files(source_dir).await {
        Ok(paths) => paths,
        Err(cause) if cause.kind() == io::ErrorKind::NotFound => {
            log::warn!("{} does not exist, nothing to merge", source_dir.display());
            return Ok(Vec::new());
        }
        Err(cause) => {
            return Err(MergeError::ReadDir {
                path: source_dir.to_owned(),
                cause,
            })
        }
    };

    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let content = tokio::fs::read(&path)
            .await
            .map_err(|cause| MergeError::Read {
                path: path.to_owned(),
                cause,
            })?;

        let document = serde_json::from_slice::<Value>(&content)
            .map_err(|cause| MergeError::InvalidDocument { path, cause })?;

        documents.push(document);
    }

    Ok(documents)
}

async fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = ReadDirStream::new(tokio::fs::read_dir(dir).await?);
    let mut paths = Vec::new();

    while let Some(entry) = entries.next().await {
        let entry = entry?;

        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }

    Ok(paths.into_iter().sorted().collect())
}
