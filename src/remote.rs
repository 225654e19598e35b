use crate::errors::RemoteError;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tracing::info;

pub const REMOTE_FILE_NAME: &str = "attendance.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Capability handed to the register for backing up the CSV export to a
/// user-authorized drive. Sign-in is owned by the drive; the register only
/// asks whether a session exists.
#[async_trait]
pub trait RemoteDrive: Send + Sync {
    fn is_authenticated(&self) -> bool;

    async fn sign_in(&self) -> Result<(), RemoteError>;

    async fn sign_out(&self);

    async fn upload(&self, file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<(), RemoteError>;

    /// Fetches the first file whose name matches exactly.
    async fn download(&self, file_name: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Drive backed by a local directory, e.g. a synced cloud folder.
#[derive(Debug)]
pub struct FolderDrive {
    root: PathBuf,
    signed_in: AtomicBool,
}

impl FolderDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            signed_in: AtomicBool::new(false),
        }
    }

    fn require_session(&self) -> Result<(), RemoteError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(RemoteError::NotAuthenticated)
        }
    }
}

#[async_trait]
impl RemoteDrive for FolderDrive {
    fn is_authenticated(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }

    async fn sign_in(&self) -> Result<(), RemoteError> {
        fs::create_dir_all(&self.root).await?;
        self.signed_in.store(true, Ordering::SeqCst);
        info!(root = %self.root.display(), "remote drive signed in");
        Ok(())
    }

    async fn sign_out(&self) {
        self.signed_in.store(false, Ordering::SeqCst);
        info!("remote drive signed out");
    }

    async fn upload(&self, file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<(), RemoteError> {
        self.require_session()?;
        let path = self.root.join(file_name);
        fs::write(&path, bytes).await?;
        info!(path = %path.display(), mime_type, "uploaded file");
        Ok(())
    }

    async fn download(&self, file_name: &str) -> Result<Vec<u8>, RemoteError> {
        self.require_session()?;
        match fs::read(self.root.join(file_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(RemoteError::NotFound(file_name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
