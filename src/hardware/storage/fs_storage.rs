use std::fs::File;
use std::path::{Path, PathBuf};

use crate::core::drivers::{StorageDriver, StorageError};

/// マウント済みファイルシステム上のディレクトリを扱うストレージ
///
/// 実機では SDカードのマウントポイント (`/sdcard`) を、
/// ホストのテストでは一時ディレクトリをルートにします。
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl StorageDriver for FsStorage {
    type File = File;

    /// ルートがディレクトリとして存在するかだけを確認する (クロックは使用しない)
    fn open(&mut self, _speed_hz: u32) -> Result<(), StorageError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(StorageError::OpenFailed(format!(
                "{} はディレクトリではありません",
                self.root.display()
            )))
        }
    }

    fn exists(&mut self, name: &str) -> bool {
        self.path_of(name).exists()
    }

    fn create(&mut self, name: &str) -> Result<File, StorageError> {
        let path = self.path_of(name);
        File::create(&path).map_err(|source| StorageError::CreateFailed {
            path: path.display().to_string(),
            source,
        })
    }
}
