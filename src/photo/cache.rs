use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::SyncError;
use crate::traits::PhotoStore;

use super::PhotoMap;

/// JSONファイルに保存される写真キャッシュ
#[derive(Debug, Clone)]
pub struct PhotoCache {
    path: PathBuf,
}

impl PhotoCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 書き込み用の一時ファイル（同じディレクトリ内）
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PhotoStore for PhotoCache {
    fn load(&self) -> Result<PhotoMap, SyncError> {
        if !self.path.exists() {
            debug!("No cache file at {:?}, starting empty", self.path);
            return Ok(PhotoMap::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| SyncError::cache(&self.path, e))?;
        let photos: PhotoMap =
            serde_json::from_str(&content).map_err(|e| SyncError::cache(&self.path, e))?;

        info!("Loaded {} cached photos from {:?}", photos.len(), self.path);
        Ok(photos)
    }

    fn save(&self, photos: &PhotoMap) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SyncError::cache(&self.path, e))?;
        }

        let json =
            serde_json::to_string_pretty(photos).map_err(|e| SyncError::cache(&self.path, e))?;

        // 一時ファイルに書いてからリネームし、ファイル全体を置き換える
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, json).map_err(|e| SyncError::cache(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| SyncError::cache(&self.path, e))?;

        debug!("Saved {} photos to {:?}", photos.len(), self.path);
        Ok(())
    }
}
