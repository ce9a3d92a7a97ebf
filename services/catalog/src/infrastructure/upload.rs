//! 商品图片存储
//!
//! HTTP 适配层持有该能力，服务本身只见到存储后的路径列表。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use mesa_errors::{AppError, AppResult};
use tracing::debug;

/// 图片存储能力
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// 存储一张图片，返回对外可见的相对路径
    async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<String>;
}

/// 本地磁盘实现
///
/// 文件名 = ISO 时间戳（冒号替换为 '-'）+ '_' + 原始文件名。
pub struct DiskImageStore {
    dir: PathBuf,
}

impl DiskImageStore {
    /// 创建存储目录（若不存在）并返回实例
    pub fn new(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::internal(format!("Failed to create image directory: {}", e)))?;
        Ok(Self { dir })
    }

    fn build_filename(original_name: &str) -> String {
        let stamp = Utc::now().to_rfc3339().replace(':', "-");
        // 去掉路径分隔符，防止客户端文件名逃出存储目录
        let safe_name: String = original_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        format!("{}_{}", stamp, safe_name)
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        let filename = Self::build_filename(original_name);
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to store image: {}", e)))?;

        debug!(path = %path.display(), "Image stored");
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_has_no_colons() {
        let name = DiskImageStore::build_filename("dish.jpg");
        assert!(!name.contains(':'));
        assert!(name.ends_with("_dish.jpg"));
    }

    #[test]
    fn test_filename_neutralizes_path_separators() {
        let name = DiskImageStore::build_filename("../../etc/passwd");
        assert!(!name.contains('/'));
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = std::env::temp_dir().join(format!("catalog-images-{}", uuid::Uuid::new_v4()));
        let store = DiskImageStore::new(&dir).unwrap();

        let path = store.store("dish.jpg", b"fake-jpeg-bytes").await.unwrap();
        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(written, b"fake-jpeg-bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
