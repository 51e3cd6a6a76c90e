//! Image uploads for products and events
//!
//! Files are stored under `<upload_dir>/<kind>/<uuid>.<ext>` and exposed to
//! clients as `/uploads/<kind>/<file>`. The previous image of the entity is
//! removed once the new path has been saved.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::settings::ServerConfig;
use crate::database::{ImageOwner, ImageRepository};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::sanitize_filename;

/// Public URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

const ALLOWED: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// An image received from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct UploadService {
    root: PathBuf,
    max_bytes: usize,
    images: ImageRepository,
}

/// Extension to store the file under, checked against the declared content type
fn accepted_extension(upload: &ImageUpload) -> Result<&'static str> {
    let extension = Path::new(&upload.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ColectaError::Upload("file has no extension".to_string()))?;

    let (ext, mime) = ALLOWED
        .iter()
        .find(|(allowed, _)| *allowed == extension)
        .ok_or_else(|| ColectaError::Upload(format!("file type .{} is not allowed", extension)))?;

    if let Some(content_type) = upload.content_type.as_deref() {
        if !content_type.eq_ignore_ascii_case(mime) {
            return Err(ColectaError::Upload(format!(
                "content type {} does not match .{}",
                content_type, ext
            )));
        }
    }

    Ok(ext)
}

/// Path on disk of a stored public path, if it points into the upload dir
fn local_path(root: &Path, public_path: &str) -> Option<PathBuf> {
    let relative = public_path.strip_prefix(PUBLIC_PREFIX)?.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|part| part == ".." || part.is_empty()) {
        return None;
    }
    Some(root.join(relative))
}

impl UploadService {
    pub fn new(config: &ServerConfig, images: ImageRepository) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            max_bytes: config.max_upload_bytes,
            images,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the per-kind directories
    pub async fn prepare(&self) -> Result<()> {
        for owner in [ImageOwner::Product, ImageOwner::Event] {
            tokio::fs::create_dir_all(self.root.join(owner.dir())).await?;
        }
        Ok(())
    }

    fn check(&self, upload: &ImageUpload) -> Result<&'static str> {
        if upload.bytes.is_empty() {
            return Err(ColectaError::Upload("file is empty".to_string()));
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(ColectaError::Upload(format!(
                "file exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        accepted_extension(upload)
    }

    /// Store the image and point the entity at it; returns the public path
    pub async fn store(&self, owner: ImageOwner, id: i64, upload: ImageUpload) -> Result<String> {
        let extension = self.check(&upload)?;
        let previous = self
            .images
            .current(owner, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: owner.resource(), id })?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let dir = self.root.join(owner.dir());
        tokio::fs::create_dir_all(&dir).await?;
        let target = dir.join(&file_name);
        tokio::fs::write(&target, &upload.bytes).await?;

        let public_path = format!("{}/{}/{}", PUBLIC_PREFIX, owner.dir(), file_name);
        if let Err(e) = self.images.set(owner, id, &public_path).await {
            if let Err(remove_error) = tokio::fs::remove_file(&target).await {
                warn!(path = %target.display(), error = %remove_error, "Failed to remove orphaned upload");
            }
            return Err(e);
        }

        if let Some(old) = previous.as_deref().and_then(|p| local_path(&self.root, p)) {
            if let Err(e) = tokio::fs::remove_file(&old).await {
                warn!(path = %old.display(), error = %e, "Failed to remove previous image");
            }
        }

        info!(
            table = owner.table(),
            id = id,
            original = %sanitize_filename(&upload.file_name),
            bytes = upload.bytes.len(),
            path = %public_path,
            "Image stored"
        );
        Ok(public_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sqlx::postgres::PgPoolOptions;

    fn upload(name: &str, content_type: Option<&str>, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: vec![7; size],
        }
    }

    fn service(max_bytes: usize) -> UploadService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/colecta")
            .unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            upload_dir: "uploads".into(),
            max_upload_bytes: max_bytes,
        };
        UploadService::new(&config, ImageRepository::new(pool))
    }

    #[test]
    fn test_accepted_extensions() {
        assert_eq!(accepted_extension(&upload("logo.PNG", Some("image/png"), 1)).unwrap(), "png");
        assert_eq!(accepted_extension(&upload("foto.jpg", Some("image/jpeg"), 1)).unwrap(), "jpg");
        assert_eq!(accepted_extension(&upload("foto.webp", None, 1)).unwrap(), "webp");
    }

    #[test]
    fn test_rejected_types() {
        assert_matches!(
            accepted_extension(&upload("script.sh", None, 1)),
            Err(ColectaError::Upload(_))
        );
        assert_matches!(
            accepted_extension(&upload("noextension", None, 1)),
            Err(ColectaError::Upload(_))
        );
        assert_matches!(
            accepted_extension(&upload("fake.png", Some("text/html"), 1)),
            Err(ColectaError::Upload(_))
        );
    }

    #[tokio::test]
    async fn test_size_limits() {
        let service = service(10);
        assert!(service.check(&upload("a.png", None, 10)).is_ok());
        assert_matches!(service.check(&upload("a.png", None, 11)), Err(ColectaError::Upload(_)));
        assert_matches!(service.check(&upload("a.png", None, 0)), Err(ColectaError::Upload(_)));
    }

    #[test]
    fn test_local_path_stays_inside_root() {
        let root = Path::new("/srv/uploads");
        assert_eq!(
            local_path(root, "/uploads/productos/a.png"),
            Some(PathBuf::from("/srv/uploads/productos/a.png"))
        );
        assert_eq!(local_path(root, "/uploads/../etc/passwd"), None);
        assert_eq!(local_path(root, "https://cdn.example.org/a.png"), None);
        assert_eq!(local_path(root, "/uploads/"), None);
    }
}
