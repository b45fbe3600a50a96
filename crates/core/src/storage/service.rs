//! Storage service implementation using Apache OpenDAL.

use opendal::{Operator, services};
use uuid::Uuid;

use kindra_shared::types::RequestId;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Storage service for cause images.
///
/// Accepts image bytes, stores them under a generated key, and returns
/// the durable public URL the request row records opaquely.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate the storage key for a cause image.
    ///
    /// Format: `causes/{request_id}/{random}-{sanitized_filename}`
    #[must_use]
    pub fn generate_object_key(request_id: RequestId, filename: &str) -> String {
        let sanitized = sanitize_filename(filename);
        format!("causes/{request_id}/{}-{sanitized}", Uuid::new_v4())
    }

    /// Upload image bytes and return the durable public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the write fails.
    pub async fn upload_image(
        &self,
        request_id: RequestId,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        self.validate_upload(content_type, data.len() as u64)?;

        let key = Self::generate_object_key(request_id, filename);
        self.operator.write(&key, data).await?;

        Ok(self.public_url(&key))
    }

    /// Public URL for a stored object key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{key}",
            self.config.public_base_url.trim_end_matches('/')
        )
    }
}

/// Strips path separators and control characters from a filename.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> StorageService {
        StorageService::from_config(StorageConfig::new(
            StorageProvider::local_fs("/tmp/kindra-storage-test"),
            "http://localhost:8080/media",
        ))
        .unwrap()
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_generate_object_key_shape() {
        let request_id = RequestId::new();
        let key = StorageService::generate_object_key(request_id, "cover.png");
        assert!(key.starts_with(&format!("causes/{request_id}/")));
        assert!(key.ends_with("-cover.png"));
    }

    #[test]
    fn test_validate_upload_rejects_oversize() {
        let service = test_service();
        let result = service.validate_upload("image/png", StorageConfig::DEFAULT_MAX_FILE_SIZE + 1);
        assert!(matches!(result, Err(StorageError::FileTooLarge { .. })));
    }

    #[test]
    fn test_validate_upload_rejects_bad_mime() {
        let service = test_service();
        let result = service.validate_upload("application/pdf", 100);
        assert!(matches!(result, Err(StorageError::InvalidMimeType { .. })));
    }

    #[test]
    fn test_public_url_joins_cleanly() {
        let service = test_service();
        assert_eq!(
            service.public_url("causes/x/y.png"),
            "http://localhost:8080/media/causes/x/y.png"
        );
    }

    #[tokio::test]
    async fn test_upload_image_local_fs() {
        let service = test_service();
        let url = service
            .upload_image(RequestId::new(), "cover.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:8080/media/causes/"));
    }
}
