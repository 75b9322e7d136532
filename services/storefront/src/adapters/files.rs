//! services/storefront/src/adapters/files.rs
//!
//! Implements the `FileStore` port. Uploads go out as `multipart/form-data`, with the
//! cover image in a part named `image` and lesson documents in a part named `pdf`.

use super::http::ApiClient;
use super::wire::{FileAssociationBody, UploadedImageRecord, UploadedPdfRecord};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use robokit_core::domain::{FileAssociation, StoredFile, StoredImage, Upload};
use robokit_core::ports::{FileStore, PortError, PortResult};

#[derive(Clone)]
pub struct HttpFileStore {
    api: ApiClient,
}

impl HttpFileStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn single_part_form(field: &'static str, upload: &Upload) -> PortResult<Form> {
    let part = Part::bytes(upload.bytes.to_vec())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)
        .map_err(|e| {
            PortError::Unexpected(format!(
                "invalid content type '{}': {}",
                upload.content_type, e
            ))
        })?;
    Ok(Form::new().part(field, part))
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload_image(&self, image: &Upload) -> PortResult<StoredImage> {
        let path = "/api/courses/files/upload-image";
        let builder = self
            .api
            .request(Method::POST, path)
            .multipart(single_part_form("image", image)?);
        let record: UploadedImageRecord = self.api.send(path, builder).await?;
        Ok(record.to_domain())
    }

    async fn upload_pdf(&self, pdf: &Upload) -> PortResult<StoredFile> {
        let path = "/api/courses/files/upload-pdf";
        let builder = self
            .api
            .request(Method::POST, path)
            .multipart(single_part_form("pdf", pdf)?);
        let record: UploadedPdfRecord = self.api.send(path, builder).await?;
        Ok(record.to_domain())
    }

    async fn associate(&self, association: &FileAssociation) -> PortResult<()> {
        let path = "/api/courses/lessons/files";
        let builder = self
            .api
            .request(Method::POST, path)
            .json(&FileAssociationBody::from(association));
        self.api.send_unit(path, builder).await
    }
}
