use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{multipart, Body, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::{
    entities::image::{ImageUpload, StoredImage},
    errors::AppError,
    infrastructure::media::MediaStore,
    settings::AppConfig,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Signed upload/destroy client for the Cloudinary image API.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: Zeroizing<String>,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build media client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        CloudinaryStore {
            client,
            api_base: config.media_api_base.trim_end_matches('/').to_string(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: Zeroizing::new(config.cloudinary_api_secret.clone()),
            folder: config.cloudinary_folder.clone(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.api_base, self.cloud_name, action)
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        sign_params(params, &self.api_secret)
    }

    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => "no error details".to_string(),
        };
        AppError::MediaStore(format!("{} ({})", message, status))
    }
}

/// Parameters sorted by key, joined as `k=v&k=v`.
fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let mut payload = Zeroizing::new(string_to_sign(params));
    payload.push_str(secret);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    #[instrument(skip(self, image), fields(file = %image.file_name, bytes = image.len()))]
    async fn upload(&self, image: &ImageUpload) -> Result<StoredImage, AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [("folder", self.folder.clone()), ("timestamp", timestamp.clone())];
        let signature = self.sign(&signed);

        let file_part = multipart::Part::stream_with_length(
            Body::from(image.data.clone()),
            image.len() as u64,
        )
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self.client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: UploadResponse = response.json().await?;
        debug!(public_id = %body.public_id, "image stored");

        Ok(StoredImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [("public_id", public_id.to_string()), ("timestamp", timestamp.clone())];
        let signature = self.sign(&signed);

        let response = self.client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.api_key.as_str()),
                ("signature_algorithm", "sha256"),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: DestroyResponse = response.json().await?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(AppError::MediaStore(format!("Destroy of {} returned {}", public_id, other))),
        }
    }
}

impl fmt::Debug for CloudinaryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryStore")
            .field("api_base", &self.api_base)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("folder", &self.folder)
            .finish()
    }
}
