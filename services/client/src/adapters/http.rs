//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the recipe backend.
//! It implements the `RecipeBackend` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use recipe_finder_core::domain::{HistoryKind, ImageRef, IMAGE_MIME};
use recipe_finder_core::ports::{PortError, PortResult, RecipeBackend};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RecipeBackend` over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecipeBackend {
    client: Client,
    base_url: String,
}

impl HttpRecipeBackend {
    /// Creates a new `HttpRecipeBackend` rooted at `base_url`.
    pub fn new(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds a fresh multipart form with every image under the repeated `files` field.
    async fn images_form(images: &[ImageRef]) -> PortResult<Form> {
        let mut form = Form::new();
        for (index, image) in images.iter().enumerate() {
            let data = tokio::fs::read(&image.path).await.map_err(|e| {
                PortError::Unexpected(format!("could not read {}: {}", image.path.display(), e))
            })?;
            let part = Part::bytes(data)
                .file_name(ImageRef::upload_name(index))
                .mime_str(IMAGE_MIME)
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
            form = form.part("files", part);
        }
        Ok(form)
    }

    async fn post_images(&self, path: &str, images: &[ImageRef]) -> PortResult<Value> {
        let form = Self::images_form(images).await?;
        debug!(path, images = images.len(), "uploading images");
        let response = self
            .client
            .post(self.endpoint(path))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn get_json(&self, path: &str) -> PortResult<Value> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }
}

fn transport(e: reqwest::Error) -> PortError {
    PortError::Transport(e.to_string())
}

async fn read_json(response: Response) -> PortResult<Value> {
    let status = response.status();
    if !status.is_success() {
        debug!(%status, url = %response.url(), "backend returned an error status");
        return Err(PortError::Status(status.as_u16()));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| PortError::Decode(e.to_string()))
}

//=========================================================================================
// `RecipeBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecipeBackend for HttpRecipeBackend {
    async fn search(&self, query: &str) -> PortResult<Value> {
        let response = self
            .client
            .post(self.endpoint("/search"))
            .form(&[("query", query)])
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn predict(&self, images: &[ImageRef]) -> PortResult<Value> {
        self.post_images("/predict", images).await
    }

    async fn recommend(&self, images: &[ImageRef]) -> PortResult<Value> {
        self.post_images("/recommend_llm", images).await
    }

    async fn add_history(&self, recipe_name: &str, kind: HistoryKind) -> PortResult<()> {
        let form = Form::new()
            .text("recipe_name", recipe_name.to_string())
            .text("hist_type", kind.as_str());

        let response = self
            .client
            .post(self.endpoint("/history/add"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PortError::Status(status.as_u16()))
        }
    }

    async fn latest_history(&self) -> PortResult<Value> {
        self.get_json("/history/latest").await
    }

    async fn all_history(&self) -> PortResult<Value> {
        self.get_json("/history").await
    }
}
