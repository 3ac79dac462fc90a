//! Assets API endpoint

use std::sync::Arc;

use super::segment;
use crate::{
    error::Result,
    pipeline::RequestPipeline,
    result::OperationResult,
    types::{Asset, CreateAssetInput, DeleteAssetInput, DeleteAssetResponse, GetByTokenIdInput, UpdateAssetInput},
};

/// Assets API resource.
///
/// # Example
///
/// ```rust,no_run
/// # use layerg_gamehub::{Client, Environment, GetByTokenIdInput};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder()
///     .api_key("key")
///     .api_key_id("key-id")
///     .environment(Environment::Dev)
///     .connect()
///     .await?;
///
/// let asset = client
///     .assets()
///     .get_by_token_id(&GetByTokenIdInput::new("collection-id", "42"))
///     .await?
///     .into_result()?;
/// println!("{}", asset.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Assets {
    pipeline: Arc<RequestPipeline>,
}

impl Assets {
    pub(crate) fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetch an asset by collection and token id.
    pub async fn get_by_token_id(&self, input: &GetByTokenIdInput) -> Result<OperationResult<Asset>> {
        let path = format!(
            "/assets/{}/{}",
            segment(&input.collection_id),
            segment(&input.token_id)
        );
        self.pipeline
            .execute::<_, ()>(http::Method::GET, &path, None)
            .await
    }

    /// Create an asset.
    pub async fn create(&self, input: &CreateAssetInput) -> Result<OperationResult<Asset>> {
        self.pipeline
            .execute(http::Method::POST, "/assets/create", Some(input))
            .await
    }

    /// Replace an asset's fields.
    ///
    /// `input.where` selects the path; only `input.data` is sent.
    pub async fn update(&self, input: &UpdateAssetInput) -> Result<OperationResult<Asset>> {
        let path = format!(
            "/assets/{}/{}",
            segment(&input.r#where.collection_id),
            segment(&input.r#where.asset_id)
        );
        self.pipeline
            .execute(http::Method::PUT, &path, Some(&input.data))
            .await
    }

    /// Delete an asset by collection and token id.
    pub async fn delete(&self, input: &DeleteAssetInput) -> Result<OperationResult<DeleteAssetResponse>> {
        let path = format!(
            "/assets/{}/{}",
            segment(&input.collection_id),
            segment(&input.token_id)
        );
        self.pipeline
            .execute::<_, ()>(http::Method::DELETE, &path, None)
            .await
    }
}
