//! Collections API endpoint

use std::sync::Arc;

use super::segment;
use crate::{
    error::Result,
    pipeline::RequestPipeline,
    result::OperationResult,
    types::{Collection, CreateCollectionInput, UpdateCollectionInput},
};

/// Collections API resource.
#[derive(Debug, Clone)]
pub struct Collections {
    pipeline: Arc<RequestPipeline>,
}

impl Collections {
    pub(crate) fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetch a collection by id.
    pub async fn get_by_id(&self, collection_id: &str) -> Result<OperationResult<Collection>> {
        let path = format!("/collection/{}", segment(collection_id));
        self.pipeline
            .execute::<_, ()>(http::Method::GET, &path, None)
            .await
    }

    /// Create a collection.
    pub async fn create(&self, input: &CreateCollectionInput) -> Result<OperationResult<Collection>> {
        self.pipeline
            .execute(http::Method::POST, "/collection", Some(input))
            .await
    }

    /// Replace a collection's fields.
    ///
    /// `input.where` selects the path; only `input.data` is sent.
    pub async fn update(&self, input: &UpdateCollectionInput) -> Result<OperationResult<Collection>> {
        let path = format!("/collection/{}", segment(&input.r#where.collection_id));
        self.pipeline
            .execute(http::Method::PUT, &path, Some(&input.data))
            .await
    }

    /// Make a collection public.
    pub async fn publish(&self, collection_id: &str) -> Result<OperationResult<Collection>> {
        let path = format!("/collection/public/{}", segment(collection_id));
        self.pipeline
            .execute::<_, ()>(http::Method::POST, &path, None)
            .await
    }
}
