//! Asset types

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// An asset (token) belonging to a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    /// Asset identifier
    pub id: String,

    /// On-chain token id
    pub token_id: String,

    /// Owning collection
    pub collection_id: String,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Creation time
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,

    /// Media storage record id
    pub media_storage_id: String,

    /// Metadata record id
    pub meta_data_id: String,

    /// Slugified name
    pub name_slug: String,

    /// URL slug
    pub slug: String,

    /// Minted quantity
    pub quantity: u64,

    /// Key that created the asset
    #[serde(rename = "apiKeyID")]
    pub api_key_id: String,

    /// Stored media
    pub media: Media,

    /// Token metadata
    pub metadata: Metadata,

    /// Image URL
    pub image: String,

    /// Flattened attributes
    pub attributes: Vec<Attribute>,

    /// External URL
    #[serde(rename = "external_url")]
    pub external_url: String,

    /// Summary of the owning collection
    pub collection: CollectionInfo,
}

/// Media reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Object storage URL
    #[serde(rename = "S3Url", default)]
    pub s3_url: String,
}

impl Media {
    /// Media stored at `s3_url`.
    pub fn new(s3_url: impl Into<String>) -> Self {
        Self {
            s3_url: s3_url.into(),
        }
    }
}

/// Token metadata wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Inner metadata document
    #[serde(default)]
    pub metadata: InnerMetadata,
}

impl Metadata {
    /// Metadata holding the given attributes.
    pub fn with_attributes(attributes: Vec<Attribute>) -> Self {
        Self {
            metadata: InnerMetadata { attributes },
        }
    }
}

/// Attribute list of a metadata document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerMetadata {
    /// Attributes
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// A single trait/value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Trait name
    #[serde(rename = "trait_type", default)]
    pub trait_type: String,

    /// Trait value
    #[serde(default)]
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

/// Collection summary embedded in an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionInfo {
    /// Collection name
    pub name: String,

    /// Collection description
    pub description: String,

    /// Contract address
    pub address: String,
}

/// Input for [`crate::resources::Assets::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct CreateAssetInput {
    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Token id; assigned by the server when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub token_id: Option<String>,

    /// Owning collection
    pub collection_id: String,

    /// Quantity to mint, as a decimal string
    pub quantity: String,

    /// Media reference
    pub media: Media,

    /// Token metadata
    #[builder(default)]
    pub metadata: Metadata,
}

impl CreateAssetInput {
    /// Create a builder for constructing a `CreateAssetInput`.
    pub fn builder() -> CreateAssetInputBuilder {
        CreateAssetInputBuilder::default()
    }
}

/// Fields replaced by an asset update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetData {
    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Token id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,

    /// Quantity, as a decimal string
    pub quantity: String,

    /// Media reference
    pub media: Media,

    /// Token metadata
    pub metadata: Metadata,
}

/// Selects the asset an update applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetWhere {
    /// Owning collection
    pub collection_id: String,

    /// Asset identifier
    pub asset_id: String,
}

/// Input for [`crate::resources::Assets::update`].
///
/// Only `data` is sent; `where` selects the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAssetInput {
    /// Replacement fields
    pub data: UpdateAssetData,

    /// Target asset
    #[serde(rename = "where")]
    pub r#where: AssetWhere,
}

/// Identifies an asset by collection and token id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetByTokenIdInput {
    /// On-chain token id
    pub token_id: String,

    /// Owning collection
    pub collection_id: String,
}

impl GetByTokenIdInput {
    /// Create a lookup for `token_id` in `collection_id`.
    pub fn new(collection_id: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

/// Identifies the asset to delete.
pub type DeleteAssetInput = GetByTokenIdInput;

/// Acknowledgement returned by a delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAssetResponse {
    /// Server acknowledgement
    #[serde(default)]
    pub message: String,
}
