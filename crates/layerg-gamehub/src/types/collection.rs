//! Collection types

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A collection of assets owned by a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    /// Collection identifier
    pub id: String,

    /// Creation time
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,

    /// Number of assets in the collection
    pub total_assets: u64,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Avatar image URL
    pub avatar_url: String,

    /// Owning project
    pub project_id: String,

    /// Slugified name
    pub name_slug: String,

    /// URL slug
    pub slug: String,

    /// Key that created the collection
    #[serde(rename = "apiKeyID")]
    pub api_key_id: String,

    /// Whether the collection has been published
    pub is_public: bool,

    /// Owning project details
    pub project: Project,

    /// Deployed contracts
    #[serde(rename = "SmartContract")]
    pub smart_contracts: Vec<SmartContract>,
}

/// A game project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    /// Project identifier
    pub id: String,

    /// Creation time
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,

    /// Whether the project is enabled
    pub is_enabled: bool,

    /// Favourite count
    pub count_fav: u64,

    /// Supported platforms
    pub platform: Vec<String>,

    /// Number of collections
    pub total_cls: u64,

    /// Project name
    pub name: String,

    /// Icon URL
    pub game_icon: String,

    /// Banner URL
    pub banner: String,

    /// Key that created the project
    #[serde(rename = "apiKeyID")]
    pub api_key_id: String,

    /// Telegram link
    pub telegram: String,

    /// Facebook link
    pub facebook: String,

    /// Instagram link
    pub instagram: String,

    /// Discord link
    pub discord: String,

    /// Twitter link
    pub twitter: String,

    /// Slugified name
    pub name_slug: String,

    /// Avatar URL
    pub avatar: String,

    /// Description
    pub description: String,

    /// Long-form information
    pub information: String,

    /// Policy text
    pub policy: String,

    /// Version string
    pub version: String,

    /// Slide show image URLs
    pub slide_show: Vec<String>,

    /// Number of reviews
    pub total_review: u64,

    /// Aggregate rating
    pub total_rating: f64,

    /// URL slug
    pub slug: String,

    /// Whether the project is recommended
    pub is_rcm: bool,

    /// Owner
    pub user_id: Option<String>,

    /// Mode
    pub mode: Option<String>,

    /// Sort index
    pub index: Option<i64>,

    /// Store links per platform
    pub platform_link: PlatformLink,
}

/// Store links per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformLink {
    /// iOS link
    #[serde(rename = "iOS")]
    pub ios: String,

    /// macOS link
    #[serde(rename = "macOS")]
    pub macos: String,

    /// Android link
    pub android: String,

    /// Windows link
    pub windows: String,
}

/// A deployed smart contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartContract {
    /// Contract record id
    pub id: String,

    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,

    /// On-chain address
    pub contract_address: String,

    /// Contract standard, e.g. `ERC721`
    pub contract_type: String,

    /// Chain id
    #[serde(rename = "networkID")]
    pub network_id: i64,

    /// Contract name
    pub contract_name: String,

    /// Token symbol
    pub token_symbol: String,

    /// Total supply
    pub total_supply: Option<u64>,

    /// Owning collection
    pub collection_id: String,

    /// Deployment time
    pub deployed_at: Option<DateTime<Utc>>,

    /// Slugified name
    pub name_slug: String,
}

/// Contract details supplied when creating or updating a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContractInput {
    /// On-chain address
    pub contract_address: String,

    /// Contract standard
    pub contract_type: String,

    /// Chain id
    #[serde(rename = "networkID")]
    pub network_id: i64,

    /// Token symbol
    pub token_symbol: String,

    /// Total supply
    pub total_supply: u64,
}

/// Collection fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct CollectionData {
    /// Display name
    pub name: String,

    /// Description
    #[builder(default)]
    pub description: String,

    /// Avatar image URL
    #[builder(default)]
    pub avatar_url: String,

    /// Owning project
    pub project_id: String,

    /// Contract details
    pub smc: SmartContractInput,
}

impl CollectionData {
    /// Create a builder for constructing `CollectionData`.
    pub fn builder() -> CollectionDataBuilder {
        CollectionDataBuilder::default()
    }
}

/// Input for [`crate::resources::Collections::create`].
pub type CreateCollectionInput = CollectionData;

/// Selects the collection an update applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionWhere {
    /// Collection identifier
    pub collection_id: String,
}

/// Input for [`crate::resources::Collections::update`].
///
/// Only `data` is sent; `where` selects the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCollectionInput {
    /// Replacement fields
    pub data: CollectionData,

    /// Target collection
    #[serde(rename = "where")]
    pub r#where: CollectionWhere,
}
