//! Wire types for the Gamehub API
//!
//! Field names follow the API's camelCase JSON, with explicit renames where the
//! server deviates (`S3Url`, `apiKeyID`, `networkID`, `SmartContract`).
//! Response structs default missing fields so partial payloads still decode.

pub use asset::*;
pub use auth::AuthResponse;
pub use collection::*;

pub mod asset;
pub mod auth;
pub mod collection;
