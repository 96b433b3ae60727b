pub mod asset_api_client;
pub mod executor;
pub mod graph_api_client;
pub mod lookups;
pub mod reconciler;
