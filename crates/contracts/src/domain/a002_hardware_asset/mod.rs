pub mod aggregate;

pub use aggregate::{
    AssetModel, AssetUser, CheckoutType, HardwareAsset, HardwarePayload, RowsResponse,
};
