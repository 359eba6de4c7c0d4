mod handler;
mod model;

pub use handler::{create_asset, delete_asset, get_assets, update_asset};
pub use model::{Asset, AssetPayload, DeleteAssetRequest};
