//! Assets module - position rows and asset categories.

mod assets_model;


pub use assets_model::{AssetCategory, AssetRowMetrics, GroupedPositions};
