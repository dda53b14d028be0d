mod cart;
mod catalog;

pub use cart::{CartLoadError, CartLoader, CartRecord};
pub use catalog::{
    CatalogLoadError, CatalogLoader, CatalogRecord, TIMESTAMP_FORMAT, default_catalog,
};
