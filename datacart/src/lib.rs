pub mod cart;
pub mod entry;
pub mod error;
pub mod persist;
pub mod rollup;
pub mod storage;

pub use cart::{DataCart, DEFAULT_CART, DOWNLOAD_CART};
pub use entry::{cart_key, CartEntry, DownloadStatus};
pub use error::CartError;
