pub mod error;
pub mod mosaic;
pub mod util;
