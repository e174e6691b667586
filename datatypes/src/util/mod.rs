pub mod helpers;
pub mod ranges;
mod result;
pub use result::Result;
