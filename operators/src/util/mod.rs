pub mod config;
pub mod logging;

use crate::error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
