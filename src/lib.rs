pub mod config;
pub mod error;
pub mod mode;
pub mod payout;
pub mod props;
pub mod settle;
pub mod slip;
pub mod store;

pub use error::{Error, Result};
