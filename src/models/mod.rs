pub mod common;
pub mod lottery;
pub mod tenant;

pub use common::*;
pub use lottery::*;
pub use tenant::*;
