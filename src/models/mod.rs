//! Value model and route domain objects observed by the filter engine.

mod community;
mod community_range;
mod labels;
mod route;

pub use community::*;
pub use community_range::*;
pub use labels::*;
pub use route::*;
