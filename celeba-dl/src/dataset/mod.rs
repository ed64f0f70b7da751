//! Dataset indexing and random access.

mod annotation;
mod celeba;
mod dataset;
mod iter;
mod manifest;
mod record;
mod utils;

pub use annotation::*;
pub use celeba::*;
pub use dataset::*;
pub use iter::*;
pub use manifest::*;
pub use record::*;
pub use utils::*;
