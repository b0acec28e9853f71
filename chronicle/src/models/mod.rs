mod common;
mod context;
mod record;

pub use common::*;
pub use context::*;
pub use record::*;
