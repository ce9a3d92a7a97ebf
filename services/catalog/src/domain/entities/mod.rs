//! 领域实体

mod product;

pub use product::*;
