//! 应用层

mod formatter;
mod product_service;

pub use formatter::*;
pub use product_service::*;
