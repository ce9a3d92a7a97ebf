//! mesa-ports - 抽象 trait 层
//!
//! 定义基础设施与服务之间的抽象接口

mod rpc;

pub use rpc::*;
