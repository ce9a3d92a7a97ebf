//! API 层：HTTP 路由与 RPC responder

pub mod http;
pub mod rpc;
