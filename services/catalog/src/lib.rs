//! Catalog Service Library
//!
//! 模块化架构：
//! - `domain`: Product 实体与仓储接口
//! - `application`: ProductService、响应信封、RPC 命令分发
//! - `infrastructure`: PostgreSQL 仓储实现、图片存储
//! - `api`: HTTP 路由与 RPC responder 适配

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
