//! 商品仓储接口
//!
//! 持久化网关：唯一触达文档存储的代码路径。
//! "记录不存在" 用 None / 空集合表达，不是错误；
//! 硬失败（校验、I/O）以 AppError 返回并由调用方向上传播。

use async_trait::async_trait;
use mesa_common::ProductId;
use mesa_errors::AppResult;

use crate::domain::entities::{NewProduct, Product};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 持久化新商品，返回含已分配标识的完整记录
    ///
    /// 必填字段缺失时返回 Validation 错误，且不产生部分写入。
    async fn create(&self, fields: NewProduct) -> AppResult<Product>;

    /// 全量商品，存储序；无数据时为空集合，从不报 "不存在"
    async fn find_all(&self) -> AppResult<Vec<Product>>;

    /// 按标识查找；不存在时为 None
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>>;

    /// 按分类精确匹配（大小写敏感）；无匹配时为空集合
    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>>;

    /// 按标识集合查找，存储序返回存在的子集
    ///
    /// 未命中的标识被静默忽略，没有部分失败信号。
    async fn find_by_ids(&self, ids: &[ProductId]) -> AppResult<Vec<Product>>;
}
