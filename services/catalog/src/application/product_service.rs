//! 商品服务
//!
//! 编排仓储与响应信封，并承担 RPC 命令分发。
//! 进程启动时构造一次，仓储以构造注入（便于测试替身）。

use std::sync::Arc;

use mesa_common::{ProductId, UserId};
use mesa_errors::{AppError, AppResult};
use mesa_ports::RpcEnvelope;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::formatter::Envelope;
use crate::domain::entities::{NewProduct, Product};
use crate::domain::repositories::ProductRepository;

/// RPC 命令：单个商品查询
pub const VIEW_PRODUCT: &str = "VIEW_PRODUCT";
/// RPC 命令：批量商品查询
pub const VIEW_PRODUCTS: &str = "VIEW_PRODUCTS";

/// 商品总览：全量商品加分类目录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogView {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
}

/// 订单行输入：`{productId, qty}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    pub product_id: ProductId,
    pub qty: u32,
}

/// 跨服务事件载荷
///
/// 由消费方（购物车/订单服务）解释，本服务只负责组装。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub event: String,
    pub data: PayloadBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadBody {
    pub user_id: UserId,
    pub product: Product,
    pub qty: u32,
}

/// RPC 结果：原始领域数据，不经过响应信封
///
/// HTTP 调用方拿到信封、RPC 调用方拿到裸记录，这是刻意保持的契约差异。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcReply {
    Product(Product),
    Products(Vec<Product>),
}

/// 商品服务
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// 创建商品并包装结果
    ///
    /// 校验/存储失败原样向上传播，信封只覆盖 "记录不存在" 一种情况。
    pub async fn create_product(&self, fields: NewProduct) -> AppResult<Envelope<Product>> {
        let product = self.repository.create(fields).await?;
        debug!(product_id = %product.id, "Product created");
        Ok(Envelope::data(product))
    }

    /// 全量商品与分类目录
    ///
    /// 分类按首次出现顺序去重；空存储得到两个空集合，不是错误。
    pub async fn get_products(&self) -> AppResult<Envelope<CatalogView>> {
        let products = self.repository.find_all().await?;

        let mut categories: Vec<String> = Vec::new();
        for product in &products {
            if let Some(category) = &product.category {
                if !categories.iter().any(|c| c == category) {
                    categories.push(category.clone());
                }
            }
        }

        Ok(Envelope::data(CatalogView {
            products,
            categories,
        }))
    }

    /// 单个商品详情；不存在时为软 not-found
    pub async fn get_product_description(&self, id: &ProductId) -> AppResult<Envelope<Product>> {
        let product = self.repository.find_by_id(id).await?;
        Ok(Envelope::format(product, "Product not found"))
    }

    /// 按分类列出商品；空集合是正常结果
    pub async fn get_products_by_category(
        &self,
        category: &str,
    ) -> AppResult<Envelope<Vec<Product>>> {
        let products = self.repository.find_by_category(category).await?;
        Ok(Envelope::data(products))
    }

    /// 批量选取商品；未命中的标识静默缺席
    pub async fn get_selected_products(
        &self,
        ids: &[ProductId],
    ) -> AppResult<Envelope<Vec<Product>>> {
        let products = self.repository.find_by_ids(ids).await?;
        Ok(Envelope::data(products))
    }

    /// 组装跨服务事件载荷
    pub async fn get_product_payload(
        &self,
        user_id: UserId,
        item: SelectedItem,
        event: &str,
    ) -> AppResult<Envelope<ProductPayload>> {
        let Some(product) = self.repository.find_by_id(&item.product_id).await? else {
            return Ok(Envelope::error("No product Available"));
        };

        Ok(Envelope::data(ProductPayload {
            event: event.to_string(),
            data: PayloadBody {
                user_id,
                product,
                qty: item.qty,
            },
        }))
    }

    /// RPC 命令分发
    ///
    /// `Ok(None)` 表示无结果：未知命令直接落空（不触达仓储），
    /// VIEW_PRODUCT 未命中同样落空——与 `Some(Products(vec![]))` 可区分。
    pub async fn serve_rpc_request(&self, request: RpcEnvelope) -> AppResult<Option<RpcReply>> {
        match request.command.as_str() {
            VIEW_PRODUCT => {
                let id: ProductId = serde_json::from_value(request.data)
                    .map_err(|e| AppError::database(format!("Malformed product id: {}", e)))?;
                let product = self.repository.find_by_id(&id).await?;
                Ok(product.map(RpcReply::Product))
            }
            VIEW_PRODUCTS => {
                let ids: Vec<ProductId> = serde_json::from_value(request.data)
                    .map_err(|e| AppError::database(format!("Malformed product ids: {}", e)))?;
                let products = self.repository.find_by_ids(&ids).await?;
                Ok(Some(RpcReply::Products(products)))
            }
            other => {
                debug!(command = %other, "No handler for RPC command");
                Ok(None)
            }
        }
    }
}
