//! 商品实体

use mesa_common::{ProductId, Timestamps};
use mesa_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 商品实体
///
/// 创建后只读：本服务不暴露更新/删除操作。
/// 时间戳属于存储层簿记，从不出现在对外表示中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub food_type: String,
    /// 备餐时间（分钟）
    pub ready_time: Option<i32>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    /// 已存储的图片路径，顺序有意义
    pub images: Vec<String>,
    pub is_special: bool,
    #[serde(skip, default)]
    pub timestamps: Timestamps,
}

/// 创建商品的输入字段（标识与时间戳由存储层分配）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub food_type: String,
    pub ready_time: Option<i32>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_special: bool,
}

impl NewProduct {
    /// 持久化前的字段校验
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::validation("Product description is required"));
        }
        if self.food_type.trim().is_empty() {
            return Err(AppError::validation("Product foodType is required"));
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(AppError::validation("Product price must be non-negative"));
            }
        }
        Ok(())
    }
}

impl Product {
    /// 校验输入并分配标识与时间戳
    ///
    /// 仓储实现的唯一构造入口：校验失败时不产生任何写入。
    pub fn create(fields: NewProduct) -> AppResult<Self> {
        fields.validate()?;
        Ok(Self {
            id: ProductId::new(),
            name: fields.name,
            description: fields.description,
            category: fields.category,
            food_type: fields.food_type,
            ready_time: fields.ready_time,
            price: fields.price,
            rating: fields.rating,
            images: fields.images,
            is_special: fields.is_special,
            timestamps: Timestamps::now(),
        })
    }
}
