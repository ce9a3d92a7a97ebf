//! 测试替身：内存商品仓储

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use catalog::domain::entities::{NewProduct, Product};
use catalog::domain::repositories::ProductRepository;
use mesa_common::ProductId;
use mesa_errors::{AppError, AppResult};

/// 插入序保存的内存仓储，并统计网关调用次数
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
    calls: AtomicUsize,
    fail: bool,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有操作都返回存储错误的仓储，用于失败传播测试
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    fn guard(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppError::database("storage unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, fields: NewProduct) -> AppResult<Product> {
        self.guard()?;
        let product = Product::create(fields)?;
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        self.guard()?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        self.guard()?;
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == *id)
            .cloned())
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        self.guard()?;
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category.as_deref() == Some(category))
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> AppResult<Vec<Product>> {
        self.guard()?;
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

/// 合法的商品输入
pub fn product_fields(name: &str, category: Option<&str>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{} description", name),
        category: category.map(ToString::to_string),
        food_type: "veg".to_string(),
        ready_time: Some(20),
        price: Some(9.9),
        rating: Some(4.2),
        images: vec![format!("images/{}.jpg", name)],
        is_special: false,
    }
}
