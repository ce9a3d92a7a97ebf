//! HTTP 路由
//!
//! 对外契约继承自既有服务：
//! - 信封路径上的 "记录不存在" 是 HTTP 200 + `{error}` 响应体；
//! - 查询路由上的任何仓储失败统一映射为 404 `{error}`。
//! 两者并存是既有客户端依赖的行为，见 DESIGN.md。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mesa_common::ProductId;
use mesa_errors::{AppError, AppResult};
use mesa_telemetry::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use tower_http::services::ServeDir;

use crate::application::{Envelope, ProductService};
use crate::domain::entities::NewProduct;
use crate::infrastructure::upload::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProductService>,
    pub image_store: Arc<dyn ImageStore>,
    pub max_images: usize,
}

pub fn router(state: AppState, image_dir: &str) -> Router {
    Router::new()
        .route("/product/create", post(create_product))
        .route("/category/{category}", get(products_by_category))
        .route("/ids", post(selected_products))
        .route("/whoami", get(whoami))
        .route("/", get(top_products))
        .route("/{id}", get(product_description))
        .with_state(state)
        .nest_service("/images", ServeDir::new(image_dir))
}

/// Prometheus 抓取端点，句柄由启动期安装的记录器提供
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
}

/// 按状态码语义映射的错误（创建、批量选取路径）
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// 查询路由的遗留错误映射：任何仓储失败都是 404
struct LookupError(AppError);

impl From<AppError> for LookupError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// 信封落地为 HTTP 响应体：成功时只返回 `data` 的内容，
/// 软 not-found 返回 `{error}`——两者都是 200
fn unwrap_envelope<T: serde::Serialize>(envelope: Envelope<T>) -> Response {
    match envelope {
        Envelope::Data { data } => Json(data).into_response(),
        Envelope::Error { error } => Json(json!({ "error": error })).into_response(),
    }
}

// 原实现对畸形标识抛存储层转换错误，这里保持同一错误类别
fn parse_product_id(raw: &str) -> AppResult<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::database(format!("Malformed product id: {}", e)))
}

async fn create_product(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut fields = NewProduct::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            if fields.images.len() >= state.max_images {
                return Err(AppError::validation(format!(
                    "At most {} images per product",
                    state.max_images
                ))
                .into());
            }

            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read image: {}", e)))?;

            let path = state.image_store.store(&file_name, &bytes).await?;
            fields.images.push(path);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Invalid form field '{}': {}", name, e)))?;

        match name.as_str() {
            "name" => fields.name = value,
            "description" => fields.description = value,
            "category" => fields.category = non_empty(value),
            "foodType" => fields.food_type = value,
            "readyTime" => fields.ready_time = parse_optional(&name, value)?,
            "price" => fields.price = parse_optional(&name, value)?,
            "rating" => fields.rating = parse_optional(&name, value)?,
            "isSpecial" => {
                fields.is_special = value.parse().map_err(|_| {
                    AppError::validation("Form field 'isSpecial' must be a boolean")
                })?
            }
            _ => {} // 未知字段忽略
        }
    }

    let envelope = state.service.create_product(fields).await?;
    Ok(unwrap_envelope(envelope))
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_optional<T: std::str::FromStr>(name: &str, value: String) -> Result<Option<T>, ApiError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| AppError::validation(format!("Form field '{}' is not a number", name)).into())
}

async fn top_products(State(state): State<AppState>) -> Result<Response, LookupError> {
    let envelope = state.service.get_products().await?;
    Ok(unwrap_envelope(envelope))
}

async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Response, LookupError> {
    let envelope = state.service.get_products_by_category(&category).await?;
    Ok(unwrap_envelope(envelope))
}

async fn product_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, LookupError> {
    let id = parse_product_id(&id)?;
    let envelope = state.service.get_product_description(&id).await?;
    Ok(unwrap_envelope(envelope))
}

#[derive(Debug, Deserialize)]
struct SelectedIds {
    ids: Vec<String>,
}

/// 批量选取返回完整信封（`{data: [...]}`），与其他路由不同——
/// 既有调用方按这个形状解析
async fn selected_products(
    State(state): State<AppState>,
    Json(body): Json<SelectedIds>,
) -> Result<Response, ApiError> {
    let ids = body
        .ids
        .iter()
        .map(|raw| parse_product_id(raw))
        .collect::<AppResult<Vec<_>>>()?;

    let envelope = state.service.get_selected_products(&ids).await?;
    Ok(Json(envelope).into_response())
}

async fn whoami() -> Response {
    Json(json!({ "msg": "/ or /products : I am products Service" })).into_response()
}
