//! RPC 命令分发测试

mod support;

use std::sync::Arc;

use catalog::api::rpc::ProductRpc;
use catalog::application::{ProductService, RpcReply, VIEW_PRODUCT, VIEW_PRODUCTS};
use mesa_common::ProductId;
use mesa_errors::AppError;
use mesa_ports::{RpcEnvelope, RpcResponder};
use serde_json::{Value, json};
use support::{InMemoryProductRepository, product_fields};

fn envelope(command: &str, data: Value) -> RpcEnvelope {
    RpcEnvelope {
        command: command.to_string(),
        data,
    }
}

#[tokio::test]
async fn test_view_product_returns_raw_record() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = ProductService::new(repo.clone());

    let product = service
        .create_product(product_fields("Ramen", Some("noodles")))
        .await
        .unwrap()
        .into_data()
        .unwrap();

    let reply = service
        .serve_rpc_request(envelope(VIEW_PRODUCT, json!(product.id.to_string())))
        .await
        .unwrap();

    match reply {
        Some(RpcReply::Product(found)) => assert_eq!(found, product),
        other => panic!("expected single product, got {:?}", other),
    }
}

#[tokio::test]
async fn test_view_product_missing_is_absent() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = ProductService::new(repo);

    let reply = service
        .serve_rpc_request(envelope(VIEW_PRODUCT, json!(ProductId::new().to_string())))
        .await
        .unwrap();
    assert!(reply.is_none());
}

#[tokio::test]
async fn test_view_products_keeps_only_matches() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = ProductService::new(repo);

    let existing = service
        .create_product(product_fields("Calzone", Some("pizza")))
        .await
        .unwrap()
        .into_data()
        .unwrap();

    let reply = service
        .serve_rpc_request(envelope(
            VIEW_PRODUCTS,
            json!([existing.id.to_string(), ProductId::new().to_string()]),
        ))
        .await
        .unwrap();

    match reply {
        Some(RpcReply::Products(products)) => {
            assert_eq!(products.len(), 1);
            assert_eq!(products[0].id, existing.id);
        }
        other => panic!("expected product list, got {:?}", other),
    }
}

#[tokio::test]
async fn test_view_products_empty_match_is_still_a_reply() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = ProductService::new(repo);

    let reply = service
        .serve_rpc_request(envelope(VIEW_PRODUCTS, json!([])))
        .await
        .unwrap();

    // 空列表是一条回复，与未知命令的无回复不同
    assert!(matches!(reply, Some(RpcReply::Products(ref p)) if p.is_empty()));
}

#[tokio::test]
async fn test_unknown_command_is_absent_without_repository_call() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = ProductService::new(repo.clone());

    let reply = service
        .serve_rpc_request(envelope("DELETE_EVERYTHING", json!({})))
        .await
        .unwrap();

    assert!(reply.is_none());
    assert_eq!(repo.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_id_maps_to_storage_error() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = ProductService::new(repo);

    let result = service
        .serve_rpc_request(envelope(VIEW_PRODUCT, json!("not-a-uuid")))
        .await;
    assert!(matches!(result, Err(AppError::Database(_))));

    let service = ProductService::new(Arc::new(InMemoryProductRepository::new()));
    let result = service
        .serve_rpc_request(envelope(VIEW_PRODUCTS, json!(["also-not-a-uuid"])))
        .await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_responder_serializes_raw_product_json() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let service = Arc::new(ProductService::new(repo));

    let product = service
        .create_product(product_fields("Margherita", Some("pizza")))
        .await
        .unwrap()
        .into_data()
        .unwrap();

    let responder = ProductRpc::new(service);
    let reply = responder
        .serve(envelope(VIEW_PRODUCT, json!(product.id.to_string())))
        .await
        .unwrap()
        .expect("reply for existing product");

    // 裸领域记录，不是 `{data: ...}` 信封
    assert!(reply.get("name").is_some());
    assert!(reply.get("foodType").is_some());
    assert!(reply.get("data").is_none());
}

#[tokio::test]
async fn test_responder_absent_reply_stays_absent() {
    let service = Arc::new(ProductService::new(Arc::new(
        InMemoryProductRepository::new(),
    )));

    let responder = ProductRpc::new(service);
    let reply = responder
        .serve(envelope("UNKNOWN", json!({})))
        .await
        .unwrap();
    assert!(reply.is_none());
}
