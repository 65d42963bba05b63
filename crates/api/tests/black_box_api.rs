use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockline_api::app::{build_app, services::AppServices};
use stockline_api::config::AppConfig;
use stockline_core::{Sku, UserId};
use stockline_inventory::StockRecord;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(catalog: Vec<StockRecord>) -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let services = AppServices::in_memory(&AppConfig::default(), catalog).expect("failed to build services");
        let app = build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn record(sku: &str, name: &str, price: u64, qty: i64) -> StockRecord {
    StockRecord::new(Sku::parse(sku).unwrap(), name, price, qty).unwrap()
}

fn order_body(items: Value) -> Value {
    json!({
        "userId": UserId::new().to_string(),
        "items": items,
        "shippingAddress": "Abay 10",
        "contactInfo": "+7 700 000 0000",
    })
}

async fn alerts_eventually(client: &reqwest::Client, base_url: &str, expected: usize) -> Vec<Value> {
    // The alert worker persists asynchronously; poll briefly.
    for _ in 0..50 {
        let res = client.get(format!("{}/alerts", base_url)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let alerts: Vec<Value> = res.json().await.unwrap();
        if alerts.len() >= expected {
            return alerts;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("alerts did not reach the store within timeout");
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn(vec![]).await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn placing_an_order_sells_out_and_raises_an_alert() {
    let srv = TestServer::spawn(vec![record("BRK-001", "Brake pad", 1500, 3)]).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&order_body(json!([{ "sku": "BRK-001", "qty": 3, "priceHint": 1.0 }])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let order_id = created["orderId"].as_str().unwrap().to_string();

    let order: Value = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order["totalPrice"], 4500);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"][0]["name"], "Brake pad");
    assert_eq!(order["shippingAddress"], "Abay 10");

    let alerts = alerts_eventually(&client, &srv.base_url, 1).await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["sku"], "BRK-001");
    assert_eq!(alerts[0]["quantityAtAlert"], 0);
}

#[tokio::test]
async fn shortfall_returns_conflict_with_issues() {
    let srv = TestServer::spawn(vec![
        record("BRK-001", "Brake pad", 1500, 10),
        record("OIL-200", "Engine oil", 900, 5),
    ])
    .await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&order_body(json!([
            { "sku": "BRK-001", "qty": 2 },
            { "sku": "OIL-200", "qty": 10 }
        ])))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["issues"], json!([{ "sku": "OIL-200", "requested": 10, "available": 5 }]));

    // nothing was reserved, so BRK-001 can still be bought in full
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&order_body(json!([{ "sku": "BRK-001", "qty": 10 }])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_submissions_are_bad_requests() {
    let srv = TestServer::spawn(vec![record("BRK-001", "Brake pad", 1500, 10)]).await;
    let client = reqwest::Client::new();

    for body in [
        order_body(json!([])),
        order_body(json!([{ "sku": "BRK-001", "qty": 0 }])),
        order_body(json!([{ "sku": "  ", "qty": 1 }])),
        json!({ "items": [{ "sku": "BRK-001", "qty": 1 }] }),
    ] {
        let res = client
            .post(format!("{}/orders", srv.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
    }

    let res = client
        .get(format!("{}/orders/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_can_list_update_and_delete_orders_without_restocking() {
    let srv = TestServer::spawn(vec![record("FLT-010", "Oil filter", 700, 20)]).await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for qty in [1, 2, 3] {
        let created: Value = client
            .post(format!("{}/orders", srv.base_url))
            .json(&order_body(json!([{ "sku": "FLT-010", "qty": qty }])))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(created["orderId"].as_str().unwrap().to_string());
    }

    let listed: Vec<Value> = client
        .get(format!("{}/admin/orders?limit=2", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], ids[2].as_str());

    let res = client
        .patch(format!("{}/admin/orders/{}", srv.base_url, ids[0]))
        .json(&json!({ "status": " Cancelled " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "cancelled");

    let res = client
        .patch(format!("{}/admin/orders/{}", srv.base_url, ids[0]))
        .json(&json!({ "status": "lost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .delete(format!("{}/admin/orders/{}", srv.base_url, ids[1]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, ids[1]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // 20 - (1 + 2 + 3) = 14 left; cancel/delete gave nothing back
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&order_body(json!([{ "sku": "FLT-010", "qty": 15 }])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["issues"][0]["available"], 14);
}
