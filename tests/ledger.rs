mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::TestApp;

fn asset(kind: &str, amount: f64) -> Value {
    json!({
        "type": kind,
        "amount": amount,
        "currency": "CNY",
        "note": "main account",
        "datetime": "2024-05-01"
    })
}

#[tokio::test]
async fn heart_and_unknown_api_paths() {
    let app = TestApp::new().await;

    let heart = app.get("/api/heart", None).await;
    assert_eq!(heart.status, StatusCode::OK);
    assert_eq!(heart.json(), json!({"hello": "world ! 🎉"}));

    let missing = app.get("/api/password/nope", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json(), json!({"error": "Oops , Page Not Found."}));
}

#[tokio::test]
async fn bursts_from_one_client_are_not_throttled() {
    let app = TestApp::new().await;
    for _ in 0..400 {
        let mut req = common::request("GET", "/api/heart", None, None);
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        assert_eq!(app.send(req).await.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn creating_and_updating_assets_writes_snapshots() {
    let app = TestApp::new().await;

    let created = app.json("POST", "/api/assets", None, asset("BANK", 1000.0)).await;
    assert_eq!(created.status, StatusCode::OK);
    let body = created.json();
    assert_eq!(body["type"], "BANK");
    assert_eq!(body["risk"], "LOW");
    assert_eq!(body["liquidity"], "GOOD");

    let duplicate = app.json("POST", "/api/assets", None, asset("BANK", 1.0)).await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let updated = app.json("PUT", "/api/assets", None, asset("BANK", 1500.0)).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["amount"], 1500.0);

    let records = app.get("/api/records", None).await.json();
    let amounts: Vec<f64> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts.len(), 2);
    assert!(amounts.contains(&1000.0) && amounts.contains(&1500.0));

    let unknown = app.json("PUT", "/api/assets", None, asset("STOCK", 1.0)).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/records", None).await.json().as_array().unwrap().len(), 2);

    let deleted = app
        .json("DELETE", "/api/assets", None, json!({"type": "BANK"}))
        .await;
    assert_eq!(deleted.json(), json!({"deleted": 1}));
    assert_eq!(app.get("/api/assets", None).await.json(), json!([]));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = TestApp::new().await;

    let res = app
        .json("POST", "/api/assets", None, json!({"type": "BANK"}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["success"], false);

    let res = app
        .json("POST", "/api/records", None, json!({"type": " ", "amount": 1, "currency": "CNY", "datetime": "2024-01-01"}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn records_can_be_saved_edited_and_removed() {
    let app = TestApp::new().await;
    let payload = json!({
        "type": "FUND",
        "alias": "index",
        "amount": 200,
        "currency": "USD",
        "datetime": "2024-02-01"
    });

    let created = app.json("POST", "/api/records", None, payload).await.json();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["alias"], "index");

    let edited = app
        .json(
            "POST",
            "/api/records",
            None,
            json!({"id": id, "type": "FUND", "amount": 250, "currency": "USD", "datetime": "2024-02-01"}),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.json()["amount"], 250.0);

    let missing = app
        .json(
            "POST",
            "/api/records",
            None,
            json!({"id": id + 100, "type": "FUND", "amount": 1, "currency": "USD", "datetime": "2024-02-01"}),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let deleted = app.json("DELETE", "/api/records", None, json!({"id": id})).await;
    assert_eq!(deleted.json(), json!({"deleted": 1}));
}

#[tokio::test]
async fn insights_are_paginated_newest_first() {
    let app = TestApp::new().await;
    for i in 1..=5 {
        let res = app
            .json(
                "POST",
                "/api/insights",
                None,
                json!({"title": format!("note {i}"), "content": "keep saving"}),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let page = app.get("/api/insights?size=2&page=2", None).await.json();
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["size"], 2);
    let titles: Vec<&str> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["note 3", "note 2"]);

    let all = app.get("/api/insights", None).await.json();
    assert_eq!(all["data"].as_array().unwrap().len(), 5);

    let bad_query = app.get("/api/insights?size=abc", None).await;
    assert_eq!(bad_query.status, StatusCode::BAD_REQUEST);

    let first_id = all["data"][0]["id"].as_i64().unwrap();
    let updated = app
        .json(
            "PUT",
            "/api/insights",
            None,
            json!({"id": first_id, "title": "edited", "content": "x"}),
        )
        .await;
    assert_eq!(updated.json()["title"], "edited");

    let no_id = app
        .json("PUT", "/api/insights", None, json!({"title": "t", "content": "c"}))
        .await;
    assert_eq!(no_id.status, StatusCode::BAD_REQUEST);

    let deleted = app
        .json("DELETE", "/api/insights", None, json!({"id": first_id}))
        .await;
    assert_eq!(deleted.json(), json!({"result": true}));
    assert_eq!(app.get("/api/insights", None).await.json()["total"], 4);
}

#[tokio::test]
async fn settings_are_created_on_first_read_and_patched() {
    let app = TestApp::new().await;

    let settings = app.get("/api/settings", None).await.json();
    assert_eq!(settings["success"], true);
    assert_eq!(settings["data"]["theme"], "light");
    assert_eq!(settings["data"]["targetCurrency"], "CNY");
    assert_eq!(settings["data"]["baseURL"], "https://api.x.ai/v1/");

    let patched = app
        .json(
            "PUT",
            "/api/settings",
            None,
            json!({"theme": "dark", "temperature": 1.2}),
        )
        .await
        .json();
    assert_eq!(patched["data"]["theme"], "dark");
    assert_eq!(patched["data"]["temperature"], 1.2);
    assert_eq!(patched["data"]["language"], "zh-CN");

    let invalid = app
        .json("PUT", "/api/settings", None, json!({"temperature": 3}))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/api/settings", None).await.json()["data"]["temperature"], 1.2);
}

#[tokio::test]
async fn custom_currencies_are_validated() {
    let app = TestApp::new().await;

    let created = app
        .json(
            "POST",
            "/api/currencies",
            None,
            json!({"code": "usdt", "symbol": "₮", "name": "Tether", "exchangeRate": 0.14}),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let currency = created.json()["data"].clone();
    assert_eq!(currency["code"], "USDT");
    assert_eq!(currency["isActive"], true);
    let id = currency["id"].as_i64().unwrap();

    let conflict = app
        .json("POST", "/api/currencies", None, json!({"code": "usd", "symbol": "$"}))
        .await;
    assert_eq!(conflict.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        conflict.json()["message"],
        "Currency code conflicts with system currency"
    );

    let duplicate = app
        .json("POST", "/api/currencies", None, json!({"code": "USDT", "symbol": "T"}))
        .await;
    assert_eq!(duplicate.json()["message"], "Currency code already exists");

    let incomplete = app
        .json("POST", "/api/currencies", None, json!({"code": "ABC"}))
        .await;
    assert_eq!(
        incomplete.json()["message"],
        "Currency code and symbol are required"
    );

    let deactivated = app
        .json(
            "PUT",
            &format!("/api/currencies/{id}"),
            None,
            json!({"isActive": false}),
        )
        .await;
    assert_eq!(deactivated.status, StatusCode::OK);
    assert_eq!(
        app.get("/api/currencies", None).await.json()["data"],
        json!([])
    );
    assert_eq!(
        app.get("/api/currencies/all", None).await.json()["data"]
            .as_array()
            .unwrap()
            .len(),
        1
    );

    let removed = app
        .send(common::request("DELETE", &format!("/api/currencies/{id}"), None, None))
        .await;
    assert_eq!(
        removed.json()["message"],
        "Custom currency deleted successfully"
    );

    let gone = app
        .send(common::request("DELETE", &format!("/api/currencies/{id}"), None, None))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.json()["message"], "Custom currency not found");
}
