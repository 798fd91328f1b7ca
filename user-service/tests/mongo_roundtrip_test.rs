//! End-to-end tests against a live MongoDB over real HTTP.

mod common;

use common::{is_object_id_hex, TestApp, ANN};
use mongodb::bson::{doc, oid::ObjectId};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "Requires MongoDB at MONGODB_URI (default mongodb://localhost:27017)"]
async fn create_read_delete_lifecycle() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/user/add", app.address))
        .body(ANN)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let id = response.text().await.unwrap();
    assert!(is_object_id_hex(&id));

    let response = client
        .get(format!("{}/user/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "_id": id,
            "name": "Ann",
            "address": {"street": "1 Main", "apt": "", "city": "X", "state": "Y", "zip": "00000"}
        })
    );

    let response = client
        .delete(format!("{}/user/delete/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/user/{}", app.address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["_id"], "");

    let response = client
        .delete(format!("{}/user/delete/{}", app.address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at MONGODB_URI (default mongodb://localhost:27017)"]
async fn stored_document_uses_native_object_id() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let id = client
        .post(format!("{}/user/add", app.address))
        .body(ANN)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let oid = ObjectId::parse_str(&id).unwrap();

    let raw = app
        .db
        .database()
        .collection::<mongodb::bson::Document>("user")
        .find_one(doc! { "_id": oid }, None)
        .await
        .unwrap()
        .expect("User document should exist");

    assert_eq!(raw.get_object_id("_id").unwrap(), oid);
    assert_eq!(raw.get_str("name").unwrap(), "Ann");
    assert_eq!(
        raw.get_document("address").unwrap().get_str("zip").unwrap(),
        "00000"
    );

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at MONGODB_URI (default mongodb://localhost:27017)"]
async fn malformed_payload_persists_nothing() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/user/add", app.address))
        .body("{\"name\":")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().await.unwrap().is_empty());

    let count = app.db.users().count_documents(doc! {}, None).await.unwrap();
    assert_eq!(count, 0);

    app.cleanup().await;
}
