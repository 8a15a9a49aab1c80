// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV import tests through the admin API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use bike_inventory::time_utils::current_year;
use tower::ServiceExt;

mod common;
use common::{body_json, get_request};

fn csv_request(cookie: &str, text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/admin/import")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(text.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_minimal_csv_import() {
    let (app, state) = common::create_test_app();
    let cookie = common::admin_cookie(&state).await;

    let response = app
        .clone()
        .oneshot(csv_request(&cookie, "modelName,modelNumber,pieces\nWild Cross,WC101,5\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["imported"], 1);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["skipped"], 0);
    assert_eq!(summary["delimiter"], "comma");

    let response = app
        .oneshot(get_request("/api/admin/bikes", Some(&cookie)))
        .await
        .unwrap();
    let bikes = body_json(response).await;
    let bike = &bikes[0];
    assert_eq!(bike["modelName"], "Wild Cross");
    assert_eq!(bike["modelNumber"], "WC101");
    assert_eq!(bike["manufacturer"], "Bulls");
    assert_eq!(bike["pieces"], 5);
    assert_eq!(bike["modelYear"], current_year());
    assert_eq!(bike["isEbike"], false);
    assert_eq!(bike["version"], 1);
}

#[tokio::test]
async fn test_import_reports_skipped_rows() {
    let (app, state) = common::create_test_app();
    let cookie = common::admin_cookie(&state).await;
    let text = "Model Name;Model Number;Battery;Price;Farbe\n\
                Sonic EVO;SE501;Bosch 750Wh;5.499,00;black\n\
                \n\
                ;SE502;;;\n\
                Copperhead;CH301\n";

    let response = app
        .clone()
        .oneshot(csv_request(&cookie, text))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["delimiter"], "semicolon");
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["imported"], 1);
    assert_eq!(summary["skipped"], 3);
    assert_eq!(summary["skipReasons"]["Empty line"], 1);
    assert_eq!(summary["skipReasons"]["Missing model name"], 1);
    assert_eq!(summary["skipReasons"]["Column count mismatch"], 1);

    let response = app
        .oneshot(get_request("/api/bikes", None))
        .await
        .unwrap();
    let bikes = body_json(response).await;
    assert_eq!(bikes.as_array().unwrap().len(), 1);
    assert_eq!(bikes[0]["isEbike"], true);
    assert_eq!(bikes[0]["price"], 5499.0);
}

#[tokio::test]
async fn test_import_without_header_is_rejected() {
    let (app, state) = common::create_test_app();
    let cookie = common::admin_cookie(&state).await;

    let response = app.oneshot(csv_request(&cookie, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");
}

#[tokio::test]
async fn test_import_requires_admin() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/import")
                .body(Body::from("modelName\nWild Cross\n"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
