use axum::http::StatusCode;
use axum_test::TestServer;
use item_catalog_server::{
    adapters::inbound::http::router::create_router, create_in_memory_app,
};
use serde_json::{Value, json};

async fn setup_test_server() -> TestServer {
    let services = create_in_memory_app().await.unwrap();
    let app = create_router(services.app_state());
    TestServer::new(app).unwrap()
}

async fn create(server: &TestServer, title: &str, duration: i32, price: f64) -> Value {
    let response = server
        .post("/api/items")
        .json(&json!({
            "title": title,
            "description": "A film",
            "durationMinutes": duration,
            "price": price,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_create_returns_location_and_camel_case_body() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/items")
        .json(&json!({
            "title": "Arrival",
            "durationMinutes": 116,
            "price": 12.5,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    let id = body["id"].as_str().unwrap().to_string();

    assert_eq!(
        response.header("location").to_str().unwrap(),
        format!("/api/items/{}", id)
    );
    assert_eq!(body["title"], "Arrival");
    assert_eq!(body["durationMinutes"], 116);
    assert_eq!(body["price"], 12.5);
    assert!(body["description"].is_null());
    assert_eq!(body["createdAt"], body["updatedAt"]);

    let fetched = server.get(&format!("/api/items/{}", id)).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>(), body);
}

#[tokio::test]
async fn test_invalid_create_returns_validation_problem() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/items")
        .json(&json!({
            "title": "",
            "durationMinutes": 0,
            "price": -1.0,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["title"], "One or more validation errors occurred.");
    assert_eq!(body["status"], 400);
    assert_eq!(body["errors"]["title"], json!(["Title cannot be empty."]));
    assert_eq!(
        body["errors"]["durationMinutes"],
        json!(["The duration must be greater than zero."])
    );
    assert_eq!(
        body["errors"]["price"],
        json!(["The price must be greater than zero."])
    );

    let list = server.get("/api/items").await.json::<Value>();
    assert_eq!(list["totalCount"], 0);
}

#[tokio::test]
async fn test_missing_item_is_not_found() {
    let server = setup_test_server().await;
    let id = "7f1c2f5e-3a3e-4a57-9a43-6f1f8e6b1d2a";

    server
        .get(&format!("/api/items/{}", id))
        .await
        .assert_status_not_found();

    server
        .put(&format!("/api/items/{}", id))
        .json(&json!({"title": "Gone", "durationMinutes": 5, "price": 1.0}))
        .await
        .assert_status_not_found();

    server
        .delete(&format!("/api/items/{}", id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_update_then_delete() {
    let server = setup_test_server().await;
    let created = create(&server, "Sicario", 121, 9.99).await;
    let url = format!("/api/items/{}", created["id"].as_str().unwrap());

    let response = server
        .put(&url)
        .json(&json!({
            "title": "Sicario: Day of the Soldado",
            "durationMinutes": 122,
            "price": 11.0,
        }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Sicario: Day of the Soldado");
    assert_eq!(updated["durationMinutes"], 122);
    assert!(updated["description"].is_null());
    assert_eq!(updated["createdAt"], created["createdAt"]);

    server.delete(&url).await.assert_status(StatusCode::NO_CONTENT);
    server.get(&url).await.assert_status_not_found();
}

#[tokio::test]
async fn test_invalid_update_is_rejected() {
    let server = setup_test_server().await;
    let created = create(&server, "Prisoners", 153, 7.5).await;
    let url = format!("/api/items/{}", created["id"].as_str().unwrap());

    let response = server
        .put(&url)
        .json(&json!({
            "title": "x".repeat(51),
            "durationMinutes": 153,
            "price": 7.5,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(
        body["errors"]["title"],
        json!(["Title cannot be longer than 50 characters."])
    );

    let unchanged = server.get(&url).await.json::<Value>();
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn test_list_paging_and_search() {
    let server = setup_test_server().await;
    for n in 1..=12 {
        create(&server, &format!("Matrix part {}", n), 100 + n, 5.0).await;
    }
    create(&server, "Blade Runner", 117, 8.0).await;
    create(&server, "Dune", 155, 9.0).await;
    create(&server, "Tenet", 150, 10.0).await;

    let response = server
        .get("/api/items")
        .add_query_param("page", 2)
        .add_query_param("pageSize", 5)
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["totalCount"], 15);
    assert_eq!(body["page"], 2);
    assert_eq!(body["pageSize"], 5);

    let response = server
        .get("/api/items")
        .add_query_param("search", "MATRIX")
        .add_query_param("pageSize", 50)
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["totalCount"], 12);
    assert_eq!(body["items"].as_array().unwrap().len(), 12);

    let response = server
        .get("/api/items")
        .add_query_param("page", 9)
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["totalCount"], 15);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_sorting() {
    let server = setup_test_server().await;
    create(&server, "Cheap", 90, 1.5).await;
    create(&server, "Pricey", 90, 30.0).await;
    create(&server, "Middle", 90, 12.0).await;

    let body = server
        .get("/api/items")
        .add_query_param("sortBy", "price")
        .add_query_param("sortDirection", "desc")
        .await
        .json::<Value>();
    let titles: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Pricey", "Middle", "Cheap"]);

    let body = server
        .get("/api/items")
        .add_query_param("sortBy", "TITLE")
        .await
        .json::<Value>();
    assert_eq!(body["items"][0]["title"], "Cheap");
}

#[tokio::test]
async fn test_list_validation_failures() {
    let server = setup_test_server().await;

    let cases = [
        ("page", "0", "page"),
        ("pageSize", "0", "pageSize"),
        ("pageSize", "51", "pageSize"),
        ("sortBy", "rating", "sortBy"),
    ];

    for (param, value, field) in cases {
        let response = server.get("/api/items").add_query_param(param, value).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(
            body["errors"].get(field).is_some(),
            "expected {} to fail for {}={}",
            field,
            param,
            value
        );
    }

    let body = server
        .get("/api/items")
        .add_query_param("sortBy", "rating")
        .await
        .json::<Value>();
    assert_eq!(
        body["errors"]["sortBy"],
        json!(["Sorting is only allowed by: title, price, duration, createdAt"])
    );
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/items")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["errors"].get("body").is_some());
}

#[tokio::test]
async fn test_unrepresentable_price_is_rejected() {
    let server = setup_test_server().await;

    for price in [json!(1e20), json!(0.004)] {
        let response = server
            .post("/api/items")
            .json(&json!({
                "title": "Overflow",
                "durationMinutes": 10,
                "price": price,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["errors"].get("body").is_some());
    }

    let list = server.get("/api/items").await.json::<Value>();
    assert_eq!(list["totalCount"], 0);
}
