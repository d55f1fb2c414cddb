use std::sync::{Arc, Mutex};

use crud_store::builder::ModuleBuilder;
use crud_store::clients::{ClientConfig, ReqwestCaller};
use crud_store::framework::{HttpError, ModuleError};
use crud_store::lifecycle::{try_setup_tracing, StoreSystem};
use crud_store::model::{ActionKind, RequestDescriptor};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn template(server: &MockServer) -> ModuleBuilder {
    try_setup_tracing();
    let config = ClientConfig::new(&server.uri()).expect("valid mock server uri");
    ModuleBuilder::new(Arc::new(ReqwestCaller::new(config)))
}

/// Full CRUD round trip against a real HTTP server.
#[tokio::test]
async fn test_full_crud_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Ada"},
            {"id": 2, "name": "Grace"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "name": "Grace"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "Linus"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "Linus"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"id": 1, "name": "Ada Lovelace"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Ada Lovelace"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut system = StoreSystem::new();
    system.register("users", template(&server).create("users"));

    // Fetch the collection
    let fetched = system
        .dispatch("users/fetchUsers", Value::Null)
        .await
        .expect("fetch failed");
    assert_eq!(fetched.unwrap().as_array().unwrap().len(), 2);

    // Load one item as the current one
    system
        .dispatch("users/getUser", json!(2))
        .await
        .expect("get failed");
    let state = system.state("users").await.unwrap();
    assert_eq!(state["currentUser"], json!({"id": 2, "name": "Grace"}));

    // Create, update, delete
    system
        .dispatch("users/createUser", json!({"name": "Linus"}))
        .await
        .expect("create failed");
    system
        .dispatch("users/updateUser", json!({"id": 1, "name": "Ada Lovelace"}))
        .await
        .expect("update failed");
    let deleted = system
        .dispatch("users/deleteUser", json!(2))
        .await
        .expect("delete failed");
    assert_eq!(deleted, Some(Value::Null));

    let state = system.state("users").await.unwrap();
    assert_eq!(
        state["users"],
        json!([
            {"id": 1, "name": "Ada Lovelace"},
            {"id": 3, "name": "Linus"}
        ])
    );
    for flag in [
        "fetchUsersLoading",
        "getUserLoading",
        "createUserLoading",
        "updateUserLoading",
        "deleteUserLoading",
    ] {
        assert_eq!(state[flag], json!(false), "{}", flag);
    }

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_reported_to_error_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
        .mount(&server)
        .await;

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let template = template(&server).on_error(move |kind, error, resource| {
        sink.lock()
            .unwrap()
            .push((kind, error.clone(), resource.to_string()));
    });

    let mut system = StoreSystem::new();
    system.register("products", template.create("products"));

    let result = system.dispatch("products/fetchProducts", Value::Null).await;
    assert_eq!(result, Ok(None));

    assert_eq!(
        *errors.lock().unwrap(),
        vec![(
            ActionKind::FetchItems,
            HttpError::Status {
                status: 503,
                body: json!({"error": "maintenance"})
            },
            "products".to_string()
        )]
    );
    let state = system.state("products").await.unwrap();
    assert_eq!(state["products"], Value::Null);
    assert_eq!(state["fetchProductsLoading"], json!(false));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_server_with_propagation() {
    // Nothing listens on the discard port.
    let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
    let template = ModuleBuilder::new(Arc::new(ReqwestCaller::new(config))).propagate_errors(true);

    let mut system = StoreSystem::new();
    system.register("orders", template.create("orders"));

    let result = system.dispatch("orders/getOrder", json!("o-1")).await;
    assert!(matches!(
        result,
        Err(ModuleError::Http(HttpError::Network(_)))
    ));
    let state = system.state("orders").await.unwrap();
    assert_eq!(state["getOrderLoading"], json!(false));
    assert_eq!(state["currentOrder"], Value::Null);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_custom_request_with_params_and_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/categories"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c-9", "label": "Tools"}],
            "page": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let template = template(&server).custom_request(
        |descriptor: RequestDescriptor, resource: &str, kind: ActionKind, _input: &Value| {
            if kind != ActionKind::FetchItems {
                return descriptor;
            }
            let mut params = serde_json::Map::new();
            params.insert("page".into(), json!(2));
            RequestDescriptor {
                url: format!("/v2/{}", resource),
                ..descriptor
            }
            .with_params(params)
            .map_state(|body| body["data"].clone())
            .map_data(|body| body["page"].clone())
        },
    );

    let mut system = StoreSystem::new();
    system.register("category", template.create("category"));

    let page = system
        .dispatch("category/fetchCategories", Value::Null)
        .await
        .unwrap();
    assert_eq!(page, Some(json!(2)));

    let state = system.state("category").await.unwrap();
    assert_eq!(state["categories"], json!([{"id": "c-9", "label": "Tools"}]));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_headers_from_client_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(&server.uri())
        .unwrap()
        .with_header("authorization", "Bearer token");
    let template = ModuleBuilder::new(Arc::new(ReqwestCaller::new(config)));

    let mut system = StoreSystem::new();
    let users = system.register("users", template.create("users"));

    users.dispatch("fetchUsers", Value::Null).await.unwrap();
    assert_eq!(users.state().await.unwrap()["users"], json!([]));

    drop(users);
    system.shutdown().await.unwrap();
}
