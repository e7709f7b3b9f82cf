use std::sync::Arc;

use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cafe_client::{
    ApiClient, ApiConfig, CatalogContext, CategoryId, Error, ImageFile, MemoryTokenStore,
    ProductId, TokenStore,
};

fn product_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "nombre": name,
        "categoria": {"_id": "c1", "nombre": "Drinks"},
        "disponible": true
    })
}

fn catalog(server: &MockServer) -> (CatalogContext<MemoryTokenStore>, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    let config = ApiConfig::new(server.uri().parse().unwrap());
    let api = ApiClient::new(config, tokens.clone());
    (CatalogContext::new(api), tokens)
}

#[tokio::test]
async fn load_products_replaces_the_entire_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos"))
        .and(query_param("limite", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": [product_json("p1", "Latte"), product_json("p2", "Mocha")]
        })))
        .mount(&server)
        .await;

    let (mut catalog, _tokens) = catalog(&server);
    catalog.load_products().await.unwrap();
    assert_eq!(catalog.products().len(), 2);
    assert_eq!(catalog.products()[0].name, "Latte");

    // A later load discards the previous listing entirely.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": [product_json("p3", "Espresso")]
        })))
        .mount(&server)
        .await;

    catalog.load_products().await.unwrap();
    assert_eq!(catalog.products().len(), 1);
    assert_eq!(catalog.products()[0].id.to_string(), "p3");
}

#[tokio::test]
async fn load_products_failure_leaves_cache_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": [product_json("p1", "Latte")]
        })))
        .mount(&server)
        .await;

    let (mut catalog, _tokens) = catalog(&server);
    catalog.load_products().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = catalog.load_products().await.unwrap_err();
    assert_eq!(err.api_status(), Some(500));
    assert_eq!(catalog.products().len(), 1);
}

#[tokio::test]
async fn add_product_appends_after_prior_contents() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": [product_json("p0", "Americano")]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/productos"))
        .and(body_json(serde_json::json!({
            "nombre": "Latte",
            "categoria": "cat1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json("p1", "Latte")))
        .expect(1)
        .mount(&server)
        .await;

    let (mut catalog, _tokens) = catalog(&server);
    catalog.load_products().await.unwrap();

    let created = catalog
        .add_product(&CategoryId::from("cat1".to_string()), "Latte")
        .await
        .unwrap();

    assert_eq!(created.id.to_string(), "p1");
    let ids: Vec<String> = catalog.products().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, ["p0", "p1"]);
}

#[tokio::test]
async fn update_product_replaces_only_the_matching_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": [
                product_json("p1", "Latte"),
                product_json("p2", "Mocha"),
                product_json("p3", "Espresso")
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/productos/p2"))
        .and(body_json(serde_json::json!({
            "nombre": "Mocha Grande",
            "categoria": "c1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p2", "Mocha Grande")))
        .expect(1)
        .mount(&server)
        .await;

    let (mut catalog, _tokens) = catalog(&server);
    catalog.load_products().await.unwrap();

    catalog
        .update_product(
            &CategoryId::from("c1".to_string()),
            "Mocha Grande",
            &ProductId::from("p2".to_string()),
        )
        .await
        .unwrap();

    let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Latte", "Mocha Grande", "Espresso"]);
}

#[tokio::test]
async fn update_product_failure_is_returned_and_cache_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": [product_json("p1", "Latte")]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/productos/p1"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"msg": "categoria no existe"})),
        )
        .mount(&server)
        .await;

    let (mut catalog, _tokens) = catalog(&server);
    catalog.load_products().await.unwrap();

    let err = catalog
        .update_product(
            &CategoryId::from("bogus".to_string()),
            "Latte XL",
            &ProductId::from("p1".to_string()),
        )
        .await
        .unwrap_err();

    assert_eq!(err.api_status(), Some(400));
    assert_eq!(catalog.products()[0].name, "Latte");
}

#[tokio::test]
async fn delete_product_is_an_explicit_unsupported_error() {
    let server = MockServer::start().await;
    let (mut catalog, _tokens) = catalog(&server);

    let err = catalog
        .delete_product(&ProductId::from("p1".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unsupported(_)));
    // Requests received by the server: none.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn load_product_by_id_does_not_touch_the_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos/p9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p9", "Flat White")))
        .expect(1)
        .mount(&server)
        .await;

    let (catalog, _tokens) = catalog(&server);
    let product = catalog
        .load_product_by_id(&ProductId::from("p9".to_string()))
        .await
        .unwrap();

    assert_eq!(product.name, "Flat White");
    assert!(catalog.products().is_empty());
}

#[tokio::test]
async fn load_categories_returns_reference_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "categorias": [
                {"_id": "c1", "nombre": "Drinks"},
                {"_id": "c2", "nombre": "Pastries"}
            ]
        })))
        .mount(&server)
        .await;

    let (catalog, _tokens) = catalog(&server);
    let categories = catalog.load_categories().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Pastries");
}

#[tokio::test]
async fn upload_image_puts_multipart_archivo_field() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/uploads/productos/p1"))
        .and(body_string_contains("name=\"archivo\""))
        .and(body_string_contains("coffee.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (catalog, _tokens) = catalog(&server);
    let image = ImageFile::new(b"fake jpeg bytes".to_vec(), "coffee.jpg", "image/jpeg");
    catalog
        .upload_image(image, &ProductId::from("p1".to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn requests_carry_the_stored_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productos"))
        .and(header("x-token", "session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "productos": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut catalog, tokens) = catalog(&server);
    tokens.set("session-token").await.unwrap();

    catalog.load_products().await.unwrap();
}
