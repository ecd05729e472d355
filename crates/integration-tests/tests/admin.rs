//! Admin panel flows against the mock DevBurger API.

#![allow(clippy::unwrap_used)]

use devburger_integration_tests::{
    ADMIN_EMAIL, ADMIN_TOKEN, CUSTOMER_EMAIL, MockApi, READY_ORDER, browser, log_in,
    start_admin,
};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::json;

/// A logged-in admin client and the admin base URL.
async fn admin_session(api: &MockApi) -> (reqwest::Client, String) {
    let site = start_admin(api).await;
    let client = browser();
    let response = log_in(&client, &site, ADMIN_EMAIL).await;
    assert_eq!(response.url().path(), "/orders");
    (client, site)
}

async fn page(client: &reqwest::Client, url: String) -> String {
    client.get(url).send().await.unwrap().text().await.unwrap()
}

fn product_form(price: &str) -> Form {
    Form::new()
        .text("name", "X-Salada Especial")
        .text("price", price.to_string())
        .text("category_id", "1")
        .text("offer", "on")
        .part(
            "file",
            Part::bytes(b"\x89PNG fake".to_vec())
                .file_name("especial.png")
                .mime_str("image/png")
                .unwrap(),
        )
}

#[tokio::test]
async fn test_customers_cannot_sign_in() {
    let api = MockApi::start().await;
    let site = start_admin(&api).await;
    let client = browser();

    let response = log_in(&client, &site, CUSTOMER_EMAIL).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Acesso restrito a administradores"));

    let response = client.get(format!("{site}/orders")).send().await.unwrap();
    assert_eq!(response.url().path(), "/auth/login");
}

#[tokio::test]
async fn test_orders_are_filtered_by_status() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let all = page(&client, format!("{site}/orders")).await;
    assert!(all.contains("Ana Placed"));
    assert!(all.contains("Bruno Ready"));
    assert!(all.contains("Carla Delivered"));
    assert!(all.contains("01/11/2024 19:45"));

    let ready = page(&client, format!("{site}/orders?status=3")).await;
    assert!(ready.contains("Bruno Ready"));
    assert!(!ready.contains("Ana Placed"));
    assert!(!ready.contains("Carla Delivered"));

    // Unknown filter ids show everything
    let unknown = page(&client, format!("{site}/orders?status=42")).await;
    assert!(unknown.contains("Ana Placed"));
    assert!(unknown.contains("Carla Delivered"));
}

#[tokio::test]
async fn test_status_change_keeps_filter() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let response = client
        .post(format!("{site}/orders/{READY_ORDER}/status"))
        .form(&[("status", "Pedido entregue"), ("filter", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/orders");
    assert_eq!(response.url().query(), Some("status=3"));
    let html = response.text().await.unwrap();
    assert!(html.contains("Status atualizado com sucesso"));
    assert!(!html.contains("Bruno Ready"));

    let update = api.last("PUT", &format!("/orders/{READY_ORDER}")).unwrap();
    assert_eq!(update.token.as_deref(), Some(ADMIN_TOKEN));
    assert_eq!(update.json().unwrap(), &json!({ "status": "Pedido entregue" }));

    let delivered = page(&client, format!("{site}/orders?status=5")).await;
    assert!(delivered.contains("Bruno Ready"));
    assert!(delivered.contains("Carla Delivered"));
}

#[tokio::test]
async fn test_status_change_with_malformed_filter_returns_to_all() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let response = client
        .post(format!("{site}/orders/{READY_ORDER}/status"))
        .form(&[("status", "Pedido a caminho"), ("filter", "três")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.url().path(), "/orders");
    assert_eq!(response.url().query(), None);
    assert!(api.last("PUT", &format!("/orders/{READY_ORDER}")).is_some());
}

#[tokio::test]
async fn test_order_id_cannot_escape_the_orders_endpoint() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    client
        .post(format!("{site}/orders/..%2Fproducts%2F1/status"))
        .form(&[("status", "Pedido pronto")])
        .send()
        .await
        .unwrap();

    assert!(api.last("PUT", "/products/1").is_none());
    assert!(api.last("PUT", "/orders/../products/1").is_some());
}

#[tokio::test]
async fn test_status_change_for_unknown_order_reports_failure() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let response = client
        .post(format!("{site}/orders/000000000000000000000000/status"))
        .form(&[("status", "Pedido pronto")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/orders");
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Falha ao atualizar o status do pedido")
    );
}

#[tokio::test]
async fn test_edit_form_is_prefilled() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let html = page(&client, format!("{site}/products/1/edit")).await;
    assert!(html.contains("value=\"X-Salada\""));
    assert!(html.contains("value=\"25,00\""));
    assert!(html.contains("<option value=\"1\" selected>"));
    assert!(html.contains("checked"));
    assert!(html.contains("enctype=\"multipart/form-data\""));
}

#[tokio::test]
async fn test_edit_of_unknown_product_returns_to_list() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let response = client
        .get(format!("{site}/products/999/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/products");
}

#[tokio::test]
async fn test_product_edit_sends_multipart_in_cents() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let response = client
        .post(format!("{site}/products/1"))
        .multipart(product_form("27,90"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("refresh").unwrap(), "2; url=/products");
    assert!(response.text().await.unwrap().contains("Produto editado com sucesso"));

    let update = api.last("PUT", "/products/1").unwrap();
    assert_eq!(update.token.as_deref(), Some(ADMIN_TOKEN));
    assert_eq!(update.part("name").unwrap().text(), "X-Salada Especial");
    assert_eq!(update.part("price").unwrap().text(), "2790");
    assert_eq!(update.part("category_id").unwrap().text(), "1");
    assert_eq!(update.part("offer").unwrap().text(), "true");
    let file = update.part("file").unwrap();
    assert_eq!(file.file_name.as_deref(), Some("especial.png"));
    assert_eq!(file.content_type.as_deref(), Some("image/png"));
    assert_eq!(file.data, b"\x89PNG fake");
}

#[tokio::test]
async fn test_invalid_price_is_rejected_before_the_api() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let response = client
        .post(format!("{site}/products/1"))
        .multipart(product_form("0"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains("Digite um valor válido e positivo"));
    assert!(html.contains("value=\"X-Salada Especial\""));
    assert!(api.last("PUT", "/products/1").is_none());
}

#[tokio::test]
async fn test_new_product_requires_image() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let form = Form::new()
        .text("name", "Batata")
        .text("price", "12,90")
        .text("category_id", "1");
    let response = client
        .post(format!("{site}/products"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Carregue um arquivo"));

    let response = client
        .post(format!("{site}/products"))
        .multipart(product_form("12,90"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/products");
    assert!(response.text().await.unwrap().contains("Produto criado com sucesso"));
    assert_eq!(api.last("POST", "/products").unwrap().part("price").unwrap().text(), "1290");
}

#[tokio::test]
async fn test_category_creation() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    let form = Form::new().text("name", "Sobremesas").part(
        "file",
        Part::bytes(vec![0xFF, 0xD8, 0xFF])
            .file_name("doce.jpg")
            .mime_str("image/jpeg")
            .unwrap(),
    );
    let response = client
        .post(format!("{site}/categories"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/categories");
    assert!(response.text().await.unwrap().contains("Categoria criada com sucesso"));

    let created = api.last("POST", "/categories").unwrap();
    assert_eq!(created.part("name").unwrap().text(), "Sobremesas");
    assert_eq!(created.part("file").unwrap().file_name.as_deref(), Some("doce.jpg"));
}

#[tokio::test]
async fn test_rejected_token_ends_admin_session() {
    let api = MockApi::start().await;
    let (client, site) = admin_session(&api).await;

    api.revoke_tokens();

    let response = client.get(format!("{site}/orders")).send().await.unwrap();
    assert_eq!(response.url().path(), "/auth/login");
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Sua sessão expirou, faça login novamente")
    );

    // The admin is gone from the session
    let response = client.get(format!("{site}/products")).send().await.unwrap();
    assert_eq!(response.url().path(), "/auth/login");
}
