//! Storefront flows against the mock DevBurger API.

#![allow(clippy::unwrap_used)]

use devburger_integration_tests::{
    CUSTOMER_EMAIL, CUSTOMER_TOKEN, MockApi, PASSWORD, browser, log_in, start_storefront,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_menu_filters_by_category() {
    let api = MockApi::start().await;
    let site = start_storefront(&api).await;

    let all = browser()
        .get(format!("{site}/menu"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(all.contains("X-Salada"));
    assert!(all.contains("Coca-Cola"));

    let drinks = browser()
        .get(format!("{site}/menu?categoria=2"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(drinks.contains("Coca-Cola"));
    assert!(!drinks.contains("X-Salada"));
}

#[tokio::test]
async fn test_checkout_sends_cart_lines_with_customer_token() {
    let api = MockApi::start().await;
    let site = start_storefront(&api).await;
    let client = browser();

    let response = log_in(&client, &site, CUSTOMER_EMAIL).await;
    assert_eq!(response.url().path(), "/");

    for product_id in ["1", "1", "2"] {
        let response = client
            .post(format!("{site}/cart/add"))
            .form(&[("product_id", product_id)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = client
        .post(format!("{site}/checkout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/");
    assert!(response.text().await.unwrap().contains("Pedido realizado com sucesso"));

    let order = api.last("POST", "/orders").unwrap();
    assert_eq!(order.token.as_deref(), Some(CUSTOMER_TOKEN));
    assert_eq!(
        order.json().unwrap(),
        &json!({ "products": [
            { "id": 1, "quantity": 2 },
            { "id": 2, "quantity": 1 }
        ] })
    );

    // Cart is emptied after a successful order
    let count = client
        .get(format!("{site}/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!count.contains("badge"));
}

#[tokio::test]
async fn test_checkout_without_login_goes_to_login() {
    let api = MockApi::start().await;
    let site = start_storefront(&api).await;

    let response = browser()
        .post(format!("{site}/checkout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/auth/login");
    assert!(api.last("POST", "/orders").is_none());
}

#[tokio::test]
async fn test_bad_credentials_rerender_login() {
    let api = MockApi::start().await;
    let site = start_storefront(&api).await;

    let response = browser()
        .post(format!("{site}/auth/login"))
        .form(&[("email", CUSTOMER_EMAIL), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains("Verifique seu e-mail e senha"));
    assert!(html.contains(CUSTOMER_EMAIL));
}

#[tokio::test]
async fn test_register_reports_taken_email() {
    let api = MockApi::start().await;
    let site = start_storefront(&api).await;

    let response = browser()
        .post(format!("{site}/auth/register"))
        .form(&[
            ("name", "Maria Silva"),
            ("email", CUSTOMER_EMAIL),
            ("password", PASSWORD),
            ("confirmPassword", PASSWORD),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("E-mail já cadastrado! Faça login para continuar")
    );
}

#[tokio::test]
async fn test_register_then_login_page() {
    let api = MockApi::start().await;
    let site = start_storefront(&api).await;

    let response = browser()
        .post(format!("{site}/auth/register"))
        .form(&[
            ("name", "João Souza"),
            ("email", "joao@example.com"),
            ("password", PASSWORD),
            ("confirmPassword", PASSWORD),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/auth/login");
    assert!(response.text().await.unwrap().contains("Cadastro efetuado com sucesso"));

    let body = api.last("POST", "/users").unwrap();
    assert_eq!(body.json().unwrap()["email"], "joao@example.com");
}
