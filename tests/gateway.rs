mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::ResponseTemplate;

use common::{Gateway, foreign_token, get, request};
use storefront_gateway::services::auth::identity::{ROLE_ADMIN, ROLE_USER};

/// payment 12 → order 7 → cart 3 → user 5; payment 99 → order 71 → cart 8 → user 6
async fn shop(gw: &Gateway) {
    gw.get_json("/api/payments/12", &json!({"paymentId": 12, "order": {"orderId": 7}}))
        .await;
    gw.get_json("/api/orders/7", &json!({"orderId": 7, "cart": {"cartId": 3}}))
        .await;
    gw.get_json("/api/carts/3", &json!({"cartId": 3, "userId": 5}))
        .await;
    gw.get_json("/api/payments/99", &json!({"paymentId": 99, "order": {"orderId": 71}}))
        .await;
    gw.get_json("/api/orders/71", &json!({"orderId": 71, "cart": {"cartId": 8}}))
        .await;
    gw.get_json("/api/carts/8", &json!({"cartId": 8, "userId": 6}))
        .await;
}

#[tokio::test]
async fn health_is_public() {
    let gw = Gateway::start().await;

    let (status, body) = gw.send(get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn owner_reaches_their_payment_through_the_whole_chain() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    shop(&gw).await;
    let token = gw.token("alice", "5", ROLE_USER);

    let (status, body) = gw.send(get("/api/payments/12", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paymentId"], 12);
    // one lookup hop plus the forwarded call
    assert_eq!(gw.received("GET", "/api/payments/12").await, 2);
    assert_eq!(gw.received("GET", "/api/carts/3").await, 1);
}

#[tokio::test]
async fn someone_elses_payment_is_forbidden_and_not_forwarded() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    shop(&gw).await;
    let token = gw.token("alice", "5", ROLE_USER);

    let (status, body) = gw.send(get("/api/payments/99", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert_eq!(gw.received("GET", "/api/payments/99").await, 1);
}

#[tokio::test]
async fn admin_reaches_any_payment() {
    let gw = Gateway::start().await;
    gw.account("root", 1, ROLE_ADMIN, "pw").await;
    shop(&gw).await;
    let token = gw.token("root", "1", ROLE_ADMIN);

    let (status, _) = gw.send(get("/api/payments/99", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn broken_chain_denies_users_but_not_admins() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.account("root", 1, ROLE_ADMIN, "pw").await;
    gw.get_json("/api/orders/72", &json!({"orderId": 72, "cart": {"cartId": 404}}))
        .await;
    gw.respond("GET", "/api/carts/404", ResponseTemplate::new(404))
        .await;

    let user = gw.token("alice", "5", ROLE_USER);
    let (status, _) = gw.send(get("/api/orders/72", Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = gw.token("root", "1", ROLE_ADMIN);
    let (status, _) = gw.send(get("/api/orders/72", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_path_is_compared_directly() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/users/5", &json!({"userId": 5, "firstName": "Alice"}))
        .await;
    let token = gw.token("alice", "5", ROLE_USER);

    let (status, body) = gw.send(get("/api/users/5", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Alice");

    let (status, _) = gw.send(get("/api/users/6", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn new_order_is_checked_against_the_cart_in_the_body() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/carts/3", &json!({"cartId": 3, "userId": 5}))
        .await;
    gw.get_json("/api/carts/4", &json!({"cartId": 4, "userId": 42}))
        .await;
    gw.respond(
        "POST",
        "/api/orders",
        ResponseTemplate::new(200).set_body_json(json!({"orderId": 80})),
    )
    .await;
    let token = gw.token("alice", "5", ROLE_USER);

    let own = json!({"orderDesc": "books", "cart": {"cartId": 3}});
    let (status, body) = gw
        .send(request("POST", "/api/orders", Some(&token), Some(own)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderId"], 80);

    let theirs = json!({"orderDesc": "books", "cart": {"cartId": 4}});
    let (status, _) = gw
        .send(request("POST", "/api/orders", Some(&token), Some(theirs)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(gw.received("POST", "/api/orders").await, 1);
}

#[tokio::test]
async fn favourite_key_names_its_owner() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/favourites/5/30", &json!({"userId": 5, "productId": 30}))
        .await;
    let token = gw.token("alice", "5", ROLE_USER);

    let (status, _) = gw.send(get("/api/favourites/5/30", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = gw.send(get("/api/favourites/6/30", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn authorization_header_stays_at_the_gateway() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/users/5", &json!({"userId": 5})).await;
    let token = gw.token("alice", "5", ROLE_USER);

    let (status, _) = gw.send(get("/api/users/5", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let forwarded = gw.backend.received_requests().await.unwrap();
    let forwarded = forwarded
        .iter()
        .find(|r| r.url.path() == "/api/users/5")
        .unwrap();
    assert!(!forwarded.headers.contains_key("authorization"));
}

#[tokio::test]
async fn listings_are_admin_only() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.account("root", 1, ROLE_ADMIN, "pw").await;
    gw.get_json("/api/payments", &json!({"collection": []})).await;

    let user = gw.token("alice", "5", ROLE_USER);
    let (status, _) = gw.send(get("/api/payments", Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(gw.received("GET", "/api/payments").await, 0);

    let admin = gw.token("root", "1", ROLE_ADMIN);
    let (status, _) = gw.send(get("/api/payments", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn anonymous_callers_see_public_routes_only() {
    let gw = Gateway::start().await;
    gw.get_json("/api/products", &json!({"collection": [{"productId": 1}]}))
        .await;

    let (status, body) = gw.send(get("/api/products", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collection"][0]["productId"], 1);

    let (status, _) = gw.send(get("/api/carts/3", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bad_tokens_are_unauthorized() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/products", &json!({"collection": []})).await;

    let tampered = foreign_token("alice", "5", ROLE_USER);
    let (status, body) = gw.send(get("/api/products", Some(&tampered))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = gw.send(get("/api/products", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = storefront_gateway::services::auth::TokenService::new(
        common::SECRET,
        chrono::Duration::seconds(-60),
        0,
    )
    .issue(&storefront_gateway::services::auth::Identity::new(
        "5",
        "alice",
        [ROLE_USER],
    ))
    .unwrap();
    let (status, _) = gw
        .send(get("/api/products", Some(expired.as_str())))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_a_vanished_or_disabled_account_is_unauthorized() {
    let gw = Gateway::start().await;
    let mut disabled = common::credential("bob", 7, ROLE_USER, "pw");
    disabled["isEnabled"] = json!(false);
    gw.get_json("/api/credentials/username/bob", &disabled).await;
    gw.respond(
        "GET",
        "/api/credentials/username/ghost",
        ResponseTemplate::new(404),
    )
    .await;

    let (status, _) = gw
        .send(get("/api/carts/3", Some(&gw.token("bob", "7", ROLE_USER))))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = gw
        .send(get("/api/carts/3", Some(&gw.token("ghost", "9", ROLE_USER))))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let gw = Gateway::start().await;

    let res = tower::ServiceExt::oneshot(gw.router.clone(), get("/health", None))
        .await
        .unwrap();

    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn address_and_credential_updates_go_through_the_record_path() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/address/77", &json!({"addressId": 77, "user": {"userId": 6}}))
        .await;
    gw.respond("PUT", "/api/address", ResponseTemplate::new(200)).await;
    gw.respond("PUT", "/api/credentials", ResponseTemplate::new(200))
        .await;
    let token = gw.token("alice", "5", ROLE_USER);

    let (status, _) = gw
        .send(request(
            "PUT",
            "/api/address/77",
            Some(&token),
            Some(json!({"addressId": 77, "user": {"userId": 5}})),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // naming yourself as owner in the body no longer reaches someone else's record
    let (status, _) = gw
        .send(request(
            "PUT",
            "/api/address",
            Some(&token),
            Some(json!({"addressId": 77, "user": {"userId": 5}})),
        ))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = gw
        .send(request(
            "PUT",
            "/api/credentials",
            Some(&token),
            Some(json!({"credentialId": 2, "username": "bob", "user": {"userId": 5}})),
        ))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(gw.received("PUT", "/api/address").await, 0);
    assert_eq!(gw.received("PUT", "/api/address/77").await, 0);
    assert_eq!(gw.received("PUT", "/api/credentials").await, 0);
}

#[tokio::test]
async fn verification_token_is_created_only_for_an_own_credential() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/credentials/1", &json!({"credentialId": 1, "user": {"userId": 5}}))
        .await;
    gw.get_json("/api/credentials/2", &json!({"credentialId": 2, "user": {"userId": 6}}))
        .await;
    gw.respond(
        "POST",
        "/api/verificationTokens",
        ResponseTemplate::new(200).set_body_json(json!({"verificationTokenId": 4})),
    )
    .await;
    let token = gw.token("alice", "5", ROLE_USER);

    let own = json!({"token": "abc", "credentialDto": {"credentialId": 1}});
    let (status, body) = gw
        .send(request("POST", "/api/verificationTokens", Some(&token), Some(own)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verificationTokenId"], 4);

    let theirs = json!({"token": "abc", "credentialDto": {"credentialId": 2}});
    let (status, _) = gw
        .send(request("POST", "/api/verificationTokens", Some(&token), Some(theirs)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(gw.received("POST", "/api/verificationTokens").await, 1);
}

#[tokio::test]
async fn verification_token_reads_are_admin_only() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.account("root", 1, ROLE_ADMIN, "pw").await;
    gw.get_json("/api/verificationTokens/4", &json!({"verificationTokenId": 4}))
        .await;

    let user = gw.token("alice", "5", ROLE_USER);
    let (status, _) = gw
        .send(get("/api/verificationTokens/4", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = gw.token("root", "1", ROLE_ADMIN);
    let (status, body) = gw
        .send(get("/api/verificationTokens/4", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verificationTokenId"], 4);
}

#[tokio::test]
async fn token_user_id_must_match_the_account() {
    let gw = Gateway::start().await;
    gw.account("alice", 5, ROLE_USER, "pw").await;
    gw.get_json("/api/users/6", &json!({"userId": 6})).await;

    // alice's token carrying another user's id
    let stale = gw.token("alice", "6", ROLE_USER);
    let (status, _) = gw.send(get("/api/users/6", Some(&stale))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(gw.received("GET", "/api/users/6").await, 0);
}
