/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - 認証 / role policy は app 側で Router 全体に layer 済み
 * - 所有者確認が必要な route は handler 側で AccessGuard を呼ぶ
 */
use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::api::handlers::{
    addresses, authenticate::authenticate, carts, catalog, credentials, favourites, orders,
    payments, shippings, users, verification_tokens,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/authenticate", post(authenticate))
        // users
        .route("/users", get(users::relay).post(users::relay))
        .route("/users/username/{username}", get(users::relay))
        .route(
            "/users/{user_id}",
            get(users::by_id).put(users::by_id).delete(users::by_id),
        )
        // credentials
        .route(
            "/credentials",
            get(credentials::relay).post(credentials::create),
        )
        .route("/credentials/username/{username}", get(credentials::relay))
        .route(
            "/credentials/{credential_id}",
            get(credentials::by_id).delete(credentials::by_id),
        )
        // addresses
        .route("/address", get(addresses::relay).post(addresses::create))
        .route(
            "/address/{address_id}",
            get(addresses::by_id)
                .put(addresses::by_id)
                .delete(addresses::by_id),
        )
        // verification tokens
        .route(
            "/verificationTokens",
            get(verification_tokens::relay).post(verification_tokens::create),
        )
        .route(
            "/verificationTokens/{verification_token_id}",
            get(verification_tokens::relay)
                .put(verification_tokens::relay)
                .delete(verification_tokens::relay),
        )
        // carts
        .route("/carts", get(carts::relay).post(carts::create))
        .route(
            "/carts/{cart_id}",
            get(carts::by_id).delete(carts::by_id),
        )
        // orders
        .route("/orders", get(orders::relay).post(orders::create))
        .route(
            "/orders/{order_id}",
            get(orders::by_id).put(orders::by_id).delete(orders::by_id),
        )
        .route("/orders/{order_id}/status", patch(orders::relay))
        // payments
        .route("/payments", get(payments::relay).post(payments::create))
        .route(
            "/payments/{payment_id}",
            get(payments::by_id)
                .put(payments::relay)
                .delete(payments::by_id),
        )
        // favourites
        .route(
            "/favourites",
            get(favourites::relay).post(favourites::create),
        )
        .route(
            "/favourites/{user_id}/{product_id}",
            get(favourites::by_key).delete(favourites::by_key),
        )
        // shippings
        .route(
            "/shippings",
            get(shippings::relay).post(shippings::create),
        )
        .route(
            "/shippings/{order_id}",
            get(shippings::by_order).delete(shippings::by_order),
        )
        // catalog
        .route("/products", get(catalog::relay).post(catalog::relay))
        .route(
            "/products/{product_id}",
            get(catalog::relay).put(catalog::relay).delete(catalog::relay),
        )
        .route("/categories", get(catalog::relay).post(catalog::relay))
        .route(
            "/categories/{category_id}",
            get(catalog::relay).put(catalog::relay).delete(catalog::relay),
        )
}
