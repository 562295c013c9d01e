/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: bearer 認証 + role policy
 * - http: request id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
