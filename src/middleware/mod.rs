/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: request id / access log / body limit
 * - contract: OpenAPI 契約検証
 * - auth: Bearer 認証 → AuthCtx
 */
pub mod auth;
pub mod contract;
pub mod http;
