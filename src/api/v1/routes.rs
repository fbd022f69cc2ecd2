/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - v1 配下すべてに認証 middleware を掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::line_id::show_line_id;
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/test", get(show_line_id));

    middleware::auth::access::apply(router, state)
}
