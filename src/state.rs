/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - contract: 起動時に読み込んだ OpenAPI 契約
 *   - auth: BearerStrategy (TokenVerifier を内包)
 *   - example: /v1/test が呼ぶ下流サービス
 * - Clone 前提で持つ (内部は Arc で read-only)
 */
use std::sync::Arc;

use crate::services::{auth::BearerStrategy, contract::ContractValidator, example::ExampleService};

#[derive(Clone)]
pub struct AppState {
    pub contract: Arc<ContractValidator>,
    pub auth: Arc<BearerStrategy>,
    pub example: Arc<dyn ExampleService>,
}

impl AppState {
    pub fn new(
        contract: Arc<ContractValidator>,
        auth: Arc<BearerStrategy>,
        example: Arc<dyn ExampleService>,
    ) -> Self {
        Self {
            contract,
            auth,
            example,
        }
    }
}
