/*
 * Responsibility
 * - handler / middleware から呼ばれる処理 (トークン検証, 契約検証, 下流サービス)
 * - HTTP レスポンスへの変換は持たない (error.rs の責務)
 */
pub mod auth;
pub mod contract;
pub mod example;
