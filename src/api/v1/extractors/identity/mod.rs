/*!
 * Verified identity extractor
 *
 * Responsibility:
 * - 認可済みリクエストの Identity を handler に提供する
 * - Identity の型そのものは services::auth 側 (middleware との契約)
 *
 * Public API:
 * - AuthIdentity
 */

mod core;

pub use core::AuthIdentity;
