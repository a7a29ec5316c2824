/*
 * Responsibility
 * - handler 向け extractor の公開インターフェース
 */
mod identity;

pub use identity::AuthIdentity;
