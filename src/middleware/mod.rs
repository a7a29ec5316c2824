/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - client server / debug server で共有する横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod recovery;
pub mod request_logger;
