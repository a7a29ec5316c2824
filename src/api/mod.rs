/*
 * Responsibility
 * - client API のバージョン別モジュール
 */
pub mod v1;
