/*!
 * Bearer authentication middleware
 *
 * Responsibility:
 * - Authorization ヘッダの解釈 (形式不正は 400)
 * - TokenAuthorizer による認可 (失敗は 401)
 * - 認可済み Identity を extensions に格納
 */

pub mod access;
mod bearer;

pub use access::require;
