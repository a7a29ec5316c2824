/*
 * Responsibility
 * - handler / middleware から使うサービス層 (認可・外部 IdP クライアント)
 */
pub mod auth;
pub mod keycloak;
