/*
 * Responsibility
 * - v1 handler の集約
 */
pub mod health;
pub mod history;
