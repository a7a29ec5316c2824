mod client;

pub use client::{KeycloakClient, KeycloakError, KeycloakOptions};
