//! Credential & session component shared by both identity spaces.
//!
//! Layers: domain (claims, tokens), repository (principal lookup),
//! service (authenticate / resolve). Users and mechanics plug in through the
//! `Principal` trait; the token's `kind` claim keeps the spaces apart.

pub mod domain;
pub mod errors;
pub mod password;
pub mod principal;
pub mod repository;
pub mod repo;
pub mod service;
pub mod token;

pub use domain::{AccessToken, PrincipalKind};
pub use principal::Principal;
pub use service::AuthService;
pub use token::TokenIssuer;
