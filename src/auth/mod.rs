//! Authentication module
//!
//! Supports: None, Basic, OAuth 1.0a, OAuth 2 bearer, API Key, TradeMe
//!
//! An `AuthStrategy` is resolved from a source's `auth_type` discriminator
//! and `auth_data` credentials, then decorates each outgoing request.
//! `auth_fields` describes the credentials each scheme needs.

mod oauth1;
mod strategy;
mod types;

pub use strategy::{auth_fields, AuthStrategy};
pub use types::{
    AuthField, AuthType, InputKind, Location, OAuthParams, PreparedRequest, SelectOption,
    SignatureMethod, TradeMeMode,
};

#[cfg(test)]
mod tests;
