//! Vidrop CDN Library
//!
//! Signed-cookie issuance for CDN-fronted video playback. A policy scoped to
//! one user's manifest directory is signed into the three cookies the edge
//! validates before serving restricted content; no per-URL signing is
//! involved and nothing is stored server-side.

pub mod policy;
pub mod signer;

pub use policy::{next_local_midnight, playback_url, resource_pattern, AccessPolicy};
pub use signer::{
    CdnError, CdnResult, CookieSigner, SignedCookies, KEY_PAIR_ID_COOKIE, POLICY_COOKIE,
    SIGNATURE_COOKIE,
};
