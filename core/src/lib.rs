//! Core signing and dispatch layer for the docsign client.
//!
//! This crate implements the request authentication protocol of a remote
//! document-signing platform: canonicalization of query parameters, MD5
//! content digesting, RSA signing and verification, and the dispatcher that
//! assembles a signed request and interprets its outcome. Endpoint-specific
//! methods live outside this crate; they hand a route, a query map, and a
//! body map to [`Client::dispatch`] and get a uniform reply back.
//!
//! ## Overview
//!
//! - **Context**: holds the pluggable HTTP transport ([`HttpSend`])
//! - **Credential / RsaSigner**: immutable key pair and the engine that
//!   signs and verifies with it
//! - **Client**: merges the mandatory query parameters, signs the plaintext,
//!   performs the call with retry/timeout, and normalizes transport failures
//!   into the uniform `{errno, errmsg, data}` envelope
//! - **verify_notification**: shared-secret check for inbound callbacks
//!
//! ## Example
//!
//! ```no_run
//! use docsign_core::{CallOptions, Client, Config, Context, Credential, RequestData};
//! use serde_json::json;
//!
//! # async fn example(ctx: Context) -> docsign_core::Result<()> {
//! let credential = Credential::new("base64 pkcs8 private key", "base64 pkcs8 public key");
//! let config = Config::new("https://api.example.com/openapi/v2", "my-developer-id");
//! let client = Client::new(ctx, config, &credential)?;
//!
//! let data = RequestData::new().with_body(json!({"name": "n", "identity": "i"}));
//! let reply = client
//!     .dispatch(http::Method::POST, "/credentialVerify/personal/identity2/", &data, &CallOptions::new())
//!     .await?;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod constants;
pub use constants::{DEFAULT_RETRY, DEFAULT_TIMEOUT, ERRNO_TRANSPORT};

mod error;
pub use error::{Error, ErrorKind, Result};

mod canonical;
pub use canonical::canonicalize;

mod credential;
pub use credential::{Credential, SignatureAlgorithm};

mod signer;
pub use signer::{RsaSigner, SignatureFormat};

mod plaintext;
pub use plaintext::build_plaintext;

mod context;
pub use context::{Context, HttpSend, NoopHttpSend};

mod client;
pub use client::{ApiEnvelope, ApiReply, CallOptions, Client, Config, RequestData, ResponseFormat};

mod notify;
pub use notify::verify_notification;
