//! Client library for a remote document-signing platform.
//!
//! This facade re-exports [`docsign_core`] and, with the default `reqwest`
//! feature, the reqwest-backed transport, so most users need a single
//! dependency:
//!
//! ```no_run
//! use docsign::{CallOptions, Client, Config, Context, Credential, RequestData, ReqwestHttpSend};
//! use serde_json::json;
//!
//! # async fn example() -> docsign::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let credential = Credential::new("base64 pkcs8 private key", "base64 pkcs8 public key");
//! let client = Client::new(
//!     ctx,
//!     Config::new("https://api.example.com/openapi/v2", "my-developer-id"),
//!     &credential,
//! )?;
//!
//! let data = RequestData::new().with_body(json!({"account": "user-1"}));
//! let reply = client
//!     .dispatch(http::Method::POST, "/user/reg/", &data, &CallOptions::new())
//!     .await?;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

pub use docsign_core::*;

#[cfg(feature = "reqwest")]
pub use docsign_http_send_reqwest::ReqwestHttpSend;
