//! Dispatch a signed identity-verification call.
//!
//! Expects DOCSIGN_ENDPOINT, DOCSIGN_DEVELOPER_ID, DOCSIGN_PRIVATE_KEY, and
//! DOCSIGN_PUBLIC_KEY in the environment; the keys are base64 PKCS#8 blobs.

use docsign::{CallOptions, Client, Config, Context, Credential, RequestData, ReqwestHttpSend};
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> docsign::Result<()> {
    let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
    let credential = Credential::new(
        env::var("DOCSIGN_PRIVATE_KEY").unwrap_or_default(),
        env::var("DOCSIGN_PUBLIC_KEY").unwrap_or_default(),
    );
    let config = Config::new(
        env::var("DOCSIGN_ENDPOINT").unwrap_or_default(),
        env::var("DOCSIGN_DEVELOPER_ID").unwrap_or_default(),
    );
    let client = Client::new(ctx, config, &credential)?;

    let data = RequestData::new().with_body(json!({
        "name": "Jane Doe",
        "identity": "110101190001010000",
    }));
    let reply = client
        .dispatch(
            http::Method::POST,
            "/credentialVerify/personal/identity2/",
            &data,
            &CallOptions::new(),
        )
        .await?;

    println!("{reply:?}");
    Ok(())
}
