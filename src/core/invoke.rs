use crate::core::Forwarder;
use crate::utils::error::{ForwarderError, Result};
use lambda_http::{Body, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// What a local invoke prints: the response as the Lambda runtime would send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeOutput {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl InvokeOutput {
    pub fn from_response(response: Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status_code: parts.status.as_u16(),
            headers: parts
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect(),
            body: match body {
                Body::Empty => String::new(),
                Body::Text(text) => text,
                Body::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            },
        }
    }
}

/// Parses an API Gateway / ALB event and runs it through `forwarder`.
///
/// A load failure is not an error here: its 500 diagnostic comes back as output.
/// Only a malformed event or an error raised by the application is.
pub async fn invoke_event<R: Read>(forwarder: &Forwarder, reader: R) -> Result<InvokeOutput> {
    let request = lambda_http::request::from_reader(reader)?;
    tracing::info!("Invoking {} {}", request.method(), request.uri());

    let response = forwarder
        .handle(request)
        .await
        .map_err(|e| ForwarderError::InvocationError {
            message: e.to_string(),
        })?;

    Ok(InvokeOutput::from_response(response))
}
