use crate::core::{Application, ApplicationFactory};
use async_trait::async_trait;
use lambda_http::http::{header::CONTENT_TYPE, StatusCode};
use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const NAME: &str = "echo";

/// Describes the request it received. Used to smoke-test a deployment.
#[derive(Debug, Default, Clone)]
pub struct EchoApplication;

#[derive(Debug, Serialize)]
struct EchoReport<'a> {
    method: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    headers: BTreeMap<&'a str, Vec<&'a str>>,
    body: String,
}

#[async_trait]
impl Application for EchoApplication {
    async fn handle(&self, request: Request) -> Result<Response<Body>, Error> {
        let mut headers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, value) in request.headers() {
            // non UTF-8 values are dropped
            if let Ok(value) = value.to_str() {
                headers.entry(name.as_str()).or_default().push(value);
            }
        }

        let body = match request.body() {
            Body::Empty => String::new(),
            Body::Text(text) => text.clone(),
            Body::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        };

        let report = EchoReport {
            method: request.method().as_str(),
            path: request.uri().path(),
            query: request.uri().query(),
            headers,
            body,
        };

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&report)?))?;
        Ok(response)
    }
}

pub struct EchoFactory;

#[async_trait]
impl ApplicationFactory for EchoFactory {
    async fn build(&self) -> anyhow::Result<Arc<dyn Application>> {
        Ok(Arc::new(EchoApplication))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_echo_reports_request() {
        let request = lambda_http::http::Request::builder()
            .method("POST")
            .uri("https://example.com/api/persons?limit=2")
            .header("x-trace", "a")
            .header("x-trace", "b")
            .body(Body::from(r#"{"name":"Arto Hellas"}"#))
            .expect("failed to build request");

        let response = EchoApplication.handle(request).await.expect("echo failed");
        assert_eq!(response.status(), StatusCode::OK);

        let report: Value = match response.body() {
            Body::Text(text) => serde_json::from_str(text).expect("invalid json"),
            _ => panic!("invalid body"),
        };
        assert_eq!(report["method"], "POST");
        assert_eq!(report["path"], "/api/persons");
        assert_eq!(report["query"], "limit=2");
        assert_eq!(report["headers"]["x-trace"], serde_json::json!(["a", "b"]));
        assert_eq!(report["body"], r#"{"name":"Arto Hellas"}"#);
    }

    #[tokio::test]
    async fn test_echo_empty_body() {
        let request = lambda_http::http::Request::builder()
            .uri("/")
            .body(Body::Empty)
            .expect("failed to build request");

        let response = EchoApplication.handle(request).await.expect("echo failed");
        let report: Value = match response.body() {
            Body::Text(text) => serde_json::from_str(text).expect("invalid json"),
            _ => panic!("invalid body"),
        };
        assert_eq!(report["method"], "GET");
        assert_eq!(report["query"], Value::Null);
        assert_eq!(report["body"], "");
    }
}
