use crate::config::ForwarderConfig;
use crate::core::{Application, LoadErrorBody, Registry};
use crate::utils::error::{ForwarderError, Result};
use crate::utils::validation::Validate;
use anyhow::anyhow;
use lambda_http::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use lambda_http::{Body, Error, Request, Response};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Outcome of the one-time attempt to acquire the application.
pub enum Resolution {
    Loaded(Arc<dyn Application>),
    Failed(LoadFailure),
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Loaded(_) => f.write_str("Loaded(..)"),
            Resolution::Failed(failure) => f.debug_tuple("Failed").field(failure).finish(),
        }
    }
}

/// Why the application could not be acquired. Kept for the life of the forwarder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    application: String,
    message: String,
    stack: String,
}

impl LoadFailure {
    pub(crate) fn from_error(application: &str, err: anyhow::Error) -> Self {
        Self {
            application: application.to_string(),
            message: err.to_string(),
            // `{:?}` on anyhow renders the cause chain and, when captured, the backtrace
            stack: format!("{:?}", err),
        }
    }

    fn not_registered(application: &str, registry: &Registry) -> Self {
        let registered = match registry.names() {
            names if names.is_empty() => "none".to_string(),
            names => names.join(", "),
        };
        let err = anyhow!("registered applications: {}", registered)
            .context(format!("Cannot find application `{}`", application));
        Self::from_error(application, err)
    }

    /// The panic message becomes `message`. The payload carries no trace of its
    /// own, so a backtrace in `stack` starts at the forwarder, not at the panic site.
    fn from_panic(application: &str, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "application panicked during initialization".to_string()
        };
        Self::from_error(application, anyhow!(message))
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn body(&self) -> LoadErrorBody {
        LoadErrorBody::new(self.message.clone(), self.stack.clone())
    }

    /// The 500 diagnostic served for every request once loading has failed.
    pub fn to_response(&self) -> Response<Body> {
        let json = serde_json::to_string(&self.body()).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize load error body: {}", e);
            format!(r#"{{"error":"{}"}}"#, crate::domain::model::LOAD_ERROR_TITLE)
        });

        let mut response = Response::new(Body::from(json));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

    pub fn to_error(&self) -> ForwarderError {
        ForwarderError::ApplicationLoad {
            application: self.application.clone(),
            message: self.message.clone(),
        }
    }
}

/// Bridges each inbound request to the named application.
///
/// The application is resolved lazily on first use and the outcome, success or
/// failure, is memoized. There is no retry: a forwarder that failed to load keeps
/// serving the same diagnostic until it is dropped.
pub struct Forwarder {
    registry: Registry,
    application: String,
    resolution: OnceCell<Resolution>,
}

impl Forwarder {
    pub fn new(registry: Registry, application: impl Into<String>) -> Self {
        Self {
            registry,
            application: application.into(),
            resolution: OnceCell::new(),
        }
    }

    /// Builds a forwarder for `config`. A name that fails validation is logged
    /// and still resolved, so it is served as a load failure instead of
    /// aborting startup.
    pub fn from_config(registry: Registry, config: &ForwarderConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::error!(
                application = %config.application,
                "Invalid forwarder configuration: {}",
                e
            );
        }
        Self::new(registry, config.application.clone())
    }

    pub fn application_name(&self) -> &str {
        &self.application
    }

    /// True once the application has been resolved successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(self.resolution.get(), Some(Resolution::Loaded(_)))
    }

    /// Resolves the application on the first call; later calls return the same outcome.
    pub async fn resolution(&self) -> &Resolution {
        self.resolution.get_or_init(|| self.resolve()).await
    }

    /// Resolves eagerly and reports a load failure as an error.
    pub async fn ensure_loaded(&self) -> Result<()> {
        match self.resolution().await {
            Resolution::Loaded(_) => Ok(()),
            Resolution::Failed(failure) => Err(failure.to_error()),
        }
    }

    pub async fn handle(&self, request: Request) -> std::result::Result<Response<Body>, Error> {
        match self.resolution().await {
            Resolution::Loaded(app) => app.handle(request).await,
            Resolution::Failed(failure) => {
                tracing::warn!(
                    application = %self.application,
                    method = %request.method(),
                    uri = %request.uri(),
                    "Application unavailable, returning load failure"
                );
                Ok(failure.to_response())
            }
        }
    }

    async fn resolve(&self) -> Resolution {
        let name = self.application.as_str();

        let Some(factory) = self.registry.get(name) else {
            let failure = LoadFailure::not_registered(name, &self.registry);
            log_failure(&failure);
            return Resolution::Failed(failure);
        };

        tracing::debug!(application = %name, "Initializing application");

        // Run initialization on its own task so a panic surfaces as a JoinError
        let outcome = tokio::spawn(async move { factory.build().await }).await;

        let failure = match outcome {
            Ok(Ok(app)) => {
                tracing::info!(application = %name, "Application loaded");
                return Resolution::Loaded(app);
            }
            Ok(Err(err)) => LoadFailure::from_error(name, err),
            Err(join_err) if join_err.is_panic() => {
                LoadFailure::from_panic(name, join_err.into_panic())
            }
            Err(join_err) => LoadFailure::from_error(name, anyhow::Error::new(join_err)),
        };

        log_failure(&failure);
        Resolution::Failed(failure)
    }
}

impl fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forwarder")
            .field("application", &self.application)
            .field("resolution", &self.resolution.get())
            .finish()
    }
}

fn log_failure(failure: &LoadFailure) {
    tracing::error!(
        application = %failure.application,
        stack = %failure.stack,
        "Failed to load application: {}",
        failure.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_keeps_top_level_message() {
        let err = anyhow!("connection refused").context("MONGODB_URI is unreachable");
        let failure = LoadFailure::from_error("phonebook", err);

        assert_eq!(failure.application(), "phonebook");
        assert_eq!(failure.message(), "MONGODB_URI is unreachable");
        assert!(failure.stack().contains("connection refused"));
    }

    #[test]
    fn test_from_panic_extracts_message() {
        let failure = LoadFailure::from_panic("app", Box::new("boom"));
        assert_eq!(failure.message(), "boom");

        let failure = LoadFailure::from_panic("app", Box::new(String::from("owned boom")));
        assert_eq!(failure.message(), "owned boom");

        let failure = LoadFailure::from_panic("app", Box::new(42_u32));
        assert_eq!(failure.message(), "application panicked during initialization");
    }

    #[test]
    fn test_from_panic_stack_starts_with_panic_message() {
        let failure = LoadFailure::from_panic("app", Box::new("index.js threw"));
        assert!(failure.stack().starts_with("index.js threw"));
        assert!(!failure.stack().contains("Caused by"));
    }

    #[test]
    fn test_not_registered_lists_known_applications() {
        let failure = LoadFailure::not_registered("phonebook", &Registry::builtin());
        assert_eq!(failure.message(), "Cannot find application `phonebook`");
        assert!(failure.stack().contains("registered applications: echo"));

        let failure = LoadFailure::not_registered("phonebook", &Registry::new());
        assert!(failure.stack().contains("registered applications: none"));
    }

    #[test]
    fn test_to_response_shape() {
        let failure = LoadFailure::from_error("app", anyhow!("nope"));
        let response = failure.to_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        match response.body() {
            Body::Text(text) => {
                assert!(text.starts_with(r#"{"error":"Failed to load application","message":"nope","stack":"#));
            }
            _ => panic!("invalid body"),
        }
    }

    #[test]
    fn test_to_error() {
        let failure = LoadFailure::from_error("app", anyhow!("nope"));
        match failure.to_error() {
            ForwarderError::ApplicationLoad {
                application,
                message,
            } => {
                assert_eq!(application, "app");
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
