use async_trait::async_trait;
use lambda_http::{Body, Error, Request, Response};
use std::future::Future;
use std::sync::Arc;

/// A request-handling program the forwarder delegates to.
///
/// Whatever `handle` returns, `Ok` or `Err`, reaches the runtime untouched.
#[async_trait]
pub trait Application: Send + Sync {
    async fn handle(&self, request: Request) -> Result<Response<Body>, Error>;
}

/// Entry point of an application: performs its load-time initialization.
#[async_trait]
pub trait ApplicationFactory: Send + Sync {
    async fn build(&self) -> anyhow::Result<Arc<dyn Application>>;
}

pub struct FactoryFn<F>(F);

/// Wraps an async closure as an [`ApplicationFactory`].
pub fn factory_fn<F, Fut>(f: F) -> FactoryFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Arc<dyn Application>>> + Send,
{
    FactoryFn(f)
}

#[async_trait]
impl<F, Fut> ApplicationFactory for FactoryFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Arc<dyn Application>>> + Send,
{
    async fn build(&self) -> anyhow::Result<Arc<dyn Application>> {
        (self.0)().await
    }
}
