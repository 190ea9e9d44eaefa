use async_trait::async_trait;
use safeprune_errors::Error;
use std::future::Future;

/// A named pass/fail check
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(false)` is a plain failure; `Err` is a failure with a message
    async fn check(&self) -> Result<bool, Error>;
}

/// Probe backed by a closure returning a future
pub struct FnProbe<F> {
    name: String,
    check: F,
}

impl<F> FnProbe<F> {
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

#[async_trait]
impl<F, Fut> Probe for FnProbe<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, Error>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<bool, Error> {
        (self.check)().await
    }
}
