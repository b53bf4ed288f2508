//! Admission layer.
//!
//! Derives one key per request with the configured [`KeyStrategy`], asks the
//! controller for a decision, and either forwards the request or answers 429.

use crate::controller::AdmissionController;
use crate::domain::key::{derive_key, KeyStrategy};
use crate::middleware::client_ip::extract_client_ip;
use crate::middleware::headers::{apply_rate_limit_headers, rate_limited_response};
use axum::{body::Body, http::Request, response::Response};
use shared_types::{CallerIdentity, SystemTimeSource, TimeSource};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::warn;

/// Admission layer for one protected route family.
pub struct AdmissionLayer<T: TimeSource = SystemTimeSource> {
    controller: Arc<AdmissionController<T>>,
    strategy: KeyStrategy,
}

impl<T: TimeSource> AdmissionLayer<T> {
    pub fn new(controller: Arc<AdmissionController<T>>, strategy: KeyStrategy) -> Self {
        Self {
            controller,
            strategy,
        }
    }

    pub fn controller(&self) -> Arc<AdmissionController<T>> {
        Arc::clone(&self.controller)
    }
}

impl<T: TimeSource> Clone for AdmissionLayer<T> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            strategy: self.strategy,
        }
    }
}

impl<S, T: TimeSource> Layer<S> for AdmissionLayer<T> {
    type Service = AdmissionService<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        AdmissionService {
            inner,
            controller: Arc::clone(&self.controller),
            strategy: self.strategy,
        }
    }
}

/// Admission service
pub struct AdmissionService<S, T: TimeSource = SystemTimeSource> {
    inner: S,
    controller: Arc<AdmissionController<T>>,
    strategy: KeyStrategy,
}

impl<S: Clone, T: TimeSource> Clone for AdmissionService<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            controller: Arc::clone(&self.controller),
            strategy: self.strategy,
        }
    }
}

impl<S, T> Service<Request<Body>> for AdmissionService<S, T>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    T: TimeSource + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let controller = Arc::clone(&self.controller);
        let strategy = self.strategy;
        // Swap in a clone so the instance polled ready is the one called.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let key = derive_key(
                strategy,
                req.extensions().get::<CallerIdentity>(),
                extract_client_ip(&req),
            )
            .to_string();

            let decision = controller.allow(&key);
            if !decision.allowed {
                warn!(
                    key = %key,
                    limit = decision.limit,
                    retry_after_secs = decision.retry_after_secs(),
                    "Admission denied"
                );
                return Ok(rate_limited_response(&decision));
            }

            let mut response = inner.call(req).await?;
            apply_rate_limit_headers(response.headers_mut(), &decision);
            Ok(response)
        })
    }
}
