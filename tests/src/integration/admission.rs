//! # Admission Flows
//!
//! Layers built by the node container in front of a plain handler.
//!
//! 1. **SDK policy**: keyed by project, independent of client IP
//! 2. **Public policy**: keyed by forwarded client IP
//! 3. **Disabled policy**: admits everything, tracks nothing

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use feedloop_node::{NodeConfig, Policy, SubsystemContainer};
    use shared_types::{CallerIdentity, ErrorBody};
    use tower::{service_fn, Layer, Service, ServiceExt};
    use uuid::Uuid;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn container(configure: impl FnOnce(&mut NodeConfig)) -> SubsystemContainer {
        let mut config = NodeConfig::default();
        configure(&mut config);
        SubsystemContainer::new(config)
    }

    fn handler(
    ) -> impl Service<Request<Body>, Response = Response, Error = Infallible, Future = impl Send> + Clone + Send
    {
        service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(Response::new(Body::from("accepted")))
        })
    }

    fn sdk_request(project: Uuid, ip: &str) -> Request<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri("/api/sdk/feedback")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(CallerIdentity::sdk(project));
        req
    }

    fn public_request(ip: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/public/feedback")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_sdk_policy_limits_per_project_across_ips() {
        let container = container(|c| c.admission.sdk.limit = 2);
        let svc = container.admission_layer(Policy::Sdk).layer(handler());
        let project = Uuid::new_v4();

        for ip in ["198.51.100.1", "198.51.100.2"] {
            let response = svc.clone().oneshot(sdk_request(project, ip)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let denied = svc
            .clone()
            .oneshot(sdk_request(project, "198.51.100.3"))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(denied.headers().contains_key(header::RETRY_AFTER));

        let bytes = axum::body::to_bytes(denied.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "RATE_LIMITED");

        let other_project = svc
            .oneshot(sdk_request(Uuid::new_v4(), "198.51.100.3"))
            .await
            .unwrap();
        assert_eq!(other_project.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_policy_keys_by_client_ip() {
        let container = container(|c| c.admission.public.limit = 1);
        let svc = container.admission_layer(Policy::Public).layer(handler());

        let first = svc.clone().oneshot(public_request("203.0.113.9")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()["x-ratelimit-remaining"], "0");

        let second = svc.clone().oneshot(public_request("203.0.113.9")).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        let neighbour = svc.oneshot(public_request("203.0.113.10")).await.unwrap();
        assert_eq!(neighbour.status(), StatusCode::OK);

        assert_eq!(container.admission(Policy::Public).tracked_keys(), 2);
        assert!(container
            .admission(Policy::Public)
            .window("ip:203.0.113.9")
            .is_some());
    }

    #[tokio::test]
    async fn test_disabled_policy_admits_everything() {
        let container = container(|c| {
            c.admission.authenticated.limit = 1;
            c.admission.authenticated.enabled = false;
        });
        let svc = container
            .admission_layer(Policy::Authenticated)
            .layer(handler());
        let user = Uuid::new_v4();

        for _ in 0..5 {
            let mut req = public_request("192.0.2.1");
            req.extensions_mut().insert(CallerIdentity::user(user));
            let response = svc.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(container.admission(Policy::Authenticated).tracked_keys(), 0);
    }
}
