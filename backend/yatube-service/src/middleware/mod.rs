/// HTTP middleware utilities for yatube-service
///
/// Provides session identity resolution and request metrics. Identity is
/// never required at this layer: a request without a usable token simply
/// proceeds as `Caller::Anonymous`, and handlers decide what that means.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::http::HTTP_REQUEST_DURATION_SECONDS;
use crate::models::AuthorRef;
use crate::session::SessionKeys;

// =====================================================================
// Session identity
// =====================================================================

/// Per-request identity stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    Authenticated(AuthorRef),
    #[default]
    Anonymous,
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated(_))
    }

    pub fn author(&self) -> Option<&AuthorRef> {
        match self {
            Caller::Authenticated(author) => Some(author),
            Caller::Anonymous => None,
        }
    }

    pub fn is(&self, author: &AuthorRef) -> bool {
        self.author().is_some_and(|me| me.id == author.id)
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(req.extensions().get::<Caller>().cloned().unwrap_or_default()))
    }
}

/// Actix middleware that resolves the session cookie or Bearer token into a `Caller`.
#[derive(Clone)]
pub struct SessionMiddleware {
    keys: Arc<SessionKeys>,
    cookie_name: Arc<str>,
}

impl SessionMiddleware {
    pub fn new(keys: SessionKeys, cookie_name: &str) -> Self {
        Self {
            keys: Arc::new(keys),
            cookie_name: Arc::from(cookie_name),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            keys: self.keys.clone(),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    keys: Arc<SessionKeys>,
    cookie_name: Arc<str>,
}

impl<S> SessionMiddlewareService<S> {
    fn token(&self, req: &ServiceRequest) -> Option<String> {
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        bearer.or_else(|| req.cookie(&self.cookie_name).map(|c| c.value().to_string()))
    }

    fn resolve(&self, req: &ServiceRequest) -> Caller {
        let Some(token) = self.token(req) else {
            return Caller::Anonymous;
        };

        match self.keys.verify(&token) {
            Ok(claims) => match claims.author() {
                Some(author) => Caller::Authenticated(author),
                None => {
                    tracing::debug!(sub = %claims.sub, "session subject is not an author id");
                    Caller::Anonymous
                }
            },
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unusable session token");
                Caller::Anonymous
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let caller = self.resolve(&req);
        req.extensions_mut().insert(caller);

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            let (route, status) = match &res {
                Ok(res) => (
                    res.request()
                        .match_pattern()
                        .unwrap_or_else(|| "unmatched".to_string()),
                    res.status().as_u16(),
                ),
                Err(err) => (
                    "unmatched".to_string(),
                    err.as_response_error().status_code().as_u16(),
                ),
            };

            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route, &status.to_string()])
                .observe(elapsed.as_secs_f64());
            tracing::debug!(%method, %path, status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
