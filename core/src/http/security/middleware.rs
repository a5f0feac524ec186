//! Security middleware for Actix Web.
//!
//! # Spring Equivalent
//! `SecurityFilterChain` / `FilterChainProxy`

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use tracing::debug;

use crate::http::security::config::{AuthenticationEntryPoint, Authenticator};
use crate::http::security::entry_point::LoginUrlEntryPoint;
use crate::http::security::form_login::FormLoginConfig;
use crate::http::security::policy::AuthorizationPolicy;

/// Security middleware factory.
///
/// # Spring Equivalent
/// `SecurityFilterChain`
///
/// # Example
/// ```ignore
/// App::new().wrap(
///     SecurityTransform::new(policy.clone())
///         .authenticator(authenticator.clone())
///         .entry_point(LoginUrlEntryPoint::new("/login"))
///         .form_login(FormLoginConfig::new())
/// )
/// ```
///
/// Build it inside the `HttpServer::new` factory: it holds `Rc`s and is
/// not `Send`. The policy itself is `Arc`-backed and cheap to clone in.
pub struct SecurityTransform {
    policy: AuthorizationPolicy,
    authenticator: Option<Rc<dyn Authenticator>>,
    entry_point: Rc<dyn AuthenticationEntryPoint>,
    form_login: Option<FormLoginConfig>,
}

impl SecurityTransform {
    /// Creates the filter chain. Without further configuration no request
    /// is ever authenticated, so only `PUBLIC` paths get through, and the
    /// rest are redirected to `/login`.
    pub fn new(policy: AuthorizationPolicy) -> Self {
        SecurityTransform {
            policy,
            authenticator: None,
            entry_point: Rc::new(LoginUrlEntryPoint::default()),
            form_login: None,
        }
    }

    pub fn authenticator<A: Authenticator + 'static>(mut self, authenticator: A) -> Self {
        self.authenticator = Some(Rc::new(authenticator));
        self
    }

    /// What unauthenticated requests to protected paths receive.
    pub fn entry_point<E: AuthenticationEntryPoint + 'static>(mut self, entry_point: E) -> Self {
        self.entry_point = Rc::new(entry_point);
        self
    }

    /// Lets the form-login URLs through. When the entry point redirects to
    /// a login page, the original request is saved for after login.
    pub fn form_login(mut self, config: FormLoginConfig) -> Self {
        self.form_login = Some(config);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityTransform
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            policy: self.policy.clone(),
            authenticator: self.authenticator.clone(),
            entry_point: Rc::clone(&self.entry_point),
            form_login: self.form_login.clone().map(Rc::new),
            service: Rc::new(service),
        })
    }
}

/// Security middleware service.
///
/// # Spring Equivalent
/// `FilterChainProxy`
pub struct SecurityService<S> {
    policy: AuthorizationPolicy,
    authenticator: Option<Rc<dyn Authenticator>>,
    entry_point: Rc<dyn AuthenticationEntryPoint>,
    form_login: Option<Rc<FormLoginConfig>>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Step 1: Authenticate - extract user from request
        let user = self
            .authenticator
            .as_ref()
            .and_then(|auth| auth.get_user(&req));
        let authenticated = user.is_some();

        // Step 2: Store user in request extensions for the extractors
        if let Some(u) = user {
            req.extensions_mut().insert(u);
        }

        // Step 3: Login, processing and logout URLs bypass authorization
        let path = req.path().to_string();
        let is_login_url = self
            .form_login
            .as_ref()
            .is_some_and(|form_login| form_login.is_login_url(&path));

        // Step 4: First-match policy decision
        let allowed = is_login_url || {
            let decision = self.policy.decide(&path);
            debug!(
                path = %path,
                rule = decision.matched,
                requirement = %decision.requirement,
                authenticated,
                "authorization decision"
            );
            decision.requirement.is_public() || authenticated
        };

        if allowed {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        // Step 5: Start authentication
        if let Some(form_login) = &self.form_login {
            if self.entry_point.saves_request() {
                form_login.save_request(&req.get_session(), req.method(), &saved_target(&req));
            }
        }
        let response = self.entry_point.commence(&req);
        Box::pin(async move { Ok(req.into_response(response.map_into_right_body())) })
    }
}

/// Origin-relative target of the request. Scheme and authority of an
/// absolute-form URI are dropped so the post-login redirect stays on site.
fn saved_target(req: &ServiceRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|target| target.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}
