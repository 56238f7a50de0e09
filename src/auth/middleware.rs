use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use chrono::Utc;
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::filter::IdentityFilter;

/// Attaches a `RequestContext` to every request and always forwards it.
///
/// The middleware never rejects a request itself: routes decide whether they
/// accept anonymous callers (see `CurrentAccount`).
pub struct IdentityMiddleware {
    filter: IdentityFilter,
}

impl IdentityMiddleware {
    pub fn new(filter: IdentityFilter) -> Self {
        Self { filter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            filter: self.filter.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    filter: IdentityFilter,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
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
        let service = Rc::clone(&self.service);
        let filter = self.filter.clone();

        Box::pin(async move {
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let context = filter.resolve(authorization.as_deref(), Utc::now()).await;
            req.extensions_mut().insert(context);

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::context::RequestContext;
    use crate::auth::token::TokenCodec;
    use crate::models::Account;
    use crate::store::{AccountStore, MemoryStore};
    use actix_web::{test, web, App, HttpResponse};
    use chrono::Duration;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn whoami(context: RequestContext) -> HttpResponse {
        match context.principal() {
            Some(account) => HttpResponse::Ok().body(account.email.clone()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[actix_rt::test]
    async fn test_middleware_never_blocks_the_request() {
        let tokens = Arc::new(TokenCodec::new(b"middleware_secret_0123456789abcdef", Duration::seconds(60)).unwrap());
        let store = Arc::new(MemoryStore::new());
        store
            .save(Account::new(Uuid::new_v4(), "jhondoe@test.in", "hash"))
            .await
            .unwrap();
        let filter = IdentityFilter::new(tokens.clone(), store);

        let app = test::init_service(
            App::new()
                .wrap(IdentityMiddleware::new(filter))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");

        let token = tokens.generate_token("jhondoe@test.in").unwrap();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "jhondoe@test.in");

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, "anonymous");
    }
}
