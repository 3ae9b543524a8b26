use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use actix_http::Request;
use undercover_backend::middleware::request_trace::RequestTrace;
use undercover_backend::routes;
use undercover_backend::state::app_state::AppState;

/// Production routes and middleware over `state`.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
