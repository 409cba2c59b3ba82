//! Service entry-point: wires the directory adapter, the enrichment service,
//! and the REST endpoints.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_enrichment::domain::UserEnrichmentService;
use user_enrichment::inbound::http::state::HttpState;
use user_enrichment::inbound::http::users::{enrich_users, list_enriched_users};
use user_enrichment::outbound::directory::HttpRecordSource;
use user_enrichment::settings::EnrichmentSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = EnrichmentSettings::load_from_iter(std::env::args_os())
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let base_url = settings.base_url().map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let config = settings.enrichment_config().map_err(io::Error::other)?;

    let source = HttpRecordSource::new(base_url.clone(), settings.request_timeout())
        .map_err(|error| io::Error::other(format!("build directory client: {error}")))?;
    let service = UserEnrichmentService::new(Arc::new(source), config);
    let state = web::Data::new(HttpState::new(Arc::new(service)));

    info!(%bind_addr, directory = %base_url, "starting user enrichment server");
    HttpServer::new(move || build_app(state.clone()))
        .bind(bind_addr)?
        .run()
        .await
}

fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(list_enriched_users)
        .service(enrich_users);

    App::new().app_data(state).service(api)
}
