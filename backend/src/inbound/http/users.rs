//! User enrichment API handlers.
//!
//! ```text
//! GET /api/v1/users/enriched
//! POST /api/v1/users/enrich {"ids":[1,2,3]}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ResponseDto;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/users/enrich`.
///
/// Example JSON:
/// `{"ids":[1,2,3]}`
#[derive(Debug, Deserialize, Serialize)]
pub struct EnrichUsersRequest {
    /// User ids to enrich, in the order they should be returned.
    pub ids: Vec<i64>,
}

/// Enrich every user listed by the upstream directory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_enrichment::inbound::http::users::list_enriched_users;
///
/// let app = App::new().service(list_enriched_users);
/// ```
#[get("/users/enriched")]
pub async fn list_enriched_users(state: web::Data<HttpState>) -> ApiResult<web::Json<ResponseDto>> {
    let response = state.enrichment.enrich_listed_users().await?;
    Ok(web::Json(response))
}

/// Enrich the requested users. Per-user failures are reported in the
/// response's `error` list; the call itself always succeeds.
#[post("/users/enrich")]
pub async fn enrich_users(
    state: web::Data<HttpState>,
    payload: web::Json<EnrichUsersRequest>,
) -> ApiResult<web::Json<ResponseDto>> {
    let EnrichUsersRequest { ids } = payload.into_inner();
    let response = state.enrichment.enrich_users(&ids).await;
    Ok(web::Json(response))
}
