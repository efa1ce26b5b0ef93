use actix_web::{
    HttpResponse, Responder, ResponseError,
    body::{BoxBody, MessageBody},
    delete,
    dev::{HttpServiceFactory, ServiceRequest, ServiceResponse},
    get,
    http::{StatusCode, header},
    middleware::Next,
    post, route, web,
};
use payloads::{GuildId, RoleId};

use crate::mock::{MockBackend, MockError, RecordedRequest};

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(current_user)
        .service(bot_user)
        .service(guilds)
        .service(guild_ranks)
        .service(join_rank)
        .service(leave_rank)
        .service(auth_redirect)
        .service(auth_clear)
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        // the dashboard treats 404 on the current user as "not signed in"
        match self {
            Self::NotSignedIn | Self::GuildNotFound | Self::RoleNotFound => {
                StatusCode::NOT_FOUND
            }
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// Applies the per-path overrides configured on the backend, and records
/// every request.
pub async fn apply_overrides(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let Some(backend) = req.app_data::<web::Data<MockBackend>>().cloned()
    else {
        return Ok(next.call(req).await?.map_into_boxed_body());
    };
    let path = req
        .path()
        .strip_prefix("/api/")
        .unwrap_or(req.path())
        .to_string();
    backend.record(RecordedRequest {
        method: req.method().to_string(),
        path: path.clone(),
        accept: req
            .headers()
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    });

    let Some(overrides) = backend.override_for(&path) else {
        return Ok(next.call(req).await?.map_into_boxed_body());
    };
    if let Some(delay) = overrides.delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = overrides.status {
        let status = StatusCode::from_u16(status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let response = HttpResponse::build(status).body("forced status");
        return Ok(req.into_response(response).map_into_boxed_body());
    }
    if overrides.malformed {
        let response = HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body("{\"id\": ");
        return Ok(req.into_response(response).map_into_boxed_body());
    }
    Ok(next.call(req).await?.map_into_boxed_body())
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[get("/me/user")]
pub async fn current_user(
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    Ok(HttpResponse::Ok().json(backend.current_user()?))
}

#[get("/bot")]
pub async fn bot_user(backend: web::Data<MockBackend>) -> HttpResponse {
    HttpResponse::Ok().json(backend.bot())
}

#[get("/me/guilds")]
pub async fn guilds(
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    Ok(HttpResponse::Ok().json(backend.guilds()?))
}

#[get("/me/guilds/{guild_id}/ranks")]
pub async fn guild_ranks(
    backend: web::Data<MockBackend>,
    path: web::Path<String>,
) -> Result<HttpResponse, MockError> {
    let guild_id = GuildId(path.into_inner());
    Ok(HttpResponse::Ok().json(backend.ranks(&guild_id)?))
}

#[post("/me/guilds/{guild_id}/ranks/{role_id}")]
pub async fn join_rank(
    backend: web::Data<MockBackend>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, MockError> {
    let (guild_id, role_id) = path.into_inner();
    let ranks =
        backend.set_membership(&GuildId(guild_id), &RoleId(role_id), true)?;
    tracing::debug!("joined rank");
    Ok(HttpResponse::Ok().json(ranks))
}

#[delete("/me/guilds/{guild_id}/ranks/{role_id}")]
pub async fn leave_rank(
    backend: web::Data<MockBackend>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, MockError> {
    let (guild_id, role_id) = path.into_inner();
    let ranks =
        backend.set_membership(&GuildId(guild_id), &RoleId(role_id), false)?;
    tracing::debug!("left rank");
    Ok(HttpResponse::Ok().json(ranks))
}

/// Stands in for the Discord OAuth round trip: signs the dataset user in
/// and sends the browser back to the app.
#[route("/auth/redirect", method = "GET", method = "POST")]
pub async fn auth_redirect(backend: web::Data<MockBackend>) -> HttpResponse {
    backend.sign_in();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

#[route("/auth/clear", method = "GET", method = "POST")]
pub async fn auth_clear(backend: web::Data<MockBackend>) -> HttpResponse {
    backend.sign_out();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}
