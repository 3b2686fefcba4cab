use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::{
        developer::{NewDeveloper, UpdateDeveloper},
        developer_info::NewDeveloperInfo,
    },
    errors::AppError,
    use_cases::context::RequestContext,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_developer(
    state: web::Data<AppState>,
    data: web::Json<NewDeveloper>,
) -> Result<impl Responder, AppError> {
    let developer_handler = &state.developer_handler;
    let data = data.into_inner();

    data.validate()?;
    developer_handler.ensure_email_available(Some(&data.email), None).await?;

    let developer = developer_handler.create_developer(data).await?;
    Ok(HttpResponse::Created().json(developer))
}

#[instrument(skip(state))]
pub async fn get_developer(
    developer_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let developer_handler = &state.developer_handler;
    let mut ctx = RequestContext::new();

    developer_handler.ensure_developer_exists(developer_id.into_inner(), &mut ctx).await?;

    let profile = developer_handler.get_developer_profile(&ctx).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// The body is extracted as a `Result` so the existence check runs first.
#[instrument(skip(state, data))]
pub async fn update_developer(
    developer_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: Result<web::Json<UpdateDeveloper>, actix_web::Error>,
) -> actix_web::Result<impl Responder> {
    let developer_handler = &state.developer_handler;
    let developer_id = developer_id.into_inner();
    let mut ctx = RequestContext::new();

    developer_handler.ensure_developer_exists(developer_id, &mut ctx).await?;
    let data = data?.into_inner();
    data.validate().map_err(AppError::from)?;
    developer_handler.ensure_email_available(data.email.as_deref(), Some(developer_id)).await?;

    let developer = developer_handler.update_developer(&ctx, data).await?;
    Ok(HttpResponse::Ok().json(developer))
}

#[instrument(skip(state))]
pub async fn delete_developer(
    developer_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let developer_handler = &state.developer_handler;
    let mut ctx = RequestContext::new();

    developer_handler.ensure_developer_exists(developer_id.into_inner(), &mut ctx).await?;

    developer_handler.delete_developer(&ctx).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, data))]
pub async fn create_developer_info(
    developer_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: Result<web::Json<NewDeveloperInfo>, actix_web::Error>,
) -> actix_web::Result<impl Responder> {
    let developer_handler = &state.developer_handler;
    let developer_id = developer_id.into_inner();
    let mut ctx = RequestContext::new();

    developer_handler.ensure_developer_exists(developer_id, &mut ctx).await?;
    developer_handler.ensure_developer_info_absent(developer_id).await?;
    let data = data?.into_inner();
    developer_handler.ensure_preferred_os_supported(&data)?;

    let info = developer_handler.create_developer_info(&ctx, data).await?;
    Ok(HttpResponse::Created().json(info))
}
