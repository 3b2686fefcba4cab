use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::{
        project::{NewProject, UpdateProject},
        technology::AttachTechnology,
    },
    errors::AppError,
    use_cases::context::RequestContext,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn create_project(
    state: web::Data<AppState>,
    data: web::Json<NewProject>,
) -> Result<impl Responder, AppError> {
    let project_handler = &state.project_handler;
    let data = data.into_inner();

    data.validate()?;
    project_handler.ensure_project_developer_exists(Some(data.developer_id)).await?;

    let project = project_handler.create_project(data).await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(state))]
pub async fn get_project(
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project_handler = &state.project_handler;
    let mut ctx = RequestContext::new();

    project_handler.ensure_project_exists(project_id.into_inner(), &mut ctx).await?;

    let rows = project_handler.get_project_with_technologies(&ctx).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[instrument(skip(state, data))]
pub async fn update_project(
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: Result<web::Json<UpdateProject>, actix_web::Error>,
) -> actix_web::Result<impl Responder> {
    let project_handler = &state.project_handler;
    let mut ctx = RequestContext::new();

    project_handler.ensure_project_exists(project_id.into_inner(), &mut ctx).await?;
    let data = data?.into_inner();
    data.validate().map_err(AppError::from)?;
    project_handler.ensure_project_developer_exists(data.developer_id).await?;

    let project = project_handler.update_project(&ctx, data).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(state))]
pub async fn delete_project(
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project_handler = &state.project_handler;
    let mut ctx = RequestContext::new();

    project_handler.ensure_project_exists(project_id.into_inner(), &mut ctx).await?;

    project_handler.delete_project(&ctx).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body errors surface only after the project lookup.
#[instrument(skip(state, data))]
pub async fn attach_technology(
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: Result<web::Json<AttachTechnology>, actix_web::Error>,
) -> actix_web::Result<impl Responder> {
    let project_handler = &state.project_handler;
    let mut ctx = RequestContext::new();

    project_handler.ensure_project_exists(project_id.into_inner(), &mut ctx).await?;
    let AttachTechnology { name } = data?.into_inner();
    project_handler.ensure_technology_attachable(&name, &mut ctx).await?;

    let association = project_handler.attach_technology(&ctx).await?;
    Ok(HttpResponse::Created().json(association))
}

#[instrument(skip(state))]
pub async fn detach_technology(
    path: web::Path<(i32, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project_handler = &state.project_handler;
    let (project_id, technology_name) = path.into_inner();
    let mut ctx = RequestContext::new();

    project_handler.ensure_project_exists(project_id, &mut ctx).await?;
    project_handler.ensure_technology_detachable(&technology_name, &mut ctx).await?;

    project_handler.detach_technology(&ctx).await?;
    Ok(HttpResponse::NoContent().finish())
}
