use actix_web::web;

mod developers;
mod projects;
mod system;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.configure(system::config_routes)
        .configure(developers::config_routes)
        .configure(projects::config_routes);
}
