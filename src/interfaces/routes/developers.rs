use actix_web::web;

use crate::handlers::developers;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/developers")
            .service(
                web::resource("")
                    .route(web::post().to(developers::create_developer))
            )
            .service(
                web::resource("/{developer_id}")
                    .route(web::get().to(developers::get_developer))
                    .route(web::patch().to(developers::update_developer))
                    .route(web::delete().to(developers::delete_developer))
            )
            .service(
                web::resource("/{developer_id}/infos")
                    .route(web::post().to(developers::create_developer_info))
            )
    );
}
