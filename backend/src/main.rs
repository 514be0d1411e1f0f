use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::{build_state, configure_app};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| io::Error::other(e.to_string()))?;
    let (host, port) = config.bind_address();
    let state = build_state(config).map_err(|e| io::Error::other(e.to_string()))?;

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_app)
    })
    .bind((host, port))?
    .run()
    .await
}
