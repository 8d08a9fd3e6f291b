use super::arena::Arena;
use super::bridge;
use crate::persistence::Store;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use std::sync::Arc;

struct AppState {
    arena: Arc<Arena>,
    store: Arc<dyn Store>,
}

pub struct Server;

impl Server {
    pub async fn run(store: Arc<dyn Store>) -> Result<(), std::io::Error> {
        let state = web::Data::new(AppState { arena: Arc::new(Arena::default()), store });
        log::info!("starting hosting server");
        let reaper = state.arena.clone();
        actix_web::rt::spawn(async move {
            let mut tick = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                tick.tick().await;
                reaper.reap_trivia().await;
            }
        });
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/crossword/{date}", web::get().to(enter_crossword))
                .route("/trivia", web::get().to(enter_trivia))
                .route("/calendar", web::get().to(enter_calendar))
        })
        .workers(4)
        .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
        .run()
        .await
    }
}

async fn enter_crossword(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let date = path.into_inner();
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            match bridge::bridge_crossword(state.arena.clone(), state.store.clone(), date, session, stream).await {
                Ok(()) => response.map_into_left_body(),
                Err(e) => HttpResponse::NotFound().body(e.to_string()).map_into_right_body(),
            }
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()).map_into_right_body(),
    }
}

async fn enter_calendar(state: web::Data<AppState>, body: web::Payload, req: HttpRequest) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match bridge::bridge_calendar(state.arena.clone(), session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::InternalServerError().body(e.to_string()).map_into_right_body(),
        },
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()).map_into_right_body(),
    }
}

async fn enter_trivia(
    state: web::Data<AppState>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            match bridge::bridge_trivia(state.arena.clone(), state.store.clone(), session, stream).await {
                Ok(()) => response.map_into_left_body(),
                Err(e) => HttpResponse::NotFound().body(e.to_string()).map_into_right_body(),
            }
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()).map_into_right_body(),
    }
}
