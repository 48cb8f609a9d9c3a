use serde::Deserialize;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use game_types::{CreateUserRequest, GameError, GameHistory, MakeMoveRequest, NewGameRequest};

pub mod config;
pub mod reminder;
pub mod service;

use crate::service::GameService;

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

pub fn create_routes(
    service: Arc<GameService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map({
        let service = service.clone();
        move || service.clone()
    });

    // Health check endpoint
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_user = warp::path!("user")
        .and(warp::post())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_create_user);

    let new_game = warp::path!("game")
        .and(warp::post())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_new_game);

    let get_game = warp::path!("game" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_game);

    let cancel_game = warp::path!("game" / String / "cancel")
        .and(warp::post())
        .and(service_filter.clone())
        .and_then(handle_cancel_game);

    let make_move = warp::path!("game" / String / "move")
        .and(warp::put())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_make_move);

    let game_history = warp::path!("game" / String / "history")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_game_history);

    let user_games = warp::path!("user" / String / "games")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_games);

    let scores = warp::path!("scores")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_scores);

    let user_scores = warp::path!("scores" / "user" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_scores);

    let high_scores = warp::path!("leaderboard" / "wins")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(service_filter.clone())
        .and_then(handle_high_scores);

    let user_rankings = warp::path!("leaderboard" / "moves")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(service_filter.clone())
        .and_then(handle_user_rankings);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT"]);

    health
        .or(create_user)
        .or(new_game)
        .or(game_history)
        .or(cancel_game)
        .or(make_move)
        .or(get_game)
        .or(user_games)
        .or(user_scores)
        .or(scores)
        .or(high_scores)
        .or(user_rankings)
        .with(cors)
        .with(warp::log("fifteen_puzzle"))
}

/// Map a failure to a status code and JSON error body. Non-game failures
/// (storage, decoding) and invariant breaches are logged and surfaced as
/// opaque 500s; everything else is the caller's mistake.
fn error_reply(err: anyhow::Error) -> WithStatus<Json> {
    let game_err = match err.downcast::<GameError>() {
        Ok(game_err) => game_err,
        Err(other) => {
            tracing::error!("request failed: {other:#}");
            return warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "internal server error"
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            );
        }
    };

    let status = match &game_err {
        GameError::DuplicateUser { .. } => StatusCode::CONFLICT,
        GameError::UserNotFound { .. } | GameError::GameNotFound { .. } => StatusCode::NOT_FOUND,
        GameError::GameAlreadyEnded
        | GameError::InvalidDirection { .. }
        | GameError::IllegalMove
        | GameError::InvalidKey { .. } => StatusCode::BAD_REQUEST,
        GameError::CorruptState { .. } => {
            tracing::error!("invariant breach surfaced at request boundary: {game_err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": game_err.to_string()
        })),
        status,
    )
}

fn ok_reply<T: serde::Serialize>(value: &T) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(value), StatusCode::OK)
}

async fn handle_create_user(
    request: CreateUserRequest,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.create_user(&request.user_name, request.email).await {
        Ok(user) => Ok(warp::reply::with_status(
            warp::reply::json(&user),
            StatusCode::CREATED,
        )),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_new_game(
    request: NewGameRequest,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.new_game(&request.user_name).await {
        Ok(snapshot) => Ok(warp::reply::with_status(
            warp::reply::json(&snapshot),
            StatusCode::CREATED,
        )),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_get_game(
    key: String,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.get_game(&key).await {
        Ok(snapshot) => Ok(ok_reply(&snapshot)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_cancel_game(
    key: String,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.cancel_game(&key).await {
        Ok(snapshot) => Ok(ok_reply(&snapshot)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_make_move(
    key: String,
    request: MakeMoveRequest,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.make_move(&key, request.direction).await {
        Ok(snapshot) => Ok(ok_reply(&snapshot)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_game_history(
    key: String,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.game_history(&key).await {
        Ok(moves) => Ok(ok_reply(&GameHistory { moves })),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_user_games(
    user_name: String,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.user_games(&user_name).await {
        Ok(snapshots) => Ok(ok_reply(&snapshots)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_scores(
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.scores().await {
        Ok(entries) => Ok(ok_reply(&entries)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_user_scores(
    user_name: String,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.user_scores(&user_name).await {
        Ok(entries) => Ok(ok_reply(&entries)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_high_scores(
    query: LeaderboardQuery,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.high_scores(query.limit).await {
        Ok(users) => Ok(ok_reply(&users)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_user_rankings(
    query: LeaderboardQuery,
    service: Arc<GameService>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match service.user_rankings(query.limit).await {
        Ok(users) => Ok(ok_reply(&users)),
        Err(err) => Ok(error_reply(err)),
    }
}
