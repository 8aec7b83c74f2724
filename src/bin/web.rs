//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, INACTIVITY_HOURS.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get,
    middleware::Logger,
    post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use scoreboard_web::{
    advance_round, parse_score_json, rank_teams, record_score, restart_competition, standings_csv,
    start_competition, Competition, CompetitionConfig, CompetitionId, CompetitionKind, GameMatch,
    MatchCount, MatchId, ServerConfig, Side, Team, TeamId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-competition entry: competition data + last activity time (for auto-cleanup).
struct CompetitionEntry {
    competition: Competition,
    last_activity: Instant,
}

/// In-memory state: many competitions by ID. Idle entries are removed by a background task.
type AppState = Data<RwLock<HashMap<CompetitionId, CompetitionEntry>>>;

/// Session key holding the browser's current competition.
const SESSION_COMPETITION: &str = "competition_id";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateCompetitionBody {
    team_names: Vec<String>,
    #[serde(default)]
    kind: CompetitionKind,
    #[serde(default = "default_match_count")]
    match_count: u8,
    #[serde(default)]
    title: Option<String>,
}

fn default_match_count() -> u8 {
    1
}

#[derive(Deserialize)]
struct RenameTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct ScoreBody {
    side: Side,
    /// Number, numeric string, or empty/null to clear.
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Deserialize)]
struct AdvanceBody {
    round: u32,
}

/// Path segment: competition id (e.g. /api/competitions/{id})
#[derive(Deserialize)]
struct CompetitionPath {
    id: CompetitionId,
}

#[derive(Deserialize)]
struct CompetitionTeamPath {
    id: CompetitionId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct CompetitionMatchPath {
    id: CompetitionId,
    match_id: MatchId,
}

/// What the page renders: raw state plus the derived match list, bracket columns and table.
#[derive(Serialize)]
struct CompetitionView<'a> {
    competition: &'a Competition,
    visible_matches: Vec<&'a GameMatch>,
    rounds: Vec<Vec<&'a GameMatch>>,
    standings: Vec<Team>,
    champion_name: Option<&'a str>,
}

impl<'a> CompetitionView<'a> {
    fn new(competition: &'a Competition) -> Self {
        let mut standings = competition.teams.clone();
        rank_teams(&mut standings);
        Self {
            competition,
            visible_matches: competition.visible_matches(),
            rounds: competition.rounds(),
            standings,
            champion_name: competition.champion.map(|id| competition.team_name(id)),
        }
    }
}

#[derive(Serialize)]
struct ScoreResponse<'a> {
    #[serde(flatten)]
    view: CompetitionView<'a>,
    outcome: scoreboard_web::ScoreOutcome,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" }))
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "scoreboard-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a competition and generate its schedule. The id is remembered in the session.
#[post("/api/competitions")]
async fn api_create_competition(
    state: AppState,
    session: Session,
    body: Json<CreateCompetitionBody>,
) -> HttpResponse {
    let match_count = match MatchCount::try_from(body.match_count) {
        Ok(m) => m,
        Err(e) => return bad_request(e),
    };
    let config = CompetitionConfig {
        kind: body.kind,
        match_count,
    };
    let mut competition = start_competition(body.team_names.as_slice(), config);
    competition.set_title(body.title.as_deref());
    let id = competition.id;
    if let Err(e) = session.insert(SESSION_COMPETITION, id) {
        log::warn!("Could not store competition in session: {}", e);
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(CompetitionEntry {
        competition,
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(CompetitionView::new(&entry.competition))
}

/// Resume: the competition stored in this browser's session (404 if none or expired).
#[get("/api/session")]
async fn api_session_competition(state: AppState, session: Session) -> HttpResponse {
    let id = match session.get::<CompetitionId>(SESSION_COMPETITION) {
        Ok(Some(id)) => id,
        Ok(None) => return not_found(),
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(CompetitionView::new(&entry.competition))
        }
        None => {
            session.remove(SESSION_COMPETITION);
            not_found()
        }
    }
}

/// Get a competition by id. Touching it refreshes last_activity.
#[get("/api/competitions/{id}")]
async fn api_get_competition(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(CompetitionView::new(&entry.competition))
        }
        None => not_found(),
    }
}

/// Rename a team without regenerating matches.
#[put("/api/competitions/{id}/teams/{team_id}/name")]
async fn api_rename_team(
    state: AppState,
    path: Path<CompetitionTeamPath>,
    body: Json<RenameTeamBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.rename_team(path.team_id, &body.name) {
        Ok(()) => HttpResponse::Ok().json(CompetitionView::new(c)),
        Err(e) => bad_request(e),
    }
}

/// Set one side of a match score. A finished bracket round comes back as
/// `awaiting_confirmation`; the client confirms through `/advance`.
#[put("/api/competitions/{id}/matches/{match_id}/score")]
async fn api_set_score(
    state: AppState,
    path: Path<CompetitionMatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    let value = parse_score_json(&body.value);
    match record_score(c, path.match_id, body.side, value, &mut |_: u32| false) {
        Ok(outcome) => HttpResponse::Ok().json(ScoreResponse {
            view: CompetitionView::new(c),
            outcome,
        }),
        Err(e) => bad_request(e),
    }
}

/// Confirm advancement of the given bracket round.
#[post("/api/competitions/{id}/advance")]
async fn api_advance(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<AdvanceBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match advance_round(c, body.round) {
        Ok(progress) => HttpResponse::Ok().json(ScoreResponse {
            view: CompetitionView::new(c),
            outcome: scoreboard_web::ScoreOutcome::Round(progress),
        }),
        Err(e) => bad_request(e),
    }
}

/// Ranked standings table.
#[get("/api/competitions/{id}/standings")]
async fn api_standings(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.id) {
        Some(entry) => {
            let mut standings = entry.competition.teams.clone();
            rank_teams(&mut standings);
            HttpResponse::Ok().json(standings)
        }
        None => not_found(),
    }
}

/// Standings as a CSV download.
#[get("/api/competitions/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    let mut standings = entry.competition.teams.clone();
    rank_teams(&mut standings);
    match standings_csv(&standings) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"standings.csv\""))
            .body(body),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("csv error")
        }
    }
}

/// Restart: same teams and format, fresh schedule.
#[post("/api/competitions/{id}/restart")]
async fn api_restart_competition(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    restart_competition(c);
    HttpResponse::Ok().json(CompetitionView::new(c))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(HashMap::<CompetitionId, CompetitionEntry>::new()));
    let session_key = Key::generate();

    // Background task: every 30 minutes, remove competitions idle past the timeout
    let state_cleanup = state.clone();
    let timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive competition(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                session_key.clone(),
            ))
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_competition)
            .service(api_session_competition)
            .service(api_get_competition)
            .service(api_rename_team)
            .service(api_set_score)
            .service(api_advance)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_restart_competition)
            .service(Files::new("/static", "static"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
