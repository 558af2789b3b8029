use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::auth::sessions;
use crate::config::Config;
use crate::db::suggestions::{self, NewSuggestion, SuggestionStatus};
use crate::db::users::User;
use crate::db::{favorites, Database};
use crate::domain::catalog::{
    compute_stats, filter_and_sort, filter_options, find_program, parse_ids, select_ids,
};
use crate::domain::{run_query, CatalogQuery, Program};
use crate::errors::ServerError;
use crate::exports;
use crate::repository::ProgramRepository;
use crate::responses::download::XLSX_CONTENT_TYPE;
use crate::responses::{
    attachment_response, html_error_response, html_response, json_error_response, json_response,
    redirect, redirect_with_cookie, ApiEnvelope, ResultResp,
};
use crate::templates::pages;
use astra::{Body, Request, Response, ResponseBuilder};
use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;

/// Everything a request handler may touch. Built once in `main` and shared by the workers.
pub struct AppState {
    pub db: Database,
    pub repo: Box<dyn ProgramRepository>,
    pub config: Config,
    pub magic: MagicLinkService,
}

impl AppState {
    pub fn new(config: Config, db: Database, repo: Box<dyn ProgramRepository>) -> Self {
        let magic = MagicLinkService::new(MagicLinkConfig {
            admin_emails: config.admin_emails.clone(),
            ..Default::default()
        });
        Self {
            db,
            repo,
            config,
            magic,
        }
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Server entry point: turns errors into pages (or JSON envelopes under `/api`) and logs the request.
pub fn respond(req: Request, state: &AppState) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = match handle(req, state) {
        Ok(resp) => resp,
        Err(err) if path.starts_with("/api/") => json_error_response(err),
        Err(err) => html_error_response(err),
    };

    log::info!(
        "{method} {path} -> {} ({} ms)",
        resp.status().as_u16(),
        started.elapsed().as_millis()
    );
    resp
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let pairs = query_pairs(&req);
    let query: HashMap<String, String> = pairs.iter().cloned().collect();
    let cookie_token = session_token(&req);
    let viewer = match &cookie_token {
        Some(token) => state
            .db
            .with_conn(|conn| sessions::load_session_user(conn, token, now_unix()))?,
        None => None,
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => programs_listing(state, &query, viewer.as_ref()),

        // JSON API
        ("GET", ["api", "programs"]) => {
            let programs = state.repo.load_programs()?;
            json_response(200, &ApiEnvelope::programs(programs.iter().collect()))
        }
        ("GET", ["api", "programs", "search"]) => api_search(state, &query),
        ("GET", ["api", "programs", "filters"]) => {
            let programs = state.repo.load_programs()?;
            json_response(200, &ApiEnvelope::data(&filter_options(&programs))?)
        }
        ("GET", ["api", "programs", "stats"]) => {
            let programs = state.repo.load_programs()?;
            json_response(200, &ApiEnvelope::data(&compute_stats(&programs))?)
        }
        ("GET", ["api", "programs", id]) => {
            let programs = state.repo.load_programs()?;
            let program = find_program(&programs, id).ok_or(ServerError::NotFound)?;
            json_response(200, &ApiEnvelope::data(program)?)
        }
        ("GET", ["api", "favorites"]) => {
            let user = viewer.ok_or_else(|| ServerError::Unauthorized("sign in first".into()))?;
            let programs = state.repo.load_programs()?;
            let saved = favorite_programs(state, &user, &programs)?;
            json_response(200, &ApiEnvelope::programs(saved))
        }

        // Exports
        ("GET", ["export", format]) => export(state, &query, &pairs, format),

        // Auth
        ("GET", ["login"]) => html_response(pages::login_page()),
        ("POST", ["auth", "request-link"]) => {
            let form = read_form(req)?;
            request_link(state, form.get("email").map(String::as_str).unwrap_or(""))
        }
        ("GET", ["auth", "magic"]) => {
            redeem_link(state, query.get("token").map(String::as_str).unwrap_or(""))
        }
        ("POST", ["logout"]) => {
            if let Some(token) = &cookie_token {
                state
                    .db
                    .with_conn(|conn| sessions::revoke_session(conn, token, now_unix()))?;
            }
            redirect_with_cookie("/", &sessions::expired_session_cookie())
        }

        // Favorites
        ("GET", ["favorites"]) => {
            let Some(user) = viewer else {
                return redirect("/login");
            };
            let programs = state.repo.load_programs()?;
            let saved = favorite_programs(state, &user, &programs)?;
            html_response(pages::favorites_page(&user, &saved))
        }
        ("POST", ["favorites", id]) => {
            let Some(user) = viewer else {
                return redirect("/login");
            };
            let id = id.to_string();
            let form = read_form(req)?;
            toggle_favorite(state, &user, &id)?;
            redirect(safe_next(form.get("next").map(String::as_str)))
        }

        // Suggestions
        ("GET", ["suggest"]) => html_response(pages::suggest_page(viewer.as_ref(), None)),
        ("POST", ["suggest"]) => {
            let form = read_form(req)?;
            submit_suggestion(state, viewer.as_ref(), form)
        }

        // Moderation
        ("GET", ["admin"]) => {
            let Some(user) = viewer else {
                return redirect("/login");
            };
            admin_queue(state, &require_admin(user)?)
        }
        ("POST", ["admin", "suggestions", id, action]) => {
            let user = require_admin(
                viewer.ok_or_else(|| ServerError::Unauthorized("sign in first".into()))?,
            )?;
            review_suggestion(state, &user, id, action)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn query_pairs(req: &Request) -> Vec<(String, String)> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn session_token(req: &Request) -> Option<String> {
    req.headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(sessions::session_token_from_cookies)
        .map(str::to_string)
}

fn read_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = String::new();
    req.into_body()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable request body: {e}")))?;
    Ok(url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect())
}

/// Only same-site relative paths are followed.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") => n,
        _ => "/favorites",
    }
}

fn require_admin(user: User) -> Result<User, ServerError> {
    if user.is_admin {
        Ok(user)
    } else {
        Err(ServerError::Forbidden("moderators only".into()))
    }
}

fn programs_listing(
    state: &AppState,
    params: &HashMap<String, String>,
    viewer: Option<&User>,
) -> ResultResp {
    let programs = state.repo.load_programs()?;
    let mut query = CatalogQuery::from_params(params, state.config.page_size);
    let mut page = run_query(&programs, &query);
    if page.page_index > page.total_pages {
        query.page.page_index = page.total_pages;
        page = run_query(&programs, &query);
    }

    let favorite_ids = match viewer {
        Some(user) => state
            .db
            .with_conn(|conn| favorites::list_favorite_ids(conn, user.id))?,
        None => Vec::new(),
    };
    let options = filter_options(&programs);

    html_response(pages::programs_page(&pages::ProgramsVm {
        viewer,
        query: &query,
        page: &page,
        options: &options,
        favorites: &favorite_ids,
    }))
}

fn api_search(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let programs = state.repo.load_programs()?;
    let query = CatalogQuery::from_params(params, state.config.page_size);
    let page = run_query(&programs, &query);
    let envelope = ApiEnvelope::programs(page.items.iter().collect()).with_data(&page.meta())?;
    json_response(200, &envelope)
}

fn export(
    state: &AppState,
    params: &HashMap<String, String>,
    pairs: &[(String, String)],
    format: &str,
) -> ResultResp {
    let programs = state.repo.load_programs()?;
    let query = CatalogQuery::from_params(params, state.config.page_size);
    let ids: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| k == "ids")
        .flat_map(|(_, v)| parse_ids(Some(v)))
        .collect();
    let selected = select_ids(filter_and_sort(&programs, &query.filter, query.sort), &ids);

    let stamp = chrono::Local::now().format("%Y-%m-%d");
    log::info!("exporting {} programs as {format}", selected.len());

    match format {
        "csv" => attachment_response(
            exports::programs_to_csv(&selected)?.into_bytes(),
            mime::TEXT_CSV_UTF_8.as_ref(),
            &format!("summer-programs-{stamp}.csv"),
        ),
        "json" => attachment_response(
            exports::programs_to_json(&selected)?.into_bytes(),
            mime::APPLICATION_JSON.as_ref(),
            &format!("summer-programs-{stamp}.json"),
        ),
        "xlsx" => attachment_response(
            exports::programs_to_xlsx(&selected)?,
            XLSX_CONTENT_TYPE,
            &format!("summer-programs-{stamp}.xlsx"),
        ),
        "print" => ResponseBuilder::new()
            .status(200)
            .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
            .body(Body::from(exports::programs_to_print_html(&selected)))
            .map_err(|_| ServerError::InternalError),
        _ => Err(ServerError::NotFound),
    }
}

fn favorite_programs<'a>(
    state: &AppState,
    user: &User,
    programs: &'a [Program],
) -> Result<Vec<&'a Program>, ServerError> {
    let ids = state
        .db
        .with_conn(|conn| favorites::list_favorite_ids(conn, user.id))?;
    Ok(ids
        .iter()
        .filter_map(|id| find_program(programs, id))
        .collect())
}

fn toggle_favorite(state: &AppState, user: &User, raw_id: &str) -> Result<bool, ServerError> {
    let programs = state.repo.load_programs()?;
    let program = find_program(&programs, raw_id).ok_or(ServerError::NotFound)?;
    let id = program.id.to_string();

    let now_favorite = state
        .db
        .with_conn(|conn| favorites::toggle_favorite(conn, user.id, &id, now_unix()))?;
    log::debug!("user {} favorite {id}: {now_favorite}", user.id);
    Ok(now_favorite)
}

fn request_link(state: &AppState, email: &str) -> ResultResp {
    let issued = state
        .db
        .with_conn(|conn| state.magic.request_link(conn, email, now_unix()))?;

    // No mail transport: the link is delivered through the log.
    log::info!("sign-in link for {}: {}", issued.email, issued.link);

    html_response(pages::check_email_page(&issued.email))
}

fn redeem_link(state: &AppState, token: &str) -> ResultResp {
    let now = now_unix();
    let session = state.db.with_conn(|conn| {
        let redeemed = state.magic.redeem(conn, token, now)?;
        sessions::create_session(conn, redeemed.user_id, now)
    })?;
    redirect_with_cookie("/", &sessions::session_cookie(&session))
}

fn submit_suggestion(
    state: &AppState,
    viewer: Option<&User>,
    mut form: HashMap<String, String>,
) -> ResultResp {
    let mut take = |key: &str| form.remove(key);
    let suggestion = NewSuggestion {
        program_name: take("program_name").unwrap_or_default(),
        organization_name: take("organization_name").unwrap_or_default(),
        website: take("website"),
        description: take("description"),
        cost_category: take("cost_category"),
        location_state: take("location_state"),
    };

    let suggestion = match suggestion.validated() {
        Ok(s) => s,
        Err(ServerError::BadRequest(msg)) => {
            return html_response(pages::suggest_page(viewer, Some(&msg)));
        }
        Err(e) => return Err(e),
    };

    let id = state.db.with_conn(|conn| {
        suggestions::insert_suggestion(conn, viewer.map(|u| u.id), &suggestion, now_unix())
    })?;
    log::info!("suggestion {id} received: {}", suggestion.program_name);

    html_response(pages::suggest_thanks_page(viewer, &suggestion.program_name))
}

fn admin_queue(state: &AppState, user: &User) -> ResultResp {
    let (pending, mut reviewed) = state.db.with_conn(|conn| {
        let pending = suggestions::list_suggestions(conn, Some(SuggestionStatus::Pending))?;
        let reviewed: Vec<_> = suggestions::list_suggestions(conn, None)?
            .into_iter()
            .filter(|s| s.status != SuggestionStatus::Pending)
            .collect();
        Ok((pending, reviewed))
    })?;
    reviewed.sort_by_key(|s| std::cmp::Reverse(s.reviewed_at));
    reviewed.truncate(20);

    html_response(pages::admin_page(&pages::AdminVm {
        viewer: user,
        pending,
        reviewed,
    }))
}

fn review_suggestion(state: &AppState, user: &User, raw_id: &str, action: &str) -> ResultResp {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid suggestion id '{raw_id}'")))?;
    let now = now_unix();

    match action {
        "approve" => {
            state
                .db
                .with_conn(|conn| suggestions::approve_suggestion(conn, id, user.id, now))?;
        }
        "reject" => {
            state
                .db
                .with_conn(|conn| suggestions::reject_suggestion(conn, id, user.id, now))?;
        }
        _ => return Err(ServerError::NotFound),
    }
    redirect("/admin")
}
