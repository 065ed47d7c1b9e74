// Store pages - server-side rendering with askama.
//
// Every handler binds the request's session first (so the cookie is minted on
// first contact) and returns the jar with the response. Pages that need a
// signed-in user render the login page in place instead of redirecting.

mod error;
mod params;
mod templates;

pub use error::PageError;

use askama::Template;
use axum::{
    extract::{Query, RawPathParams, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::CookieJar;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::activity::ActivityEvent;
use crate::session::Session;
use crate::AppState;

use params::{BrowseParams, Params, PurchaseParams};
use templates::{AccountTemplate, BuyTemplate, IndexTemplate, LoginTemplate};

/// Sentinel used in request traces when the session has no user. It never
/// reaches a page.
const NO_USER: &str = "NOUSER";

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(index))
        .route("/login", get(login_view).post(login_submit))
        .route("/account", get(account))
        .route("/buy", get(browse).post(purchase))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => PageError::internal(format!("Template error: {}", e)).into_response(),
    }
}

fn login_page() -> Response {
    render_template(LoginTemplate { title: "Login" })
}

fn display_user(session: &Session) -> String {
    session.user().unwrap_or_else(|| NO_USER.to_string())
}

// Home page, shown to everyone regardless of session state
async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (session, jar) = state.sessions.acquire(jar);
    tracing::debug!(session = %session.id(), user = %display_user(&session), "Rendering index");

    (jar, render_template(IndexTemplate { title: "Online Store" })).into_response()
}

// GET /login shows the account page with whatever the session holds
async fn login_view(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (session, jar) = state.sessions.acquire(jar);
    let user = session.user().unwrap_or_default();

    let page = render_template(AccountTemplate {
        title: "Your Account",
        user,
        alert: None,
    });
    (jar, page).into_response()
}

// POST /login stores the reported name, no questions asked
async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let (session, jar) = state.sessions.acquire(jar);

    let uname = match Params::new(form).require("uname") {
        Ok(uname) => uname,
        Err(e) => return (jar, e).into_response(),
    };
    session.set_user(uname.clone());
    tracing::info!(session = %session.id(), user = %uname, "User signed in");

    let page = render_template(AccountTemplate {
        title: "Your Account",
        user: uname,
        alert: None,
    });
    (jar, page).into_response()
}

async fn account(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (session, jar) = state.sessions.acquire(jar);

    let page = match session.user() {
        None => login_page(),
        Some(user) => render_template(AccountTemplate {
            title: "Account",
            user,
            alert: None,
        }),
    };
    (jar, page).into_response()
}

// GET /buy - product detail view, logged as a browse
async fn browse(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    path: RawPathParams,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (session, jar) = state.sessions.acquire(jar);
    let Some(user) = session.user() else {
        return (jar, login_page()).into_response();
    };

    let params = Params::merged(query, path.iter());
    let view = match BrowseParams::read(&params) {
        Ok(view) => view,
        Err(e) => return (jar, e).into_response(),
    };

    state
        .activity
        .record(ActivityEvent::browse(&user, &view.category, &view.item));
    tracing::debug!(session = %session.id(), user = %user, item = %view.item, "Browse recorded");

    let page = render_template(BuyTemplate {
        title: "Online Ordering",
        item: view.item,
        price: view.price,
        category: view.category,
        desc: view.desc,
    });
    (jar, page).into_response()
}

// POST /buy - completed purchase, logged then back to the index
async fn purchase(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let (session, jar) = state.sessions.acquire(jar);
    let Some(user) = session.user() else {
        return (jar, login_page()).into_response();
    };

    let order = match PurchaseParams::read(&Params::new(form)) {
        Ok(order) => order,
        Err(e) => return (jar, e).into_response(),
    };

    state.activity.record(ActivityEvent::purchase(
        &user,
        &order.ad,
        &order.category,
        &order.item,
    ));
    tracing::info!(
        session = %session.id(),
        user = %user,
        item = %order.item,
        quantity = %order.quantity,
        "Purchase recorded"
    );

    (jar, render_template(IndexTemplate { title: "Online Store" })).into_response()
}
