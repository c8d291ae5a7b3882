//! Server-rendered panel pages.
//!
//! Each panel is one page: a menu on the left selects the active panel, the form holds the
//! values the user entered, and after a submit the page is rendered again with either the
//! diagnosis or the reason the submission was rejected.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use ha_core::{
    constants::{APP_NAME, MENU_TITLE},
    DiagnoseError, ErrorKind, FieldKind, FormCollector, PanelId, PanelSpec,
};

use crate::error::status_for;
use crate::AppState;

/// What the result area of a panel page shows.
enum Outcome {
    /// Nothing submitted yet.
    Idle,
    Diagnosis(&'static str),
    Rejected(String),
    Failed,
}

/// The first panel is the landing page.
pub async fn index() -> Redirect {
    Redirect::to(&format!("/panels/{}", PanelId::ALL[0].slug()))
}

pub async fn show_panel(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Ok(panel) = slug.parse::<PanelId>() else {
        return not_found(&slug);
    };

    let form = FormCollector::new(panel);
    let page = render_panel(&state, panel.spec(), &form, &Outcome::Idle);
    Html(page).into_response()
}

pub async fn submit_panel(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let Ok(panel) = slug.parse::<PanelId>() else {
        return not_found(&slug);
    };
    let spec = panel.spec();

    // Keys that are not fields (the submit button, for one) are not part of the form.
    let mut form = FormCollector::new(panel);
    let mut rejected: Option<DiagnoseError> = None;
    for (key, value) in pairs.iter().filter(|(k, _)| spec.field(k).is_some()) {
        if let Err(e) = form.set(key, value) {
            if rejected.is_none() {
                rejected = Some(e.into());
            }
        }
    }

    let result = match rejected {
        Some(e) => Err(e),
        None => state.service.diagnose_form(form.clone()),
    };

    let (status, outcome) = match result {
        Ok(diagnosis) => (StatusCode::OK, Outcome::Diagnosis(diagnosis.message)),
        Err(e) => {
            let (status, _) = status_for(e.kind());
            if e.kind() == ErrorKind::Internal {
                (status, Outcome::Failed)
            } else {
                (status, Outcome::Rejected(e.to_string()))
            }
        }
    };

    let page = render_panel(&state, spec, &form, &outcome);
    (status, Html(page)).into_response()
}

fn not_found(slug: &str) -> Response {
    let body = layout(
        "Not found",
        &render_menu(None),
        &format!(
            "<h1>Not found</h1><p class=\"error\">No panel named '{}'.</p>",
            escape_html(slug)
        ),
    );
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

fn render_panel(
    state: &AppState,
    spec: &PanelSpec,
    form: &FormCollector,
    outcome: &Outcome,
) -> String {
    let mut main = format!("<h1>{}</h1>\n", escape_html(spec.title));

    if !state.service.is_available(spec.id) {
        main.push_str(
            "<p class=\"warning\">The model for this panel is not loaded; predictions are unavailable.</p>\n",
        );
    }

    main.push_str(&format!(
        "<form method=\"post\" action=\"/panels/{}\">\n<div class=\"grid\" style=\"grid-template-columns:repeat({},1fr)\">\n",
        spec.id.slug(),
        spec.columns
    ));
    for field in spec.fields {
        let current = form.display_value(field.key).unwrap_or_default();
        main.push_str(&format!(
            "<label>{}\n",
            escape_html(field.label)
        ));
        match field.kind {
            FieldKind::Numeric => {
                main.push_str(&format!(
                    "<input type=\"text\" name=\"{}\" value=\"{}\" inputmode=\"decimal\">\n",
                    field.key,
                    escape_html(&current)
                ));
            }
            FieldKind::Categorical(choices) => {
                main.push_str(&format!("<select name=\"{}\">\n", field.key));
                for (i, choice) in choices.iter().enumerate() {
                    let selected = if current.is_empty() {
                        i == 0
                    } else {
                        current == choice.label
                    };
                    main.push_str(&format!(
                        "<option{}>{}</option>\n",
                        if selected { " selected" } else { "" },
                        escape_html(choice.label)
                    ));
                }
                main.push_str("</select>\n");
            }
        }
        main.push_str("</label>\n");
    }
    main.push_str(&format!(
        "</div>\n<button type=\"submit\">{}</button>\n</form>\n",
        escape_html(spec.submit_label)
    ));

    match outcome {
        Outcome::Idle => {}
        Outcome::Diagnosis(message) => main.push_str(&format!(
            "<div class=\"success\">{}</div>\n",
            escape_html(message)
        )),
        Outcome::Rejected(message) => main.push_str(&format!(
            "<div class=\"error\">{}</div>\n",
            escape_html(message)
        )),
        Outcome::Failed => main.push_str(
            "<div class=\"error\">An internal error occurred. The prediction could not be made.</div>\n",
        ),
    }

    layout(spec.title, &render_menu(Some(spec.id)), &main)
}

fn render_menu(active: Option<PanelId>) -> String {
    let mut menu = format!("<nav>\n<h2>{}</h2>\n<ul>\n", escape_html(MENU_TITLE));
    for panel in PanelId::ALL {
        let spec = panel.spec();
        menu.push_str(&format!(
            "<li class=\"icon-{}{}\"><a href=\"/panels/{}\">{}</a></li>\n",
            spec.icon,
            if active == Some(panel) { " active" } else { "" },
            panel.slug(),
            escape_html(spec.menu_label)
        ));
    }
    menu.push_str("</ul>\n</nav>\n");
    menu
}

fn layout(title: &str, menu: &str, main: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - {}</title>\n<style>{}</style>\n</head>\n<body>\n{}<main>\n{}</main>\n</body>\n</html>\n",
        escape_html(title),
        APP_NAME,
        STYLE,
        menu,
        main
    )
}

const STYLE: &str = "body{display:flex;margin:0;font-family:sans-serif}\
nav{width:16rem;min-height:100vh;padding:1rem;background:#f0f2f6}\
nav ul{list-style:none;padding:0}nav li{margin:.25rem 0}\
nav li.active a{font-weight:bold;color:#ff4b4b}\
main{flex:1;padding:1rem 2rem}\
.grid{display:grid;gap:1rem}\
label{display:flex;flex-direction:column;font-size:.9rem}\
button{margin-top:1rem;padding:.5rem 1rem}\
.success{margin-top:1rem;padding:1rem;background:#dff5e3;color:#0f5132}\
.error{margin-top:1rem;padding:1rem;background:#fde2e2;color:#842029}\
.warning{padding:1rem;background:#fff3cd}";

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
