mod demo;
mod layout;

use anyhow::Context;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::StringRejection,
        FromRequest, Multipart, Request, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use dynform::{Config, FileHandle, Form, RuleSchema, ServerConfig, Submission, SubmitOutcome, ValueMap};
use layout::{markup_response, page};
use maud::{html, Markup};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    schema: Arc<RuleSchema>,
}

impl AppState {
    fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            schema: Arc::new(demo::schema()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dynform=debug,tower_http=debug")),
        )
        .init();

    info!("dynform-server starting...");

    let mut config = Config::load_default().unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });
    apply_env_overrides(&mut config.server, |name| std::env::var(name).ok());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// `HOST` and `PORT` take precedence over dynform.toml
fn apply_env_overrides(server: &mut ServerConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(host) = var("HOST") {
        server.host = host;
    }
    if let Some(port) = var("PORT") {
        match port.parse() {
            Ok(port) => server.port = port,
            Err(_) => warn!(%port, "ignoring invalid PORT"),
        }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let (status, markup) = render_demo(&state, None)?;
    Ok(markup_response(status, markup))
}

async fn submit_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let submission = read_submission(request).await?;
    let (status, markup) = render_demo(&state, Some(&submission))?;
    Ok(markup_response(status, markup))
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Read a url-encoded or multipart body into a submission
async fn read_submission(request: Request) -> Result<Submission, AppError> {
    let urlencoded = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if urlencoded {
        let body = String::from_request(request, &()).await?;
        return Ok(Submission::from_urlencoded(&body));
    }

    let multipart = Multipart::from_request(request, &()).await?;
    Ok(read_multipart(multipart).await?)
}

/// Read a multipart body into a submission
async fn read_multipart(mut multipart: Multipart) -> Result<Submission, MultipartError> {
    let mut submission = Submission::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // A file input left blank still posts an empty part
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                submission.push_file(name, FileHandle::new(file_name, content_type, bytes.to_vec()));
            }
            None => {
                let text = field.text().await?;
                submission.push_text(name, text);
            }
        }
    }

    Ok(submission)
}

fn demo_form<'a>(
    state: &'a AppState,
    on_submit: impl FnMut(ValueMap) + 'a,
) -> anyhow::Result<Form<'a>> {
    Form::builder(demo::fields(), &*state.schema, on_submit)
        .config(&state.config)
        .before(html! {
            h1 class="text-2xl font-bold" { "Dynamic Form" }
        })
        .after(html! {
            p class="text-sm text-gray-500" { "All fields are required" }
        })
        .build()
        .context("Failed to mount demo form")
}

/// Render the demo page, submitting `submission` first when there is one.
/// Rejected submissions answer 422 with the errors inline.
fn render_demo(
    state: &AppState,
    submission: Option<&Submission>,
) -> Result<(StatusCode, Markup), AppError> {
    let mut accepted: Option<ValueMap> = None;

    let (status, form_markup) = {
        let mut form = demo_form(state, |values| accepted = Some(values))?;
        let status = match submission.map(|submission| form.submit(submission)) {
            Some(SubmitOutcome::Invalid { fields }) => {
                warn!(?fields, "submission rejected");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Some(SubmitOutcome::Submitted) | None => StatusCode::OK,
        };
        (status, form.render())
    };

    let notice = match accepted {
        Some(values) => {
            let json = serde_json::to_string_pretty(&values)
                .context("Failed to serialize submitted values")?;
            info!(values = %json, "form submitted");
            Some(json)
        }
        None => None,
    };

    let markup = page(
        "Dynamic Form",
        html! {
            @if let Some(json) = notice {
                div class="mb-6 p-4 rounded-md border-2 border-green-600" {
                    p class="font-medium text-green-700" { "Form submitted" }
                    pre class="text-xs overflow-x-auto" { (json) }
                }
            }
            (form_markup)
        },
    );

    Ok((status, markup))
}

/// Error page response carrying the status to send
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{:#}", err),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<StringRejection> for AppError {
    fn from(rejection: StringRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(status = %self.status, message = %self.message, "request failed");
        let title = self.status.canonical_reason().unwrap_or("Error");
        markup_response(
            self.status,
            page(
                title,
                html! {
                    h1 class="text-2xl font-bold" { (self.status.as_u16()) " " (title) }
                    p { (self.message) }
                    a href="/" { "Go Home" }
                },
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const BOUNDARY: &str = "dynform-test-boundary";

    fn test_app() -> Router {
        app(AppState::new(Config::default()))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn multipart_request(texts: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in texts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        let (file_name, bytes) = file.unwrap_or(("", b""));
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn valid_texts() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Ada"),
            ("description", "Analyst"),
            ("email", "ada@example.com"),
            ("age", "36"),
            ("hobbies", "football"),
            ("hobbies", "films"),
            ("experience", "5more"),
            ("select", "option1"),
            ("birthday", "1815-12-10"),
        ]
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_index_renders_demo_form() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1 class=\"text-2xl font-bold\">Dynamic Form</h1>"));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"id="experience-5more""#));
        assert!(!html.contains("is required"));
    }

    #[tokio::test]
    async fn test_invalid_submission_shows_errors() {
        let response = test_app()
            .oneshot(multipart_request(&[("name", "Ada"), ("age", "old")], None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_string(response).await;
        assert!(html.contains("Age is required and must be a number"));
        assert!(html.contains("File is required"));
        assert!(html.contains("Hobbies is required"));
        assert!(!html.contains("Name is required"));
        assert!(!html.contains("Form submitted"));
    }

    #[tokio::test]
    async fn test_valid_submission_is_accepted() {
        let response = test_app()
            .oneshot(multipart_request(&valid_texts(), Some(("cv.pdf", b"%PDF-1.4"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Form submitted"));
        assert!(html.contains("cv.pdf"));
        assert!(!html.contains("is required"));
    }

    #[tokio::test]
    async fn test_blank_file_part_counts_as_missing() {
        let response = test_app()
            .oneshot(multipart_request(&valid_texts(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("File is required"));
    }

    #[tokio::test]
    async fn test_urlencoded_submission() {
        let request = Request::post("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Ada+Lovelace&age=36&hobbies=films&hobbies=football"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_string(response).await;
        assert!(html.contains(r#"value="Ada Lovelace""#));
        assert!(html.contains(r#"value="36""#));
        assert!(html.contains(r#"checked class="w-5 h-5" id="hobbies-films""#));
        assert!(!html.contains("Name is required"));
        assert!(!html.contains("Hobbies is required"));
        assert!(html.contains("File is required"));
    }

    #[tokio::test]
    async fn test_unsupported_body_is_rejected() {
        let request = Request::post("/")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=Ada"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_env_overrides() {
        let mut server = ServerConfig::default();
        apply_env_overrides(&mut server, |name| match name {
            "HOST" => Some("0.0.0.0".to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        });
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);

        apply_env_overrides(&mut server, |name| (name == "PORT").then(|| "nope".to_string()));
        assert_eq!(server.port, 8080);
    }
}
