// File: src/layout.rs
// Purpose: Maud page shell shared by the demo handlers

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup, DOCTYPE};

/// Full HTML document around `content`
pub fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="min-h-screen flex justify-center p-8" {
                main class="w-full max-w-md" {
                    (content)
                }
            }
        }
    }
}

/// Convert rendered markup into an axum response
pub fn markup_response(status: StatusCode, markup: Markup) -> Response {
    (status, Html(markup.into_string())).into_response()
}
