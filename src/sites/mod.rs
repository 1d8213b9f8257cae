use crate::state::AppState;
use axum::Router;

mod dto;
mod gemini;
pub mod generator;
pub mod handlers;
mod html;
mod llm;
mod minimal;
mod template;

pub use generator::{build_generator, SiteGenerator};

pub fn router() -> Router<AppState> {
    handlers::site_routes()
}
