use axum::response::Html;

const CAPTURE_PAGE: &str = include_str!("../../assets/index.html");

/// Serves the capture page with the drawing canvas
pub async fn index() -> Html<&'static str> {
    Html(CAPTURE_PAGE)
}
