use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Upload form, video list, and player
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
