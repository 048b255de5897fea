use axum::{Extension, http::StatusCode, response::Html};

use crate::types::SharedFragment;

/// Page served on the redirect URI.
///
/// The access token arrives in the URL fragment, which browsers never send to
/// the server. The script posts the fragment back to `/token` and then clears
/// it from the address bar so a reload does not resubmit it.
const CALLBACK_PAGE: &str = r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>promptlist</title></head>
  <body>
    <h4 id="status">Completing login...</h4>
    <script>
      const fragment = window.location.hash.substring(1);
      history.replaceState(null, "", window.location.pathname);
      const status = document.getElementById("status");
      if (!fragment) {
        status.textContent = "Missing access token.";
      } else {
        fetch("/token", { method: "POST", body: fragment })
          .then((res) => {
            status.textContent = res.ok
              ? "Authentication successful. Close this browser window."
              : "Login failed.";
          })
          .catch(() => { status.textContent = "Login failed."; });
      }
    </script>
  </body>
</html>"#;

pub async fn callback() -> Html<&'static str> {
    Html(CALLBACK_PAGE)
}

/// Receives the raw fragment posted by the callback page.
///
/// Only the first fragment is kept; later posts are rejected until the auth
/// flow has consumed it.
pub async fn token(
    Extension(shared_state): Extension<SharedFragment>,
    body: String,
) -> StatusCode {
    let body = body.trim();
    if body.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    let mut state = shared_state.lock().await;
    if state.is_some() {
        return StatusCode::CONFLICT;
    }

    *state = Some(body.to_string());
    StatusCode::ACCEPTED
}
