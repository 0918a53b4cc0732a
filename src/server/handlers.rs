//! HTTP handlers.

use std::sync::Arc;

use axum::{Json, extract::State, response::Html};

use crate::job;
use crate::ticket::TicketRequest;

use super::state::AppState;

const USAGE: &str = r#"
<p>
Welcome to the web-based ticket printer. Send tickets via a POST call to this URL in the following format:
</p>
<pre>
  {
    "tickets": [{
      "show": "My Show",
      "dateTime": "Thursday, Octember 32 - 7:30PM",
      "name": "Joe Schmoe",
      "ticketType": "Standard Admission",
      "isSubscriber": false,
      "section": "CTR",
      "row": "A",
      "seat": "5",
      "ticketId": "1234567890"
    }]
  }
</pre>
"#;

/// Handle GET / - static usage page.
pub async fn usage() -> Html<&'static str> {
    Html(USAGE)
}

/// Handle POST / - accept tickets and acknowledge immediately.
///
/// Rendering and printing continue in the background; the acknowledgment
/// says the request was received, not that any ticket printed.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TicketRequest>,
) -> &'static str {
    let launched = job::submit(&state, request.tickets);
    println!("[server] accepted {} ticket(s)", launched);
    "OK"
}
