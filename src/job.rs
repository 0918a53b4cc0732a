//! Per-ticket render/print pipelines.
//!
//! Every accepted ticket becomes an independent background task: compose
//! the face, stage the PNG, hand it to the print dispatcher. Tasks share
//! nothing mutable — each owns its canvas and staged file — so a failing
//! ticket never disturbs its siblings, and the HTTP caller is answered
//! before any of them has produced a byte.

use std::sync::Arc;

use tokio::task;

use crate::error::BoletoError;
use crate::printer::dispatch;
use crate::render::compositor;
use crate::server::AppState;
use crate::ticket::TicketRecord;

/// Launch one pipeline per ticket and return how many were launched.
///
/// Records with an unsafe ticket id are rejected up front: the id names
/// the staged file, so letting one through would risk path escapes or
/// collisions between concurrent renders.
pub fn submit(state: &Arc<AppState>, tickets: Vec<TicketRecord>) -> usize {
    let mut launched = 0;
    for ticket in tickets {
        if !ticket.has_safe_id() {
            eprintln!("[job] rejected ticket with unsafe id {:?}", ticket.ticket_id);
            continue;
        }

        let state = Arc::clone(state);
        tokio::spawn(async move {
            let id = ticket.ticket_id.clone();
            if let Err(e) = run_pipeline(state, ticket).await {
                eprintln!("[job] ticket {}: {}", id, e);
            }
        });
        launched += 1;
    }
    launched
}

async fn run_pipeline(state: Arc<AppState>, ticket: TicketRecord) -> Result<(), BoletoError> {
    let staged = state.assets.staged_path(&ticket.ticket_id);

    // Glyph rasterization and compositing are CPU-bound; keep them off
    // the reactor.
    let png = {
        let state = Arc::clone(&state);
        task::spawn_blocking(move || -> Result<Vec<u8>, BoletoError> {
            let canvas = compositor::compose_ticket(&state.assets, &state.fonts, &ticket)?;
            canvas.encode_png()
        })
        .await
        .map_err(|e| BoletoError::Image(format!("render task failed: {e}")))??
    };

    if let Some(dir) = staged.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&staged, &png).await?;
    println!("[job] staged {}, sending to printer", staged.display());

    dispatch::print_staged(&state.printer, &staged).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::compositor::AssetPaths;
    use crate::render::font::FontBook;
    use crate::server::{AppState, ServerConfig};
    use crate::ticket::TicketRecord;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: ServerConfig {
                listen_addr: "127.0.0.1:0".to_string(),
            },
            printer: crate::printer::PrinterConfig::default(),
            assets: AssetPaths::default(),
            fonts: Arc::new(FontBook::empty()),
        })
    }

    fn ticket_with_id(id: &str) -> TicketRecord {
        TicketRecord {
            show: "Annie".into(),
            date_time: "Fri 7:30PM".into(),
            name: "Jane Doe".into(),
            ticket_type: None,
            is_subscriber: false,
            section: "CTR".into(),
            row: "A".into(),
            seat: "5".into(),
            ticket_id: id.into(),
        }
    }

    #[tokio::test]
    async fn test_empty_submission_launches_nothing() {
        assert_eq!(submit(&test_state(), vec![]), 0);
    }

    #[tokio::test]
    async fn test_unsafe_ids_are_rejected() {
        let tickets = vec![ticket_with_id(""), ticket_with_id("../escape")];
        assert_eq!(submit(&test_state(), tickets), 0);
    }

    #[tokio::test]
    async fn test_safe_tickets_are_launched() {
        let tickets = vec![ticket_with_id("A1"), ticket_with_id("A2")];
        assert_eq!(submit(&test_state(), tickets), 2);
    }
}
