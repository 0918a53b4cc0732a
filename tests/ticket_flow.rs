//! End-to-end behavior of the ticket pipeline that does not require the
//! deployed template/logo/font assets: wire parsing, fire-and-forget
//! submission, and the print dispatcher's cleanup contract.

use std::sync::Arc;
use std::time::Duration;

use boleto::printer::{PrinterConfig, dispatch};
use boleto::render::compositor::AssetPaths;
use boleto::render::font::FontBook;
use boleto::server::{AppState, ServerConfig};
use boleto::ticket::TicketRequest;
use pretty_assertions::assert_eq;

/// The documented example request.
const SCENARIO: &str = r#"{
    "tickets": [{
        "show": "Annie",
        "dateTime": "Fri 7:30PM",
        "name": "Jane Doe",
        "isSubscriber": true,
        "section": "GA",
        "row": "-",
        "seat": "-",
        "ticketId": "ABC123"
    }]
}"#;

fn state_with_assets(assets: AssetPaths) -> Arc<AppState> {
    Arc::new(AppState {
        config: ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
        },
        printer: PrinterConfig::default(),
        assets,
        fonts: Arc::new(FontBook::empty()),
    })
}

#[test]
fn scenario_body_parses_and_names_its_staged_file() {
    let request: TicketRequest = serde_json::from_str(SCENARIO).unwrap();
    let ticket = &request.tickets[0];

    assert!(ticket.has_safe_id());
    assert_eq!(ticket.show_slug(), "annie");

    let assets = AssetPaths::default();
    assert_eq!(
        assets.staged_path(&ticket.ticket_id),
        std::path::PathBuf::from("img/generated-tickets/ABC123.png")
    );
}

#[tokio::test]
async fn submission_is_acknowledged_before_any_render_output() {
    let staging = std::env::temp_dir().join(format!("boleto-flow-{}", std::process::id()));
    let assets = AssetPaths {
        template: "/nonexistent/template.png".into(),
        logo_dir: "/nonexistent/logos".into(),
        staging_dir: staging.clone(),
    };
    let state = state_with_assets(assets);

    let request: TicketRequest = serde_json::from_str(SCENARIO).unwrap();
    let launched = boleto::job::submit(&state, request.tickets);
    assert_eq!(launched, 1);

    // The pipeline aborts at the missing template, so nothing is ever
    // staged; the acknowledgment above never depended on it.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!staging.join("ABC123.png").exists());
}

#[tokio::test]
async fn dispatcher_always_consumes_the_staged_file() {
    let file = std::env::temp_dir().join(format!("boleto-flow-staged-{}.png", std::process::id()));
    tokio::fs::write(&file, b"staged ticket").await.unwrap();

    // Point at a printer that cannot exist; the print step fails but the
    // staged file is still consumed.
    let config = PrinterConfig::resolve(|key| match key {
        "PRINTER_NAME" => Some("BOCA_TEST_NO_SUCH_PRINTER".to_string()),
        _ => None,
    });
    dispatch::print_staged(&config, &file).await;

    assert!(!file.exists());
}
