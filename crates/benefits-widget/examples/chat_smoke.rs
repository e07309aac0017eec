//! Smoke test for the chat client against a running analysis service.
//!
//! Logs in, loads history, sends one question and prints the reply and the
//! agent trace. Uses the saved config if there is one, otherwise an
//! in-memory backend seeded with a single employee.
//!
//! Usage:
//!   BENEFITS_ANALYSIS_URL=http://localhost:8000 \
//!   BENEFITS_EMPLOYEE_ID=12345 \
//!   cargo run -p benefits-widget --example chat_smoke -- "Am I eligible for an HSA?"

use benefits_chat::controller::SendOutcome;
use benefits_core::models::employee::Employee;
use benefits_widget::config::{self, StorageBackend, WidgetConfig};
use benefits_widget::telemetry;
use benefits_widget::widget::Widget;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    telemetry::init_tracing(false);

    let employee_id =
        std::env::var("BENEFITS_EMPLOYEE_ID").unwrap_or_else(|_| "12345".to_string());
    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Am I eligible for an HSA?".to_string());

    let mut cfg = if config::has_config() {
        config::load_config()?
    } else {
        let scratch = std::env::temp_dir().join("benefits-chat-smoke");
        WidgetConfig {
            storage: StorageBackend::Memory {
                employees: vec![Employee {
                    employee_id: employee_id.clone(),
                    name: "Smoke Test".to_string(),
                    date_of_birth: None,
                    email: "smoke@example.com".to_string(),
                    hsa_eligible: true,
                    fsa_eligible: true,
                    cobra_status: "not_applicable".to_string(),
                }],
            },
            session_dir: Some(scratch),
            ..WidgetConfig::default()
        }
    };
    cfg.apply_env_overrides();

    println!("Analysis service: {}", cfg.analysis_base_url);
    println!("Employee:         {employee_id}");
    println!();

    let mut widget = Widget::from_config(&cfg).await?;

    match widget.health().await {
        Ok(health) => println!("Service: {} {} ({})", health.service, health.version, health.status),
        Err(e) => println!("Health check failed: {e}"),
    }

    let chat = widget.controller_mut();
    if !chat.login(&employee_id).await {
        return Err(eyre::eyre!("login failed for employee {employee_id}"));
    }
    let loaded = chat.load_history().await;
    println!("Loaded {loaded} stored message(s)");
    println!();

    println!("> {question}");
    match chat.send(&question).await {
        SendOutcome::Answered => {}
        SendOutcome::Failed(e) => println!("(request failed: {e})"),
        SendOutcome::Ignored => return Err(eyre::eyre!("question was ignored")),
    }

    if let Some(reply) = chat.messages().last() {
        println!("{}", reply.text);
        if let Some(details) = &reply.details {
            for rec in &details.recommendations {
                println!("  * {rec}");
            }
            for item in &details.action_items {
                println!("  - {item}");
            }
        }
        for suggestion in reply.suggestions.iter().flatten() {
            println!("  [{suggestion}]");
        }
    }

    println!();
    println!("Agent trace:");
    println!("{}", chat.trace_view().render());

    chat.close().await;
    Ok(())
}
