//! Classroom Client
//!
//! Command-line entry point for the join flow.
//!
//! # Startup Flow
//!
//! 1. Initialize tracing
//! 2. Load configuration from environment
//! 3. Optionally classify the class schedule
//!    (`CLASSROOM_LESSON_DATE`, `CLASSROOM_LESSON_START`, `CLASSROOM_LESSON_END`)
//! 4. Request a join grant for `CLASSROOM_LESSON_ID`
//! 5. Report the grant or the wait screen text
//!
//! Connecting the real-time transport is left to the embedding application.

#![warn(clippy::pedantic)]

use std::env;

use classroom_client::bootstrap::{JoinClient, JoinOutcome};
use classroom_client::config::Config;
use classroom_client::countdown::Countdown;
use classroom_client::errors::ClassroomError;
use classroom_client::join_window::SessionWindow;
use common::clock::{Clock, SystemClock};
use common::types::LessonId;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first; it decides the log format
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    init_tracing(config.log_json);

    info!("Starting classroom client");
    info!(
        api_base_url = %config.api_base_url,
        join_lead_seconds = config.join_lead.as_secs(),
        utc_offset_minutes = config.utc_offset_minutes,
        "Configuration loaded successfully"
    );

    let lesson_id: LessonId = env::var("CLASSROOM_LESSON_ID")
        .map_err(|_| ClassroomError::Config("CLASSROOM_LESSON_ID is not set".to_string()))?
        .parse()?;

    let client = JoinClient::new(&config)?;
    let now = SystemClock.now();

    let outcome = match schedule_from_env(&config)? {
        Some(window) => {
            let phase = client.policy().classify(now, window.start(), window.end());
            info!(
                lesson_id = %lesson_id,
                phase = %phase,
                start = %window.start(),
                end = %window.end(),
                "Schedule classified"
            );
            client.join_within_window(lesson_id, &window, now).await
        }
        None => client.join(lesson_id).await,
    };

    match outcome {
        Ok(JoinOutcome::Granted(grant)) => {
            info!(
                lesson_id = %lesson_id,
                url = %grant.url,
                is_host = grant.is_host,
                "Joined class"
            );
            println!("Joined lesson {lesson_id}");
            println!("  transport: {}", grant.url);
            println!("  host: {}", grant.host_identity);
            println!(
                "  ends at: {} ({} remaining)",
                grant.effective_end,
                Countdown::between(SystemClock.now(), grant.effective_end)
            );
            for resource in &grant.resources {
                println!("  resource #{}: {} ({})", resource.id, resource.title, resource.file);
            }
            Ok(())
        }
        Ok(JoinOutcome::Wait(wait)) => {
            warn!(lesson_id = %lesson_id, open_at = ?wait.open_at, "Class not open yet");
            println!("{}", wait.message);
            Ok(())
        }
        Err(e) => {
            error!(lesson_id = %lesson_id, error = %e, "Join failed");
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "classroom_client=debug".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Read the optional schedule triple. All three must be set together.
fn schedule_from_env(config: &Config) -> Result<Option<SessionWindow>, ClassroomError> {
    let date = env::var("CLASSROOM_LESSON_DATE").ok();
    let start = env::var("CLASSROOM_LESSON_START").ok();
    let end = env::var("CLASSROOM_LESSON_END").ok();

    match (date, start, end) {
        (Some(date), Some(start), Some(end)) => {
            SessionWindow::from_schedule(&date, &start, &end, config.utc_offset()).map(Some)
        }
        (None, None, None) => Ok(None),
        _ => Err(ClassroomError::Config(
            "CLASSROOM_LESSON_DATE, CLASSROOM_LESSON_START and CLASSROOM_LESSON_END must be set together"
                .to_string(),
        )),
    }
}
