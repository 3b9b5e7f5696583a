use anyhow::Result;
use mindmate_analytics::{snapshot, AnalyticsSnapshot, ReportGenerator};
use mindmate_core::backend::{HttpBackend, MoodStore};
use mindmate_core::config::AppConfig;
use mindmate_core::session::{SendOutcome, SessionStore};
use mindmate_core::types::{ChatModel, Message, MoodEntry};
use rustyline::error::ReadlineError;
use rustyline::{Config as RlConfig, DefaultEditor};
use std::sync::Arc;

const BANNER: &str = r#"
  ╔═══════════════════════════════════════════╗
  ║            mindmate v0.1.0                ║
  ║   A supportive companion, always here     ║
  ╚═══════════════════════════════════════════╝

  Type a message and press Enter to talk.
  Commands:
    /model <name>            — Switch model (fast, balanced, accurate)
    /mood <1-5> <emoji> [note] — Log how you feel right now
    /today                   — Show today's mood log
    /dashboard               — Show your wellness dashboard
    /report                  — Full markdown wellness report
    /config                  — Show current config
    /help                    — Show this help
    /exit                    — Quit
"#;

/// Run the interactive chat client.
pub async fn run(config: AppConfig, user_id: String) -> Result<()> {
    println!("{}", BANNER);
    println!(
        "  User: {}  |  Model: {}  |  Endpoint: {}",
        user_id,
        config.session.default_model.as_str(),
        config.backend.api_base
    );
    println!();

    let backend = Arc::new(HttpBackend::new(&config)?);
    let mut store = SessionStore::new(&config, backend.clone());

    // Show the seeded greeting, if any.
    if let Some(greeting) = store.last_message() {
        print_assistant(greeting);
    }

    // Set up rustyline.
    let rl_config = RlConfig::builder().auto_add_history(true).build();
    let history_path = AppConfig::data_dir().join("repl_history.txt");
    let mut rl = DefaultEditor::with_config(rl_config)?;
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = format!("\x1b[1;36m{}\x1b[0m \x1b[1;32m❯\x1b[0m ", user_id);

        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                // Handle slash commands.
                if input.starts_with('/') {
                    let handled =
                        handle_command(input, &mut store, backend.as_ref(), &user_id, &config)
                            .await?;
                    if !handled {
                        break; // /exit
                    }
                    continue;
                }

                // A plain line is a chat turn.
                match store.send(&user_id, input).await {
                    SendOutcome::Completed => {
                        if let Some(reply) = store.last_message() {
                            print_assistant(reply);
                        }
                    }
                    SendOutcome::Busy => {
                        println!("  Still waiting on the last reply...");
                    }
                    SendOutcome::EmptyInput => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Take care!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    // Save history.
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Print an assistant message, with the helpline directory beneath it when
/// the reply is crisis-flagged.
fn print_assistant(message: &Message) {
    println!("\x1b[1;33mmindmate\x1b[0m: {}", message.content);
    if message.crisis_flag {
        println!();
        println!("  \x1b[1;31m⚠ If you're in crisis, please reach out right now:\x1b[0m");
        if let Some(helplines) = &message.helplines {
            for (name, number) in helplines {
                println!("    {} — {}", name, number);
            }
        }
        println!();
    }
}

/// Handle a slash command. Returns `true` to continue the loop, `false` to exit.
async fn handle_command(
    input: &str,
    store: &mut SessionStore,
    backend: &HttpBackend,
    user_id: &str,
    config: &AppConfig,
) -> Result<bool> {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/exit" | "/quit" | "/q" => {
            println!("Take care!");
            return Ok(false);
        }
        "/model" => {
            if arg.is_empty() {
                println!("Current model: {}", store.model().as_str());
                println!("Usage: /model <fast|balanced|accurate>");
            } else {
                match arg.parse::<ChatModel>() {
                    Ok(model) => {
                        store.set_model(model);
                        println!("Switched to model: {}", model.as_str());
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }
        "/mood" => {
            handle_mood(arg, backend, user_id).await;
        }
        "/today" => {
            let entries = fetch_or_empty(backend, user_id).await;
            let today = chrono::Utc::now().date_naive();
            let todays: Vec<&MoodEntry> = entries
                .iter()
                .filter(|e| e.timestamp.date_naive() == today)
                .collect();
            if todays.is_empty() {
                println!("  No moods logged today yet.");
            } else {
                for entry in todays {
                    let note = entry.note.as_deref().unwrap_or("");
                    println!(
                        "  {}  {}  {}",
                        entry.timestamp.format("%H:%M"),
                        entry.emoji,
                        note
                    );
                }
            }
        }
        "/dashboard" => {
            let entries = fetch_or_empty(backend, user_id).await;
            print_dashboard(&snapshot(&entries));
        }
        "/report" => {
            let entries = fetch_or_empty(backend, user_id).await;
            println!("{}", ReportGenerator::wellness_report(&snapshot(&entries)));
        }
        "/config" => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        "/help" | "/?" => {
            println!("  /model <name>              — Switch model (fast, balanced, accurate)");
            println!("  /mood <1-5> <emoji> [note] — Log how you feel right now");
            println!("  /today                     — Show today's mood log");
            println!("  /dashboard                 — Show your wellness dashboard");
            println!("  /report                    — Full markdown wellness report");
            println!("  /config                    — Show current config");
            println!("  /help                      — Show this help");
            println!("  /exit                      — Quit");
        }
        _ => {
            println!(
                "Unknown command: {}. Type /help for available commands.",
                cmd
            );
        }
    }

    Ok(true)
}

/// Parse and submit a `/mood <score> <emoji> [note]` command.
async fn handle_mood(arg: &str, backend: &HttpBackend, user_id: &str) {
    let mut parts = arg.splitn(3, ' ');
    let score = parts.next().and_then(|s| s.parse::<u8>().ok());
    let emoji = parts.next();
    let note = parts.next().map(str::trim).filter(|n| !n.is_empty());

    let (score, emoji) = match (score, emoji) {
        (Some(score), Some(emoji)) if (1..=5).contains(&score) => (score, emoji),
        _ => {
            println!("Usage: /mood <1-5> <emoji> [note]");
            return;
        }
    };

    match backend.submit_entry(user_id, emoji, score, note).await {
        Ok(()) => println!("Mood logged successfully! 🌟"),
        Err(e) => {
            tracing::warn!("failed to log mood: {}", e);
            println!("Failed to log mood. Try again.");
        }
    }
}

/// Fetch the raw entry list; a failed fetch renders as an empty list
/// rather than an error.
async fn fetch_or_empty(backend: &HttpBackend, user_id: &str) -> Vec<MoodEntry> {
    match backend.fetch_entries(user_id).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("failed to fetch mood entries: {}", e);
            Vec::new()
        }
    }
}

fn print_dashboard(snap: &AnalyticsSnapshot) {
    if snap.count == 0 {
        println!("  No mood data available yet. Log a mood with /mood to get started.");
        return;
    }

    println!("  \x1b[1mYour Wellness Dashboard\x1b[0m");
    println!("    Average Mood : {}/5", snap.average);
    println!("    Total Entries: {}", snap.count);
    println!("    Trend        : {:+.1}", snap.trend_delta);
    if let Some(best) = snap.best_day {
        println!("    Best Day     : {}", best.format("%A, %b %d"));
    }
    if let Some(worst) = snap.worst_day {
        println!("    Toughest Day : {}", worst.format("%A, %b %d"));
    }

    if !snap.daily_series.is_empty() {
        println!();
        for day in &snap.daily_series {
            let bar = "█".repeat(day.average_score.round().max(1.0) as usize);
            println!(
                "    {}  {:<5} {}  ({} entries)",
                day.date.format("%b %d"),
                bar,
                day.average_score,
                day.entries
            );
        }
    }

    if !snap.insights.is_empty() {
        println!();
        for insight in &snap.insights {
            println!("    💡 {}", insight.message());
        }
    }
}
