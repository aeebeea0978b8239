mod commands;

use clap::Parser;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use solace_assistant::{AssistantBackend, Companion, GeminiClient, GenerationParams};
use solace_core::{SolaceConfig, WellnessStore};
use solace_memory::{KvStore, PersistenceBridge};

use commands::App;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the wellness database (overrides config and SOLACE_DB)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, default_value = "solace.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let config = SolaceConfig::load_or_default(&args.config);
    let db_path = args
        .db
        .unwrap_or_else(|| PathBuf::from(&config.storage.db_path));

    // Persistence is best-effort: an unopenable database means the session
    // simply runs in memory only.
    let bridge = match KvStore::open(&db_path).await {
        Ok(kv) => {
            info!("Persistence at {}", db_path.display());
            Some(PersistenceBridge::new(kv))
        }
        Err(e) => {
            warn!("Persistence unavailable, running in memory only: {:#}", e);
            None
        }
    };

    let mut store = WellnessStore::new();
    let changes = store.subscribe();
    if let Some(bridge) = &bridge {
        bridge.hydrate(&mut store).await;
    }

    let backend: Option<Arc<dyn AssistantBackend>> = match GeminiClient::new(&config.assistant) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            info!("Assistant backend unavailable ({}), using local fallbacks", e);
            None
        }
    };
    let companion = Companion::new(
        backend,
        GenerationParams {
            max_output_tokens: config.assistant.max_output_tokens,
            temperature: config.assistant.temperature,
        },
    );

    let mut app = App {
        store,
        companion,
        bridge,
        changes,
    };

    println!("Solace ready. Type 'help' for commands, 'quit' to leave.");
    let mut rl = rustyline::DefaultEditor::new()?;

    loop {
        let line = match rl.readline("solace> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        if input == "quit" || input == "exit" {
            break;
        }

        commands::dispatch(&mut app, input, &mut rl).await;

        // Hand every change the mutation produced to the bridge while the
        // post-mutation snapshot is still current.
        app.flush().await;
    }

    println!("Take care.");
    Ok(())
}
