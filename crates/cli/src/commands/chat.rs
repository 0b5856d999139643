//! `emissary chat` — Interactive or single-message chat mode.

use std::sync::Arc;

use emissary_agent::PersonaAgent;
use emissary_config::AppConfig;
use emissary_core::event::EventBus;
use emissary_core::message::Message;
use emissary_core::persona::Persona;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Missing key gets a setup hint up front; the agent itself would only
    // answer with the fixed unavailability text.
    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No model API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export GOOGLE_API_KEY='...'      (Gemini, the default endpoint)");
        eprintln!("    export OPENAI_API_KEY='sk-...'   (for OpenAI-compatible endpoints)");
        eprintln!("    export EMISSARY_API_KEY='...'    (generic)");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = emissary_providers::build_provider(&config);
    let notifier = emissary_notify::build_notifier(&config);
    let tools = emissary_tools::registry(notifier);

    let persona_dir = config.persona_dir();
    let persona = Persona::load(&persona_dir, &config.persona.name);

    let event_bus = Arc::new(EventBus::default());
    let context_files = persona.loaded_files.clone();
    let agent = PersonaAgent::new(provider, &config.model, &persona, tools, event_bus)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_max_rounds(config.max_tool_rounds);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = match agent.respond(&msg, &[]).await {
            Ok(reply) => reply,
            Err(err) => err.user_reply(),
        };
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Emissary — Interactive Chat           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Persona:   {}", agent.persona_name());
    println!("  Model:     {}", config.model);
    println!("  Tools:     record_contact, record_unknown_question");
    if context_files.is_empty() {
        println!("  Context:   no persona files found in {}", persona_dir.display());
    } else {
        println!("  Context:   {}", context_files.join(", "));
    }
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    use std::io::Write;
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        eprint!("  ...");
        let reply = match agent.respond(&line, &history).await {
            Ok(reply) => reply,
            Err(err) => err.user_reply(),
        };
        eprint!("\r     \r");

        println!();
        for reply_line in reply.lines() {
            println!("  {} > {reply_line}", agent.persona_name());
        }
        println!();

        // Client-side history: the agent itself keeps no session state.
        history.push(Message::user(&line));
        history.push(Message::assistant(&reply));

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
