//! `emissary doctor` — Diagnose configuration and connectivity.

use emissary_config::AppConfig;
use emissary_core::persona::Persona;
use emissary_core::provider::Provider;
use emissary_providers::build_provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Emissary Doctor — Diagnostics");
    println!("================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file — run `emissary onboard` (env vars still apply)");
        issues += 1;
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        // API key
        if config.has_api_key() {
            println!("  ✅ Model API key configured");

            // Endpoint reachability
            let provider = build_provider(&config);
            match provider.health_check().await {
                Ok(true) => println!("  ✅ Model endpoint reachable ({})", provider.name()),
                Ok(false) => {
                    println!("  ⚠️  Model endpoint not reachable");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Model endpoint check failed: {e}");
                    issues += 1;
                }
            }
        } else {
            println!("  ❌ No model API key — set GOOGLE_API_KEY or add api_key to config.toml");
            issues += 1;
        }

        // Pushover
        if config.pushover.is_configured() {
            println!("  ✅ Pushover configured — notifications go to your phone");
        } else {
            println!("  ⚠️  Pushover not configured — notifications will only be logged");
        }

        // Persona context
        let persona_dir = config.persona_dir();
        let persona = Persona::load(&persona_dir, &config.persona.name);
        if persona.has_context() {
            println!(
                "  ✅ Persona context loaded: {}",
                persona.loaded_files.join(", ")
            );
        } else {
            println!(
                "  ⚠️  No persona files in {} — run `emissary onboard`",
                persona_dir.display()
            );
            issues += 1;
        }

        if config.persona.name == "Your Name" {
            println!("  ⚠️  Persona name is still the placeholder — set [persona] name");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
