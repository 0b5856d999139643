//! `emissary onboard` — First-time setup.

use emissary_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let persona_dir = config_dir.join("persona");

    println!("Emissary — First-Time Setup");
    println!("===========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !persona_dir.exists() {
        std::fs::create_dir_all(&persona_dir)?;
        println!("✅ Created persona directory: {}", persona_dir.display());
    }

    // Template persona files. summary.md is the short bio; profile.md holds
    // the long-form background (paste your LinkedIn export or CV text here).
    let summary_path = persona_dir.join("summary.md");
    if !summary_path.exists() {
        std::fs::write(
            &summary_path,
            concat!(
                "# Summary\n\n",
                "<!-- Two or three sentences about who you are. -->\n",
                "<!-- Example: I'm a backend engineer based in Lisbon who has\n",
                "     spent the last decade building payment systems. -->\n",
            ),
        )?;
        println!("✅ Created summary.md");
    }

    let profile_path = persona_dir.join("profile.md");
    if !profile_path.exists() {
        std::fs::write(
            &profile_path,
            concat!(
                "# Profile\n\n",
                "<!-- Your full professional background: roles, dates, projects,\n",
                "     skills, education. Plain text extracted from your CV or\n",
                "     LinkedIn profile works well. -->\n",
            ),
        )?;
        println!("✅ Created profile.md");
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Edit {} — set [persona] name and your API key", config_path.display());
        println!("   2. Fill in {} and profile.md", summary_path.display());
        println!("   3. Run: emissary chat\n");
    }

    println!("🎉 Setup complete! Run `emissary chat` to try it out.\n");

    Ok(())
}
