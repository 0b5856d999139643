//! Persona: who the agent speaks as, and the system prompt built from it.
//!
//! A persona is loaded once at startup from a directory of plain-text
//! context files:
//!
//! - `summary.md` (or `summary.txt`): a short background summary
//! - `profile.md` (or `profile.txt`): the full professional profile
//!
//! Each file is optional. Missing files are silently skipped; the prompt is
//! assembled from whatever was found. The persona never changes mid-session.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Candidate file names for each section, tried in order.
pub const SUMMARY_FILES: [&str; 2] = ["summary.md", "summary.txt"];
pub const PROFILE_FILES: [&str; 2] = ["profile.md", "profile.txt"];

/// The person this agent represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// The represented person's name
    pub name: String,

    /// Short background summary (may be empty)
    pub summary: String,

    /// Full professional profile text (may be empty)
    pub profile: String,

    /// Which context files were loaded (for diagnostics)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loaded_files: Vec<String>,
}

impl Persona {
    /// A persona with a name and no context files.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
            profile: String::new(),
            loaded_files: Vec::new(),
        }
    }

    /// Load persona context files from a directory.
    ///
    /// For each section the candidate file names are tried in order and the
    /// first readable, non-blank one wins. A missing directory yields a
    /// persona with empty sections, not an error.
    pub fn load(dir: &Path, name: impl Into<String>) -> Self {
        let mut persona = Self::new(name);

        if let Some((path, content)) = Self::first_readable(dir, &SUMMARY_FILES) {
            debug!(file = %path, "Loaded persona summary");
            persona.loaded_files.push(path);
            persona.summary = content;
        }
        if let Some((path, content)) = Self::first_readable(dir, &PROFILE_FILES) {
            debug!(file = %path, "Loaded persona profile");
            persona.loaded_files.push(path);
            persona.profile = content;
        }

        if persona.loaded_files.is_empty() {
            debug!(dir = %dir.display(), "No persona context files found");
        }

        persona
    }

    /// True when at least one context section was loaded.
    pub fn has_context(&self) -> bool {
        !self.summary.trim().is_empty() || !self.profile.trim().is_empty()
    }

    /// Assemble the system prompt that opens every model invocation.
    ///
    /// The instructions name the two recording tools by their registered
    /// names; renaming a tool means updating this prompt too.
    pub fn system_prompt(&self) -> String {
        let name = &self.name;
        let mut prompt = format!(
            "You are acting as {name}. You are answering questions on {name}'s website, \
             particularly questions related to {name}'s career, background, skills and \
             experience. Your responsibility is to represent {name} for interactions on \
             the website as faithfully as possible. You are given a summary of {name}'s \
             background and a professional profile which you can use to answer questions. \
             Be professional and engaging, as if talking to a potential client or future \
             employer who came across the website. If you don't know the answer to any \
             question, use your record_unknown_question tool to record the question that \
             you couldn't answer, even if it's about something trivial or unrelated to \
             career. If the user is engaging in discussion, try to steer them towards \
             getting in touch via email; ask for their email and record it using your \
             record_contact tool."
        );

        if !self.summary.trim().is_empty() {
            prompt.push_str("\n\n## Summary:\n");
            prompt.push_str(self.summary.trim());
        }
        if !self.profile.trim().is_empty() {
            prompt.push_str("\n\n## Profile:\n");
            prompt.push_str(self.profile.trim());
        }

        prompt.push_str(&format!(
            "\n\nWith this context, please chat with the user, always staying in \
             character as {name}."
        ));

        prompt
    }

    /// Try candidate file names in order, returning the first that reads to
    /// non-blank content. Unreadable files are skipped, not errors.
    fn first_readable(dir: &Path, candidates: &[&str]) -> Option<(String, String)> {
        for filename in candidates {
            let path = dir.join(filename);
            if let Some(content) = Self::read_file_safe(&path) {
                if !content.trim().is_empty() {
                    return Some((path.display().to_string(), content));
                }
            }
        }
        None
    }

    /// Safely read a file, returning None on any error.
    fn read_file_safe(path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}
