use std::env;

/// The one model this assistant talks to. Fixed at startup, not
/// user-selectable at runtime.
pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";
pub const DEFAULT_MODEL_DISPLAY: &str = "Gemini 2.0 Flash";

/// Environment variables checked for the Gemini API key, in order.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Load environment variables from .env files.
/// First loads from ~/.env (home directory), then from ./.env (project directory).
/// Project directory values take precedence over home directory values.
/// Call this before parsing CLI args to ensure env vars are available.
pub fn load_env_file() {
    // Load from home directory first (lower precedence)
    if let Some(home) = dirs::home_dir() {
        let home_env_path = home.join(".env");
        dotenv::from_path(home_env_path).ok();
    }

    // Load from project directory (higher precedence - overwrites home values)
    // dotenv::dotenv() loads from current directory's .env
    dotenv::dotenv().ok();
}

/// Resolve the API key from the environment.
/// Prefers GEMINI_API_KEY, falls back to GOOGLE_API_KEY.
/// Returns None if neither is set (the caller prompts interactively).
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|key| !key.trim().is_empty())
}
