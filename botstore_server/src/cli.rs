use std::{env, env::VarError};

/// Variables that are safe to print as-is.
const DISPLAY_ENVS: [&str; 17] = [
    "RUST_LOG",
    "BOTSTORE_HOST",
    "BOTSTORE_PORT",
    "BOTSTORE_DATA_DIR",
    "BOTSTORE_ENV",
    "BOTSTORE_USE_X_FORWARDED_FOR",
    "BOTSTORE_USE_FORWARDED",
    "BOTSTORE_WEBHOOK_SIGNATURE_CHECKS",
    "BOTSTORE_PAYMENT_FALLBACK",
    "BOTSTORE_EXPIRY_INTERVAL_SECS",
    "BOTSTORE_ATLANTIC_BASE_URL",
    "BOTSTORE_PANEL_URL",
    "BOTSTORE_PANEL_LOCATION_ID",
    "BOTSTORE_PANEL_EGG_ID",
    "BOTSTORE_PANEL_DOCKER_IMAGE",
    "BOTSTORE_PANEL_CONTACT_DOMAIN",
    "BOTSTORE_REMOTE_TIMEOUT_SECS",
];

/// Variables holding credentials. Only their presence is reported.
const SECRET_ENVS: [&str; 3] = ["BOTSTORE_WEBHOOK_SECRET", "BOTSTORE_ATLANTIC_API_KEY", "BOTSTORE_PANEL_API_KEY"];

/// There's no real CLI for the server. Any argument prints the help text and the current configuration, and the
/// caller should exit.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        println!("\n{}\n", include_str!("./cli-help.txt"));
        display_envs();
    }
    has_cli_args
}

fn display_envs() {
    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| println!("  {name:<35} {:<15}", describe(name, false)));
    SECRET_ENVS.iter().for_each(|&name| println!("  {name:<35} {:<15}", describe(name, true)));
}

fn describe(name: &str, secret: bool) -> String {
    match env::var(name) {
        Ok(s) if secret && s.is_empty() => "Empty".into(),
        Ok(_) if secret => "****".into(),
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(_)) if secret => "Invalid value".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
