use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Interpret a yes/no answer. Empty input falls back to the default.
fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        default_yes
    } else {
        matches!(input.as_str(), "y" | "yes" | "o" | "oui")
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
pub fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    Ok(parse_yes_no(&input, default_yes))
}
