//! Hash password command handler

use anyhow::Context;

use crate::config::{Config, PASSWORD_HASH_ENV};
use crate::services::hash_password;

pub fn cmd_hash_password(config: &Config, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            eprintln!("Enter password:");
            let mut input = String::new();
            std::io::stdin()
                .read_line(&mut input)
                .context("Failed to read password from stdin")?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let hash = hash_password(&password, &config.security)?;

    println!("{hash}");
    eprintln!();
    eprintln!("Set it in your environment or .env file:");
    eprintln!("  {PASSWORD_HASH_ENV}='{hash}'");

    Ok(())
}
