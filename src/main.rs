use clap::{Parser, Subcommand};
use serde::Serialize;

use keyvault_lib::commands;
use keyvault_lib::config::Settings;
use keyvault_lib::{init_logging, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unlock the vault
    Login {
        #[arg(long = "password", id = "attempt", env = "KEYVAULT_LOGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Lock the vault
    Logout,
    /// List stored keys
    List,
    /// Show dashboard counts
    Stats,
    /// Add a key
    Add {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        label: Option<String>,
    },
    /// Remove a key by id
    Remove {
        id: String,
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
    /// Suggest a throwaway email and password for a new provider account
    Identity,
    /// Show how to get a key for a provider
    Guide {
        provider: String,
        /// Open the provider's key page in the browser
        #[arg(long)]
        open: bool,
    },
    /// Show where to get a replacement for a key
    Cycle { id: String },
    /// Check a key against the Gemini API
    Validate { key: String },
    /// Ask Gemini for acquisition steps, authenticating with a stored key
    AskGuide {
        /// Id of the stored Gemini key to authenticate with
        #[arg(long)]
        with: String,
        provider: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

async fn run(state: &AppState, command: Command) -> Result<(), String> {
    match command {
        Command::Login { password } => {
            commands::login(state, password)?;
            println!("Vault unlocked");
        }
        Command::Logout => {
            commands::logout(state)?;
            println!("Vault locked");
        }
        Command::List => print_json(&commands::get_keys(state)?)?,
        Command::Stats => print_json(&commands::get_stats(state)?)?,
        Command::Add { provider, key, label } => {
            print_json(&commands::add_key(state, key, provider, label)?)?
        }
        Command::Remove { id, yes } => {
            if !yes {
                return Err("Refusing to remove without --yes".to_string());
            }
            if commands::delete_key(state, id.clone(), yes)? {
                println!("Removed {}", id);
            } else {
                println!("No key with id {}", id);
            }
        }
        Command::Identity => print_json(&commands::generate_identity())?,
        Command::Guide { provider, open } => {
            let guide = commands::get_guide(provider)?;
            print_json(guide)?;
            if open {
                keyvault_lib::guide::open_keys_page(guide.provider).map_err(|e| e.to_string())?;
            }
        }
        Command::Cycle { id } => print_json(&commands::cycle_key(state, id)?)?,
        Command::Validate { key } => {
            let valid = commands::validate_key(state, key).await?;
            println!("{}", if valid { "valid" } else { "invalid" });
        }
        Command::AskGuide { with, provider } => {
            println!("{}", commands::fetch_guide(state, with, provider).await?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard = match init_logging(&cli.settings.log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let state = match AppState::new_production(cli.settings) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize");
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&state, cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use keyvault_lib::mocks::{InMemoryPersistence, RecordedKeyValidator};

    fn state_for(cli: &Cli) -> AppState {
        AppState::with_parts(
            Arc::new(InMemoryPersistence::new()),
            Arc::new(RecordedKeyValidator::new()),
            cli.settings.clone(),
        )
    }

    fn run_args(state: &AppState, args: &[&str]) -> Result<(), String> {
        let cli = Cli::parse_from(args.iter().copied());
        tokio_test::block_on(run(state, cli.command))
    }

    #[test]
    fn test_login_attempt_does_not_replace_gate_password() {
        let cli = Cli::parse_from(["keyvault", "login", "--password", "wrong"]);

        assert_eq!(cli.settings.password, "admin");
        assert!(matches!(&cli.command, Command::Login { password } if password == "wrong"));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let cli = Cli::parse_from(["keyvault", "login", "--password", "wrong"]);
        let state = state_for(&cli);

        let result = tokio_test::block_on(run(&state, cli.command));

        assert_eq!(result, Err("Access Denied: Invalid credentials.".to_string()));
        assert!(!state.vault.is_authenticated());
        assert_eq!(run_args(&state, &["keyvault", "list"]), Err("Not logged in".to_string()));
    }

    #[test]
    fn test_custom_gate_password() {
        let cli = Cli::parse_from([
            "keyvault",
            "--gate-password",
            "hunter2",
            "login",
            "--password",
            "admin",
        ]);
        assert_eq!(cli.settings.password, "hunter2");
        let state = state_for(&cli);

        assert!(tokio_test::block_on(run(&state, cli.command)).is_err());
        assert!(run_args(&state, &["keyvault", "login", "--password", "hunter2"]).is_ok());
        assert!(state.vault.is_authenticated());
    }

    #[test]
    fn test_key_commands_refused_before_login() {
        let cli = Cli::parse_from(["keyvault", "list"]);
        let state = state_for(&cli);

        for args in [
            vec!["keyvault", "list"],
            vec!["keyvault", "stats"],
            vec!["keyvault", "cycle", "3"],
            vec!["keyvault", "remove", "1", "--yes"],
            vec!["keyvault", "add", "--provider", "OpenAI", "--key", "sk-x"],
        ] {
            assert_eq!(run_args(&state, &args), Err("Not logged in".to_string()));
        }
        assert_eq!(state.vault.list().len(), 3);
    }

    #[test]
    fn test_remove_requires_yes() {
        let cli = Cli::parse_from(["keyvault", "list"]);
        let state = state_for(&cli);
        run_args(&state, &["keyvault", "login", "--password", "admin"]).unwrap();

        assert_eq!(
            run_args(&state, &["keyvault", "remove", "1"]),
            Err("Refusing to remove without --yes".to_string())
        );
        assert_eq!(state.vault.list().len(), 3);

        run_args(&state, &["keyvault", "remove", "1", "--yes"]).unwrap();
        assert!(state.vault.get("1").is_none());
    }

    #[test]
    fn test_identity_and_guide_need_no_login() {
        let cli = Cli::parse_from(["keyvault", "identity"]);
        let state = state_for(&cli);

        assert!(run_args(&state, &["keyvault", "identity"]).is_ok());
        assert!(run_args(&state, &["keyvault", "guide", "mistral"]).is_ok());
    }
}
