use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
mod auth;
use ironseal::{Clock, Expiration, SealedToken, SystemClock, is_sealed, parse_ttl, seal, unseal};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ironseal")]
#[command(
    version,
    about = "Seal values into tamper-evident Fe26.2 tokens and unseal them again."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seals a value into a token
    #[command(arg_required_else_help = true)]
    Seal {
        value: String,

        /// Time to live, e.g. "30 min", "2 days" or plain milliseconds
        #[arg(long, env = "IRONSEAL_TTL", value_parser = parse_ttl)]
        ttl: Option<u64>,
    },

    /// Verifies a token and prints the value it carries
    #[command(arg_required_else_help = true)]
    Unseal {
        token: String,

        /// Pretty-print the value if it is JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// Shows the unauthenticated fields of a token
    #[command(arg_required_else_help = true)]
    Inspect {
        token: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Exits successfully if the value looks like a sealed token
    #[command(arg_required_else_help = true)]
    Check { value: String },
}

#[derive(Debug, Serialize)]
struct TokenInfo {
    version: String,
    expires_at: Option<String>,
    expired: bool,
    cipher_text_len: usize,
}

impl TokenInfo {
    fn from_token(token: &SealedToken, now_millis: i64) -> Result<Self> {
        let base = token.base();
        let expiration = base.expiration()?;
        let expires_at = match expiration {
            Expiration::Never => None,
            Expiration::At(at) => Some(
                DateTime::<Utc>::from_timestamp_millis(at)
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| at.to_string()),
            ),
        };

        Ok(Self {
            version: base.prefix().to_string(),
            expires_at,
            expired: expiration.is_expired(now_millis),
            cipher_text_len: base.cipher_text().len(),
        })
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Seal { value, ttl } => {
            let secret = auth::read_secret()?;
            let token = seal(&value, &secret, ttl)?;
            println!("{token}");
        }
        Commands::Unseal { token, pretty } => {
            let secret = auth::read_secret()?;
            let value = unseal(token.trim(), &secret)?;
            match serde_json::from_str::<serde_json::Value>(&value) {
                Ok(json) if pretty => println!("{}", serde_json::to_string_pretty(&json)?),
                _ => println!("{value}"),
            }
        }
        Commands::Inspect { token, json } => {
            let token = SealedToken::parse(token.trim())?;
            let info = TokenInfo::from_token(&token, SystemClock.now_millis())?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info).context("failed to render token info")?
                );
            } else {
                println!("version:  {}", info.version);
                println!(
                    "expires:  {}",
                    info.expires_at.as_deref().unwrap_or("never")
                );
                println!("expired:  {}", if info.expired { "yes" } else { "no" });
                println!("payload:  {} base64url characters", info.cipher_text_len);
            }
        }
        Commands::Check { value } => {
            if is_sealed(value.trim()) {
                println!("sealed");
            } else {
                println!("not sealed");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
