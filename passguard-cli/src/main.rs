use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use passguard::{BreachChecker, CredentialHasher, Error, HashParams, PasswordConfig};

#[derive(Parser, Debug)]
#[command(name = "passguard")]
#[command(about = "Hash, verify, and breach-check passwords from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash a password read from stdin and print the encoded hash
    Hash {
        /// Minimum accepted password length
        #[arg(long, default_value_t = passguard::DEFAULT_MIN_LENGTH)]
        min_length: usize,

        /// Pepper key mixed into the password before hashing
        #[arg(long)]
        secret: Option<String>,

        /// Skip the breach-corpus check
        #[arg(long)]
        no_breach_check: bool,

        /// Argon2 memory cost in KiB
        #[arg(long)]
        memory_cost: Option<u32>,

        /// Argon2 iteration count
        #[arg(long)]
        time_cost: Option<u32>,

        /// Argon2 parallelism
        #[arg(long)]
        parallelism: Option<u32>,
    },

    /// Verify a password read from stdin against a stored hash
    Verify {
        /// Encoded hash to verify against
        #[arg(long)]
        hash: String,

        /// Pepper key the hash was generated under
        #[arg(long)]
        secret: Option<String>,
    },

    /// Report how many times the password appears in the breach corpus
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let password = read_password()?;

    match cli.command {
        Command::Hash {
            min_length,
            secret,
            no_breach_check,
            memory_cost,
            time_cost,
            parallelism,
        } => {
            let mut config = PasswordConfig::default()
                .with_min_length(min_length)
                .with_check_common(!no_breach_check);
            if let Some(secret) = secret {
                config = config.with_secret(secret);
            }

            let mut params = HashParams::default();
            if let Some(memory_cost) = memory_cost {
                params.memory_cost_kib = memory_cost;
            }
            if let Some(time_cost) = time_cost {
                params.time_cost = time_cost;
            }
            if let Some(parallelism) = parallelism {
                params.parallelism = parallelism;
            }

            let hasher = CredentialHasher::new(config)?.with_params(params);
            match hasher.generate_password_hash(password.as_str()).await {
                Ok(hash) => {
                    println!("{hash}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) if err.is_validation() => {
                    eprintln!("rejected: {err}");
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => Err(err.into()),
            }
        }

        Command::Verify { hash, secret } => {
            let mut config = PasswordConfig::default().with_check_common(false);
            if let Some(secret) = secret {
                config = config.with_secret(secret);
            }

            let hasher = CredentialHasher::new(config)?;
            if hasher.check_password_hash(&hash, password.as_str()) {
                println!("ok");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("mismatch");
                Ok(ExitCode::FAILURE)
            }
        }

        Command::Check => {
            let checker = BreachChecker::new().map_err(Error::from)?;
            let count = checker.times_breached(&password).await.map_err(Error::from)?;
            println!("{count}");
            Ok(if count == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Reads the password as the first line of stdin so it never appears in the
/// process argument list.
fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
