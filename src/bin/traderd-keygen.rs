use clap::Parser;
use std::path::PathBuf;
use traderd::keys;

/// Generate an Ed25519 keypair for the trading API and save the seed.
///
/// The base64 private seed lands in the secret file; keep it out of
/// source control. The printed public key goes into the broker's API key
/// setup page.
#[derive(Parser, Debug)]
#[command(name = "traderd-keygen", version, about)]
struct Cli {
    /// Trading API key (saved alongside the secret when given)
    #[arg(long)]
    api_key: Option<String>,

    /// Path to save the base64 private seed
    #[arg(long, default_value = "r_secret.txt")]
    secret_path: PathBuf,

    /// Path to save the API key
    #[arg(long, default_value = "r_key.txt")]
    key_path: PathBuf,

    /// Overwrite an existing secret file
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.secret_path.exists() && !cli.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            cli.secret_path.display()
        );
    }

    let keys = keys::generate_keys(&cli.secret_path, cli.api_key.as_deref(), &cli.key_path)?;

    println!("Keys generated and private seed saved to:");
    println!("  {}", keys.secret_path.display());
    match &keys.key_path {
        Some(path) => println!("  {} (saved)", path.display()),
        None => println!(
            "  {} (not written, run with --api-key to save it)",
            cli.key_path.display()
        ),
    }

    println!("\nPublic key formats (paste into the broker's API key page):\n");
    println!("Base64 public key:\n{}\n", keys.public_b64);
    println!("Hex public key:\n{}\n", keys.public_hex);
    println!("PEM-style public key:\n{}", keys.public_pem);

    Ok(())
}
