//! Palisade Command Line Tool
//!
//! Provides commands for working with Palisade keys and tokens:
//! - keygen: Generate an Ed25519 keypair
//! - capability: Mint a capability token
//! - inspect: Decode and optionally verify a capability token
//! - canonicalize: Generate canonical JSON representation
//! - hash: Compute BLAKE3 hash of canonical JSON

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use palisade_canonical::{canonical_bytes, hash_canonical};
use palisade_capability::{mint, CapabilityClaims, CapabilityToken};
use palisade_signing::{KeyPair, PublicKey, SharedSecret, Signer, VerifierKey};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "palisade")]
#[command(version)]
#[command(about = "Palisade Command Line Tool - keys, capability tokens, and canonical JSON")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 keypair
    #[command(about = "Generate an Ed25519 keypair and write the seed to a file")]
    Keygen {
        /// Where to write the hex-encoded seed
        #[arg(value_name = "FILE")]
        out: PathBuf,
    },

    /// Mint a capability token
    #[command(about = "Mint a signed capability token")]
    Capability {
        /// Path to the Ed25519 seed file
        #[arg(long, conflicts_with = "hmac_secret")]
        key: Option<PathBuf>,

        /// HMAC shared secret (fallback scheme)
        #[arg(long)]
        hmac_secret: Option<String>,

        /// Token subject, e.g. the guardian id
        #[arg(long)]
        subject: String,

        /// Token audience
        #[arg(long, default_value = "palisade-portal")]
        audience: String,

        /// Scope to grant; repeat for multiple
        #[arg(long = "scope", value_name = "SCOPE")]
        scopes: Vec<String>,

        /// Issuer identifier; defaults to did:palisade:<subject>
        #[arg(long)]
        issuer: Option<String>,

        /// Token lifetime in seconds
        #[arg(long, default_value_t = 300)]
        lifetime: i64,
    },

    /// Decode and optionally verify a capability token
    #[command(about = "Decode a capability token and verify it when a key is given")]
    Inspect {
        /// The base64 token
        #[arg(value_name = "TOKEN")]
        token: String,

        /// Hex-encoded Ed25519 public key to verify against
        #[arg(long, conflicts_with = "hmac_secret")]
        pubkey: Option<String>,

        /// HMAC shared secret to verify against
        #[arg(long)]
        hmac_secret: Option<String>,

        /// Expected audience
        #[arg(long, default_value = "palisade-portal")]
        audience: String,
    },

    /// Canonicalize a JSON file
    #[command(about = "Output canonical JSON representation")]
    Canonicalize {
        /// Path to the JSON file to canonicalize
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compute BLAKE3 hash of canonical JSON
    #[command(about = "Compute BLAKE3 hash of canonical JSON")]
    Hash {
        /// Path to the JSON file to hash
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { out } => handle_keygen(&out),
        Commands::Capability {
            key,
            hmac_secret,
            subject,
            audience,
            scopes,
            issuer,
            lifetime,
        } => handle_capability(
            key.as_deref(),
            hmac_secret.as_deref(),
            &subject,
            &audience,
            scopes,
            issuer,
            lifetime,
        ),
        Commands::Inspect {
            token,
            pubkey,
            hmac_secret,
            audience,
        } => handle_inspect(&token, pubkey.as_deref(), hmac_secret.as_deref(), &audience),
        Commands::Canonicalize { file } => handle_canonicalize(&file),
        Commands::Hash { file } => handle_hash(&file),
    }
}

fn handle_keygen(out: &Path) -> Result<()> {
    let keypair = KeyPair::generate();
    std::fs::write(out, format!("{}\n", keypair.seed_hex()))
        .with_context(|| format!("Failed to write seed file: {}", out.display()))?;

    println!("Seed file: {}", out.display());
    println!("Public key (hex): {}", keypair.public_key().to_hex());
    println!("Public key (base64): {}", keypair.public_key().to_base64());
    println!("Key id: {}", keypair.key_id());

    Ok(())
}

fn handle_capability(
    key: Option<&Path>,
    hmac_secret: Option<&str>,
    subject: &str,
    audience: &str,
    scopes: Vec<String>,
    issuer: Option<String>,
    lifetime: i64,
) -> Result<()> {
    let signer = build_signer(key, hmac_secret)?;
    let issued_by = issuer.unwrap_or_else(|| format!("did:palisade:{subject}"));

    let claims = CapabilityClaims::new(
        subject,
        audience,
        scopes,
        issued_by,
        chrono::Utc::now().timestamp(),
        lifetime,
    );
    let wire = mint(&claims, &signer).with_context(|| "Failed to mint capability token")?;

    println!("{wire}");
    if let Signer::Ed25519(keypair) = &signer {
        eprintln!("Public key (hex): {}", keypair.public_key().to_hex());
    }

    Ok(())
}

fn handle_inspect(
    token: &str,
    pubkey: Option<&str>,
    hmac_secret: Option<&str>,
    audience: &str,
) -> Result<()> {
    let token = CapabilityToken::decode(token).with_context(|| "Failed to decode token")?;

    let pretty = serde_json::to_string_pretty(&token)
        .with_context(|| "Failed to render decoded token")?;
    println!("{pretty}");

    let verifier = match (pubkey, hmac_secret) {
        (Some(hex_key), _) => Some(VerifierKey::Ed25519(
            PublicKey::from_hex(hex_key).with_context(|| "Failed to parse public key")?,
        )),
        (None, Some(secret)) => Some(VerifierKey::Hmac(SharedSecret::new(secret))),
        (None, None) => None,
    };

    if let Some(verifier) = verifier {
        token
            .verify(&verifier, audience, chrono::Utc::now().timestamp())
            .with_context(|| "Token verification failed")?;
        println!("Token is valid");
    }

    Ok(())
}

fn handle_canonicalize(file: &Path) -> Result<()> {
    let value = read_json(file)?;

    let canonical =
        canonical_bytes(&value).with_context(|| "Failed to generate canonical JSON")?;

    std::io::stdout()
        .write_all(&canonical)
        .with_context(|| "Failed to write output")?;

    Ok(())
}

fn handle_hash(file: &Path) -> Result<()> {
    let value = read_json(file)?;

    let hash = hash_canonical(&value).with_context(|| "Failed to compute hash")?;

    println!("{hash}");

    Ok(())
}

fn build_signer(key: Option<&Path>, hmac_secret: Option<&str>) -> Result<Signer> {
    match (key, hmac_secret) {
        (Some(path), _) => Ok(Signer::Ed25519(
            KeyPair::from_seed_file(path)
                .with_context(|| format!("Failed to load key file: {}", path.display()))?,
        )),
        (None, Some(secret)) => Ok(Signer::Hmac(SharedSecret::new(secret))),
        (None, None) => bail!("either --key or --hmac-secret is required"),
    }
}

fn read_json(file: &Path) -> Result<serde_json::Value> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    serde_json::from_str(&json).with_context(|| format!("Failed to parse {} as JSON", file.display()))
}
