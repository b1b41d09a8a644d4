//! Derive public keys, sign digests, and recover signers from the command line.
//!
//! All inputs and outputs are hex (a `0x` prefix and whitespace are tolerated on input). Digests
//! must already be hashed; any length other than 32 bytes is left-padded or truncated.
//!
//! # Usage
//!
//! ## Derive a Public Key
//!
//! ```sh
//! cargo run --release --bin newchain-signer -- public-key --key 0x0101010101010101010101010101010101010101010101010101010101010101 --compressed
//! ```
//!
//! ```txt
//! public_key: 0x026ff03b949241ce1dadd43519e6960e0a85b41a69a05c328103aa2bce1594ca16
//! ```
//!
//! ## Sign a Digest
//!
//! ```sh
//! cargo run --release --bin newchain-signer -- sign --key 0x0101010101010101010101010101010101010101010101010101010101010101 --digest 0x0000000000000000000000000000000000000000000000000000000000000000
//! ```
//!
//! ## Recover the Signer
//!
//! ```sh
//! cargo run --release --bin newchain-signer -- recover --digest <digest> --signature <signature>
//! ```

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::Error;

fn main() {
    // Parse arguments
    let key = Arg::new("key")
        .long("key")
        .required(true)
        .help("Private key (32 bytes)");
    let digest = Arg::new("digest")
        .long("digest")
        .required(true)
        .help("Hashed digest to sign or recover from");
    let signature = Arg::new("signature")
        .long("signature")
        .required(true)
        .help("Joined (65 bytes) or compact (64 bytes) signature");
    let matches = Command::new("newchain-signer")
        .about("derive, sign, and recover with P-256 keys")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .value_parser(value_parser!(tracing::Level)),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("public-key")
                .about("derive or convert a public key")
                .arg(
                    Arg::new("key")
                        .long("key")
                        .required(true)
                        .help("Private key (32 bytes) or public key (33 or 65 bytes)"),
                )
                .arg(
                    Arg::new("compressed")
                        .long("compressed")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("sign")
                .about("sign a digest")
                .arg(key.clone())
                .arg(digest.clone()),
        )
        .subcommand(
            Command::new("recover")
                .about("recover the uncompressed public key of a signer")
                .arg(digest.clone())
                .arg(signature.clone()),
        )
        .subcommand(
            Command::new("shared-secret")
                .about("compute an ECDH shared secret")
                .arg(key)
                .arg(
                    Arg::new("peer")
                        .long("peer")
                        .required(true)
                        .help("Peer private or public key"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("verify a signature over a digest")
                .arg(digest)
                .arg(signature)
                .arg(Arg::new("public-key").long("public-key").required(true)),
        )
        .get_matches();

    // Create logger
    let level = *matches
        .get_one::<tracing::Level>("log-level")
        .unwrap_or(&tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // Run command
    if let Err(err) = run(&matches) {
        tracing::error!(%err, "command failed");
        std::process::exit(1);
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    match matches.subcommand() {
        Some(("public-key", matches)) => {
            let key = commands::decode_key(arg(matches, "key"))?;
            let compressed = matches.get_flag("compressed");
            let public_key = commands::public_key(&key, compressed)?;
            tracing::info!(compressed, %public_key, "derived public key");
            println!("public_key: {public_key}");
        }
        Some(("sign", matches)) => {
            let key = commands::decode_key(arg(matches, "key"))?;
            let digest = commands::decode("digest", arg(matches, "digest"))?;
            let signed = commands::sign(&key, &digest)?;
            tracing::info!(public_key = %signed.public_key, "signed digest");
            println!("r: {}", signed.r);
            println!("s: {}", signed.s);
            println!("v: {}", signed.v);
            println!("recovery_param: {}", signed.recovery_param);
            println!("signature: {}", signed.signature);
        }
        Some(("recover", matches)) => {
            let digest = commands::decode("digest", arg(matches, "digest"))?;
            let signature = commands::decode("signature", arg(matches, "signature"))?;
            let public_key = commands::recover(&digest, &signature)?;
            tracing::info!(%public_key, "recovered signer");
            println!("public_key: {public_key}");
        }
        Some(("shared-secret", matches)) => {
            let key = commands::decode_key(arg(matches, "key"))?;
            let peer = commands::decode_key(arg(matches, "peer"))?;
            let secret = commands::shared_secret(&key, &peer)?;
            tracing::info!("computed shared secret");
            println!("shared_secret: {secret}");
        }
        Some(("verify", matches)) => {
            let digest = commands::decode("digest", arg(matches, "digest"))?;
            let signature = commands::decode("signature", arg(matches, "signature"))?;
            let public_key = commands::decode("public-key", arg(matches, "public-key"))?;
            let valid = commands::verify(&digest, &signature, &public_key)?;
            tracing::info!(valid, "verified signature");
            println!("valid: {valid}");
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}
