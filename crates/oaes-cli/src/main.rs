//! Command-line interface for the `oaes` envelope cipher.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use oaes::{armor, Cipher, KeySize, Mode};
use rand::SeedableRng;
use rand_isaac::IsaacRng;

/// AES envelope cipher CLI.
#[derive(Parser)]
#[command(
    name = "oaes",
    version,
    author,
    about = "Encrypt, decrypt, and manage keys in the OAES envelope format"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key and write it as a headered key blob.
    GenKey {
        /// Key size in bits (128, 192, or 256).
        #[arg(long, default_value_t = 128)]
        bits: u16,
        /// Output path for the key blob.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Optional RNG seed for reproducible generation.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt a file into a self-describing message.
    Enc {
        /// Path to the key blob.
        #[arg(long, value_name = "FILE")]
        key: PathBuf,
        /// Input plaintext path.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output message path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Use ECB instead of the default CBC.
        #[arg(long, default_value_t = false)]
        ecb: bool,
        /// Explicit IV as 32 hex characters (CBC only).
        #[arg(long, value_name = "HEX")]
        iv: Option<String>,
        /// Armor the output with base64.
        #[arg(long, default_value_t = false)]
        base64: bool,
        /// Optional RNG seed for reproducible IV generation.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Decrypt a message produced by `enc`.
    Dec {
        /// Path to the key blob.
        #[arg(long, value_name = "FILE")]
        key: PathBuf,
        /// Input message path.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output plaintext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Treat the input as base64 armor.
        #[arg(long, default_value_t = false)]
        base64: bool,
    },
    /// Run a local demo: generate a key, encrypt a sample, decrypt it back.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::GenKey { bits, out, seed } => cmd_gen_key(bits, &out, seed),
        Commands::Enc {
            key,
            input,
            output,
            ecb,
            iv,
            base64,
            seed,
        } => cmd_enc(&key, &input, &output, ecb, iv.as_deref(), base64, seed),
        Commands::Dec {
            key,
            input,
            output,
            base64,
        } => cmd_dec(&key, &input, &output, base64),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn cmd_gen_key(bits: u16, out: &PathBuf, seed: Option<u64>) -> Result<()> {
    let size = parse_key_size(bits)?;
    let mut cipher = seeded_cipher(seed);
    cipher.generate_key(size);
    let blob = cipher.export_key()?;
    fs::write(out, blob).with_context(|| format!("write {}", out.display()))?;
    Ok(())
}

fn cmd_enc(
    key_path: &PathBuf,
    input: &PathBuf,
    output: &PathBuf,
    ecb: bool,
    iv_hex: Option<&str>,
    armor_output: bool,
    seed: Option<u64>,
) -> Result<()> {
    let mut cipher = load_key(key_path, seed)?;
    if ecb {
        if iv_hex.is_some() {
            bail!("--iv only applies to CBC mode");
        }
        cipher.set_mode(Mode::Ecb);
    } else if let Some(text) = iv_hex {
        cipher.set_iv(parse_iv_hex(text)?);
    }

    let plaintext = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let message = cipher.encrypt(&plaintext)?;
    if armor_output {
        fs::write(output, armor::encode(&message))
            .with_context(|| format!("write {}", output.display()))?;
    } else {
        fs::write(output, message).with_context(|| format!("write {}", output.display()))?;
    }
    Ok(())
}

fn cmd_dec(key_path: &PathBuf, input: &PathBuf, output: &PathBuf, armored: bool) -> Result<()> {
    let cipher = load_key(key_path, None)?;
    let raw = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let message = if armored {
        let text = String::from_utf8(raw).context("armored input is not UTF-8")?;
        armor::decode(&text)?
    } else {
        raw
    };
    let plaintext = cipher.decrypt(&message)?;
    fs::write(output, plaintext).with_context(|| format!("write {}", output.display()))?;
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut cipher = seeded_cipher(seed);
    cipher.generate_key(KeySize::Bits128);

    let plaintext = b"oaes demo payload";
    let message = cipher.encrypt(plaintext)?;
    let recovered = cipher.decrypt(&message)?;

    println!("demo key:   {}", hex::encode(cipher.export_key_data()?));
    println!("plaintext:  {}", hex::encode(plaintext));
    println!("ciphertext: {}", hex::encode(&message));
    println!("decrypted:  {}", hex::encode(&recovered));
    if recovered != plaintext {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn parse_key_size(bits: u16) -> Result<KeySize> {
    KeySize::from_bits(bits)
        .with_context(|| format!("unsupported key size {bits}; expected 128, 192, or 256"))
}

fn parse_iv_hex(text: &str) -> Result<[u8; 16]> {
    let bytes = hex::decode(text.trim()).context("decode IV hex")?;
    if bytes.len() != 16 {
        bail!("IV must be 16 bytes (32 hex characters)");
    }
    let mut iv = [0u8; 16];
    iv.copy_from_slice(&bytes);
    Ok(iv)
}

fn load_key(path: &PathBuf, seed: Option<u64>) -> Result<Cipher> {
    let blob = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut cipher = seeded_cipher(seed);
    cipher
        .import_key(&blob)
        .with_context(|| format!("import key from {}", path.display()))?;
    Ok(cipher)
}

fn seeded_cipher(seed: Option<u64>) -> Cipher {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            Cipher::with_rng(IsaacRng::from_seed(seed_bytes))
        }
        None => Cipher::new(),
    }
}
