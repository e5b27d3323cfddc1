//! Command-line front end for the compact AES core.
//!
//! The core itself only accepts short, block-aligned buffers; this binary
//! layers file handling on top, feeding longer inputs through in segments
//! and chaining CBC state across segment boundaries.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use microaes_core::{
    cbc_decrypt, cbc_encrypt, ecb_decrypt, ecb_encrypt, Block, Variant, BLOCK_SIZE, MAX_INPUT_SIZE,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Compact AES CLI.
#[derive(Parser)]
#[command(
    name = "microaes",
    version,
    author,
    about = "Compact AES encryption tool (ECB/CBC, 128/192/256-bit keys)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Electronic code book. Insecure; provided for compatibility only.
    Ecb,
    /// Cipher block chaining.
    Cbc,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file in place-equivalent fashion, writing the result out.
    Enc {
        /// Key as 32, 48 or 64 hex characters; selects AES-128/192/256.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Block mode.
        #[arg(long, value_enum, default_value = "cbc")]
        mode: Mode,
        /// IV as 32 hex characters (CBC only).
        #[arg(long, value_name = "HEX")]
        iv_hex: Option<String>,
        /// Input file (length must be a nonzero multiple of 16 bytes).
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output ciphertext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Decrypt a file produced by `enc` with the same key, mode and IV.
    Dec {
        /// Key as 32, 48 or 64 hex characters; selects AES-128/192/256.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Block mode.
        #[arg(long, value_enum, default_value = "cbc")]
        mode: Mode,
        /// IV as 32 hex characters (CBC only).
        #[arg(long, value_name = "HEX")]
        iv_hex: Option<String>,
        /// Input ciphertext file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output plaintext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Round-trip a random buffer and print the intermediate hex.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc {
            key_hex,
            mode,
            iv_hex,
            input,
            output,
        } => cmd_enc(&key_hex, mode, iv_hex.as_deref(), &input, &output),
        Commands::Dec {
            key_hex,
            mode,
            iv_hex,
            input,
            output,
        } => cmd_dec(&key_hex, mode, iv_hex.as_deref(), &input, &output),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn cmd_enc(
    key_hex: &str,
    mode: Mode,
    iv_hex: Option<&str>,
    input: &PathBuf,
    output: &PathBuf,
) -> Result<()> {
    let (key, variant) = parse_key_hex(key_hex)?;
    let mut data = read_aligned(input)?;
    match mode {
        Mode::Ecb => {
            for segment in data.chunks_mut(MAX_INPUT_SIZE) {
                ecb_encrypt(segment, &key, variant)?;
            }
        }
        Mode::Cbc => {
            let mut iv = parse_iv_hex(iv_hex)?;
            for segment in data.chunks_mut(MAX_INPUT_SIZE) {
                cbc_encrypt(segment, &key, &iv, variant)?;
                // The segment's final ciphertext block seeds the next segment.
                iv.copy_from_slice(&segment[segment.len() - BLOCK_SIZE..]);
            }
        }
    }
    fs::write(output, data).with_context(|| format!("write {}", output.display()))?;
    Ok(())
}

fn cmd_dec(
    key_hex: &str,
    mode: Mode,
    iv_hex: Option<&str>,
    input: &PathBuf,
    output: &PathBuf,
) -> Result<()> {
    let (key, variant) = parse_key_hex(key_hex)?;
    let mut data = read_aligned(input)?;
    match mode {
        Mode::Ecb => {
            for segment in data.chunks_mut(MAX_INPUT_SIZE) {
                ecb_decrypt(segment, &key, variant)?;
            }
        }
        Mode::Cbc => {
            let mut iv = parse_iv_hex(iv_hex)?;
            for segment in data.chunks_mut(MAX_INPUT_SIZE) {
                let next_iv: Block = segment[segment.len() - BLOCK_SIZE..]
                    .try_into()
                    .expect("segment ends on a block boundary");
                cbc_decrypt(segment, &key, &iv, variant)?;
                iv = next_iv;
            }
        }
    }
    fs::write(output, data).with_context(|| format!("write {}", output.display()))?;
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let mut iv = [0u8; BLOCK_SIZE];
    rng.fill_bytes(&mut iv);
    let mut data = [0u8; MAX_INPUT_SIZE];
    rng.fill_bytes(&mut data);
    let plaintext_hex = hex::encode(data);

    cbc_encrypt(&mut data, &key, &iv, Variant::Aes128)?;
    let ciphertext_hex = hex::encode(data);
    cbc_decrypt(&mut data, &key, &iv, Variant::Aes128)?;
    let decrypted_hex = hex::encode(data);

    println!("demo key: {}", hex::encode(key));
    println!("demo iv: {}", hex::encode(iv));
    println!("plaintext: {plaintext_hex}");
    println!("ciphertext: {ciphertext_hex}");
    println!("decrypted: {decrypted_hex}");
    if decrypted_hex != plaintext_hex {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn parse_key_hex(key_hex: &str) -> Result<(Vec<u8>, Variant)> {
    let key = hex::decode(key_hex.trim()).context("decode key hex")?;
    let variant = match key.len() {
        16 => Variant::Aes128,
        24 => Variant::Aes192,
        32 => Variant::Aes256,
        other => bail!("key must be 16, 24 or 32 bytes, got {other}"),
    };
    Ok((key, variant))
}

fn parse_iv_hex(iv_hex: Option<&str>) -> Result<Block> {
    let Some(iv_hex) = iv_hex else {
        bail!("--iv-hex is required in CBC mode");
    };
    let bytes = hex::decode(iv_hex.trim()).context("decode IV hex")?;
    if bytes.len() != BLOCK_SIZE {
        bail!("IV must be {BLOCK_SIZE} bytes (32 hex characters)");
    }
    let mut iv = [0u8; BLOCK_SIZE];
    iv.copy_from_slice(&bytes);
    Ok(iv)
}

fn read_aligned(input: &PathBuf) -> Result<Vec<u8>> {
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        bail!("input length must be a nonzero multiple of {BLOCK_SIZE} bytes");
    }
    Ok(data)
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
