use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

mod auth;

#[derive(Debug, Parser)]
#[command(name = "sealbox")]
#[command(
    version,
    about = "Encrypt and decrypt data with a password, as a portable text envelope."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts input into a text envelope
    Encrypt {
        /// Read plaintext from this file instead of stdin
        #[arg(long = "in", value_name = "PATH")]
        input: Option<PathBuf>,

        /// Write the envelope to this file instead of stdout
        #[arg(long = "out", value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Decrypts a text envelope back into plaintext
    Decrypt {
        /// Read the envelope from this file instead of stdin
        #[arg(long = "in", value_name = "PATH")]
        input: Option<PathBuf>,

        /// Write plaintext to this file instead of stdout
        #[arg(long = "out", value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn read_input(path: Option<&PathBuf>) -> Result<Zeroizing<Vec<u8>>> {
    let data = match path {
        Some(p) => fs::read(p).with_context(|| format!("failed to read {}", p.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
            buf
        }
    };
    Ok(Zeroizing::new(data))
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(p) => fs::write(p, data).with_context(|| format!("failed to write {}", p.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // The password is read before any payload so that a piped password
    // never mixes with piped payload data; auth refuses to take both from
    // stdin.
    match args.command {
        Commands::Encrypt { input, output } => {
            let password = auth::read_encrypt_password(input.is_some())?;
            let plaintext = read_input(input.as_ref())?;
            let envelope = sealbox::encrypt(&plaintext, password.as_bytes())?;
            write_output(output.as_ref(), envelope.as_bytes())?;
        }
        Commands::Decrypt { input, output } => {
            let password = auth::read_password(input.is_some())?;
            let text = read_input(input.as_ref())?;
            let text = std::str::from_utf8(&text).context("envelope is not valid UTF-8")?;
            let plaintext = sealbox::decrypt(text, password.as_bytes())?;
            write_output(output.as_ref(), &plaintext)?;
        }
    }

    Ok(())
}
