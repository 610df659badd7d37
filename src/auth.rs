use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

fn env_password() -> Option<Zeroizing<String>> {
    //  SEALBOX_PASSWORD="supersecret" sealbox decrypt --in backup.env
    std::env::var("SEALBOX_PASSWORD")
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Reads the password for decryption.
///
/// `stdin_free` is false when stdin already carries the payload; the
/// password then has to come from the environment or a terminal, never from
/// a line of the payload stream.
pub fn read_password(stdin_free: bool) -> Result<Zeroizing<String>> {
    if let Some(pw) = env_password() {
        return Ok(pw);
    }

    if !io::stdin().is_terminal() {
        if !stdin_free {
            bail!(
                "stdin carries the payload data; set SEALBOX_PASSWORD or read the payload from a file with --in"
            );
        }

        //  printf "%s" "$SEALBOX_PASSWORD" | sealbox decrypt --in backup.env
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        let pw = buf.trim_end().to_string();

        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
        bail!("no password provided");
    }

    let pw = rpassword::prompt_password("Password: ")?;
    if !pw.is_empty() {
        return Ok(Zeroizing::new(pw));
    }

    bail!("no password provided")
}

/// Reads the password for encryption.
///
/// Interactive use prompts twice and rejects a mismatch, so a typo cannot
/// produce an envelope nobody can decrypt. Scripted pipelines supply the
/// password once via the environment or a piped line.
pub fn read_encrypt_password(stdin_free: bool) -> Result<Zeroizing<String>> {
    if let Some(pw) = env_password() {
        return Ok(pw);
    }

    if !io::stdin().is_terminal() {
        return read_password(stdin_free);
    }

    let pw = rpassword::prompt_password("New password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;

    if pw.is_empty() {
        bail!("password cannot be empty");
    }
    if pw != confirm {
        bail!("passwords do not match");
    }

    Ok(Zeroizing::new(pw))
}
