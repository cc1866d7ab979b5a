use anyhow::{Context, Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const SECRET_ENV: &str = "IRONSEAL_SECRET";

pub fn read_secret() -> Result<Zeroizing<String>> {
    //  Environment variable (also picked up from .env)
    //  IRONSEAL_SECRET="..." ironseal seal hello
    if let Ok(secret) = std::env::var(SECRET_ENV) {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    //  stdin (pipeline)
    //  printf "%s" "$SECRET" | ironseal unseal <token>
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin()
            .read_line(&mut buf)
            .context("failed to read secret from stdin")?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
        bail!("No secret provided");
    }

    //  Interactive (TTY)
    let secret = rpassword::prompt_password("Secret: ")?;
    if !secret.is_empty() {
        return Ok(Zeroizing::new(secret));
    }

    bail!("No secret provided")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
