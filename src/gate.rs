use std::io::{self, BufRead, Write};

use log::{info, warn};
use sha2::{Digest, Sha256};

use crate::config::AccessConfig;
use crate::console::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted,
    Denied,
}

/// Up-front password challenge against a configured shared secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    digest: String,
    max_attempts: u32,
}

impl AccessGate {
    /// `None` when no secret is configured, meaning the gate is off.
    pub fn from_config(access: &AccessConfig) -> Option<Self> {
        let digest = match (&access.password, &access.password_sha256) {
            (_, Some(hex)) => hex.trim().to_ascii_lowercase(),
            (Some(plain), None) => sha256_hex(plain),
            (None, None) => return None,
        };
        Some(Self {
            digest,
            max_attempts: access.max_attempts,
        })
    }

    pub fn challenge<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> io::Result<GateOutcome> {
        for attempt in 1..=self.max_attempts {
            let Some(answer) = console.ask("Password: ")? else {
                warn!("event=access_gate status=input_closed attempt={attempt}");
                return Ok(GateOutcome::Denied);
            };
            if sha256_hex(&answer) == self.digest {
                info!("event=access_gate status=granted attempt={attempt}");
                return Ok(GateOutcome::Granted);
            }

            let left = self.max_attempts - attempt;
            warn!("event=access_gate status=rejected attempt={attempt} left={left}");
            if left > 0 {
                console.warn(&format!("Wrong password. {left} attempt(s) left."))?;
            }
        }

        console.warn("Too many failed attempts. Exiting.")?;
        Ok(GateOutcome::Denied)
    }
}

pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{sha256_hex, AccessGate, GateOutcome};
    use crate::config::AccessConfig;
    use crate::console::Console;
    use crate::ui::Palette;

    fn access(password: Option<&str>, password_sha256: Option<&str>) -> AccessConfig {
        AccessConfig {
            password: password.map(str::to_string),
            password_sha256: password_sha256.map(str::to_string),
            max_attempts: 3,
        }
    }

    fn challenge(gate: &AccessGate, input: &str) -> (GateOutcome, String) {
        let mut console = Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            Palette::plain(),
        );
        let outcome = gate.challenge(&mut console).expect("challenge should run");
        let output = String::from_utf8(console.into_output()).expect("utf8 output");
        (outcome, output)
    }

    #[test]
    fn no_secret_means_no_gate() {
        assert!(AccessGate::from_config(&access(None, None)).is_none());
    }

    #[test]
    fn accepts_correct_password_on_last_attempt() {
        let gate = AccessGate::from_config(&access(Some("1234"), None)).expect("gate enabled");
        let (outcome, output) = challenge(&gate, "no\nnope\n1234\n");
        assert_eq!(outcome, GateOutcome::Granted);
        assert!(output.contains("Wrong password. 2 attempt(s) left."));
        assert!(output.contains("Wrong password. 1 attempt(s) left."));
        assert!(!output.contains("Too many failed attempts"));
    }

    #[test]
    fn refuses_after_three_misses() {
        let gate = AccessGate::from_config(&access(Some("1234"), None)).expect("gate enabled");
        let (outcome, output) = challenge(&gate, "a\nb\nc\n1234\n");
        assert_eq!(outcome, GateOutcome::Denied);
        assert_eq!(output.matches("Password: ").count(), 3);
        assert!(output.contains("Too many failed attempts. Exiting."));
    }

    #[test]
    fn closed_input_is_denied() {
        let gate = AccessGate::from_config(&access(Some("1234"), None)).expect("gate enabled");
        let (outcome, _) = challenge(&gate, "");
        assert_eq!(outcome, GateOutcome::Denied);
    }

    #[test]
    fn hashed_secret_is_compared_by_digest() {
        let hex = sha256_hex("open sesame").to_ascii_uppercase();
        let gate = AccessGate::from_config(&access(None, Some(&hex))).expect("gate enabled");
        let (outcome, _) = challenge(&gate, "open sesame\n");
        assert_eq!(outcome, GateOutcome::Granted);
    }

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
