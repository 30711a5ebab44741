use async_trait::async_trait;
use client_core::Prompt;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Confirmation on stdin, alerts on stderr.
pub struct TerminalPrompt {
    pub assume_yes: bool,
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match ask(message).await {
            Ok(answer) => is_affirmative(&answer),
            Err(err) => {
                tracing::warn!("could not read confirmation: {err}");
                false
            }
        }
    }

    async fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

async fn ask(message: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(format!("{message} [y/N] ").as_bytes()).await?;
    stderr.flush().await?;
    let mut answer = String::new();
    BufReader::new(io::stdin()).read_line(&mut answer).await?;
    Ok(answer)
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_affirms() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
    }

    #[tokio::test]
    async fn assume_yes_skips_stdin() {
        let prompt = TerminalPrompt { assume_yes: true };
        assert!(prompt.confirm("Are you sure?").await);
    }
}
