use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line reader over stdin
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// Next non-empty trimmed line, `None` at EOF
    pub async fn next_line(&mut self) -> Result<Option<String>, anyhow::Error> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }

        tracing::info!("Console input closed");
        Ok(None)
    }
}
