//! CLI adapter — interactive and single-message command line interface.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::agent::ConversationHistory;
use crate::gateway::ResponseGateway;
use crate::Result;

/// CLI channel for interactive chat sessions.
pub struct CliChannel {
    gateway: ResponseGateway,
    history: ConversationHistory,
}

impl CliChannel {
    /// Create a new CLI channel.
    pub fn new(gateway: ResponseGateway) -> Self {
        Self {
            gateway,
            history: ConversationHistory::new(),
        }
    }

    /// Run a single message and return the display text.
    pub async fn run_once(&mut self, message: &str) -> String {
        self.history.push_user(message);
        self.gateway.respond_turn(&mut self.history).await;

        self.history
            .turns()
            .last()
            .and_then(|turn| turn.reply.clone())
            .unwrap_or_default()
    }

    /// Run interactive REPL loop.
    pub async fn run_interactive(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("\n{}: ", "You".blue().bold());
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let input = line.trim();
            if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "q") {
                println!("Goodbye! 👋");
                break;
            }

            // The gateway handles empty input and all failures itself,
            // so every submission gets a printable reply.
            let reply = self.run_once(input).await;
            println!("\n{}: {}", "Agent".green().bold(), reply);
        }

        Ok(())
    }

    /// Clear conversation history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Get current history length.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
