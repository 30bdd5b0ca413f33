//! Output formatting for CLI.

use colored::Colorize;
use serde::Serialize;
use tlsgate_types::GatewayEvent;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for the fee command.
#[derive(Debug, Serialize)]
pub struct FeeOutput {
    pub request_bytes: u64,
    pub max_response_bytes: u64,
    pub token_wei_per_byte: String,
    pub payment_token: String,
    pub fee: String,
}

impl Render for FeeOutput {
    fn render_human(&self) -> String {
        [
            format!("{} {}", "Fee:".green().bold(), self.fee),
            format!(
                "{} {} request + {} response bytes at {} wei/byte",
                "Basis:".bold(),
                self.request_bytes,
                self.max_response_bytes,
                self.token_wei_per_byte
            ),
            format!("{} {}", "Payment token:".bold(), self.payment_token),
        ]
        .join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for the callback-gas command.
#[derive(Debug, Serialize)]
pub struct CallbackGasOutput {
    pub response_len: u64,
    pub gas: u64,
}

impl Render for CallbackGasOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {} (for a {} byte response)",
            "Callback gas:".green().bold(),
            self.gas,
            self.response_len
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for the request-id and request-hash commands.
#[derive(Debug, Serialize)]
pub struct HashOutput {
    pub label: &'static str,
    pub hash: String,
}

impl Render for HashOutput {
    fn render_human(&self) -> String {
        format!("{} {}", format!("{}:", self.label).bold(), self.hash)
    }

    fn render_json(&self) -> String {
        let mut map = serde_json::Map::new();
        map.insert(
            self.label.to_lowercase().replace(' ', "_"),
            serde_json::Value::String(self.hash.clone()),
        );
        serde_json::to_string_pretty(&map).unwrap_or_default()
    }
}

/// Output for the simulate command.
#[derive(Debug, Serialize)]
pub struct SimulateOutput {
    pub gateway: String,
    pub account: String,
    pub request_id: String,
    pub request_hash: String,
    pub fee_paid: String,
    pub gas_used: u64,
    pub events: Vec<GatewayEvent>,
}

impl Render for SimulateOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("{} {}", "Gateway:".bold(), self.gateway),
            format!("{} {}", "Account:".bold(), self.account),
            format!("{} {}", "Request id:".green().bold(), self.request_id),
            format!("{} {}", "Request hash:".bold(), self.request_hash),
            format!("{} {}", "Fee paid:".bold(), self.fee_paid),
            format!("{} {}", "Callback gas used:".bold(), self.gas_used),
            format!("{}", "Events:".bold()),
        ];
        for event in &self.events {
            lines.push(format!("  {}", event.name().cyan()));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
