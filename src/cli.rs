use anyhow::anyhow;
use clap::Parser;

pub const DEFAULT_BAUD: u32 = 115_200;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "board-tester",
    about = "Smoke test for a serial config board (echo + throughput)"
)]
pub struct Cli {
    /// Serial device (default: COM3 on Windows, /dev/ttyUSB0 elsewhere)
    #[arg(allow_hyphen_values = true)]
    pub port: Option<String>,
    /// Baud rate
    #[arg(allow_hyphen_values = true)]
    pub baud: Option<String>,
    /// Anything after the baud rate is ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

impl Cli {
    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| default_port_for(std::env::consts::OS).to_string())
    }

    pub fn baud(&self) -> anyhow::Result<u32> {
        match self.baud.as_deref() {
            Some(text) => parse_baud(text),
            None => Ok(DEFAULT_BAUD),
        }
    }
}

/// Default device for a platform identifier as reported by `std::env::consts::OS`.
pub fn default_port_for(os: &str) -> &'static str {
    if os == "windows" { "COM3" } else { "/dev/ttyUSB0" }
}

pub fn parse_baud(text: &str) -> anyhow::Result<u32> {
    text.trim()
        .parse()
        .map_err(|_| anyhow!("Invalid baudrate"))
}
