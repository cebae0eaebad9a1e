use anyhow::{Context, Result};
use clap::Parser;

mod board;
mod cli;
mod frame;
mod port;
mod stats;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    if !args.extra.is_empty() {
        eprintln!("[board] ignoring extra arguments: {:?}", args.extra);
    }
    let baud = match args.baud() {
        Ok(b) => b,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };

    let plan = board::TestPlan::new(args.port(), baud);
    let mut out = std::io::stdout().lock();
    let passed = board::run(&plan, &mut out);
    board::write_summary(passed, &mut out).context("writing summary")?;
    Ok(())
}
