//! The board smoke test: open, echo four messages, time a burst of writes, close.

use anyhow::Context;
use std::io::Write;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::frame::{TEST_MESSAGES, display_text, perf_payload};
use crate::port::{Link, LinkError, open_port};
use crate::stats::PerfSample;

pub const READ_TIMEOUT: Duration = Duration::from_secs(2);
pub const SETTLE: Duration = Duration::from_millis(500);
pub const PERF_WRITES: usize = 10;

pub const TROUBLESHOOTING: [&str; 4] = [
    "Check device connection",
    "Confirm driver is installed",
    "Check if port number is correct",
    "Try different baudrate",
];

#[derive(Debug, Clone)]
pub struct TestPlan {
    pub port: String,
    pub baud: u32,
    pub read_timeout: Duration,
    /// Wait after each echo-phase write before checking for a reply.
    pub settle: Duration,
    pub perf_writes: usize,
}

impl TestPlan {
    pub fn new(port: impl Into<String>, baud: u32) -> Self {
        Self {
            port: port.into(),
            baud,
            read_timeout: READ_TIMEOUT,
            settle: SETTLE,
            perf_writes: PERF_WRITES,
        }
    }
}

#[derive(Debug, Error)]
pub enum TestError {
    #[error("Serial error: {0}")]
    Serial(#[from] LinkError),
    #[error("Other error: {0:#}")]
    Other(#[from] anyhow::Error),
}

/// Run the test against the real serial port named in `plan`.
pub fn run<W: Write>(plan: &TestPlan, out: &mut W) -> bool {
    run_with(plan, out, |p| {
        let link = open_port(&p.port, p.baud, p.read_timeout)?;
        eprintln!("[board] opened {} at {} baud", link.name(), p.baud);
        Ok(link)
    })
}

/// Run the test over whatever link `open` produces. Returns true only if every
/// step, including the close, succeeded.
pub fn run_with<L, W, F>(plan: &TestPlan, out: &mut W, open: F) -> bool
where
    L: Link,
    W: Write,
    F: FnOnce(&TestPlan) -> Result<L, LinkError>,
{
    match try_run(plan, out, open) {
        Ok(()) => true,
        Err(e) => {
            let line = format!("✗ {e}");
            if writeln!(out, "{line}").is_err() {
                eprintln!("[board] {line}");
            }
            false
        }
    }
}

fn try_run<L, W, F>(plan: &TestPlan, out: &mut W, open: F) -> Result<(), TestError>
where
    L: Link,
    W: Write,
    F: FnOnce(&TestPlan) -> Result<L, LinkError>,
{
    write_header(plan, out).context("writing report")?;

    let mut link = open(plan)?;
    writeln!(out, "✓ Serial connection successful").context("writing report")?;

    let result = exercise(&mut link, plan, out);
    let closed = link.close();
    match (result, closed) {
        (Err(e), Err(c)) => {
            eprintln!("[board] close after failure: {c}");
            return Err(e);
        }
        (Err(e), Ok(())) => return Err(e),
        (Ok(()), Err(c)) => return Err(c.into()),
        (Ok(()), Ok(())) => {}
    }

    writeln!(out, "\n✓ Test completed successfully").context("writing report")?;
    Ok(())
}

fn write_header<W: Write>(plan: &TestPlan, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Starting STM32 serial config board test")?;
    writeln!(out, "Port: {}", plan.port)?;
    writeln!(out, "Baudrate: {}", plan.baud)?;
    writeln!(out, "{}", "-".repeat(50))
}

fn exercise<L: Link, W: Write>(link: &mut L, plan: &TestPlan, out: &mut W) -> Result<(), TestError> {
    writeln!(out, "\nSending test data:").context("writing report")?;
    for (i, msg) in TEST_MESSAGES.iter().enumerate() {
        echo_once(link, msg, i + 1, plan.settle, out)?;
    }

    writeln!(out, "\nPerformance test:").context("writing report")?;
    let sample = perf_probe(link, plan.perf_writes)?;
    write_sample(&sample, out).context("writing report")?;
    Ok(())
}

fn echo_once<L: Link, W: Write>(
    link: &mut L,
    msg: &[u8],
    n: usize,
    settle: Duration,
    out: &mut W,
) -> Result<(), TestError> {
    writeln!(out, "  {}. Sending: {}", n, display_text(msg)).context("writing report")?;
    link.send(msg)?;
    std::thread::sleep(settle);

    let waiting = link.waiting()?;
    if waiting > 0 {
        let reply = link.recv(waiting)?;
        writeln!(out, "     Received: {}", display_text(&reply)).context("writing report")?;
    } else {
        writeln!(out, "     No response").context("writing report")?;
    }
    Ok(())
}

/// Back-to-back writes of the perf payload, draining (and discarding) any
/// reply between them.
fn perf_probe<L: Link>(link: &mut L, writes: usize) -> Result<PerfSample, LinkError> {
    let payload = perf_payload();
    let start = Instant::now();
    for _ in 0..writes {
        link.send(&payload)?;
        let waiting = link.waiting()?;
        if waiting > 0 {
            link.recv(waiting)?;
        }
    }
    Ok(PerfSample::new(payload.len(), writes, start.elapsed()))
}

fn write_sample<W: Write>(s: &PerfSample, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "  Data size: {} bytes", s.total_bytes())?;
    writeln!(out, "  Time elapsed: {:.2} seconds", s.elapsed.as_secs_f64())?;
    writeln!(out, "  Speed: {:.0} bytes/sec", s.bytes_per_sec())
}

/// Final banner, plus troubleshooting hints when the test failed.
pub fn write_summary<W: Write>(passed: bool, out: &mut W) -> std::io::Result<()> {
    if passed {
        return writeln!(out, "\n🎉 All tests passed!");
    }
    writeln!(out, "\n❌ Test failed")?;
    writeln!(out, "\nTroubleshooting suggestions:")?;
    for (i, tip) in TROUBLESHOOTING.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, tip)?;
    }
    Ok(())
}
