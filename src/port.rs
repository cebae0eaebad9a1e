use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;
use thiserror::Error;

/// Connection-layer failures: the port could not be opened, or I/O on it failed.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serial(#[from] serialport::Error),
}

/// An open channel to the board. Closing consumes it, so it can only happen once.
pub trait Link {
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError>;
    /// Bytes currently buffered on the receive side.
    fn waiting(&mut self) -> Result<usize, LinkError>;
    /// Read up to `n` bytes; may return fewer if the read timeout expires.
    fn recv(&mut self, n: usize) -> Result<Vec<u8>, LinkError>;
    fn close(self) -> Result<(), LinkError>;
}

pub struct SerialLink {
    name: String,
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Open `dev` at `baud`, 8N1, no flow control.
pub fn open_port(dev: &str, baud: u32, timeout: Duration) -> Result<SerialLink, LinkError> {
    let port = serialport::new(dev, baud)
        .timeout(timeout)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open()
        .map_err(|source| LinkError::Open {
            port: dev.to_string(),
            source,
        })?;
    Ok(SerialLink {
        name: dev.to_string(),
        port,
    })
}

impl Link for SerialLink {
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(data)?;
        Ok(())
    }

    fn waiting(&mut self) -> Result<usize, LinkError> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn recv(&mut self, n: usize) -> Result<Vec<u8>, LinkError> {
        let mut buf = vec![0u8; n];
        let got = self.port.read(&mut buf)?;
        buf.truncate(got);
        Ok(buf)
    }

    fn close(mut self) -> Result<(), LinkError> {
        self.port.flush()?;
        eprintln!("[board] closed {}", self.name);
        // dropping the handle releases the device
        Ok(())
    }
}
