// Byte-stream transport consumed by the framing layer

use super::comm::{Result, SerialPort};

/// Byte sink and single-byte source for one exchange at a time
///
/// Reads block until a byte arrives. Any timeout belongs to the implementation
/// and is reported as an error like any other read failure.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Write every byte of `buf`
    async fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Push written bytes out to the device
    async fn flush(&mut self) -> Result<()>;

    /// Read a single byte
    async fn read_byte(&mut self) -> Result<u8>;
}

impl Transport for SerialPort {
    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        SerialPort::write_all(self, buf).await
    }

    async fn flush(&mut self) -> Result<()> {
        SerialPort::flush(self).await
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte).await?;
        Ok(byte[0])
    }
}
