// Mock serial port for testing without hardware

use super::comm::{Result, SerialError};
use super::transport::Transport;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock serial port for testing
#[derive(Clone)]
pub struct MockSerialPort {
    /// Data to be read (simulates module responses)
    read_buffer: Arc<Mutex<VecDeque<u8>>>,

    /// Data that was written (simulates commands sent to the module)
    write_buffer: Arc<Mutex<Vec<u8>>>,

    /// Bytes handed out by reads so far
    bytes_read: Arc<Mutex<usize>>,

    /// Simulated delay for read/write operations (in ms)
    delay_ms: u64,
}

impl MockSerialPort {
    /// Create a new mock serial port
    pub fn new() -> Self {
        Self {
            read_buffer: Arc::new(Mutex::new(VecDeque::new())),
            write_buffer: Arc::new(Mutex::new(Vec::new())),
            bytes_read: Arc::new(Mutex::new(0)),
            delay_ms: 0,
        }
    }

    /// Set simulated delay for operations
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Push data to be read (simulates the module sending data)
    pub fn push_read_data(&mut self, data: &[u8]) {
        let mut buffer = self.read_buffer.lock().unwrap();
        buffer.extend(data.iter().copied());
    }

    /// Get data that was written
    pub fn get_written_data(&self) -> Vec<u8> {
        self.write_buffer.lock().unwrap().clone()
    }

    /// Check if a specific byte sequence was written
    pub fn was_written(&self, expected: &[u8]) -> bool {
        let buffer = self.write_buffer.lock().unwrap();
        buffer
            .windows(expected.len())
            .any(|window| window == expected)
    }

    /// Get number of bytes still waiting to be read
    pub fn bytes_available(&self) -> usize {
        self.read_buffer.lock().unwrap().len()
    }

    /// Get number of bytes consumed by reads
    pub fn bytes_read(&self) -> usize {
        *self.bytes_read.lock().unwrap()
    }

    async fn delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
    }
}

impl Transport for MockSerialPort {
    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.delay().await;
        self.write_buffer.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// An exhausted script reads as a closed port
    async fn read_byte(&mut self) -> Result<u8> {
        self.delay().await;
        let byte = self
            .read_buffer
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(SerialError::Eof)?;
        *self.bytes_read.lock().unwrap() += 1;
        Ok(byte)
    }
}

impl Default for MockSerialPort {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to create a mock port with pre-loaded response data
pub fn mock_port_with_response(response: &[u8]) -> MockSerialPort {
    let mut port = MockSerialPort::new();
    port.push_read_data(response);
    port
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serial_basic() {
        let mut port = MockSerialPort::new();
        port.push_read_data(&[0xC1, 0x00]);

        assert_eq!(port.read_byte().await.unwrap(), 0xC1);
        assert_eq!(port.read_byte().await.unwrap(), 0x00);
        assert_eq!(port.bytes_read(), 2);

        port.write_all(&[0xC0, 0x00, 0x00]).await.unwrap();
        assert_eq!(port.get_written_data(), vec![0xC0, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_mock_serial_eof() {
        let mut port = MockSerialPort::new();
        let result = port.read_byte().await;
        assert!(matches!(result, Err(SerialError::Eof)));
        assert_eq!(port.bytes_read(), 0);
    }

    #[tokio::test]
    async fn test_mock_was_written() {
        let mut port = MockSerialPort::new();
        port.write_all(&[0xC1, 0x80, 0x07]).await.unwrap();

        assert!(port.was_written(&[0x80, 0x07]));
        assert!(!port.was_written(&[0xC0]));
    }

    #[tokio::test]
    async fn test_mock_with_delay() {
        let mut port = MockSerialPort::new().with_delay(10);
        port.push_read_data(&[0x01]);

        let start = std::time::Instant::now();
        port.read_byte().await.unwrap();
        assert!(start.elapsed().as_millis() >= 10);
    }

    #[tokio::test]
    async fn test_mock_clones_share_buffers() {
        let mut port = MockSerialPort::new();
        let observer = port.clone();
        port.push_read_data(&[1, 2, 3]);
        assert_eq!(observer.bytes_available(), 3);

        port.write_all(&[0xC1]).await.unwrap();
        assert!(observer.was_written(&[0xC1]));
    }
}
