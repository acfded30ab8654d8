//! Serial transport implementation.
//!
//! This module provides serial port communication for XBee modules
//! attached over UART or USB.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::error::{Error, Result};
use crate::packet::Packet;
use crate::protocol::{FrameDecoder, OperatingMode};
use crate::transport::Transport;

/// Factory default baud rate of XBee modules.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Configuration for serial transport.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM3").
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// API operating mode configured on the module (`AP` parameter).
    pub mode: OperatingMode,
}

impl SerialConfig {
    /// Creates a new serial configuration with default settings.
    #[must_use]
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            mode: OperatingMode::default(),
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// Sets the API operating mode.
    #[must_use]
    pub const fn mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Serial transport for XBee communication.
///
/// Uses split read/write halves so a background task can read while
/// packets are sent.
pub struct SerialTransport {
    config: SerialConfig,
    writer: Option<Arc<Mutex<WriteHalf<SerialStream>>>>,
    reader: Option<ReadHalf<SerialStream>>,
    decoder: FrameDecoder,
    read_task: Option<JoinHandle<()>>,
}

impl SerialTransport {
    /// Creates a new serial transport with the given configuration.
    #[must_use]
    pub fn new(config: SerialConfig) -> Self {
        let decoder = FrameDecoder::with_mode(config.mode);
        Self {
            config,
            writer: None,
            reader: None,
            decoder,
            read_task: None,
        }
    }

    /// Creates a new serial transport for the given port with default settings.
    #[must_use]
    pub fn with_port(port: impl Into<String>) -> Self {
        Self::new(SerialConfig::new(port))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Takes the reader half for use in a background task.
    ///
    /// This can only be called once after connecting.
    pub fn take_reader(&mut self) -> Option<ReadHalf<SerialStream>> {
        self.reader.take()
    }

    /// Takes the frame decoder, leaving a fresh one in its place.
    ///
    /// Pair with [`take_reader`](Self::take_reader) to drive [`run_read_loop`].
    pub fn take_decoder(&mut self) -> FrameDecoder {
        std::mem::replace(&mut self.decoder, FrameDecoder::with_mode(self.config.mode))
    }

    /// Connects and spawns the read loop, returning the receiving end of
    /// the packet channel.
    ///
    /// The read loop is stopped by [`disconnect`](Transport::disconnect) or
    /// when the transport is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened.
    pub async fn start(&mut self, capacity: usize) -> Result<mpsc::Receiver<Packet>> {
        self.connect().await?;
        let reader = self.take_reader().ok_or(Error::NotConnected)?;
        let decoder = self.take_decoder();
        let (tx, rx) = mpsc::channel(capacity);

        self.stop_read_task();
        self.read_task = Some(spawn_read_loop(reader, decoder, tx));

        Ok(rx)
    }

    fn stop_read_task(&mut self) {
        if let Some(task) = self.read_task.take() {
            task.abort();
        }
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.stop_read_task();
    }
}

/// Spawns [`run_read_loop`] on the runtime.
///
/// Aborting the returned handle drops the reader, which closes the port.
pub fn spawn_read_loop<R>(
    reader: R,
    decoder: FrameDecoder,
    tx: mpsc::Sender<Packet>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = run_read_loop(reader, decoder, tx).await {
            tracing::debug!("read loop ended: {}", e);
        }
    })
}

/// Reads bytes from `reader`, decodes API frames and forwards them as
/// packets on `tx`.
///
/// Frames that fail validation or do not decode into a packet are logged
/// and skipped. Returns `Ok(())` once the receiver is dropped.
///
/// # Errors
///
/// Returns an error if reading fails or the stream is closed.
pub async fn run_read_loop<R>(
    mut reader: R,
    mut decoder: FrameDecoder,
    tx: mpsc::Sender<Packet>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 1024];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => {
                tracing::debug!("serial port closed");
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "serial port closed",
                )));
            }
            Ok(n) => n,
            Err(e) => {
                tracing::error!("serial read error: {}", e);
                return Err(Error::Io(e));
            }
        };

        tracing::trace!("received {} bytes", n);
        decoder.feed(&buf[..n]);

        loop {
            let frame = match decoder.decode() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("frame decode error: {}", e);
                    continue;
                }
            };

            tracing::trace!(
                "decoded frame type {:02X}: {} bytes",
                frame.frame_type,
                frame.data.len()
            );

            let packet = match Packet::from_raw(&frame) {
                Ok(packet) => packet,
                Err(e) => {
                    tracing::warn!("packet decode error: {}", e);
                    continue;
                }
            };

            if tx.send(packet).await.is_err() {
                tracing::debug!("packet receiver dropped");
                return Ok(());
            }
        }
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.writer.is_some() {
                return Ok(());
            }

            tracing::info!(
                "connecting to serial port: {} at {} baud",
                self.config.port,
                self.config.baud_rate
            );

            let stream = tokio_serial::new(&self.config.port, self.config.baud_rate)
                .open_native_async()
                .map_err(Error::Serial)?;

            let (reader, writer) = tokio::io::split(stream);
            self.reader = Some(reader);
            self.writer = Some(Arc::new(Mutex::new(writer)));
            self.decoder.clear();

            tracing::info!("connected to serial port");
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.writer.is_some() || self.reader.is_some() || self.read_task.is_some() {
                tracing::info!("disconnecting from serial port");
                self.stop_read_task();
                self.writer = None;
                self.reader = None;
            }
            Ok(())
        })
    }

    fn send(&mut self, packet: &Packet) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let writer = self.writer.clone();
        let frame = packet.to_frame(self.config.mode);
        Box::pin(async move {
            let writer = writer.ok_or(Error::NotConnected)?;
            let frame = frame?;
            let mut writer = writer.lock().await;

            tracing::trace!("sending frame: {}", hex::encode(&frame));

            writer.write_all(&frame).await.map_err(Error::Io)?;
            writer.flush().await.map_err(Error::Io)?;

            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.writer.is_some()
    }
}

/// Lists available serial ports.
///
/// # Errors
///
/// Returns an error if the port list cannot be retrieved.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports().map_err(Error::Serial)?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::ModemStatusPacket;
    use crate::types::ModemStatus;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("xbee=trace")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_serial_config_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.mode, OperatingMode::Api);
    }

    #[test]
    fn test_serial_config_builder() {
        let config = SerialConfig::new("/dev/ttyUSB0")
            .baud_rate(115_200)
            .mode(OperatingMode::ApiEscaped);
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.mode, OperatingMode::ApiEscaped);

        let transport = SerialTransport::new(config);
        assert_eq!(transport.config().mode, OperatingMode::ApiEscaped);
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_send_not_connected() {
        let mut transport = SerialTransport::with_port("/dev/null");
        let packet = Packet::from(ModemStatusPacket::new(ModemStatus::Joined));
        assert!(matches!(
            transport.send(&packet).await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_read_loop_decodes_packets() {
        init_tracing();
        let (mut device, host) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_read_loop(host, FrameDecoder::new(), tx));

        // Line noise, a corrupted frame, then a modem status frame split in two.
        device.write_all(&[0x00, 0x42]).await.unwrap();
        device
            .write_all(&[0x7E, 0x00, 0x02, 0x8A, 0x02, 0x00])
            .await
            .unwrap();
        device.write_all(&[0x7E, 0x00, 0x02]).await.unwrap();
        device.write_all(&[0x8A, 0x06, 0x6F]).await.unwrap();

        let packet = rx.recv().await.unwrap();
        assert_eq!(
            packet,
            Packet::from(ModemStatusPacket::new(ModemStatus::CoordinatorStarted))
        );

        drop(device);
        assert!(matches!(handle.await.unwrap(), Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_read_loop_skips_undecodable_packets() {
        init_tracing();
        let (mut device, host) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_read_loop(host, FrameDecoder::new(), tx));

        // Valid frame whose modem status code is not defined.
        let bad = crate::protocol::encode_frame(0x8A, &[0x55], OperatingMode::Api).unwrap();
        let good = Packet::from(ModemStatusPacket::new(ModemStatus::Joined))
            .to_frame(OperatingMode::Api)
            .unwrap();
        device.write_all(&bad).await.unwrap();
        device.write_all(&good).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            Packet::from(ModemStatusPacket::new(ModemStatus::Joined))
        );

        drop(rx);
        device.write_all(&good).await.unwrap();
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_stops_read_loop() {
        init_tracing();
        let (mut device, host) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);
        let mut transport = SerialTransport::with_port("/dev/null");
        transport.read_task = Some(spawn_read_loop(host, FrameDecoder::new(), tx));

        let frame = Packet::from(ModemStatusPacket::new(ModemStatus::Joined))
            .to_frame(OperatingMode::Api)
            .unwrap();
        device.write_all(&frame).await.unwrap();
        assert!(rx.recv().await.is_some());

        transport.disconnect().await.unwrap();
        assert!(transport.read_task.is_none());
        // The aborted task dropped both the sender and the reader.
        assert!(rx.recv().await.is_none());
        assert!(device.write_all(&frame).await.is_err());
    }

    #[tokio::test]
    async fn test_drop_stops_read_loop() {
        let (_device, host) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);
        let mut transport = SerialTransport::with_port("/dev/null");
        transport.read_task = Some(spawn_read_loop(host, FrameDecoder::new(), tx));

        drop(transport);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    #[ignore = "Requires /sys/class/tty - not available in sandboxed builds"]
    fn test_list_ports() {
        let _ = list_ports();
    }
}
