//! Newline-delimited status messages over any async byte stream.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

use super::StatusSource;
use crate::core::AirfieldError;

/// Reads one message per line; `\r\n` endings are accepted.
///
/// Lines are decoded lossily, so bytes that are not UTF-8 reach the consumer
/// as a malformed message instead of ending the feed.
pub struct LineFeed<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R> LineFeed<R>
where
    R: AsyncBufRead + Unpin,
{
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl<R> StatusSource for LineFeed<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_message(&mut self) -> Result<Option<String>, AirfieldError> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|e| AirfieldError::Feed(e.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Open a TCP connection to a status server.
///
/// # Errors
///
/// [`AirfieldError::Feed`] if the connection cannot be established.
pub async fn connect_tcp(addr: &str) -> Result<LineFeed<BufReader<TcpStream>>, AirfieldError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| AirfieldError::Feed(format!("connect {addr}: {e}")))?;
    tracing::info!(addr, "connected to status feed");
    Ok(LineFeed::new(BufReader::new(stream)))
}
