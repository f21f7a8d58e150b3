use super::error::TransportError;

/// Byte source the GNSS receiver is attached to
///
/// # Contract
///
/// - `read` waits at most the transport's configured timeout
/// - a timeout is `Ok(0)`, not an error
/// - errors are reported once; the next call reads normally
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Read up to `buffer.len()` bytes, returning how many were written
    async fn read(&mut self, buffer: &mut [u8]) -> Result<usize, TransportError>;
}
