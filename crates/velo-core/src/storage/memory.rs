use core::convert::Infallible;

use super::NvStorage;

/// RAM-backed [`NvStorage`] starting out erased (all `0xFF`).
///
/// Used by the simulator and tests. Accesses past the end are clipped; reads
/// there see erased bytes.
#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
    writes: u32,
}

impl<const N: usize> MemoryStorage<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; N],
            writes: 0,
        }
    }

    /// Number of write calls served so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    fn range(address: u16, len: usize) -> core::ops::Range<usize> {
        let start = (address as usize).min(N);
        start..start.saturating_add(len).min(N)
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NvStorage for MemoryStorage<N> {
    type Error = Infallible;

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Infallible> {
        buf.fill(0xFF);
        let range = Self::range(address, buf.len());
        let len = range.len();
        if let (Some(dst), Some(src)) = (buf.get_mut(..len), self.bytes.get(range)) {
            dst.copy_from_slice(src);
        }
        Ok(())
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Infallible> {
        let range = Self::range(address, data.len());
        let len = range.len();
        if let (Some(dst), Some(src)) = (self.bytes.get_mut(range), data.get(..len)) {
            dst.copy_from_slice(src);
        }
        self.writes += 1;
        Ok(())
    }
}
