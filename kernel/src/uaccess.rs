/// Caller-memory access for console system calls.
///
/// Reads and writes copy one byte at a time into or out of the caller's
/// buffer. Argument marshaling lives outside the console; it hands the
/// console anything implementing `UserBuffer`. Kernel-resident buffers use
/// `KernelSlice` / `KernelBytes`.
use core::fmt;

/// A copy to or from caller memory failed (bad address, out of bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFault {
    pub offset: usize,
}

impl fmt::Display for CopyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "copy fault at offset {}", self.offset)
    }
}

/// Destination or source memory of a console transfer.
pub trait UserBuffer {
    /// Copy `src` into the buffer at `offset`.
    fn copy_out(&mut self, offset: usize, src: &[u8]) -> Result<(), CopyFault>;

    /// Fill `dst` from the buffer starting at `offset`.
    fn copy_in(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyFault>;

    /// Addressable length in bytes.
    fn len(&self) -> usize;
}

/// Writable kernel buffer.
pub struct KernelSlice<'a>(pub &'a mut [u8]);

impl UserBuffer for KernelSlice<'_> {
    fn copy_out(&mut self, offset: usize, src: &[u8]) -> Result<(), CopyFault> {
        let end = offset.checked_add(src.len()).ok_or(CopyFault { offset })?;
        let dst = self.0.get_mut(offset..end).ok_or(CopyFault { offset })?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn copy_in(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyFault> {
        let end = offset.checked_add(dst.len()).ok_or(CopyFault { offset })?;
        let src = self.0.get(offset..end).ok_or(CopyFault { offset })?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Read-only kernel buffer; every `copy_out` faults.
pub struct KernelBytes<'a>(pub &'a [u8]);

impl UserBuffer for KernelBytes<'_> {
    fn copy_out(&mut self, offset: usize, _src: &[u8]) -> Result<(), CopyFault> {
        Err(CopyFault { offset })
    }

    fn copy_in(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyFault> {
        let end = offset.checked_add(dst.len()).ok_or(CopyFault { offset })?;
        let src = self.0.get(offset..end).ok_or(CopyFault { offset })?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_slice_bounds() {
        let mut buf = [0u8; 4];
        let mut dst = KernelSlice(&mut buf);
        assert!(dst.copy_out(2, b"ab").is_ok());
        assert_eq!(dst.copy_out(3, b"ab"), Err(CopyFault { offset: 3 }));
        assert_eq!(buf, [0, 0, b'a', b'b']);
    }

    #[test]
    fn kernel_bytes_is_read_only() {
        let mut src = KernelBytes(b"xyz");
        let mut one = [0u8; 1];
        assert!(src.copy_in(2, &mut one).is_ok());
        assert_eq!(one[0], b'z');
        assert!(src.copy_in(3, &mut one).is_err());
        assert!(src.copy_out(0, b"q").is_err());
    }
}
