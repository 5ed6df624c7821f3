use super::size::align_up;

/// Opaque id of a GPU buffer owned by a buffer manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BufferHandle(pub u32);

/// A sub-range of a GPU buffer.
///
/// Compared by value: two equal infos need no rebind. The default info has no
/// buffer and stands for "nothing bound".
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct BindBufferInfo {
    pub buffer: Option<BufferHandle>,
    pub offset: u32,
    pub size: u32,
}

impl BindBufferInfo {
    #[inline]
    pub const fn new(buffer: BufferHandle, offset: u32, size: u32) -> Self {
        Self { buffer: Some(buffer), offset, size }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.buffer.is_some()
    }
}

/// Cursor over one mapped buffer range `[base, base + size)`.
///
/// Hands out consecutive, optionally aligned byte ranges. A scratch
/// allocator has no buffer handle; its offsets index CPU memory.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BufferSubAllocator {
    buffer: Option<BufferHandle>,
    base: u32,
    size: u32,
    cursor: u32,
}

impl BufferSubAllocator {
    #[inline]
    pub const fn new(buffer: Option<BufferHandle>, base: u32, size: u32) -> Self {
        Self { buffer, base, size, cursor: 0 }
    }

    #[inline]
    pub fn buffer(&self) -> Option<BufferHandle> {
        self.buffer
    }

    /// Absolute offset of the next free byte.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.base + self.cursor
    }

    /// Absolute end of the range.
    #[inline]
    pub fn end(&self) -> u32 {
        self.base + self.size
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.size - self.cursor
    }

    /// Elements of `stride` bytes that still fit.
    #[inline]
    pub fn available(&self, stride: u32) -> u32 {
        if stride == 0 { 0 } else { self.remaining() / stride }
    }

    /// Elements that fit after aligning the cursor to `alignment`.
    pub fn available_with_alignment(&self, stride: u32, alignment: u32) -> u32 {
        let aligned = align_up(self.offset(), alignment);
        if stride == 0 || aligned >= self.end() {
            return 0;
        }
        (self.end() - aligned) / stride
    }

    /// Claims `bytes` at the next `alignment` boundary.
    pub fn reserve(&mut self, bytes: u32, alignment: u32) -> Option<BindBufferInfo> {
        let aligned = align_up(self.offset(), alignment);
        let end = aligned.checked_add(bytes)?;
        if end > self.end() {
            return None;
        }
        self.cursor = end - self.base;
        Some(BindBufferInfo { buffer: self.buffer, offset: aligned, size: bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(base: u32, size: u32) -> BufferSubAllocator {
        BufferSubAllocator::new(Some(BufferHandle(1)), base, size)
    }

    #[test]
    fn available_counts_whole_elements() {
        let a = alloc(0, 100);
        assert_eq!(a.available(16), 6);
        assert_eq!(a.available(0), 0);
    }

    #[test]
    fn alignment_reduces_availability() {
        let mut a = alloc(0, 64);
        assert!(a.reserve(4, 1).is_some());
        assert_eq!(a.available(16), 3);
        assert_eq!(a.available_with_alignment(16, 16), 3);
        assert_eq!(a.available_with_alignment(12, 12), 4);
    }

    #[test]
    fn reserve_is_contiguous_and_bounded() {
        let mut a = alloc(32, 64);
        let first = a.reserve(16, 16).unwrap();
        assert_eq!(first, BindBufferInfo::new(BufferHandle(1), 32, 16));
        let second = a.reserve(40, 1).unwrap();
        assert_eq!(second.offset, 48);
        assert!(a.reserve(16, 1).is_none());
        assert_eq!(a.remaining(), 8);
    }
}
