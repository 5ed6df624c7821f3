use bytemuck::Pod;

/// Sequential writer over a mapped byte range.
///
/// Writes are chained: `vw.write(a).write(b)`. Running past the end of the
/// range is a caller bug and panics.
#[derive(Debug)]
pub struct VertexWriter<'a> {
    bytes: &'a mut [u8],
    pos: usize,
}

impl<'a> VertexWriter<'a> {
    #[inline]
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    pub fn write<T: Pod>(&mut self, value: T) -> &mut Self {
        self.write_bytes(bytemuck::bytes_of(&value))
    }

    #[inline]
    pub fn write_slice<T: Pod>(&mut self, values: &[T]) -> &mut Self {
        self.write_bytes(bytemuck::cast_slice(values))
    }

    /// Writes `value` `count` times.
    pub fn repeat<T: Pod>(&mut self, value: T, count: usize) -> &mut Self {
        for _ in 0..count {
            self.write(value);
        }
        self
    }

    /// Zero-fills the rest of the range.
    pub fn zero_rest(&mut self) {
        self.bytes[self.pos..].fill(0);
        self.pos = self.bytes.len();
    }

    #[inline]
    fn write_bytes(&mut self, src: &[u8]) -> &mut Self {
        let end = self.pos + src.len();
        self.bytes[self.pos..end].copy_from_slice(src);
        self.pos = end;
        self
    }

    #[inline]
    pub fn written(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_writes_pack_tightly() {
        let mut buf = [0u8; 16];
        let mut vw = VertexWriter::new(&mut buf);
        vw.write(1.0f32).write([2.0f32, 3.0]).write(7u32);
        assert_eq!(vw.remaining(), 0);
        let floats: Vec<f32> = buf[..12]
            .chunks_exact(4)
            .map(|c| bytemuck::pod_read_unaligned::<f32>(c))
            .collect();
        assert_eq!(floats, vec![1.0, 2.0, 3.0]);
        assert_eq!(u32::from_ne_bytes(buf[12..16].try_into().unwrap()), 7);
    }

    #[test]
    #[should_panic]
    fn overrun_panics() {
        let mut buf = [0u8; 4];
        VertexWriter::new(&mut buf).write(1u64);
    }

    #[test]
    fn zero_rest_fills_tail() {
        let mut buf = [0xffu8; 8];
        let mut vw = VertexWriter::new(&mut buf);
        vw.write(0x0102_0304u32).zero_rest();
        assert_eq!(&buf[4..], &[0, 0, 0, 0]);
    }
}
