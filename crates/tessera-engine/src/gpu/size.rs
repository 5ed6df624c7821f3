//! Checked size arithmetic for GPU writes.
//!
//! A byte size that does not fit the addressable range would truncate a GPU
//! write, so overflow terminates through [`overflow_abort`] instead of wrapping.

/// Terminates after an unrepresentable size computation.
#[cold]
#[inline(never)]
pub fn overflow_abort(what: &str) -> ! {
    log::error!("size overflow computing {what}");
    panic!("size overflow computing {what}");
}

/// `count * stride` in bytes.
#[inline]
pub fn checked_byte_size(count: u32, stride: u32) -> u32 {
    match count.checked_mul(stride) {
        Some(bytes) => bytes,
        None => overflow_abort("byte size"),
    }
}

#[inline]
pub fn checked_add(a: u32, b: u32) -> u32 {
    match a.checked_add(b) {
        Some(sum) => sum,
        None => overflow_abort("element count"),
    }
}

/// Rounds `value` up to a multiple of `alignment` (any non-zero alignment).
#[inline]
pub fn align_up(value: u32, alignment: u32) -> u32 {
    if alignment <= 1 {
        return value;
    }
    match value.checked_next_multiple_of(alignment) {
        Some(v) => v,
        None => overflow_abort("aligned offset"),
    }
}

/// Least common multiple; zero inputs are treated as one.
pub fn lcm(a: u32, b: u32) -> u32 {
    let (a, b) = (a.max(1), b.max(1));
    let mut x = a;
    let mut y = b;
    while y != 0 {
        (x, y) = (y, x % y);
    }
    match (a / x).checked_mul(b) {
        Some(v) => v,
        None => overflow_abort("alignment"),
    }
}
