//! Static key-to-worker assignment.
//!
//! Keys are hashed with 32-bit FNV-1a and reduced modulo the pool size, so a
//! key lands on the same worker on every run with the same pool size.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of `data`.
pub fn fnv1a_32(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in data {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Index of the worker that owns `partition_key` in a pool of `num_workers`.
///
/// `num_workers` must be non-zero; the pool rejects empty sizes before any
/// key is routed.
pub fn worker_index(partition_key: &str, num_workers: usize) -> usize {
    fnv1a_32(partition_key.as_bytes()) as usize % num_workers
}
