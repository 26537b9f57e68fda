//! Splitting an ordered sequence into fixed-size batches.
//! Chunks are contiguous, in input order, and only the last may be short.

use crate::errors::BatchError;

/// Split `items` into chunks of `chunk_size`. Fails on a zero size.
pub fn chunkify<T: Clone>(items: &[T], chunk_size: usize) -> Result<Vec<Vec<T>>, BatchError> {
    if chunk_size == 0 {
        return Err(BatchError::InvalidChunkSize(0));
    }
    Ok(items.chunks(chunk_size).map(<[T]>::to_vec).collect())
}

/// Interpret a requested chunk size: `0` means no chunking, negative is rejected.
pub fn chunk_size_from(requested: i64) -> Result<Option<usize>, BatchError> {
    match requested {
        0 => Ok(None),
        n if n < 0 => Err(BatchError::InvalidChunkSize(n)),
        n => usize::try_from(n)
            .map(Some)
            .map_err(|_| BatchError::InvalidChunkSize(n)),
    }
}

/// Name of the chunk at 1-based `index`, e.g. `chunk_3`.
#[inline]
pub fn chunk_name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}
