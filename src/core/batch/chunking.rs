//! Chunk planning

use crate::utils::error::{GatewayError, Result};

/// Split `items` into contiguous chunks of exactly `chunk_size`, the last holding the remainder
pub fn split<T>(items: &[T], chunk_size: usize) -> Result<Vec<&[T]>> {
    ChunkPlanner::new(chunk_size).map(|planner| planner.plan(items))
}

/// Fixed-size chunk planner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlanner {
    chunk_size: usize,
}

impl ChunkPlanner {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(GatewayError::validation("chunk size must be at least 1"));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks `len` items split into
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    pub fn plan<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        items.chunks(self.chunk_size).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_and_remainder() {
        let items: Vec<u32> = (0..10).collect();
        let chunks = split(&items, 4).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], &[0, 1, 2, 3]);
        assert_eq!(chunks[2], &[8, 9]);
    }

    #[test]
    fn test_split_zero_is_error() {
        let items = [1, 2, 3];
        assert!(split(&items, 0).is_err());
        assert!(ChunkPlanner::new(0).is_err());
    }

    #[test]
    fn test_split_empty_input() {
        let items: Vec<u8> = Vec::new();
        assert!(split(&items, 3).unwrap().is_empty());
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let items: Vec<usize> = (0..257).collect();
        for chunk_size in [1, 2, 3, 7, 64, 100, 256, 257, 1000] {
            let chunks = split(&items, chunk_size).unwrap();
            let rebuilt: Vec<usize> = chunks.concat();
            assert_eq!(rebuilt, items, "chunk_size {}", chunk_size);
            assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == chunk_size));
        }
    }

    #[test]
    fn test_planner_counts() {
        let planner = ChunkPlanner::new(100).unwrap();
        assert_eq!(planner.chunk_count(0), 0);
        assert_eq!(planner.chunk_count(100), 1);
        assert_eq!(planner.chunk_count(101), 2);
        assert_eq!(planner.plan(&[1; 250]).len(), 3);
    }
}
