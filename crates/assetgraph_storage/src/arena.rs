//! Append-only slot arena with stable addresses and lock-free reads.
//!
//! Slots live in chunks of doubling size. A chunk, once allocated, is never
//! reallocated, so a reference to a slot stays valid for the arena's whole
//! lifetime no matter how many slots are appended later.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;

/// Number of index bits covered by the first chunk.
const FIRST_CHUNK_BITS: u32 = 5;

/// Number of slots in the first chunk.
const FIRST_CHUNK_LEN: u64 = 1 << FIRST_CHUNK_BITS;

/// Enough chunks to address every `u64` index.
const CHUNK_COUNT: usize = (u64::BITS - FIRST_CHUNK_BITS) as usize;

type Chunk<T> = Box<[OnceCell<T>]>;

/// Append-only storage addressed by a dense `u64` index.
///
/// Writers must serialize `insert` calls among themselves; readers never
/// block. Occupied slots are never cleared, moved, or overwritten.
pub struct SlotArena<T> {
    chunks: [OnceCell<Chunk<T>>; CHUNK_COUNT],
    /// One past the highest occupied index.
    len: AtomicU64,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotArena<T> {
    /// Creates an empty arena. No chunk is allocated until the first insert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: std::array::from_fn(|_| OnceCell::new()),
            len: AtomicU64::new(0),
        }
    }

    /// Maps an index to `(chunk, offset)`.
    fn locate(index: u64) -> Option<(usize, usize)> {
        let biased = index.checked_add(FIRST_CHUNK_LEN)?;
        let chunk = (u64::BITS - 1 - biased.leading_zeros()) - FIRST_CHUNK_BITS;
        let offset = biased - (1u64 << (chunk + FIRST_CHUNK_BITS));
        Some((chunk as usize, offset as usize))
    }

    /// Number of slots in the given chunk.
    fn chunk_len(chunk: usize) -> usize {
        1usize << (chunk + FIRST_CHUNK_BITS as usize)
    }

    /// Stores `value` at `index`, returning a reference to the stored value.
    ///
    /// Returns `Err(value)` if the slot is already occupied or the index is
    /// outside the addressable range.
    pub fn insert(&self, index: u64, value: T) -> Result<&T, T> {
        let Some((chunk, offset)) = Self::locate(index) else {
            return Err(value);
        };
        let slots = self.chunks[chunk].get_or_init(|| {
            (0..Self::chunk_len(chunk))
                .map(|_| OnceCell::new())
                .collect::<Vec<_>>()
                .into_boxed_slice()
        });
        let stored = slots[offset]
            .try_insert(value)
            .map_err(|(_, rejected)| rejected)?;
        self.len.fetch_max(index + 1, Ordering::Release);
        Ok(stored)
    }

    /// Returns the value at `index`, if that slot is occupied.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<&T> {
        let (chunk, offset) = Self::locate(index)?;
        self.chunks[chunk].get()?.get(offset)?.get()
    }

    /// Returns true if the slot at `index` is occupied.
    #[must_use]
    pub fn contains(&self, index: u64) -> bool {
        self.get(index).is_some()
    }

    /// One past the highest occupied index.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len.load(Ordering::Acquire)
    }

    /// Returns true if no slot has been filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates occupied slots in index order.
    ///
    /// Slots appended while iterating may or may not be observed.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index).map(|value| (index, value)))
    }
}
