use crate::memory::{Memory, MemoryError};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Cache line size in bytes
pub const CACHE_LINE_SIZE: usize = 32;
/// Number of cache sets
pub const CACHE_SETS: usize = 64;
/// Associativity (ways per set)
pub const CACHE_WAYS: usize = 4;

/// A set-associative write-back cache in front of `Memory`.
///
/// Line fills read the whole line, so every byte of a line must be inside
/// the backing memory.
pub struct Cache {
    sets: [CacheSet; CACHE_SETS],
    stats: CacheStats,
    access_counter: u64,
}

#[derive(Clone)]
struct CacheLine {
    valid: bool,
    dirty: bool,
    tag: u32,
    data: [u8; CACHE_LINE_SIZE],
    /// LRU stamp
    access_time: u64,
}

impl CacheLine {
    fn new() -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: 0,
            data: [0; CACHE_LINE_SIZE],
            access_time: 0,
        }
    }

    /// The first memory address held by this line
    fn base_address(&self, set_index: usize) -> u32 {
        (self.tag * CACHE_SETS as u32 + set_index as u32) * CACHE_LINE_SIZE as u32
    }
}

#[derive(Clone)]
struct CacheSet {
    lines: [CacheLine; CACHE_WAYS],
}

impl CacheSet {
    fn new() -> Self {
        Self {
            lines: [(); CACHE_WAYS].map(|_| CacheLine::new()),
        }
    }
}

/// Cache access statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writebacks: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    pub fn new() -> Self {
        Self {
            sets: [(); CACHE_SETS].map(|_| CacheSet::new()),
            stats: CacheStats::default(),
            access_counter: 0,
        }
    }

    fn set_index(address: u32) -> usize {
        (address as usize / CACHE_LINE_SIZE) % CACHE_SETS
    }

    fn tag(address: u32) -> u32 {
        (address as usize / CACHE_LINE_SIZE / CACHE_SETS) as u32
    }

    fn offset(address: u32) -> usize {
        address as usize % CACHE_LINE_SIZE
    }

    /// Find the way holding the tag and touch its LRU stamp
    fn find_line(&mut self, set_index: usize, tag: u32) -> Option<usize> {
        for (way, line) in self.sets[set_index].lines.iter_mut().enumerate() {
            if line.valid && line.tag == tag {
                line.access_time = self.access_counter;
                self.access_counter += 1;
                return Some(way);
            }
        }

        None
    }

    /// Pick the way to fill: the first invalid one, else least recently used
    fn select_victim(&self, set_index: usize) -> usize {
        let lines = &self.sets[set_index].lines;
        let mut victim = 0;
        let mut oldest = lines[0].access_time;

        for (way, line) in lines.iter().enumerate() {
            if !line.valid {
                return way;
            }
            if line.access_time < oldest {
                oldest = line.access_time;
                victim = way;
            }
        }

        victim
    }

    fn writeback_line(&mut self, memory: &mut Memory, set_index: usize, way: usize) -> Result<(), MemoryError> {
        let line = &self.sets[set_index].lines[way];
        if !line.dirty {
            return Ok(());
        }

        let base_address = line.base_address(set_index);
        for i in 0..CACHE_LINE_SIZE {
            memory.write_byte(base_address + i as u32, line.data[i])?;
        }

        self.sets[set_index].lines[way].dirty = false;
        self.stats.writebacks += 1;
        Ok(())
    }

    fn load_line(&mut self, memory: &Memory, set_index: usize, way: usize, tag: u32) -> Result<(), MemoryError> {
        let base_address = (tag * CACHE_SETS as u32 + set_index as u32) * CACHE_LINE_SIZE as u32;

        let mut data = [0; CACHE_LINE_SIZE];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = memory.read_byte(base_address + i as u32)?;
        }

        let line = &mut self.sets[set_index].lines[way];
        line.valid = true;
        line.dirty = false;
        line.tag = tag;
        line.data = data;
        line.access_time = self.access_counter;
        self.access_counter += 1;

        Ok(())
    }

    /// Evict the victim way (writing it back if dirty) and fill it from memory
    fn fill(&mut self, memory: &mut Memory, set_index: usize, tag: u32) -> Result<usize, MemoryError> {
        let way = self.select_victim(set_index);

        if self.sets[set_index].lines[way].valid {
            self.writeback_line(memory, set_index, way)?;
        }

        self.load_line(memory, set_index, way, tag)?;
        Ok(way)
    }

    /// Read the byte at the address
    pub fn read_byte(&mut self, memory: &mut Memory, address: u32) -> Result<u8, MemoryError> {
        let set_index = Self::set_index(address);
        let tag = Self::tag(address);
        let offset = Self::offset(address);

        let way = match self.find_line(set_index, tag) {
            Some(way) => {
                self.stats.hits += 1;
                way
            }
            None => {
                self.stats.misses += 1;
                self.fill(memory, set_index, tag)?
            }
        };

        Ok(self.sets[set_index].lines[way].data[offset])
    }

    /// Write the byte at the address (write-allocate)
    pub fn write_byte(&mut self, memory: &mut Memory, address: u32, value: u8) -> Result<(), MemoryError> {
        let set_index = Self::set_index(address);
        let tag = Self::tag(address);
        let offset = Self::offset(address);

        let way = match self.find_line(set_index, tag) {
            Some(way) => {
                self.stats.hits += 1;
                way
            }
            None => {
                self.stats.misses += 1;
                self.fill(memory, set_index, tag)?
            }
        };

        let line = &mut self.sets[set_index].lines[way];
        line.data[offset] = value;
        line.dirty = true;
        Ok(())
    }

    /// Read the word (4 bytes) at the address
    pub fn read_word(&mut self, memory: &mut Memory, address: u32) -> Result<u32, MemoryError> {
        memory.check_word(address)?;

        let mut bytes = [0; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_byte(memory, address + i as u32)?;
        }

        Ok(u32::from_le_bytes(bytes))
    }

    /// Write the word (4 bytes) at the address
    pub fn write_word(&mut self, memory: &mut Memory, address: u32, value: u32) -> Result<(), MemoryError> {
        memory.check_word(address)?;

        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            self.write_byte(memory, address + i as u32, *byte)?;
        }

        Ok(())
    }

    /// Write every dirty line back to memory
    pub fn flush(&mut self, memory: &mut Memory) -> Result<(), MemoryError> {
        for set_index in 0..CACHE_SETS {
            for way in 0..CACHE_WAYS {
                if self.sets[set_index].lines[way].valid {
                    self.writeback_line(memory, set_index, way)?;
                }
            }
        }

        Ok(())
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}

impl Debug for Cache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Cache({} sets, {} ways)", CACHE_SETS, CACHE_WAYS)
    }
}

impl Display for CacheStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "hits: {}", self.hits)?;
        writeln!(f, "misses: {}", self.misses)?;
        writeln!(f, "hit rate: {:.2}%", self.hit_rate() * 100.0)?;
        write!(f, "writebacks: {}", self.writebacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_through_and_write_back() {
        let mut memory = Memory::with_size(0x4000);
        let mut cache = Cache::new();

        memory.write_byte(0x1000, 0xAB).unwrap();
        assert_eq!(cache.read_byte(&mut memory, 0x1000).unwrap(), 0xAB);

        cache.write_byte(&mut memory, 0x1000, 0xCD).unwrap();
        assert_eq!(cache.read_byte(&mut memory, 0x1000).unwrap(), 0xCD);

        // The store sits in the cache until a flush
        assert_eq!(memory.read_byte(0x1000).unwrap(), 0xAB);
        cache.flush(&mut memory).unwrap();
        assert_eq!(memory.read_byte(0x1000).unwrap(), 0xCD);
        assert_eq!(cache.stats().writebacks, 1);
    }

    #[test]
    fn hit_and_miss_accounting() {
        let mut memory = Memory::with_size(0x4000);
        let mut cache = Cache::new();

        cache.read_byte(&mut memory, 0x1000).unwrap();
        cache.read_byte(&mut memory, 0x1000).unwrap();
        // Same line, different byte
        cache.read_byte(&mut memory, 0x1001).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn word_access_is_one_line() {
        let mut memory = Memory::with_size(0x4000);
        let mut cache = Cache::new();

        memory.write_word(0x1000, 0x12345678).unwrap();
        assert_eq!(cache.read_word(&mut memory, 0x1000).unwrap(), 0x12345678);

        // One miss for the first byte, hits for the rest
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 3);
    }

    #[test]
    fn unaligned_word_is_rejected() {
        let mut memory = Memory::with_size(0x4000);
        let mut cache = Cache::new();

        assert_eq!(
            cache.read_word(&mut memory, 0x1002),
            Err(MemoryError::Unaligned { address: 0x1002 })
        );
    }

    #[test]
    fn lru_eviction_writes_back_dirty_victim() {
        let mut memory = Memory::with_size(0x4000);
        let mut cache = Cache::new();

        // Addresses with the same set index, one per way plus one extra
        let way_stride = (CACHE_SETS * CACHE_LINE_SIZE) as u32;

        cache.write_byte(&mut memory, 0, 0x77).unwrap();
        for way in 1..CACHE_WAYS as u32 {
            cache.read_byte(&mut memory, way * way_stride).unwrap();
        }

        // The set is full; the dirty line at 0 is the LRU victim
        cache.read_byte(&mut memory, CACHE_WAYS as u32 * way_stride).unwrap();
        assert_eq!(cache.stats().writebacks, 1);
        assert_eq!(memory.read_byte(0).unwrap(), 0x77);

        // Refetching address 0 misses and sees the written-back value
        let misses = cache.stats().misses;
        assert_eq!(cache.read_byte(&mut memory, 0).unwrap(), 0x77);
        assert_eq!(cache.stats().misses, misses + 1);
    }

    #[test]
    fn empty_stats() {
        let cache = Cache::new();
        assert_eq!(cache.stats().hit_rate(), 0.0);
    }
}
