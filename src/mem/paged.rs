//! Two-level demand-paged memory.
//!
//! A 32-bit address selects a top-level directory entry (upper 10 bits),
//! a second-level table entry (next 10 bits), and a byte offset within a
//! 4 KiB page (low 12 bits). Directories, tables, and pages are allocated
//! lazily; pages are zero-filled on allocation.

use log::debug;

/// Number of entries in each directory level.
const DIR_ENTRIES: usize = 1024;

/// Size of one backing page in bytes.
pub const PAGE_SIZE: usize = 4096;

type Page = Box<[u8; PAGE_SIZE]>;

#[derive(Clone)]
struct PageTable {
    pages: Vec<Option<Page>>,
}

impl PageTable {
    fn new() -> Self {
        Self {
            pages: vec![None; DIR_ENTRIES],
        }
    }
}

/// Sparse byte-addressable 32-bit memory.
///
/// Drivers are expected to call [`PagedMemory::add_page`] before touching
/// an address; a byte access to an unmapped page is a soft failure that
/// logs through the debug channel and yields a best-effort result.
pub struct PagedMemory {
    directory: Vec<Option<PageTable>>,
}

impl Default for PagedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedMemory {
    /// Creates an empty memory with no pages allocated.
    pub fn new() -> Self {
        Self {
            directory: vec![None; DIR_ENTRIES],
        }
    }

    fn dir_index(addr: u32) -> usize {
        ((addr >> 22) & 0x3FF) as usize
    }

    fn table_index(addr: u32) -> usize {
        ((addr >> 12) & 0x3FF) as usize
    }

    fn page_offset(addr: u32) -> usize {
        (addr & 0xFFF) as usize
    }

    /// Returns `true` iff the page backing `addr` has been allocated.
    pub fn page_exists(&self, addr: u32) -> bool {
        self.directory[Self::dir_index(addr)]
            .as_ref()
            .is_some_and(|table| table.pages[Self::table_index(addr)].is_some())
    }

    /// Allocates the zero-filled page backing `addr`.
    ///
    /// Missing directory levels are created lazily. Returns `false` when
    /// the page already exists; the existing page is left untouched.
    pub fn add_page(&mut self, addr: u32) -> bool {
        let table = self.directory[Self::dir_index(addr)].get_or_insert_with(PageTable::new);
        let entry = &mut table.pages[Self::table_index(addr)];
        if entry.is_some() {
            debug!("addr {addr:#010x} already has a backing page");
            return false;
        }
        *entry = Some(Box::new([0u8; PAGE_SIZE]));
        true
    }

    /// Reads the byte at `addr`.
    ///
    /// An unmapped address logs a debug warning and reads as zero.
    pub fn get_byte(&self, addr: u32) -> u8 {
        match self.page(addr) {
            Some(page) => page[Self::page_offset(addr)],
            None => {
                debug!("byte read from unmapped addr {addr:#010x}");
                0
            }
        }
    }

    /// Writes the byte at `addr`.
    ///
    /// Returns `false` (and logs a debug warning) when the address has no
    /// backing page; the write is dropped.
    pub fn set_byte(&mut self, addr: u32, val: u8) -> bool {
        match self.page_mut(addr) {
            Some(page) => {
                page[Self::page_offset(addr)] = val;
                true
            }
            None => {
                debug!("byte write to unmapped addr {addr:#010x}");
                false
            }
        }
    }

    fn page(&self, addr: u32) -> Option<&Page> {
        self.directory[Self::dir_index(addr)]
            .as_ref()?
            .pages[Self::table_index(addr)]
            .as_ref()
    }

    fn page_mut(&mut self, addr: u32) -> Option<&mut Page> {
        self.directory[Self::dir_index(addr)]
            .as_mut()?
            .pages[Self::table_index(addr)]
            .as_mut()
    }
}
