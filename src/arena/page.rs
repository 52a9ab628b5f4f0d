//! OS page allocator: reserve / commit / decommit / release of
//! page-aligned virtual memory ranges.

use std::ptr::NonNull;

/// A source of page-aligned virtual memory. `Arena` is generic over this so
/// tests can substitute a bounds-checking fake instead of touching real
/// memory.
///
/// # Safety
/// Implementors must return well-aligned, page-sized regions, and callers
/// must only `commit`/`decommit`/`release` sub-ranges (or the whole range)
/// of a prior `reserve` call.
pub unsafe trait PageAllocator {
    /// The page granularity this allocator backs ranges with.
    fn page_size(&self) -> usize;

    /// Reserves `size` bytes of address space, rounded up to a page
    /// boundary. The range is not yet readable or writable.
    fn reserve(&self, size: usize) -> Option<NonNull<u8>>;

    /// Backs `[ptr, ptr+size)` with read/write pages. `ptr` and `size` must
    /// fall within a prior `reserve` call's range.
    ///
    /// # Safety
    /// `ptr` must point into a live reservation from this allocator.
    unsafe fn commit(&self, ptr: NonNull<u8>, size: usize) -> bool;

    /// Returns `[ptr, ptr+size)` to the OS without releasing the
    /// reservation backing it.
    ///
    /// # Safety
    /// `ptr` must point into a live, committed range from this allocator.
    unsafe fn decommit(&self, ptr: NonNull<u8>, size: usize);

    /// Releases the reservation starting at `ptr`. `size` is advisory: on
    /// platforms that can only release an entire prior reservation at
    /// once, `size` is ignored and the whole reservation is freed.
    ///
    /// # Safety
    /// `ptr` must be the base of a live reservation from this allocator,
    /// not previously released.
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize);
}

fn round_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// The process's virtual-memory page size, queried once and cached.
#[cfg(unix)]
pub fn query_page_size() -> usize {
    use std::sync::OnceLock;
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            size as usize
        } else {
            crate::config::DEFAULT_PAGE_SIZE
        }
    })
}

#[cfg(windows)]
pub fn query_page_size() -> usize {
    use std::sync::OnceLock;
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        use std::mem::MaybeUninit;
        use winapi::um::sysinfoapi::GetSystemInfo;
        unsafe {
            let mut info = MaybeUninit::zeroed().assume_init();
            GetSystemInfo(&mut info);
            info.dwPageSize as usize
        }
    })
}

#[cfg(not(any(unix, windows)))]
pub fn query_page_size() -> usize {
    crate::config::DEFAULT_PAGE_SIZE
}

/// The production `PageAllocator`, backed directly by the host OS's
/// virtual memory APIs.
#[derive(Debug, Default)]
pub struct OsPageAllocator;

#[cfg(unix)]
unsafe impl PageAllocator for OsPageAllocator {
    fn page_size(&self) -> usize {
        query_page_size()
    }

    fn reserve(&self, size: usize) -> Option<NonNull<u8>> {
        let size = round_up(size.max(1), self.page_size());
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_NONE,
                libc::MAP_PRIVATE | libc::MAP_ANON,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return None;
        }
        NonNull::new(ptr as *mut u8)
    }

    unsafe fn commit(&self, ptr: NonNull<u8>, size: usize) -> bool {
        let size = round_up(size, self.page_size());
        unsafe { libc::mprotect(ptr.as_ptr() as *mut _, size, libc::PROT_READ | libc::PROT_WRITE) == 0 }
    }

    unsafe fn decommit(&self, ptr: NonNull<u8>, size: usize) {
        let size = round_up(size, self.page_size());
        unsafe {
            libc::madvise(ptr.as_ptr() as *mut _, size, libc::MADV_DONTNEED);
            libc::mprotect(ptr.as_ptr() as *mut _, size, libc::PROT_NONE);
        }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        let size = round_up(size.max(1), self.page_size());
        unsafe {
            libc::munmap(ptr.as_ptr() as *mut _, size);
        }
    }
}

#[cfg(windows)]
unsafe impl PageAllocator for OsPageAllocator {
    fn page_size(&self) -> usize {
        query_page_size()
    }

    fn reserve(&self, size: usize) -> Option<NonNull<u8>> {
        use winapi::um::memoryapi::VirtualAlloc;
        use winapi::um::winnt::{MEM_RESERVE, PAGE_NOACCESS};
        let size = round_up(size.max(1), self.page_size());
        let ptr = unsafe { VirtualAlloc(std::ptr::null_mut(), size, MEM_RESERVE, PAGE_NOACCESS) };
        NonNull::new(ptr as *mut u8)
    }

    unsafe fn commit(&self, ptr: NonNull<u8>, size: usize) -> bool {
        use winapi::um::memoryapi::VirtualAlloc;
        use winapi::um::winnt::{MEM_COMMIT, PAGE_READWRITE};
        let size = round_up(size, self.page_size());
        unsafe { !VirtualAlloc(ptr.as_ptr() as *mut _, size, MEM_COMMIT, PAGE_READWRITE).is_null() }
    }

    unsafe fn decommit(&self, ptr: NonNull<u8>, size: usize) {
        use winapi::um::memoryapi::VirtualFree;
        use winapi::um::winnt::MEM_DECOMMIT;
        let size = round_up(size, self.page_size());
        unsafe {
            VirtualFree(ptr.as_ptr() as *mut _, size, MEM_DECOMMIT);
        }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, _size: usize) {
        use winapi::um::memoryapi::VirtualFree;
        use winapi::um::winnt::MEM_RELEASE;
        unsafe {
            VirtualFree(ptr.as_ptr() as *mut _, 0, MEM_RELEASE);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakePageAllocator;
    use super::*;

    #[test]
    fn fake_allocator_round_trips_reserve_and_release() {
        let allocator = FakePageAllocator::new();
        let ptr = allocator.reserve(100).expect("reserve should succeed");
        unsafe {
            assert!(allocator.commit(ptr, 100));
            allocator.release(ptr, 100);
        }
    }

    #[test]
    fn query_page_size_is_nonzero() {
        assert!(query_page_size() > 0);
    }

    #[test]
    fn os_allocator_reserve_commit_decommit_release_round_trip() {
        let allocator = OsPageAllocator;
        let size = allocator.page_size();
        let ptr = allocator.reserve(size).expect("reserve should succeed");
        unsafe {
            assert!(allocator.commit(ptr, size));
            std::ptr::write_bytes(ptr.as_ptr(), 0xAB, size);
            allocator.decommit(ptr, size);
            allocator.release(ptr, size);
        }
    }
}
