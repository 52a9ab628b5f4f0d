//! Bump allocator backed by [`PageAllocator`]: chained growth, LIFO
//! checkpoints, and free-list recycling of retired tail arenas.

use std::ptr::NonNull;

use crate::arena::page::{OsPageAllocator, PageAllocator};
use crate::config::ARENA_HEADER_SIZE;

struct ArenaNode {
    base: NonNull<u8>,
    reserved: usize,
    committed: usize,
    pos: usize,
    base_pos: usize,
}

fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// A chained, checkpointable bump allocator. Generic over the page source
/// so tests can substitute a non-OS-backed fake; `OsPageAllocator` is the
/// production default.
///
/// Not `Send`/`Sync`: an `Arena` is meant to be owned by a single
/// extraction pipeline running on one thread.
pub struct Arena<P: PageAllocator = OsPageAllocator> {
    allocator: P,
    reserve_size: usize,
    commit_size: usize,
    nodes: Vec<ArenaNode>,
    active_chain: Vec<usize>,
    free_stack: Vec<usize>,
    free_size: usize,
}

/// A scoped checkpoint. Allocations made through it are released when it
/// is dropped, regardless of how control leaves the scope.
pub struct Scratch<'a, P: PageAllocator> {
    arena: &'a mut Arena<P>,
    saved_pos: usize,
}

impl<'a, P: PageAllocator> Scratch<'a, P> {
    pub fn push(&mut self, size: usize, align: usize) -> Option<NonNull<u8>> {
        self.arena.push(size, align)
    }
}

impl<'a, P: PageAllocator> Drop for Scratch<'a, P> {
    fn drop(&mut self) {
        self.arena.pop_to(self.saved_pos);
    }
}

impl Arena<OsPageAllocator> {
    /// Creates an arena backed by the host OS's virtual memory, with the
    /// project's default reserve/commit sizing.
    pub fn new_default() -> Option<Self> {
        Self::new(
            crate::config::ARENA_DEFAULT_RESERVE_SIZE,
            crate::config::ARENA_DEFAULT_COMMIT_SIZE,
        )
    }

    pub fn new(reserve_size: usize, commit_size: usize) -> Option<Self> {
        Self::with_allocator(OsPageAllocator, reserve_size, commit_size)
    }
}

impl<P: PageAllocator> Arena<P> {
    /// Creates an arena over a caller-provided page allocator, rounding
    /// both sizes up to the allocator's page size and committing the
    /// initial head arena eagerly.
    pub fn with_allocator(allocator: P, reserve_size: usize, commit_size: usize) -> Option<Self> {
        let page_size = allocator.page_size();
        let reserve_size = align_up(reserve_size.max(1), page_size);
        let commit_size = align_up(commit_size.max(1).min(reserve_size), page_size);

        let head = Self::new_node(&allocator, reserve_size, commit_size, 0)?;
        Some(Arena {
            allocator,
            reserve_size,
            commit_size,
            nodes: vec![head],
            active_chain: vec![0],
            free_stack: Vec::new(),
            free_size: 0,
        })
    }

    fn new_node(allocator: &P, reserve_size: usize, commit_size: usize, base_pos: usize) -> Option<ArenaNode> {
        let base = allocator.reserve(reserve_size)?;
        if unsafe { !allocator.commit(base, commit_size) } {
            unsafe { allocator.release(base, reserve_size) };
            return None;
        }
        Some(ArenaNode { base, reserved: reserve_size, committed: commit_size, pos: ARENA_HEADER_SIZE, base_pos })
    }

    fn current(&self) -> &ArenaNode {
        &self.nodes[*self.active_chain.last().expect("active chain is never empty")]
    }

    /// The current global bump position: `current.base_pos + current.pos`.
    pub fn get_pos(&self) -> usize {
        let c = self.current();
        c.base_pos + c.pos
    }

    /// Number of retired arenas sitting on the free list.
    pub fn free_count(&self) -> usize {
        self.free_stack.len()
    }

    /// Total reserved bytes held by free-listed arenas.
    pub fn free_size(&self) -> usize {
        self.free_size
    }

    /// Bump-allocates `size` bytes aligned to `align`, growing the
    /// committed range or chaining a new tail arena as needed. Returns
    /// `None` only if a fresh arena's reservation or commit fails.
    pub fn push(&mut self, size: usize, align: usize) -> Option<NonNull<u8>> {
        for _ in 0..2 {
            let index = *self.active_chain.last().unwrap();
            let reserved = self.nodes[index].reserved;
            let start = align_up(self.nodes[index].pos, align);
            let end = start.checked_add(size)?;

            if end <= reserved {
                if end > self.nodes[index].committed {
                    let grow_to = align_up(end, self.commit_size).min(reserved);
                    let base = self.nodes[index].base;
                    if !unsafe { self.allocator.commit(base, grow_to) } {
                        return None;
                    }
                    self.nodes[index].committed = grow_to;
                }
                self.nodes[index].pos = end;
                let base = self.nodes[index].base;
                return Some(unsafe { NonNull::new_unchecked(base.as_ptr().add(start)) });
            }

            self.acquire_tail(size)?;
        }
        None
    }

    fn acquire_tail(&mut self, size: usize) -> Option<()> {
        let current_index = *self.active_chain.last().unwrap();
        let base_pos = self.nodes[current_index].base_pos + self.nodes[current_index].reserved;

        if let Some(&candidate) = self.free_stack.last() {
            if self.nodes[candidate].reserved >= size.max(1) {
                self.free_stack.pop();
                self.free_size -= self.nodes[candidate].reserved;
                self.nodes[candidate].pos = ARENA_HEADER_SIZE;
                self.nodes[candidate].base_pos = base_pos;
                self.active_chain.push(candidate);
                return Some(());
            }
        }

        let node = Self::new_node(&self.allocator, self.reserve_size, self.commit_size, base_pos)?;
        #[cfg(feature = "arena-trace")]
        crate::displaylevel!(4, "arena: chained new tail at base_pos={}\n", base_pos);
        self.nodes.push(node);
        self.active_chain.push(self.nodes.len() - 1);
        Some(())
    }

    /// Rewinds the bump position to `pos`, moving every tail arena whose
    /// range lies entirely at or beyond `pos` onto the free list.
    pub fn pop_to(&mut self, pos: usize) {
        while self.active_chain.len() > 1 {
            let index = *self.active_chain.last().unwrap();
            if self.nodes[index].base_pos >= pos {
                self.active_chain.pop();
                self.free_size += self.nodes[index].reserved;
                self.free_stack.push(index);
            } else {
                break;
            }
        }
        let index = *self.active_chain.last().unwrap();
        let base_pos = self.nodes[index].base_pos;
        if pos >= base_pos {
            self.nodes[index].pos = (pos - base_pos).max(ARENA_HEADER_SIZE);
        }
    }

    /// Equivalent to `pop_to(ARENA_HEADER_SIZE)`: retires every chained
    /// tail arena and resets the head to empty.
    pub fn clear(&mut self) {
        self.pop_to(ARENA_HEADER_SIZE);
    }

    /// Opens a scoped checkpoint; allocations made through the returned
    /// guard are released when it drops.
    pub fn scratch(&mut self) -> Scratch<'_, P> {
        let saved_pos = self.get_pos();
        Scratch { arena: self, saved_pos }
    }
}

impl<P: PageAllocator> Drop for Arena<P> {
    fn drop(&mut self) {
        for node in &self.nodes {
            unsafe { self.allocator.release(node.base, node.reserved) };
        }
    }
}
