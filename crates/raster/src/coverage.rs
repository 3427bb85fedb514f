//! Run-length compressed coverage accumulation for the multisampling
//! rasterizer.

use alloc::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Run {
    cover: u16,
    len: u32,
}

/// A sparse per-pixel coverage accumulator.
///
/// The buffer always describes exactly `capacity` pixels as a sequence of
/// `(coverage, run length)` runs. Adding a span splits the runs at its
/// boundaries and increments the covered ones, so a scanline crossed by few
/// spans stays cheap to accumulate and iterate.
#[derive(Clone, Debug, Default)]
pub struct SparseCoverageBuffer {
    runs: Vec<Run>,
    capacity: u32,
}

impl SparseCoverageBuffer {
    pub fn new() -> Self {
        SparseCoverageBuffer {
            runs: Vec::new(),
            capacity: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Collapses the buffer to a single zero-coverage run of `capacity`
    /// pixels.
    pub fn reset(&mut self, capacity: u32) {
        self.runs.clear();
        self.capacity = capacity;
        if capacity > 0 {
            self.runs.push(Run {
                cover: 0,
                len: capacity,
            });
        }
    }

    /// Adds one unit of coverage to `len` pixels starting at `x`. The span
    /// is clamped to the buffer.
    pub fn add_span(&mut self, x: i32, len: u32) {
        let start = x.max(0) as u32;
        let end = ((x as i64 + len as i64).min(self.capacity as i64)).max(0) as u32;
        if start >= end {
            return;
        }

        // Walk the runs, splitting at the span boundaries and bumping the
        // covered ones.
        let mut pos = 0u32;
        let mut i = 0;
        while i < self.runs.len() && pos < end {
            let run_len = self.runs[i].len;
            let run_end = pos + run_len;

            if run_end <= start {
                pos = run_end;
                i += 1;
                continue;
            }

            if pos < start {
                // Split off the uncovered prefix.
                let covered = run_len - (start - pos);
                self.runs[i].len = start - pos;
                let cover = self.runs[i].cover;
                self.runs.insert(
                    i + 1,
                    Run {
                        cover,
                        len: covered,
                    },
                );
                pos = start;
                i += 1;
                continue;
            }

            if run_end > end {
                // Split off the uncovered suffix.
                let covered = end - pos;
                self.runs[i].len = covered;
                let cover = self.runs[i].cover;
                self.runs.insert(
                    i + 1,
                    Run {
                        cover,
                        len: run_len - covered,
                    },
                );
            }

            self.runs[i].cover += 1;
            pos += self.runs[i].len;
            i += 1;
        }
    }

    /// Iterates the `(coverage, run length)` runs in order.
    pub fn for_each_run<F>(&self, mut f: F)
    where
        F: FnMut(u32, u32, u16),
    {
        let mut pos = 0u32;
        for run in &self.runs {
            f(pos, run.len, run.cover);
            pos += run.len;
        }
    }

    /// The coverage at pixel `i` and the length of its run from `i`
    /// onwards.
    pub fn get(&self, i: u32) -> (u16, u32) {
        debug_assert!(i < self.capacity);

        let mut pos = 0u32;
        for run in &self.runs {
            if i < pos + run.len {
                return (run.cover, pos + run.len - i);
            }
            pos += run.len;
        }

        (0, 0)
    }
}
