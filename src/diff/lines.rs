//! Line-level text diff.

use std::collections::HashMap;

/// The kind of a run of lines in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Present in both texts.
    Unchanged,
    /// Only in the new text.
    Added,
    /// Only in the old text.
    Removed,
}

impl RunKind {
    /// Returns the unified-diff marker for this kind.
    pub fn marker(&self) -> char {
        match self {
            RunKind::Unchanged => ' ',
            RunKind::Added => '+',
            RunKind::Removed => '-',
        }
    }
}

/// Consecutive lines sharing one [`RunKind`].
///
/// `text` keeps the original line terminators, so concatenating the
/// unchanged and removed runs gives back the old text, and the unchanged and
/// added runs give back the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRun {
    /// What happened to these lines.
    pub kind: RunKind,
    /// The lines, terminators included.
    pub text: String,
}

impl LineRun {
    /// Creates a run.
    pub fn new(kind: RunKind, text: impl Into<String>) -> Self {
        LineRun {
            kind,
            text: text.into(),
        }
    }

    /// Returns the number of lines in the run.
    pub fn line_count(&self) -> usize {
        self.text.split_inclusive('\n').count()
    }

    /// Iterates over the lines without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// A line diff algorithm.
pub trait LineDiff {
    /// Compares `before` with `after`, returning runs in document order.
    fn diff(&self, before: &str, after: &str) -> Vec<LineRun>;
}

/// Myers line diff, in linear space.
///
/// Uses the divide-and-conquer form of Myers' O(ND) algorithm: each step
/// finds the middle snake of the shortest edit script and recurses on both
/// halves, so memory stays proportional to the input size. Within a changed
/// region, removed lines are reported before added ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersLineDiff;

impl LineDiff for MyersLineDiff {
    fn diff(&self, before: &str, after: &str) -> Vec<LineRun> {
        let old: Vec<&str> = before.split_inclusive('\n').collect();
        let new: Vec<&str> = after.split_inclusive('\n').collect();

        // Compare small integers instead of strings.
        let mut ids = HashMap::new();
        let old_ids = intern(&mut ids, &old);
        let new_ids = intern(&mut ids, &new);

        let mut script = EditScript {
            old: &old_ids,
            new: &new_ids,
            ops: Vec::with_capacity(old.len().max(new.len())),
        };
        script.conquer(0, old.len(), 0, new.len());

        let mut builder = RunBuilder::default();
        for op in script.ops {
            match op {
                Edit::Keep(i) => builder.push(RunKind::Unchanged, old[i]),
                Edit::Delete(i) => builder.push(RunKind::Removed, old[i]),
                Edit::Insert(j) => builder.push(RunKind::Added, new[j]),
            }
        }
        builder.finish()
    }
}

fn intern<'a>(ids: &mut HashMap<&'a str, u32>, lines: &[&'a str]) -> Vec<u32> {
    lines
        .iter()
        .map(|line| {
            let next = ids.len() as u32;
            *ids.entry(*line).or_insert(next)
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Keep(usize),
    Delete(usize),
    Insert(usize),
}

struct EditScript<'a> {
    old: &'a [u32],
    new: &'a [u32],
    ops: Vec<Edit>,
}

impl EditScript<'_> {
    /// Emits the edits turning `old[old_lo..old_hi]` into `new[new_lo..new_hi]`.
    fn conquer(&mut self, mut old_lo: usize, mut old_hi: usize, mut new_lo: usize, mut new_hi: usize) {
        while old_lo < old_hi && new_lo < new_hi && self.old[old_lo] == self.new[new_lo] {
            self.ops.push(Edit::Keep(old_lo));
            old_lo += 1;
            new_lo += 1;
        }
        let mut suffix = 0;
        while old_lo < old_hi && new_lo < new_hi && self.old[old_hi - 1] == self.new[new_hi - 1] {
            old_hi -= 1;
            new_hi -= 1;
            suffix += 1;
        }

        if old_lo == old_hi {
            self.ops.extend((new_lo..new_hi).map(Edit::Insert));
        } else if new_lo == new_hi {
            self.ops.extend((old_lo..old_hi).map(Edit::Delete));
        } else {
            match self.middle_snake(old_lo, old_hi, new_lo, new_hi) {
                Some((x, y))
                    if (old_lo..=old_hi).contains(&x)
                        && (new_lo..=new_hi).contains(&y)
                        && (x, y) != (old_lo, new_lo)
                        && (x, y) != (old_hi, new_hi) =>
                {
                    self.conquer(old_lo, x, new_lo, y);
                    self.conquer(x, old_hi, y, new_hi);
                }
                _ => {
                    self.ops.extend((old_lo..old_hi).map(Edit::Delete));
                    self.ops.extend((new_lo..new_hi).map(Edit::Insert));
                }
            }
        }

        self.ops.extend((old_hi..old_hi + suffix).map(Edit::Keep));
    }

    /// Finds a point on a shortest edit path that splits its edits roughly
    /// in half. Both ranges must be non-empty.
    fn middle_snake(
        &self,
        old_lo: usize,
        old_hi: usize,
        new_lo: usize,
        new_hi: usize,
    ) -> Option<(usize, usize)> {
        let old = &self.old[old_lo..old_hi];
        let new = &self.new[new_lo..new_hi];
        let n = old.len() as isize;
        let m = new.len() as isize;
        let delta = n - m;
        let odd = delta & 1 == 1;
        let d_max = (n + m + 1) / 2;
        let offset = d_max + 1;
        let idx = |k: isize| (k + offset) as usize;

        // vf[k]: furthest x on diagonal k from the start; vb[k]: the same
        // measured backwards from the end.
        let mut vf = vec![0isize; (2 * d_max + 3) as usize];
        let mut vb = vec![0isize; (2 * d_max + 3) as usize];

        for d in 0..=d_max {
            let mut k = -d;
            while k <= d {
                let mut x = if k == -d || (k != d && vf[idx(k - 1)] < vf[idx(k + 1)]) {
                    vf[idx(k + 1)]
                } else {
                    vf[idx(k - 1)] + 1
                };
                let mut y = x - k;
                let (x0, y0) = (x, y);
                while x < n && y < m && old[x as usize] == new[y as usize] {
                    x += 1;
                    y += 1;
                }
                vf[idx(k)] = x;
                if odd && (k - delta).abs() < d && x + vb[idx(delta - k)] >= n {
                    return Some((old_lo + x0 as usize, new_lo + y0 as usize));
                }
                k += 2;
            }

            let mut k = -d;
            while k <= d {
                let mut x = if k == -d || (k != d && vb[idx(k - 1)] < vb[idx(k + 1)]) {
                    vb[idx(k + 1)]
                } else {
                    vb[idx(k - 1)] + 1
                };
                let mut y = x - k;
                while x < n && y < m && old[(n - x - 1) as usize] == new[(m - y - 1) as usize] {
                    x += 1;
                    y += 1;
                }
                vb[idx(k)] = x;
                if !odd && (k - delta).abs() <= d && x + vf[idx(delta - k)] >= n {
                    return Some((old_lo + (n - x) as usize, new_lo + (m - y) as usize));
                }
                k += 2;
            }
        }

        None
    }
}

/// Merges edits into runs, moving removals ahead of additions between
/// unchanged lines.
#[derive(Default)]
struct RunBuilder {
    runs: Vec<LineRun>,
    removed: String,
    added: String,
}

impl RunBuilder {
    fn push(&mut self, kind: RunKind, line: &str) {
        match kind {
            RunKind::Removed => self.removed.push_str(line),
            RunKind::Added => self.added.push_str(line),
            RunKind::Unchanged => {
                self.flush_changes();
                self.append(RunKind::Unchanged, line);
            }
        }
    }

    fn append(&mut self, kind: RunKind, text: &str) {
        match self.runs.last_mut() {
            Some(run) if run.kind == kind => run.text.push_str(text),
            _ => self.runs.push(LineRun::new(kind, text)),
        }
    }

    fn flush_changes(&mut self) {
        if !self.removed.is_empty() {
            let text = std::mem::take(&mut self.removed);
            self.append(RunKind::Removed, &text);
        }
        if !self.added.is_empty() {
            let text = std::mem::take(&mut self.added);
            self.append(RunKind::Added, &text);
        }
    }

    fn finish(mut self) -> Vec<LineRun> {
        self.flush_changes();
        self.runs
    }
}
