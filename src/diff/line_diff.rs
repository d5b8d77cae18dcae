//! Line-level diffing via Myers' shortest edit script
//!
//! The stats stage only consumes the edit counts, but the full script is
//! produced so callers can render line output as well.

use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit<T> {
    Deletion { value: T },
    Addition { value: T },
    Context { value: T },
}

impl<T> LineEdit<T>
where
    T: Clone + Into<String>,
{
    pub fn as_string(&self) -> String {
        match self {
            LineEdit::Deletion { value } => format!("-{}", value.clone().into()),
            LineEdit::Addition { value } => format!("+{}", value.clone().into()),
            LineEdit::Context { value } => format!(" {}", value.clone().into()),
        }
    }
}

/// Totals over an edit script, the unit the stats stage aggregates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditTotals {
    pub additions: usize,
    pub deletions: usize,
}

impl EditTotals {
    pub fn accumulate(&mut self, other: EditTotals) {
        self.additions += other.additions;
        self.deletions += other.deletions;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LineDiff<'d, T> {
    before: &'d [T],
    after: &'d [T],
}

impl<'d, T: Eq + Clone> LineDiff<'d, T> {
    /// Myers forward pass: snapshots of the furthest-reaching x per diagonal,
    /// one snapshot per edit distance
    fn shortest_edit_trace(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.before.len() as isize, self.after.len() as isize);
        let offset = (n + m) as usize;

        // two empty inputs leave no diagonal to extend
        if offset == 0 {
            return Vec::new();
        }

        let mut reach = vec![0; 2 * offset + 1];
        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            trace.push(reach.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                let mut x = if k == -d {
                    // only reachable from k+1, an addition
                    reach[idx + 1]
                } else if k == d {
                    // only reachable from k-1, a deletion
                    reach[idx - 1] + 1
                } else {
                    let x_del = reach[idx - 1] + 1;
                    let x_add = reach[idx + 1];
                    if x_del > x_add { x_del } else { x_add }
                };

                let mut y = x - k;
                while x < n && y < m && self.before[x as usize] == self.after[y as usize] {
                    // snake
                    x += 1;
                    y += 1;
                }

                reach[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    fn backtrack(&self) -> Vec<(isize, isize, isize, isize)> {
        let (mut x, mut y) = (self.before.len() as isize, self.after.len() as isize);
        let offset = (x + y) as usize;
        let mut path = Vec::new();

        let trace = self.shortest_edit_trace();

        for (d, reach) in trace.iter().enumerate().rev() {
            let k = x - y;

            let prev_k = if k == -(d as isize) {
                k + 1
            } else if k == (d as isize) {
                k - 1
            } else {
                let k_del = k - 1;
                let k_add = k + 1;
                if reach[(offset as isize + k_del) as usize] + 1
                    > reach[(offset as isize + k_add) as usize]
                {
                    k_del
                } else {
                    k_add
                }
            };

            let prev_x = reach[(offset as isize + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        path
    }

    pub fn edits(&self) -> Vec<LineEdit<T>> {
        let mut edits = Vec::new();

        for (prev_x, prev_y, x, y) in self.backtrack() {
            if x == prev_x {
                // only y advanced
                if prev_y < self.after.len() as isize {
                    edits.push(LineEdit::Addition {
                        value: self.after[prev_y as usize].clone(),
                    });
                }
            } else if y == prev_y {
                // only x advanced
                if prev_x < self.before.len() as isize {
                    edits.push(LineEdit::Deletion {
                        value: self.before[prev_x as usize].clone(),
                    });
                }
            } else {
                // diagonal move
                if prev_x < self.before.len() as isize {
                    edits.push(LineEdit::Context {
                        value: self.before[prev_x as usize].clone(),
                    });
                }
            }
        }

        edits.reverse();
        edits
    }

    /// Count additions and deletions without materializing line values
    pub fn totals(&self) -> EditTotals {
        let mut totals = EditTotals::default();

        for edit in self.edits() {
            match edit {
                LineEdit::Addition { .. } => totals.additions += 1,
                LineEdit::Deletion { .. } => totals.deletions += 1,
                LineEdit::Context { .. } => {}
            }
        }

        totals
    }
}
