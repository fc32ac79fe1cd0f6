//! Loop assembly: chains a layer's unordered segments into polygon loops.
//!
//! Tracing starts from the lowest-indexed segment not yet covered and
//! follows unused segments from the open end of the path. At a branch the
//! trace continues with the first continuation and every other continuation
//! is forked onto an explicit stack as a snapshot of the path and its own
//! used-segment set, so sibling traces never see each other's consumption.
//!
//! A trace ends in one of two ways:
//!
//! - the next point is already on the path: the loop closes and the part of
//!   the path from that point onwards is emitted as a closed candidate;
//! - both ends are stuck (the path is reversed once to try the other end):
//!   the path is emitted as an open chain.
//!
//! Once every trace grown from a seed has finished, all segments any of them
//! used are removed from the pool and the next seed is picked. Candidates
//! are not de-duplicated here; that is the cleaner's job.

use hashbrown::{HashMap, HashSet};

use crate::geometry::{PointKey, Segment};

/// A traced chain of points, before cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Points in traversal order. Closed candidates do not repeat the first
    /// point at the end.
    pub points: Vec<PointKey>,
    /// Whether the chain closed on itself.
    pub closed: bool,
}

/// Everything the assembler found in one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Candidates in discovery order.
    pub candidates: Vec<Candidate>,
    /// Number of branch states forked.
    pub forks: usize,
    /// Whether some branches were not explored because of the fork cap.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
struct Trace {
    path: Vec<PointKey>,
    /// Position of each path point, kept in step with `path`.
    positions: HashMap<PointKey, usize>,
    used: HashSet<usize>,
    reversed: bool,
    /// Segment a forked trace has yet to step along.
    pending: Option<usize>,
}

enum Step {
    Closed(Vec<PointKey>),
    Open(Vec<PointKey>),
}

struct Assembler<'a> {
    segments: &'a [Segment],
    incidence: HashMap<PointKey, Vec<usize>>,
    max_forks: usize,
    out: Assembly,
}

impl<'a> Assembler<'a> {
    fn new(segments: &'a [Segment], max_forks: usize) -> Self {
        let mut incidence: HashMap<PointKey, Vec<usize>> = HashMap::new();
        for (i, s) in segments.iter().enumerate() {
            incidence.entry(s.a).or_default().push(i);
            incidence.entry(s.b).or_default().push(i);
        }
        Self {
            segments,
            incidence,
            max_forks,
            out: Assembly::default(),
        }
    }

    /// Unused segments leaving the end of `trace`, in index order.
    fn continuations(&self, trace: &Trace) -> Vec<usize> {
        let Some(end) = trace.path.last() else {
            return Vec::new();
        };
        self.incidence
            .get(end)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|i| !trace.used.contains(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Extend `trace` along segment `id`. Returns the closed loop if the
    /// step reaches a point already on the path.
    fn advance(&self, trace: &mut Trace, id: usize) -> Option<Vec<PointKey>> {
        trace.used.insert(id);
        let end = *trace.path.last()?;
        let next = self.segments[id].other(end)?;
        if let Some(&pos) = trace.positions.get(&next) {
            return Some(trace.path[pos..].to_vec());
        }
        trace.positions.insert(next, trace.path.len());
        trace.path.push(next);
        None
    }

    /// Follow one trace to its end, forking at branches.
    fn run(&mut self, mut trace: Trace, stack: &mut Vec<Trace>) -> (Step, HashSet<usize>) {
        if let Some(id) = trace.pending.take() {
            if let Some(points) = self.advance(&mut trace, id) {
                return (Step::Closed(points), trace.used);
            }
        }

        loop {
            let options = self.continuations(&trace);
            let Some((&first, extra)) = options.split_first() else {
                if trace.reversed {
                    return (Step::Open(trace.path), trace.used);
                }
                trace.path.reverse();
                trace.positions = index_path(&trace.path);
                trace.reversed = true;
                continue;
            };

            for &id in extra {
                if self.out.forks >= self.max_forks {
                    self.out.truncated = true;
                    break;
                }
                self.out.forks += 1;
                let mut fork = trace.clone();
                fork.pending = Some(id);
                stack.push(fork);
            }

            if let Some(points) = self.advance(&mut trace, first) {
                return (Step::Closed(points), trace.used);
            }
        }
    }

    fn assemble(mut self) -> Assembly {
        let mut covered = vec![false; self.segments.len()];
        let mut cursor = 0;

        while let Some(seed) = (cursor..self.segments.len()).find(|&i| !covered[i]) {
            cursor = seed + 1;
            let s = self.segments[seed];
            let path = vec![s.a, s.b];
            let mut stack = vec![Trace {
                positions: index_path(&path),
                path,
                used: HashSet::from([seed]),
                reversed: false,
                pending: None,
            }];

            while let Some(trace) = stack.pop() {
                let (step, used) = self.run(trace, &mut stack);
                match step {
                    Step::Closed(points) if points.len() >= 3 => {
                        self.out.candidates.push(Candidate {
                            points,
                            closed: true,
                        });
                    }
                    Step::Closed(_) => {}
                    Step::Open(points) => self.out.candidates.push(Candidate {
                        points,
                        closed: false,
                    }),
                }
                // Seeds only look at coverage, so marking now is the same as
                // marking once the whole stack has drained.
                for i in used {
                    covered[i] = true;
                }
            }
        }

        self.out
    }
}

fn index_path(path: &[PointKey]) -> HashMap<PointKey, usize> {
    path.iter().enumerate().map(|(i, &p)| (p, i)).collect()
}

/// Chain a layer's segments into candidate loops.
///
/// `segments` should be sorted and free of duplicates, as produced by
/// [`crate::build_layers`]; seeds are taken in that order. At most
/// `max_forks` branch states are forked; beyond that
/// [`Assembly::truncated`] is set and the remaining branches are only
/// followed along their first continuation.
///
/// # Example
///
/// ```
/// use strata_slice::{PointKey, Segment, assemble};
///
/// let corners = [PointKey(0, 0), PointKey(1, 0), PointKey(1, 1), PointKey(0, 1)];
/// let mut segments: Vec<Segment> = (0..4)
///     .filter_map(|i| Segment::new(corners[i], corners[(i + 1) % 4], false))
///     .collect();
/// segments.sort();
///
/// let assembly = assemble(&segments, 16);
/// assert_eq!(assembly.candidates.len(), 1);
/// assert!(assembly.candidates[0].closed);
/// assert_eq!(assembly.candidates[0].points.len(), 4);
/// ```
#[must_use]
pub fn assemble(segments: &[Segment], max_forks: usize) -> Assembly {
    Assembler::new(segments, max_forks).assemble()
}
