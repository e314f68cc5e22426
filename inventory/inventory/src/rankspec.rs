//! Run-length encoding of sparse selections over a rank-ordered, homogeneous collection.
//!
//! A rankspec is a string of runs, `(<count>?<char>)*`.  A run of `-` skips ranks, a run of any other
//! character marks ranks and carries that character as an opaque payload, e.g. a state code.  An omitted
//! count means 1.
//!
//! `"2-3+"` skips ranks 0 and 1 then marks ranks 2, 3 and 4 with `'+'`.

use std::fmt::{Display, Formatter, Write};
use std::ops::Range;
use std::str::FromStr;

use itertools::Itertools;
use rand::Rng;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

pub const SKIP: char = '-';
pub const MARK: char = '+';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    /// rank of the first element covered by this run
    pub start: usize,
    pub len: usize,
    pub value: char,
}

impl Run {
    pub fn is_skip(&self) -> bool {
        self.value == SKIP
    }

    pub fn ranks(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// A validated rankspec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct RankSpec {
    spec: String,
    runs: Vec<Run>,
}

impl RankSpec {
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Iterates over the marked ranks, in rank order, with their payload character.
    pub fn ranks(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.runs
            .iter()
            .filter(|run| !run.is_skip())
            .flat_map(|run| {
                run.ranks()
                    .map(move |rank| (rank, run.value))
            })
    }

    /// Visits every marked rank, returns the number of marked ranks.
    pub fn decode<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(usize, char),
    {
        let mut count = 0;
        for (rank, value) in self.ranks() {
            visit(rank, value);
            count += 1;
        }
        count
    }

    /// The number of marked ranks.
    pub fn count(&self) -> usize {
        self.runs
            .iter()
            .filter(|run| !run.is_skip())
            .map(|run| run.len)
            .sum()
    }

    /// The highest marked rank, if any.
    pub fn max_rank(&self) -> Option<usize> {
        self.runs
            .iter()
            .rev()
            .find(|run| !run.is_skip() && run.len > 0)
            .map(|run| run.start + run.len - 1)
    }

    /// Builds the minimal rankspec marking `ranks` with [`MARK`].
    ///
    /// Duplicates are ignored and order does not matter.  Returns `None` when there is nothing to mark.
    pub fn from_ranks<I>(ranks: I) -> Option<RankSpec>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut writer = RunWriter::default();
        let mut ranks = ranks
            .into_iter()
            .sorted_unstable()
            .dedup()
            .peekable();
        while let Some(first) = ranks.next() {
            let mut last = first;
            while ranks.next_if_eq(&(last + 1)).is_some() {
                last += 1;
            }

            let gap = first - writer.rank;
            if gap > 0 {
                writer.push(gap, SKIP);
            }
            writer.push(last - first + 1, MARK);
        }

        writer.finish()
    }
}

impl FromStr for RankSpec {
    type Err = RankSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if spec.is_empty() {
            return Err(RankSpecError::Empty);
        }

        let mut runs = vec![];
        let mut rank: usize = 0;
        let mut chars = spec.char_indices().peekable();

        while chars.peek().is_some() {
            let mut digits = String::new();
            while let Some((_, digit)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
                digits.push(digit);
            }

            let Some((_, value)) = chars.next() else {
                return Err(RankSpecError::TrailingCount(digits));
            };

            let len = match digits.is_empty() {
                true => 1,
                false => digits
                    .parse::<usize>()
                    .map_err(|_| RankSpecError::InvalidCount(digits.clone()))?,
            };

            runs.push(Run {
                start: rank,
                len,
                value,
            });
            rank = rank
                .checked_add(len)
                .ok_or(RankSpecError::InvalidCount(digits))?;
        }

        Ok(RankSpec {
            spec: spec.to_string(),
            runs,
        })
    }
}

impl Display for RankSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.spec)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankSpecError {
    #[error("Empty rankspec")]
    Empty,
    #[error("Rankspec ends with a count but no character. count: '{0}'")]
    TrailingCount(String),
    #[error("Invalid run count in rankspec. count: '{0}'")]
    InvalidCount(String),
}

#[derive(Default)]
struct RunWriter {
    spec: String,
    runs: Vec<Run>,
    rank: usize,
}

impl RunWriter {
    fn push(&mut self, len: usize, value: char) {
        if len != 1 {
            // writing to a String cannot fail
            let _ = write!(self.spec, "{}", len);
        }
        self.spec.push(value);
        self.runs.push(Run {
            start: self.rank,
            len,
            value,
        });
        self.rank += len;
    }

    fn finish(self) -> Option<RankSpec> {
        match self.runs.is_empty() {
            true => None,
            false => Some(RankSpec {
                spec: self.spec,
                runs: self.runs,
            }),
        }
    }
}

/// Parses `spec` and visits every marked rank with its payload character.
///
/// The spec is validated before the first visit so a malformed spec visits nothing.  Returns the number of
/// marked ranks.
pub fn decode<F>(spec: &str, visit: F) -> Result<usize, RankSpecError>
where
    F: FnMut(usize, char),
{
    let spec = RankSpec::from_str(spec)?;
    Ok(spec.decode(visit))
}

/// Encodes a dense selection, rank `i` is selected when `selected[i]` is true.
///
/// Returns `None` when nothing is selected.
pub fn encode(selected: &[bool]) -> Option<RankSpec> {
    RankSpec::from_ranks(
        selected
            .iter()
            .enumerate()
            .filter_map(|(rank, &is_selected)| is_selected.then_some(rank)),
    )
}

/// Synthesizes a small random spec of the form `<0|1>-<0|1>+`.
///
/// Only for demonstration data; callers must gate this behind an explicit opt-in.
pub fn demo_rankspec<R: Rng + ?Sized>(rng: &mut R) -> RankSpec {
    let skip: usize = rng.random_range(0..2);
    let mark: usize = rng.random_range(0..2);

    let spec = format!("{}{}{}{}", skip, SKIP, mark, MARK);
    let runs = vec![
        Run {
            start: 0,
            len: skip,
            value: SKIP,
        },
        Run {
            start: skip,
            len: mark,
            value: MARK,
        },
    ];

    RankSpec {
        spec,
        runs,
    }
}
