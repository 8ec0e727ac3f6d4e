//! Constructive greedy strategies
//!
//! All four share one skeleton: visit nodes in a strategy-specific order
//! and give each the smallest color free among its colored neighbors. When
//! the context caps the palette, a node that would need a color past the
//! cap takes the least-conflicting color instead.
//!
//! | Strategy | Order |
//! |----------|-------|
//! | First fit | index order |
//! | Welsh-Powell | non-increasing degree |
//! | DSatur | dynamic: saturation, then degree |
//! | RLF | one color class at a time |
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod dsatur;
mod first_fit;
mod rlf;
mod welsh_powell;

pub use self::dsatur::DSatur;
pub use self::first_fit::FirstFit;
pub use self::rlf::RecursiveLargestFirst;
pub use self::welsh_powell::WelshPowell;

use crate::algorithm::traits::{AttemptOutcome, Result};
use crate::execution::context::{RunContext, Snapshot};

/// Color nodes one at a time in the given order
pub(crate) fn color_in_order<I>(ctx: &mut RunContext<'_>, order: I) -> Result<AttemptOutcome>
where
    I: IntoIterator<Item = usize>,
{
    let graph = ctx.graph();
    let cap = ctx.max_colors();
    ctx.coloring.reset();

    for u in order {
        ctx.coloring.assign_bounded(graph, u, cap);
        ctx.tick(Snapshot::Live)?;
    }
    Ok(AttemptOutcome::Constructed)
}

/// Lowest-index node maximizing `key` among `candidates`
pub(crate) fn argmax_lowest<K, I, F>(candidates: I, mut key: F) -> Option<usize>
where
    K: Ord,
    I: IntoIterator<Item = usize>,
    F: FnMut(usize) -> K,
{
    let mut best: Option<(usize, K)> = None;
    for u in candidates {
        let k = key(u);
        match &best {
            Some((_, current)) if k <= *current => {}
            _ => best = Some((u, k)),
        }
    }
    best.map(|(u, _)| u)
}
