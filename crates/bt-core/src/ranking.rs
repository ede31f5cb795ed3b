//! Final standings.

use crate::competitor::{Competitor, Status};

/// Orders competitors for the results table.
///
/// Finished competitors come first, fastest elapsed time first; ties keep
/// their input order. Everyone else follows in input order.
pub fn rank<'a, I>(competitors: I) -> Vec<&'a Competitor>
where
    I: IntoIterator<Item = &'a Competitor>,
{
    let (mut finished, others): (Vec<_>, Vec<_>) = competitors
        .into_iter()
        .partition(|c| c.status == Status::Finished);

    // sort_by_key is stable
    finished.sort_by_key(|c| c.elapsed());
    finished.extend(others);
    finished
}
