/// Final ratings and cumulative deltas for one side of a settled series.
/// Entries are positional: index 0 is the side's first slot, index 1 the
/// optional second slot (doubles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideOutcome {
    pub new_ratings: Vec<i32>,
    pub deltas: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOutcome {
    pub winners: SideOutcome,
    pub losers: SideOutcome,
}
