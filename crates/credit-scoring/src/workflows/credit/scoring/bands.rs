/// One step of a bucket table: values at or above `lower` receive `adjustment` until the
/// next band starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub lower: i64,
    pub adjustment: i32,
}

impl Band {
    pub const fn new(lower: i64, adjustment: i32) -> Self {
        Self { lower, adjustment }
    }
}

/// Adjustment of the last band whose lower bound does not exceed `value`.
///
/// Tables are ordered by ascending `lower`. Values below the first band resolve to zero.
pub fn lookup(table: &[Band], value: i64) -> i32 {
    table
        .iter()
        .take_while(|band| band.lower <= value)
        .last()
        .map_or(0, |band| band.adjustment)
}

#[cfg(test)]
pub(crate) fn is_ascending(table: &[Band]) -> bool {
    table.windows(2).all(|pair| pair[0].lower < pair[1].lower)
}
