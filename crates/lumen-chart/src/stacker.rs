//! Accumulation of stacked series.

use ahash::HashMap;

use crate::series::SeriesKind;
use crate::value::StackedValue;

#[derive(Debug, Clone, Copy, Default)]
struct Stack {
    positive: f64,
    negative: f64,
}

/// Running totals per series kind, stack group and secondary value.
///
/// Stacks of different kinds never share totals: a stacked area does not sit
/// on top of stacked columns of the same group. Series push their samples in
/// registration order; each sample starts where the previous one of the same
/// sign ended. Positive and negative values accumulate separately so they
/// grow away from the baseline.
#[derive(Debug, Default)]
pub struct Stacker {
    stacks: HashMap<StackKey, Stack>,
}

impl Stacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack `value` at `secondary` in the `kind` stack of `group`. The
    /// returned total is not final until every series has been pushed; see
    /// [`Stacker::finish`].
    pub fn push(
        &mut self,
        kind: SeriesKind,
        group: usize,
        secondary: f64,
        value: f64,
    ) -> StackedValue {
        let stack = self.stacks.entry(key(kind, group, secondary)).or_default();
        let slot = if value >= 0.0 {
            &mut stack.positive
        } else {
            &mut stack.negative
        };
        let start = *slot;
        *slot += value;
        StackedValue {
            start,
            end: *slot,
            total: 0.0,
        }
    }

    /// Total of the same-sign stack `value` belongs to.
    pub fn total(&self, kind: SeriesKind, group: usize, secondary: f64, value: f64) -> f64 {
        self.stacks
            .get(&key(kind, group, secondary))
            .map(|stack| {
                if value >= 0.0 {
                    stack.positive
                } else {
                    stack.negative
                }
            })
            .unwrap_or(0.0)
    }

    /// Fill in the final stack total of a previously pushed sample.
    pub fn finish(
        &self,
        kind: SeriesKind,
        group: usize,
        secondary: f64,
        stacked: &mut StackedValue,
    ) {
        let value = stacked.end - stacked.start;
        stacked.total = self.total(kind, group, secondary, value);
    }
}

type StackKey = (SeriesKind, usize, u64);

fn key(kind: SeriesKind, group: usize, secondary: f64) -> StackKey {
    // -0.0 and 0.0 are the same category.
    let secondary = if secondary == 0.0 { 0.0 } else { secondary };
    (kind, group, secondary.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMN: SeriesKind = SeriesKind::StackedColumn;

    #[test]
    fn test_accumulates_in_push_order() {
        let mut stacker = Stacker::new();
        let first = stacker.push(COLUMN, 0, 1.0, 2.0);
        let second = stacker.push(COLUMN, 0, 1.0, 3.0);
        assert_eq!((first.start, first.end), (0.0, 2.0));
        assert_eq!((second.start, second.end), (2.0, 5.0));

        let mut second = second;
        stacker.finish(COLUMN, 0, 1.0, &mut second);
        assert_eq!(second.total, 5.0);
    }

    #[test]
    fn test_signs_and_groups_are_independent() {
        let mut stacker = Stacker::new();
        stacker.push(COLUMN, 0, 0.0, 4.0);
        let negative = stacker.push(COLUMN, 0, -0.0, -1.0);
        assert_eq!((negative.start, negative.end), (0.0, -1.0));

        let other_group = stacker.push(COLUMN, 1, 0.0, 1.0);
        assert_eq!(other_group.start, 0.0);

        let other_category = stacker.push(COLUMN, 0, 2.0, 1.0);
        assert_eq!(other_category.start, 0.0);
    }

    #[test]
    fn test_kinds_stack_separately() {
        let mut stacker = Stacker::new();
        stacker.push(SeriesKind::StackedColumn, 0, 0.0, 1.0);
        let mut area = stacker.push(SeriesKind::StackedArea, 0, 0.0, 1.0);
        assert_eq!((area.start, area.end), (0.0, 1.0));

        stacker.finish(SeriesKind::StackedArea, 0, 0.0, &mut area);
        assert_eq!(area.total, 1.0);
    }
}
