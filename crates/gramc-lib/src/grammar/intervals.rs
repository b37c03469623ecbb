//! Sets of token types or characters, stored as sorted inclusive ranges.

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    /// Sorted, disjoint and non-adjacent.
    ranges: Vec<(u32, u32)>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(value: u32) -> Self {
        Self::range(value, value)
    }

    pub fn range(lo: u32, hi: u32) -> Self {
        let mut set = Self::new();
        set.add_range(lo, hi);
        set
    }

    pub fn add(&mut self, value: u32) {
        self.add_range(value, value);
    }

    pub fn add_range(&mut self, lo: u32, hi: u32) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.ranges.push((lo, hi));
        self.normalize();
    }

    pub fn add_all(&mut self, other: &IntervalSet) {
        self.ranges.extend_from_slice(&other.ranges);
        self.normalize();
    }

    pub fn contains(&self, value: u32) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= value && value <= hi)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of members.
    pub fn len(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| u64::from(hi - lo) + 1)
            .sum()
    }

    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    pub fn intersection(&self, other: &IntervalSet) -> IntervalSet {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a_lo, a_hi) = self.ranges[i];
            let (b_lo, b_hi) = other.ranges[j];
            let lo = a_lo.max(b_lo);
            let hi = a_hi.min(b_hi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a_hi < b_hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        IntervalSet { ranges: out }
    }

    /// Members of `min..=max` not in this set.
    pub fn complement(&self, min: u32, max: u32) -> IntervalSet {
        let mut out = Vec::new();
        let mut next = min;
        for &(lo, hi) in &self.ranges {
            if hi < next {
                continue;
            }
            if lo > max {
                break;
            }
            if lo > next {
                out.push((next, lo - 1));
            }
            match hi.checked_add(1) {
                Some(n) => next = n,
                None => return IntervalSet { ranges: out },
            }
        }
        if next <= max {
            out.push((next, max));
        }
        IntervalSet { ranges: out }
    }

    fn normalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            match merged.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
    }
}
