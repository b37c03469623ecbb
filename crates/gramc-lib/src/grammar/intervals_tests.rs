use super::IntervalSet;

#[test]
fn adjacent_ranges_merge() {
    let mut set = IntervalSet::range(1, 3);
    set.add(4);
    set.add_range(10, 12);
    set.add_range(6, 5);

    assert_eq!(set.ranges(), &[(1, 6), (10, 12)]);
    assert_eq!(set.len(), 9);
}

#[test]
fn intersection_of_overlapping_sets() {
    let mut a = IntervalSet::range(1, 10);
    a.add_range(20, 30);
    let b = IntervalSet::range(5, 25);

    assert_eq!(a.intersection(&b).ranges(), &[(5, 10), (20, 25)]);
    assert!(a.intersection(&IntervalSet::of(15)).is_empty());
}

#[test]
fn complement_within_bounds() {
    let mut set = IntervalSet::of(4);
    set.add_range(7, 8);

    assert_eq!(set.complement(4, 10).ranges(), &[(5, 6), (9, 10)]);
    assert_eq!(IntervalSet::new().complement(0, 3).ranges(), &[(0, 3)]);
}

#[test]
fn complement_at_upper_limit() {
    let set = IntervalSet::range(0, u32::MAX);
    assert!(set.complement(0, u32::MAX).is_empty());
}

#[test]
fn add_all_and_contains() {
    let mut set = IntervalSet::of(1);
    set.add_all(&IntervalSet::range(3, 5));

    assert!(set.contains(4));
    assert!(!set.contains(2));
}
