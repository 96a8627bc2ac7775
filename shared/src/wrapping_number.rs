use crate::Tick;

/// Returns whether tick `a` was issued after tick `b`, treating the `u16`
/// counter as a ring so comparisons keep working across the wrap.
/// tick_greater_than(2, 1) is true, tick_greater_than(1, 65535) is true,
/// tick_greater_than(1, 1) is false.
pub fn tick_greater_than(a: Tick, b: Tick) -> bool {
    a != b && a.wrapping_sub(b) <= 32768
}

/// Mirror of [`tick_greater_than`].
pub fn tick_less_than(a: Tick, b: Tick) -> bool {
    tick_greater_than(b, a)
}

/// Signed number of ticks from `a` forward to `b`.
///
/// ```
/// # use convoy_shared::tick_diff;
/// assert_eq!(tick_diff(1, 2), 1);
/// assert_eq!(tick_diff(2, 1), -1);
/// assert_eq!(tick_diff(65535, 0), 1);
/// assert_eq!(tick_diff(0, 65535), -1);
/// ```
pub fn tick_diff(a: Tick, b: Tick) -> i16 {
    b.wrapping_sub(a) as i16
}
