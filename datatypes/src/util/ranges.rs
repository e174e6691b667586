pub fn value_in_range_inclusive<T>(value: T, min: T, max: T) -> bool
where
    T: PartialOrd,
{
    (value >= min) && (value <= max)
}

/// Checks whether `value` lies in the half-open range `[min, max)`
pub fn value_in_range<T>(value: T, min: T, max: T) -> bool
where
    T: PartialOrd,
{
    (value >= min) && (value < max)
}
