/// Smallest bucket array the map will allocate.
pub const MIN_CAPACITY: u64 = 17;

/// Largest bucket array the map will grow to; beyond that resizes are refused.
pub const MAX_CAPACITY: u64 = 4_294_967_311;

/// Trial division on the 6k +/- 1 wheel.
pub fn is_prime(n: u64) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n <= 1 || n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let (mut i, mut w) = (5u64, 2u64);
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += w;
        w = 6 - w;
    }
    true
}

/// Clamps `requested` into `[MIN_CAPACITY, max_capacity]` and moves it up to the next prime,
/// never past `max_capacity`.
pub fn select_capacity(requested: u64, max_capacity: u64) -> u64 {
    let mut capacity = requested.max(MIN_CAPACITY).min(max_capacity);
    while capacity < max_capacity && !is_prime(capacity) {
        capacity += 1;
    }
    capacity.min(max_capacity)
}

/// Capacity needed so that `items` spread over it stays at or under `target_load_factor`.
///
/// Doubles a candidate starting at 2 until the ratio fits or the maximum is hit,
/// then hands the candidate to [`select_capacity`].
pub fn growth_capacity(items: u64, target_load_factor: f64, max_capacity: u64) -> u64 {
    let mut candidate = 2u64;
    while items as f64 / candidate as f64 > target_load_factor {
        candidate = candidate.saturating_mul(2);
        if candidate >= max_capacity {
            candidate = max_capacity;
            break;
        }
    }
    select_capacity(candidate, max_capacity)
}
