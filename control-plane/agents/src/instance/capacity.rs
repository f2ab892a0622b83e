//! Capacity arithmetic for instance expand and shrink decisions.
//!
//! All targets are ceiling-aligned to the instance's declared step size and
//! clamped into the cloud's instance size bounds. The planner is pure; the
//! manager owns the cloud listings feeding it.

use share_port::constants::{
    DEFAULT_CAPACITY_STEP_SIZE_GB, GIB, MAX_INSTANCE_SIZE_BYTES, MIN_INSTANCE_SIZE_BYTES,
};
use share_port::types::v0::transport::MultishareInstance;

/// GiB as bytes.
pub(crate) fn gib_to_bytes(gib: u64) -> u64 {
    gib * GIB
}

/// The resize granularity of an instance, in bytes.
pub(crate) fn step_bytes(instance: &MultishareInstance) -> u64 {
    match instance.capacity_step_size_gb {
        0 => gib_to_bytes(DEFAULT_CAPACITY_STEP_SIZE_GB),
        step => gib_to_bytes(step),
    }
}

/// Ceiling-align `bytes` to a multiple of `step`.
pub(crate) fn align_bytes(bytes: u64, step: u64) -> u64 {
    if step == 0 {
        return bytes;
    }
    ((bytes + step - 1) / step) * step
}

/// The aligned capacity an instance must grow to before `needed` more share
/// bytes fit, or `None` when the current headroom already suffices.
pub(crate) fn expansion_target(
    instance_capacity: u64,
    share_total: u64,
    needed: u64,
    step: u64,
) -> Option<u64> {
    if instance_capacity.saturating_sub(share_total) >= needed {
        return None;
    }
    let target = align_bytes(share_total + needed, step);
    Some(target.min(MAX_INSTANCE_SIZE_BYTES))
}

/// The aligned capacity a drained instance may shrink to, or `None` when no
/// shrink is warranted.
///
/// Never exceeds the current capacity: either the aligned share total sits
/// strictly below it, or there is nothing to reclaim.
pub(crate) fn shrink_target(instance_capacity: u64, share_total: u64, step: u64) -> Option<u64> {
    if share_total >= instance_capacity || instance_capacity <= MIN_INSTANCE_SIZE_BYTES {
        return None;
    }
    let target = align_bytes(share_total, step).max(MIN_INSTANCE_SIZE_BYTES);
    (target < instance_capacity).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use share_port::constants::TIB;

    #[test]
    fn alignment_is_ceiling() {
        let step = gib_to_bytes(256);
        assert_eq!(align_bytes(0, step), 0);
        assert_eq!(align_bytes(1, step), step);
        assert_eq!(align_bytes(step, step), step);
        assert_eq!(align_bytes(step + 1, step), 2 * step);
        assert_eq!(align_bytes(5, 0), 5);
    }

    #[test]
    fn fitting_share_needs_no_expansion() {
        // 1024 GiB instance, 500 GiB of shares, a 100 GiB share incoming.
        let target = expansion_target(
            gib_to_bytes(1024),
            gib_to_bytes(500),
            gib_to_bytes(100),
            gib_to_bytes(256),
        );
        assert_eq!(target, None);
    }

    #[test]
    fn expansion_target_is_aligned() {
        // 1024 GiB instance, 900 GiB of shares, a 200 GiB share incoming:
        // grow to align_up(1100, 256) = 1280 GiB.
        let target = expansion_target(
            gib_to_bytes(1024),
            gib_to_bytes(900),
            gib_to_bytes(200),
            gib_to_bytes(256),
        );
        assert_eq!(target, Some(gib_to_bytes(1280)));
    }

    #[test]
    fn expansion_clamps_to_max_instance_size() {
        let target = expansion_target(
            MAX_INSTANCE_SIZE_BYTES - gib_to_bytes(10),
            MAX_INSTANCE_SIZE_BYTES - gib_to_bytes(20),
            gib_to_bytes(512),
            gib_to_bytes(256),
        );
        assert_eq!(target, Some(MAX_INSTANCE_SIZE_BYTES));
    }

    #[test]
    fn shrink_clamps_to_min_instance_size() {
        // 2 TiB instance with 100 GiB of shares shrinks to the 1 TiB floor,
        // not to the 256 GiB alignment of its share total.
        let target = shrink_target(2 * TIB, gib_to_bytes(100), gib_to_bytes(256));
        assert_eq!(target, Some(MIN_INSTANCE_SIZE_BYTES));
    }

    #[test]
    fn shrink_is_monotonic() {
        let step = gib_to_bytes(256);
        // Aligned share total equal to current capacity: nothing to reclaim.
        assert_eq!(shrink_target(TIB + step, TIB + 1, step), None);
        // Instance already at the floor.
        assert_eq!(shrink_target(MIN_INSTANCE_SIZE_BYTES, gib_to_bytes(10), step), None);
        // Shares exceeding capacity must never trigger an upward "shrink".
        assert_eq!(shrink_target(TIB, 2 * TIB, step), None);
        if let Some(target) = shrink_target(2 * TIB, TIB + 1, step) {
            assert!(target < 2 * TIB);
            assert_eq!(target % step, 0);
        } else {
            panic!("expected a shrink");
        }
    }

    #[test]
    fn default_step_covers_unreported_granularity() {
        let mut instance = MultishareInstance::default();
        assert_eq!(step_bytes(&instance), gib_to_bytes(DEFAULT_CAPACITY_STEP_SIZE_GB));
        instance.capacity_step_size_gb = 512;
        assert_eq!(step_bytes(&instance), gib_to_bytes(512));
    }
}
