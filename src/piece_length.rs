//! The piece-length policy: a pure, fixed table from total subtree size to
//! piece length, replacing the historical tool's tunable pieces-count
//! heuristic (see REDESIGN FLAGS in the spec this crate implements).

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Smallest piece length this policy ever produces (32 KiB).
pub const MIN_PIECE_LENGTH: u64 = 1 << 15;

/// Derive the piece length for a subtree of the given total size.
///
/// The thresholds and resulting exponents are fixed; there is no tunable
/// variant. Monotonic in `size`.
pub fn piece_length_for(size: u64) -> u64 {
    let exponent: u32 = if size > 8 * GIB {
        21
    } else if size > 2 * GIB {
        20
    } else if size > 512 * MIB {
        19
    } else if size > 64 * MIB {
        18
    } else if size > 16 * MIB {
        17
    } else if size > 4 * MIB {
        16
    } else {
        15
    };

    1u64 << exponent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_thresholds() {
        assert_eq!(piece_length_for(0), 1 << 15);
        assert_eq!(piece_length_for(4 * MIB), 1 << 15);
        assert_eq!(piece_length_for(4 * MIB + 1), 1 << 16);
        assert_eq!(piece_length_for(16 * MIB), 1 << 16);
        assert_eq!(piece_length_for(16 * MIB + 1), 1 << 17);
        assert_eq!(piece_length_for(64 * MIB), 1 << 17);
        assert_eq!(piece_length_for(64 * MIB + 1), 1 << 18);
        assert_eq!(piece_length_for(512 * MIB), 1 << 18);
        assert_eq!(piece_length_for(512 * MIB + 1), 1 << 19);
        assert_eq!(piece_length_for(2 * GIB), 1 << 19);
        assert_eq!(piece_length_for(2 * GIB + 1), 1 << 20);
        assert_eq!(piece_length_for(8 * GIB), 1 << 20);
        assert_eq!(piece_length_for(8 * GIB + 1), 1 << 21);
    }

    #[test]
    fn positive_monotonic() {
        let sizes = [0, 1, KIB, MIB, 4 * MIB, 16 * MIB, 64 * MIB, 512 * MIB, 2 * GIB, 8 * GIB, 64 * GIB];
        for window in sizes.windows(2) {
            assert!(piece_length_for(window[0]) <= piece_length_for(window[1]));
        }
    }
}
