//! Subset enumeration helpers (bitmasks and index combinations).

/// All `length`-bit masks with exactly `weight` bits set, in increasing order.
///
/// Bit `i` set means item `i` is part of the subset. Uses Gosper's hack, so
/// the masks come out without materializing the full power set.
pub fn bit_iteration(length: usize, weight: usize) -> BitIteration {
    debug_assert!(length < usize::BITS as usize, "mask length exceeds usize");
    let next = if weight > length {
        None
    } else if weight == 0 {
        Some(0)
    } else {
        Some((1usize << weight) - 1)
    };
    BitIteration {
        limit: 1usize << length,
        next,
    }
}

/// Iterator returned by [`bit_iteration`].
#[derive(Clone, Debug)]
pub struct BitIteration {
    limit: usize,
    next: Option<usize>,
}

impl Iterator for BitIteration {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        if current >= self.limit {
            self.next = None;
            return None;
        }
        self.next = if current == 0 {
            None
        } else {
            let lowest = current & current.wrapping_neg();
            let ripple = current + lowest;
            Some((((ripple ^ current) >> 2) / lowest) | ripple)
        };
        Some(current)
    }
}

/// Lexicographic `k`-combinations of `0..n` as sorted index vectors.
pub fn combinations(n: usize, k: usize) -> Combinations {
    Combinations {
        n,
        current: if k <= n { Some((0..k).collect()) } else { None },
    }
}

/// Iterator returned by [`combinations`].
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let out = self.current.take()?;
        let k = out.len();
        let mut succ = out.clone();
        // rightmost index that can still move right
        let mut i = k;
        while i > 0 {
            i -= 1;
            if succ[i] < self.n - k + i {
                succ[i] += 1;
                for j in i + 1..k {
                    succ[j] = succ[j - 1] + 1;
                }
                self.current = Some(succ);
                return Some(out);
            }
        }
        Some(out)
    }
}
