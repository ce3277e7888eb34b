use alloc::vec::Vec;
use rand::Rng;

/// Fisher-Yates shuffle into a new vector, `items` is left untouched.
///
/// Walks `i` from the last index down to 1 and swaps it with a uniformly chosen
/// `j` in `0..=i`, so every permutation is equally likely for a uniform `rng`.
/// The result may keep the original order.
pub fn shuffle<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}
