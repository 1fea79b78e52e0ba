//! Ratcliff/Obershelp similarity: twice the number of matched characters over the
//! combined length, where matches are found by recursively taking the longest common
//! block (earliest in `a`, then in `b`) and recursing on both sides of it.

pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut matched = 0;

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }

        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    let width = b_hi - b_lo + 1;
    // runs[k + 1] is the length of the common run ending at (i - 1, b_lo + k).
    let mut runs = vec![0usize; width];
    let mut next = vec![0usize; width];

    for i in a_lo..a_hi {
        next.iter_mut().for_each(|run| *run = 0);
        for j in b_lo..b_hi {
            if a[i] != b[j] {
                continue;
            }
            let size = runs[j - b_lo] + 1;
            next[j - b_lo + 1] = size;
            if size > best_size {
                best_i = i + 1 - size;
                best_j = j + 1 - size;
                best_size = size;
            }
        }
        std::mem::swap(&mut runs, &mut next);
    }

    (best_i, best_j, best_size)
}
