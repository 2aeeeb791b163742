/// Longest-common-subsequence alignment.
///
/// The same dynamic program serves both granularities: paragraphs under a
/// similarity predicate and words under equality. The predicate need not be
/// transitive; the backtrack follows exactly the choices the fill made, so
/// the pair list is always consistent with the table.

/// Align two sequences, returning matched index pairs in order.
pub fn lcs_pairs<T, F>(a: &[T], b: &[T], eq: F) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let (m, n) = (a.len(), b.len());
    if m == 0 || n == 0 {
        return Vec::new();
    }

    // table[i][j] = LCS length of a[i..] and b[j..]
    let width = n + 1;
    let mut table = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            table[i * width + j] = if eq(&a[i], &b[j]) {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[0] as usize);
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if eq(&a[i], &b[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}
