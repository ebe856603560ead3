//! Antipodal face numbering
//!
//! Faces are paired greedily in index order with the unpaired face whose
//! direction is closest to their opposite. Pairs are ranked by that match and
//! the k-th best pair gets `k` on its first face and `21 - k` on its partner.

use glam::Vec3;
use tracing::debug;

use crate::error::{PropError, Result};

/// Number of faces on the die
pub const FACE_COUNT: usize = 20;

/// Two faces matched as opposites
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacePair {
    pub first: usize,
    pub second: usize,
    /// Cosine between `first` and the negated direction of `second`
    pub score: f32,
}

/// Greedily pair faces with their best remaining antipode
pub fn pair_antipodal(centroids: &[Vec3]) -> Result<Vec<FacePair>> {
    if centroids.len() != FACE_COUNT {
        return Err(PropError::PairingFailure(format!(
            "expected {FACE_COUNT} faces, got {}",
            centroids.len()
        )));
    }

    let dirs: Vec<Vec3> = centroids.iter().map(|c| c.normalize_or_zero()).collect();
    let mut used = [false; FACE_COUNT];
    let mut pairs = Vec::with_capacity(FACE_COUNT / 2);

    for i in 0..FACE_COUNT {
        if used[i] {
            continue;
        }
        let target = -dirs[i];
        let best = (0..FACE_COUNT)
            .filter(|&k| k != i && !used[k])
            .map(|k| (k, dirs[k].dot(target)))
            .fold(None, |best: Option<(usize, f32)>, (k, score)| match best {
                Some((_, s)) if s >= score => best,
                _ => Some((k, score)),
            });

        let Some((k, score)) = best else {
            return Err(PropError::PairingFailure(format!(
                "face {i} has no unpaired candidate"
            )));
        };
        used[i] = true;
        used[k] = true;
        pairs.push(FacePair {
            first: i,
            second: k,
            score,
        });
    }

    if pairs.len() != FACE_COUNT / 2 {
        return Err(PropError::PairingFailure(format!(
            "formed {} pairs instead of {}",
            pairs.len(),
            FACE_COUNT / 2
        )));
    }
    Ok(pairs)
}

/// Die number (1-20) for every face, indexed like `centroids`
pub fn assign_numbers(centroids: &[Vec3]) -> Result<Vec<u8>> {
    let mut pairs = pair_antipodal(centroids)?;
    // Stable, so equal scores keep their discovery order
    pairs.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut numbers = vec![0u8; FACE_COUNT];
    for (rank, pair) in pairs.iter().enumerate() {
        let n = rank as u8 + 1;
        numbers[pair.first] = n;
        numbers[pair.second] = 21 - n;
    }
    debug!(?numbers, "assigned face numbers");
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::icosahedron;

    fn centroids() -> Vec<Vec3> {
        icosahedron(0.5)
            .iter()
            .map(|[a, b, c]| (*a + *b + *c) / 3.0)
            .collect()
    }

    #[test]
    fn test_opposite_faces_sum_to_21() {
        let centres = centroids();
        let numbers = assign_numbers(&centres).unwrap();

        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=20).collect::<Vec<u8>>());

        for i in 0..FACE_COUNT {
            let j = numbers
                .iter()
                .position(|&n| n == 21 - numbers[i])
                .unwrap();
            let d = centres[i].normalize().dot(centres[j].normalize());
            assert!(d <= -0.99, "faces {i} and {j}: dot {d}");
        }
    }

    #[test]
    fn test_pairs_cover_all_faces() {
        let pairs = pair_antipodal(&centroids()).unwrap();
        assert_eq!(pairs.len(), 10);
        let mut seen = [false; FACE_COUNT];
        for p in &pairs {
            assert!(!seen[p.first] && !seen[p.second]);
            seen[p.first] = true;
            seen[p.second] = true;
            assert!(p.score > 0.99);
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_wrong_face_count_rejected() {
        let mut centres = centroids();
        centres.pop();
        assert!(matches!(
            assign_numbers(&centres),
            Err(PropError::PairingFailure(_))
        ));
        assert!(pair_antipodal(&[]).is_err());
    }
}
