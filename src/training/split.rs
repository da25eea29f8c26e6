//! Shuffled train/test split of a DataFrame

use crate::error::{ProfitError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rows of one split, kept in permutation order
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: DataFrame,
    pub test: DataFrame,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Number of test rows for `n_samples`: `ceil(test_size * n_samples)`
pub fn test_count(n_samples: usize, test_size: f64) -> usize {
    (test_size * n_samples as f64).ceil() as usize
}

/// Shuffle row indices with `seed` and hold out the first
/// `ceil(test_size * n)` of them for testing
pub fn split_indices(n_samples: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ProfitError::InvalidInput(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = test_count(n_samples, test_size);
    if n_test == 0 || n_test >= n_samples {
        return Err(ProfitError::DataError(format!(
            "cannot split {} rows with test_size {}",
            n_samples, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

/// Split `df` into train and test frames
pub fn train_test_split(df: &DataFrame, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    let (train_indices, test_indices) = split_indices(df.height(), test_size, seed)?;

    let train = take_rows(df, &train_indices)?;
    let test = take_rows(df, &test_indices)?;

    Ok(TrainTestSplit {
        train,
        test,
        train_indices,
        test_indices,
    })
}

fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifty_rows_hold_out_six() {
        let (train, test) = split_indices(50, 0.12, 42).unwrap();
        assert_eq!(test.len(), 6);
        assert_eq!(train.len(), 44);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_reproducible() {
        assert_eq!(split_indices(30, 0.2, 7).unwrap(), split_indices(30, 0.2, 7).unwrap());
        assert_ne!(split_indices(30, 0.2, 7).unwrap(), split_indices(30, 0.2, 8).unwrap());
    }

    #[test]
    fn test_too_few_rows() {
        assert!(split_indices(1, 0.12, 42).is_err());
        assert!(split_indices(0, 0.12, 42).is_err());
    }

    #[test]
    fn test_frame_split() {
        let df = df!("a" => (0..10).map(|i| i as f64).collect::<Vec<_>>()).unwrap();
        let split = train_test_split(&df, 0.3, 1).unwrap();

        assert_eq!(split.test.height(), 3);
        assert_eq!(split.train.height(), 7);

        let first = split.test.column("a").unwrap().f64().unwrap().get(0).unwrap();
        assert_eq!(first, split.test_indices[0] as f64);
    }
}
