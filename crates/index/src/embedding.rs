//! Dense embedding matrix and taste-vector aggregation.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::IndexError;

/// Row-major `rows × dimension` matrix; row `i` is the latent vector of
/// internal index `i`.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    rows: Array2<f32>,
}

impl EmbeddingTable {
    /// Wrap an existing matrix. A zero-width matrix is rejected.
    pub fn new(rows: Array2<f32>) -> Result<Self, IndexError> {
        if rows.ncols() == 0 {
            return Err(IndexError::InvalidArtifact(
                "embedding dimension must be positive".into(),
            ));
        }
        Ok(Self { rows })
    }

    /// Build from a flat row-major buffer.
    pub fn from_flat(dimension: usize, data: Vec<f32>) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::InvalidArtifact(
                "embedding dimension must be positive".into(),
            ));
        }
        if data.len() % dimension != 0 {
            return Err(IndexError::InvalidArtifact(format!(
                "{} values is not a whole number of {dimension}-d rows",
                data.len()
            )));
        }
        let n = data.len() / dimension;
        let rows = Array2::from_shape_vec((n, dimension), data)
            .map_err(|e| IndexError::InvalidArtifact(e.to_string()))?;
        Self::new(rows)
    }

    /// Build from one `Vec` per row; all rows must share a length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, IndexError> {
        let dimension = rows.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * dimension);
        for row in rows {
            if row.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        Self::from_flat(dimension, flat)
    }

    pub fn vector_for(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.len()).then(|| self.rows.row(index))
    }

    /// Coordinate-wise mean of the given rows. `None` when `indices` is empty.
    pub fn aggregate(&self, indices: &[usize]) -> Result<Option<Array1<f32>>, IndexError> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(IndexError::UnknownIndex(bad));
        }
        Ok(self.rows.select(Axis(0), indices).mean_axis(Axis(0)))
    }

    pub fn dimension(&self) -> usize {
        self.rows.ncols()
    }

    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    pub fn as_array(&self) -> &Array2<f32> {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn aggregate_is_coordinate_mean() {
        let table = EmbeddingTable::new(array![[1.0, 0.0], [0.0, 1.0], [4.0, 4.0]]).unwrap();
        let mean = table.aggregate(&[0, 1]).unwrap().unwrap();
        assert_eq!(mean, array![0.5, 0.5]);
    }

    #[test]
    fn aggregate_weights_repeated_rows() {
        let table = EmbeddingTable::new(array![[0.0, 0.0], [3.0, 3.0]]).unwrap();
        let mean = table.aggregate(&[1, 1, 0]).unwrap().unwrap();
        assert_eq!(mean, array![2.0, 2.0]);
    }

    #[test]
    fn aggregate_of_nothing_is_none() {
        let table = EmbeddingTable::new(array![[1.0, 2.0]]).unwrap();
        assert!(table.aggregate(&[]).unwrap().is_none());
    }

    #[test]
    fn aggregate_rejects_out_of_range() {
        let table = EmbeddingTable::new(array![[1.0, 2.0]]).unwrap();
        assert!(matches!(
            table.aggregate(&[0, 3]),
            Err(IndexError::UnknownIndex(3))
        ));
    }

    #[test]
    fn from_flat_checks_shape() {
        let table = EmbeddingTable::from_flat(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dimension(), 2);
        assert_eq!(table.vector_for(1).unwrap().to_vec(), vec![3.0, 4.0]);
        assert!(table.vector_for(2).is_none());

        assert!(EmbeddingTable::from_flat(3, vec![1.0, 2.0]).is_err());
        assert!(EmbeddingTable::from_flat(0, vec![]).is_err());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = EmbeddingTable::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        ));
    }
}
