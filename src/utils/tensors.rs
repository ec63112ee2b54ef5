use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

use crate::models::tfidf::SparseRow;

/// Scatter sparse rows into a dense `[rows, n_features]` float tensor
pub fn dense_from_sparse<B: Backend>(
    rows: &[SparseRow],
    n_features: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let mut values = vec![0.0f32; rows.len() * n_features];

    for (index, row) in rows.iter().enumerate() {
        let offset = index * n_features;

        for &(column, value) in row {
            if column < n_features {
                values[offset + column] = value;
            }
        }
    }

    let data: Data<B::FloatElem, 2> = Data::new(
        values.into_iter().map(|v| v.elem()).collect(),
        Shape::new([rows.len(), n_features]),
    );

    Tensor::from_data(data, device)
}

/// Build a class id tensor from integer labels
pub fn targets_from_labels<B: Backend>(labels: &[usize], device: &B::Device) -> Tensor<B, 1, Int> {
    let data: Data<B::IntElem, 1> = Data::new(
        labels.iter().map(|&label| (label as i64).elem()).collect(),
        Shape::new([labels.len()]),
    );

    Tensor::from_data(data, device)
}

/// Read a 2D float tensor back into row vectors
pub fn rows_from_tensor<B: Backend>(tensor: Tensor<B, 2>) -> Vec<Vec<f32>> {
    let [_, n_cols] = tensor.dims();
    let values = tensor.into_data().convert::<f32>().value;

    if n_cols == 0 {
        return Vec::new();
    }

    values.chunks(n_cols).map(<[f32]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn test_dense_from_sparse() {
        let device = Default::default();
        let rows = vec![vec![(0, 0.5), (2, 0.25)], vec![], vec![(1, 1.0)]];

        let tensor = dense_from_sparse::<TestBackend>(&rows, 3, &device);

        assert_eq!(tensor.dims(), [3, 3]);
        assert_eq!(
            rows_from_tensor(tensor),
            vec![
                vec![0.5, 0.0, 0.25],
                vec![0.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0]
            ]
        );
    }

    #[test]
    fn test_targets_from_labels() {
        let device = Default::default();

        let targets = targets_from_labels::<TestBackend>(&[1, 0, 1], &device);

        assert_eq!(
            targets.into_data().convert::<i64>().value,
            vec![1i64, 0, 1]
        );
    }
}
