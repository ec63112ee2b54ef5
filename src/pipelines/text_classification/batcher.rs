use burn::{
    data::dataloader,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::utils::tensors::{dense_from_sparse, targets_from_labels};

use super::Item;

/// A training batch for text classification
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Dense feature rows: [batch_size, n_features]
    pub inputs: Tensor<B, 2>,

    /// Class ids for the batch
    pub targets: Tensor<B, 1, Int>,
}

/// Struct for batching featurized items
#[derive(Clone, new)]
pub struct Batcher<B: Backend> {
    /// Width of every feature row
    pub n_features: usize,

    /// Device on which to perform computation
    pub device: B::Device,
}

impl<B: Backend> dataloader::batcher::Batcher<Item, Train<B>> for Batcher<B> {
    /// Collects a vector of items into a training batch
    fn batch(&self, items: Vec<Item>) -> Train<B> {
        let (rows, labels): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|item| (item.features, item.label))
            .unzip();

        Train {
            inputs: dense_from_sparse(&rows, self.n_features, &self.device),
            targets: targets_from_labels(&labels, &self.device),
        }
    }
}
