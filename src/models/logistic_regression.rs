use burn::{
    module::Module,
    nn::{loss::CrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    tensor::{activation::softmax, backend::Backend, Int, Tensor},
    train::ClassificationOutput,
};

/// Logistic regression configuration
#[derive(burn::config::Config, Debug)]
pub struct LogisticRegressionConfig {
    /// Width of the input feature vectors (the vocabulary size)
    pub n_features: usize,

    /// Number of output classes
    #[config(default = 2)]
    pub n_classes: usize,

    /// Inverse L2 regularization strength; smaller values regularize more
    #[config(default = 1.0)]
    pub c: f64,
}

impl LogisticRegressionConfig {
    /// Initialize a model with all weights and biases at zero
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticRegression<B> {
        let output = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);

        LogisticRegression {
            output,
            n_classes: self.n_classes,
            c: self.c,
        }
    }
}

/// Multinomial logistic regression over dense feature rows
#[derive(Module, Debug)]
pub struct LogisticRegression<B: Backend> {
    /// Linear layer producing one logit per class
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,

    /// Inverse L2 regularization strength
    pub c: f64,
}

impl<B: Backend> LogisticRegression<B> {
    /// Class logits for a `[batch, n_features]` input
    pub fn forward(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.output.forward(inputs)
    }

    /// Defines forward pass for training.
    ///
    /// The loss is the mean cross-entropy plus `‖W‖² / (2 · c · n_samples)`, where
    /// `n_samples` is the size of the full training set.
    pub fn forward_classification(
        &self,
        inputs: Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
        n_samples: usize,
    ) -> ClassificationOutput<B> {
        let output = self.forward(inputs);

        let loss = CrossEntropyLossConfig::new()
            .init(&output.device())
            .forward(output.clone(), targets.clone());

        let weight = self.output.weight.val();
        let penalty = (weight.clone() * weight)
            .sum()
            .mul_scalar(1.0 / (2.0 * self.c * n_samples.max(1) as f64));

        ClassificationOutput {
            loss: loss + penalty,
            output,
            targets,
        }
    }

    /// Defines forward pass for inference: class probabilities per row
    pub fn infer(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(inputs), 1)
    }
}
