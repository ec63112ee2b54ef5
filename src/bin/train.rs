//! Command line tool to train a classifier from a labeled CSV file and save it

use anyhow::anyhow;
use burn::LearningRate;
use log::info;
use pico_args::Arguments;
use spam_classifier::{
    datasets::spam_or_ham::{self, Category},
    pipelines::text_classification::{self, Pipeline},
};

const HELP: &str = "\
Usage: train [DATA] [OPTIONS]

Arguments:
  DATA                          The labeled CSV file to train on (defaults to 'spamorham.csv')

Options:
  -h, --help                    Print help
  -o, --output                  Directory to save the trained pipeline to (defaults to 'artifacts')
  -n, --num-epochs              Number of epochs to train for
  -b, --batch-size              Batch size
  -l, --learning-rate           Initial learning rate
  -c, --inverse-regularization  Inverse L2 regularization strength
";

#[derive(Debug)]
struct Args {
    data: String,
    output: String,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    learning_rate: Option<LearningRate>,
    c: Option<f64>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            output: pargs
                .opt_value_from_str(["-o", "--output"])?
                .unwrap_or_else(|| "artifacts".to_string()),
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            learning_rate: pargs.opt_value_from_str(["-l", "--learning-rate"])?,
            c: pargs.opt_value_from_str(["-c", "--inverse-regularization"])?,
            data: pargs
                .opt_free_from_str()?
                .unwrap_or_else(|| spam_or_ham::DEFAULT_PATH.to_string()),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let mut config = text_classification::Config::new();

    if let Some(num_epochs) = args.num_epochs {
        config.num_epochs = num_epochs;
    }

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }

    if let Some(c) = args.c {
        config.c = c;
    }

    let data = args.data.clone();
    let pipeline =
        tokio::task::spawn_blocking(move || Pipeline::from_csv(&data, config)).await??;

    pipeline.save(&args.output)?;

    // Spot-check the fitted pipeline on a few training messages
    let dataset = spam_or_ham::Dataset::load(&args.data)?;
    let samples = dataset.get_samples(5);
    let texts: Vec<String> = samples.iter().map(|item| item.text.clone()).collect();
    let probabilities = pipeline.predict_proba(&texts)?;

    for (item, probs) in samples.iter().zip(probabilities) {
        let spam = probs[Category::Spam.id()];

        info!(
            "{} (p(spam) = {:.3}) expected {}: {}",
            if spam > 0.5 { Category::Spam } else { Category::Ham },
            spam,
            item.category,
            item.text
        );
    }

    println!("Saved trained pipeline to {}", args.output);

    Ok(())
}
