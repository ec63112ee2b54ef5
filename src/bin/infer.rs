//! Command line tool to classify texts with a saved pipeline

use anyhow::anyhow;
use pico_args::Arguments;
use spam_classifier::{
    datasets::spam_or_ham::Category,
    pipelines::text_classification::Pipeline,
};

const HELP: &str = "\
Usage: infer [OPTIONS] TEXT...

Arguments:
  TEXT                 One or more texts to classify

Options:
  -h, --help           Print help
  -a, --artifact-dir   Directory containing a saved pipeline (defaults to 'artifacts')
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The saved pipeline to use
    artifact_dir: Option<String>,

    /// Texts to classify
    texts: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    let artifact_dir = pargs.opt_value_from_str(["-a", "--artifact-dir"])?;

    let texts = pargs
        .finish()
        .into_iter()
        .map(|text| text.to_string_lossy().into_owned())
        .collect();

    Ok(Args {
        help,
        artifact_dir,
        texts,
    })
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    if args.texts.is_empty() {
        return Err(anyhow!("Missing required argument: TEXT"));
    }

    let artifact_dir = args.artifact_dir.unwrap_or_else(|| "artifacts".to_string());
    let pipeline = Pipeline::load(&artifact_dir)?;

    let probabilities = pipeline.predict_proba(&args.texts)?;

    for (i, (text, probs)) in args.texts.iter().zip(probabilities).enumerate() {
        let spam = probs[Category::Spam.id()];
        let class = if spam > 0.5 { Category::Spam } else { Category::Ham };

        println!(
            "\n=== Item {i} ===\
             \n- Text: {text}\
             \n- Class: {class}\
             \n- p(spam): {spam:.3}\
             \n================"
        );
    }

    Ok(())
}
