//! HTTP prediction server

use std::{path::PathBuf, sync::Arc};

use anyhow::anyhow;
use log::info;
use pico_args::Arguments;
use spam_classifier::server::{self, load_config, ServeConfig};

const HELP: &str = "\
Usage: serve [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         YAML config file
  -d, --data           The labeled CSV file to train on at startup (defaults to 'spamorham.csv')
  -a, --artifact-dir   Load a saved pipeline instead of training at startup
  --host               Interface to bind (defaults to '0.0.0.0')
  -p, --port           Port to bind (defaults to 5000)
";

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    artifact_dir: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            config: pargs.opt_value_from_os_str(["-c", "--config"], parse_path)?,
            data: pargs.opt_value_from_os_str(["-d", "--data"], parse_path)?,
            artifact_dir: pargs.opt_value_from_os_str(["-a", "--artifact-dir"], parse_path)?,
            host: pargs.opt_value_from_str("--host")?,
            port: pargs.opt_value_from_str(["-p", "--port"])?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }

    /// Layer command line flags over the config file (or defaults)
    fn into_config(self) -> anyhow::Result<ServeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                load_config(path)?
            }
            None => ServeConfig::default(),
        };

        if let Some(data) = self.data {
            config.data_path = data;
        }

        if let Some(artifact_dir) = self.artifact_dir {
            config.artifact_dir = Some(artifact_dir);
        }

        if let Some(host) = self.host {
            config.host = host;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        Ok(config)
    }
}

fn parse_path(s: &std::ffi::OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let config = args.into_config()?;

    // The server only binds once the model is ready
    let startup = config.clone();
    let pipeline =
        tokio::task::spawn_blocking(move || server::prepare_pipeline(&startup)).await??;

    server::serve(&config, Arc::new(pipeline)).await
}
