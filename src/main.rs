use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use simdabi::report::{AbiReport, DEFAULT_LANES};
use simdabi::simd::{AbiConfig, ElementKind, TargetFeatures};

#[derive(Parser)]
#[command(
    name = "simdabi",
    version,
    about = "Show the SIMD storage deduced for each element type and lane count"
)]
struct Cli {
    /// Lane counts to report [default: 1 2 3 4 7 8 16 32 63 64]
    lanes: Vec<usize>,

    /// Comma-separated target_feature names to deduce for instead of the build target
    #[arg(long, value_delimiter = ',')]
    features: Option<Vec<String>>,

    /// Architecture the feature names belong to
    #[arg(long, default_value = std::env::consts::ARCH)]
    arch: String,

    /// Accept zero-lane vectors
    #[arg(long)]
    zero_width: bool,
}

impl Cli {
    fn config(&self) -> AbiConfig {
        let config = match &self.features {
            Some(names) => AbiConfig::new(TargetFeatures::from_target_features(
                &self.arch,
                names.as_slice(),
            )),
            None => AbiConfig::BUILD,
        };
        if self.zero_width {
            config.with_zero_width(true)
        } else {
            config
        }
    }

    fn lanes(&self) -> Vec<usize> {
        if self.lanes.is_empty() {
            DEFAULT_LANES.to_vec()
        } else {
            self.lanes.clone()
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let lanes = cli.lanes();

    info!(features = %config.features, lanes = lanes.len(), "deducing");
    let report = AbiReport::build(config, &ElementKind::ALL, &lanes);
    print!("{report}");

    let rejected = report.errors().count();
    if rejected > 0 {
        info!(rejected, "some lane counts have no storage");
    }
}
