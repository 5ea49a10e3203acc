use opentelemetry::sdk::trace::Sampler;
use tracing_bunyan_formatter::BunyanFormattingLayer;

const DEFAULT_SAMPLING_RATIO: f64 = 0.001;

/// How log and trace output is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tracing {
    /// Plain logging to the console
    #[default]
    Disabled,
    /// Export spans to Jaeger, log in bunyan format
    Jaeger,
}

impl From<bool> for Tracing {
    fn from(enable: bool) -> Self {
        if enable {
            Tracing::Jaeger
        } else {
            Tracing::Disabled
        }
    }
}

/// Parse a sampling ratio, as found in `OTEL_TRACES_SAMPLER_ARG`.
fn parse_ratio(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|p| (0.0..=1.0).contains(p))
}

fn sampler() -> Sampler {
    let ratio = std::env::var("OTEL_TRACES_SAMPLER_ARG")
        .ok()
        .and_then(|value| parse_ratio(&value))
        .unwrap_or(DEFAULT_SAMPLING_RATIO);
    Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(ratio)))
}

pub fn init_tracing(name: &str, tracing: Tracing) {
    match tracing {
        Tracing::Disabled => init_no_tracing(),
        Tracing::Jaeger => init_jaeger(name),
    }
}

fn init_jaeger(name: &str) {
    use tracing_subscriber::prelude::*;

    opentelemetry::global::set_text_map_propagator(opentelemetry::sdk::propagation::TraceContextPropagator::new());
    let pipeline = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(name)
        .with_auto_split_batch(true)
        .with_trace_config(opentelemetry::sdk::trace::Config::default().with_sampler(sampler()));

    let tracer = match pipeline.install_batch(opentelemetry::runtime::Tokio) {
        Ok(tracer) => tracer,
        Err(e) => {
            eprintln!("Error setting up Jaeger pipeline, falling back to plain logging: {e}");
            init_no_tracing();
            return;
        }
    };

    println!("Tracing is enabled. This console will not show any logging information.");

    let formatting_layer = BunyanFormattingLayer::new(name.to_string(), std::io::stdout);

    if let Err(e) = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(formatting_layer)
        .try_init()
    {
        eprintln!("Error initializing tracing: {:?}", e);
    }
}

fn init_no_tracing() {
    if let Err(e) = env_logger::builder().format_timestamp_millis().try_init() {
        eprintln!("Error initializing logging: {:?}", e);
    }
}
