//! Environment source: `PACKRAT_<SECTION>__<KEY>` overrides, e.g. `PACKRAT_LOGGING__LEVEL=debug`

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, Map};

pub const ENV_PREFIX: &str = "PACKRAT";

/// Add environment overrides to the builder.
///
/// `vars` replaces the process environment when given.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(vars),
    )
}
