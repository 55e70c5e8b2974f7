use {
    super::{Config, Error},
    crate::domain::{allocation::Tolerance, mechanism::reserve::ReservePrice},
    serde::Deserialize,
    std::{num::NonZeroUsize, path::Path},
    tokio::fs,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct File {
    /// Distance from 1 within which a solved bid variable counts as accepted.
    #[serde(default = "default_acceptance_tolerance")]
    acceptance_tolerance: f64,

    /// Maximum number of counterfactual auctions solved concurrently when
    /// computing VCG payments.
    #[serde(default = "default_max_parallel_solves")]
    max_parallel_solves: usize,

    /// Optional minimum price per good. Enables the reserve price rule.
    reserve_price: Option<f64>,
}

fn default_acceptance_tolerance() -> f64 {
    Tolerance::default().get()
}

fn default_max_parallel_solves() -> usize {
    super::Config::default().parallelism.get()
}

/// Loads the mechanism configuration from a TOML file.
pub async fn load_path(path: &Path) -> Result<Config, Error> {
    let data = fs::read_to_string(path).await.map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    load_string(&data)
}

/// Parses the mechanism configuration from a TOML string.
pub fn load_string(data: &str) -> Result<Config, Error> {
    let file = toml::de::from_str::<File>(data)?;
    let config = Config {
        tolerance: Tolerance::new(file.acceptance_tolerance)
            .ok_or(Error::Tolerance(file.acceptance_tolerance))?,
        parallelism: NonZeroUsize::new(file.max_parallel_solves).ok_or(Error::Parallelism)?,
        reserve: file.reserve_price.map(ReservePrice::new).transpose()?,
    };
    tracing::debug!(?config, "loaded mechanism configuration");
    Ok(config)
}
