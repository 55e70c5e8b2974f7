use {
    crate::{
        domain::{
            allocation::Tolerance,
            mechanism::{
                PaymentRule,
                reserve::{ConfigurationError, Reserve, ReservePrice},
                vcg::{self, Vcg},
            },
        },
        infra::solver::Solver,
    },
    std::{num::NonZeroUsize, sync::Arc},
};

pub mod file;

/// Parameters of the payment mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tolerance: Tolerance,
    pub parallelism: NonZeroUsize,
    pub reserve: Option<ReservePrice>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            parallelism: vcg::DEFAULT_PARALLELISM,
            reserve: None,
        }
    }
}

impl Config {
    /// Builds the payment rule this configuration describes: VCG, wrapped in a
    /// reserve price when one is configured.
    pub fn mechanism(&self, solver: Arc<dyn Solver>) -> Arc<dyn PaymentRule> {
        let vcg = Vcg::new(solver)
            .with_tolerance(self.tolerance)
            .with_parallelism(self.parallelism);
        match self.reserve {
            Some(price) => Arc::new(Reserve::new(vcg, price)),
            None => Arc::new(vcg),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error while reading {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid acceptance tolerance {0}, must lie in (0, 0.5)")]
    Tolerance(f64),
    #[error("max-parallel-solves must be at least 1")]
    Parallelism,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
