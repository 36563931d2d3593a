use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::classifier::{Classifier, FixedJitter, HashedJitter, RandomJitter};

/// Where the classifier's confidence noise comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterMode {
    #[default]
    Random,
    /// Derived from the input, so repeated requests agree.
    Hashed,
    None,
}

impl FromStr for JitterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(JitterMode::Random),
            "hashed" => Ok(JitterMode::Hashed),
            "none" | "off" => Ok(JitterMode::None),
            other => Err(format!("unknown jitter mode '{other}'")),
        }
    }
}

impl JitterMode {
    pub fn classifier(self) -> Classifier {
        match self {
            JitterMode::Random => Classifier::new(RandomJitter),
            JitterMode::Hashed => Classifier::new(HashedJitter),
            JitterMode::None => Classifier::new(FixedJitter(0.0)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub jitter: JitterMode,
    /// Load demo users, transactions and feedback into an empty database.
    pub seed_demo: bool,
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jitter = match env::var("CATEGORIZER_CONFIDENCE_JITTER") {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!("CATEGORIZER_CONFIDENCE_JITTER: {}, using random", e);
                JitterMode::Random
            }),
            Err(_) => JitterMode::default(),
        };

        Self {
            host: env::var("CATEGORIZER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("CATEGORIZER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            database_path: env::var("CATEGORIZER_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/categorizer.db")),
            migrations_path: env::var("CATEGORIZER_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            jitter,
            seed_demo: env::var("CATEGORIZER_SEED_DEMO")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
