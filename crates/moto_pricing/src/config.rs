use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{km::Km, money::Pesos, percent::Percent};

/// Tariff table for a single trip: a flat base price up to 6 km, then two
/// per-km brackets, a global surcharge and the coupon book.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TariffConfig {
    pub base_rate: Pesos,
    pub rate_6_to_10: f64,
    pub rate_over_10: f64,
    pub surcharge: Percent,
    pub coupons: HashMap<String, Percent>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        TariffConfig {
            base_rate: Pesos::new(6000),
            rate_6_to_10: 1000.0,
            rate_over_10: 850.0,
            surcharge: Percent::ZERO,
            coupons: HashMap::from([("BIENVENIDA10".to_string(), Percent::from_raw(10.0))]),
        }
    }
}

impl TariffConfig {
    /// Coupon codes are matched case-insensitively; the canonical form is
    /// upper case, fixed here so lookups never re-derive it.
    fn normalized(mut self) -> Self {
        self.rate_6_to_10 = self.rate_6_to_10.max(0.0);
        self.rate_over_10 = self.rate_over_10.max(0.0);
        if self.base_rate < Pesos::ZERO {
            self.base_rate = Pesos::ZERO;
        }
        self.coupons = self
            .coupons
            .into_iter()
            .map(|(code, percent)| (code.trim().to_uppercase(), percent))
            .collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Legs chain stop to stop and the summed trip distance is priced once.
    ChainedTrip,
    /// Every leg runs from the origin and per-leg breakdowns are summed.
    FanOutPerLeg,
}

/// Stand-in distance and duration used for a leg when the routing provider
/// cannot answer. Quotes built this way are flagged, never silent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FallbackLeg {
    pub distance: Km,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AggregationConfig {
    pub policy: AggregationPolicy,
    pub fallback: Option<FallbackLeg>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            policy: AggregationPolicy::ChainedTrip,
            fallback: Some(FallbackLeg {
                distance: Km::new(8.5),
                duration_minutes: 30,
            }),
        }
    }
}

/// Root of the JSON config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct QuoteConfig {
    pub tariff: TariffConfig,
    pub aggregation: AggregationConfig,
}

impl QuoteConfig {
    fn normalized(mut self) -> Self {
        self.tariff = self.tariff.normalized();
        self
    }
}

/// Partial admin update; absent fields keep their current values and coupon
/// entries are merged into the existing book.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TariffUpdate {
    pub surcharge: Option<Percent>,
    #[serde(default)]
    pub coupons: HashMap<String, Percent>,
}

/// Process-wide configuration handle. Readers take one `Arc` snapshot per
/// computation, so a pricing run never observes a half-applied update.
pub struct ConfigStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<QuoteConfig>>,
}

impl ConfigStore {
    pub fn new(config: QuoteConfig) -> Self {
        ConfigStore {
            path: None,
            current: RwLock::new(Arc::new(config.normalized())),
        }
    }

    /// Loads the config file, starting with built-in defaults when it is
    /// missing or unreadable rather than refusing to boot.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match load_config(&path) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "tariff config unreadable, using built-in defaults"
                );
                QuoteConfig::default()
            }
        };

        ConfigStore {
            path: Some(path),
            current: RwLock::new(Arc::new(config.normalized())),
        }
    }

    pub fn snapshot(&self) -> Arc<QuoteConfig> {
        self.current.read().clone()
    }

    /// Single-writer update. The new snapshot is swapped in atomically and
    /// written back to the config file best-effort; a failed write keeps the
    /// in-memory update and is only logged.
    pub fn apply(&self, update: TariffUpdate) -> Arc<QuoteConfig> {
        let mut guard = self.current.write();
        let mut config = (**guard).clone();

        if let Some(surcharge) = update.surcharge {
            config.tariff.surcharge = surcharge;
        }
        for (code, percent) in update.coupons {
            config.tariff.coupons.insert(code.trim().to_uppercase(), percent);
        }

        let config = Arc::new(config.normalized());
        *guard = Arc::clone(&config);
        drop(guard);

        if let Some(path) = &self.path
            && let Err(error) = persist(path, &config)
        {
            tracing::warn!(path = %path.display(), %error, "failed to persist tariff update");
        }

        config
    }
}

fn load_config(path: &Path) -> anyhow::Result<QuoteConfig> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn persist(path: &Path, config: &QuoteConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}
