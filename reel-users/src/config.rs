use reel_core::{ReelConfig, ReelConfigSnapshot, ReelError, ReelResult};

use crate::feed::AssetFailurePolicy;
use crate::manifest::ManifestUrlBuilder;

/// Settings for the users services, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersConfig {
    pub profile_bucket: String,
    pub thumbnail_bucket: String,
    pub manifest_prefix: String,
    pub encoding_suffixes: String,
    pub manifest_suffix: String,
    /// Upper bound on thumbnails fetched at once for one page
    pub asset_concurrency: usize,
    pub asset_failure: AssetFailurePolicy,
}

impl UsersConfig {
    pub const ENV_PREFIX: &'static str = "REEL__";
    pub const DEFAULT_ASSET_CONCURRENCY: usize = 8;

    pub fn new(
        profile_bucket: impl Into<String>,
        thumbnail_bucket: impl Into<String>,
        manifest: (&str, &str, &str),
    ) -> Self {
        let (prefix, encoding_suffixes, suffix) = manifest;
        Self {
            profile_bucket: profile_bucket.into(),
            thumbnail_bucket: thumbnail_bucket.into(),
            manifest_prefix: prefix.to_string(),
            encoding_suffixes: encoding_suffixes.to_string(),
            manifest_suffix: suffix.to_string(),
            asset_concurrency: Self::DEFAULT_ASSET_CONCURRENCY,
            asset_failure: AssetFailurePolicy::default(),
        }
    }

    /// Read the settings from a config snapshot.
    ///
    /// Required: `storage.profile_bucket`, `storage.thumbnail_bucket`,
    /// `manifest.prefix`, `manifest.encoding_suffixes`, `manifest.suffix`.
    /// Optional: `feed.asset_concurrency`, `feed.asset_failure` (`fail` | `degrade`).
    pub fn from_snapshot(snapshot: &ReelConfigSnapshot) -> ReelResult<Self> {
        let required = |key: &str| {
            snapshot
                .get_string(key)
                .ok_or_else(|| ReelError::general_error(format!("Missing configuration key: {}", key)).into_anyhow())
        };

        let asset_concurrency = match snapshot.get("feed.asset_concurrency") {
            None => Self::DEFAULT_ASSET_CONCURRENCY,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ReelError::general_error(format!(
                        "feed.asset_concurrency must be a positive integer, got {:?}",
                        raw
                    ))
                    .into_anyhow())
                }
            },
        };

        let asset_failure = match snapshot.get("feed.asset_failure") {
            None => AssetFailurePolicy::default(),
            Some(raw) => raw.parse()?,
        };

        Ok(Self {
            profile_bucket: required("storage.profile_bucket")?,
            thumbnail_bucket: required("storage.thumbnail_bucket")?,
            manifest_prefix: required("manifest.prefix")?,
            encoding_suffixes: required("manifest.encoding_suffixes")?,
            manifest_suffix: required("manifest.suffix")?,
            asset_concurrency,
            asset_failure,
        })
    }

    /// Read the settings from `REEL__*` environment variables.
    pub fn from_env() -> ReelResult<Self> {
        let mut config = ReelConfig::new();
        config.load_env(Self::ENV_PREFIX);
        Self::from_snapshot(&config.snapshot())
    }

    pub fn with_asset_concurrency(mut self, concurrency: usize) -> Self {
        self.asset_concurrency = concurrency.max(1);
        self
    }

    pub fn with_asset_failure(mut self, policy: AssetFailurePolicy) -> Self {
        self.asset_failure = policy;
        self
    }

    pub fn manifest_builder(&self) -> ManifestUrlBuilder {
        ManifestUrlBuilder::new(
            self.manifest_prefix.as_str(),
            self.encoding_suffixes.as_str(),
            self.manifest_suffix.as_str(),
        )
    }
}
