//! Rendition orchestration: stage → fingerprint → inspect → per-variant
//! cache check → transform → publish.

use std::path::PathBuf;
use std::sync::Arc;

use aquamark_core::models::{TransformParameters, UploadedAsset};
use aquamark_core::{EngineConfig, EngineError};
use aquamark_processing::{
    fingerprint_file, inspect_orientation, DrawtextFilter, VariantTransformer, WatermarkRunner,
};
use aquamark_storage::{RenditionKey, RenditionStore, StagedAsset, StagingArea};

use crate::single_flight::{FlightOutcome, SingleFlight};

/// One produced (or cache-served) rendition.
#[derive(Debug, Clone)]
pub struct StoredRendition {
    pub label: String,
    pub key: RenditionKey,
    /// Durable path inside the store; open it via the store for a handle.
    pub path: PathBuf,
}

/// The engine's public entry point. Explicitly constructed with its
/// collaborators — no ambient singletons.
pub struct RenditionService {
    store: Arc<RenditionStore>,
    staging: StagingArea,
    transformer: Arc<dyn VariantTransformer>,
    flights: SingleFlight,
    config: EngineConfig,
}

impl RenditionService {
    /// Wire the service from configuration: validates it, initializes the
    /// store layout and staging area, and sets up the ffmpeg runner.
    pub async fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let store = RenditionStore::open_at(&config.store_root, &config.all_labels()).await?;
        let staging = StagingArea::open_at(&config.staging_root)
            .await
            .map_err(|e| {
                EngineError::Config(format!(
                    "Failed to initialize staging area {}: {}",
                    config.staging_root.display(),
                    e
                ))
            })?;
        let transformer = Arc::new(WatermarkRunner::new(
            config.ffmpeg_path.clone(),
            config.poll_interval(),
            config.max_transform_wait(),
        ));
        Ok(Self::new(Arc::new(store), staging, transformer, config))
    }

    /// Assemble from explicit collaborators (tests inject stub
    /// transformers here).
    pub fn new(
        store: Arc<RenditionStore>,
        staging: StagingArea,
        transformer: Arc<dyn VariantTransformer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            staging,
            transformer,
            flights: SingleFlight::new(),
            config,
        }
    }

    pub fn store(&self) -> &Arc<RenditionStore> {
        &self.store
    }

    /// Produce the configured default variant set for the asset's kind.
    pub async fn produce_default_renditions(
        &self,
        asset: UploadedAsset,
    ) -> Result<Vec<StoredRendition>, EngineError> {
        let labels = self.config.default_labels_for(asset.kind).to_vec();
        self.produce_renditions(asset, &labels).await
    }

    /// Produce one rendition per requested label, serving cache hits
    /// without invoking the transformer. The first failed variant aborts
    /// the remaining ones; renditions already published by this request
    /// stay in the store so a resubmission does not recompute them.
    pub async fn produce_renditions(
        &self,
        asset: UploadedAsset,
        labels: &[String],
    ) -> Result<Vec<StoredRendition>, EngineError> {
        if labels.is_empty() {
            return Err(EngineError::Config(
                "no variant labels requested".to_string(),
            ));
        }

        let UploadedAsset {
            data,
            kind,
            extension,
        } = asset;

        let staged = Arc::new(
            self.staging
                .stage(&data, &extension)
                .await
                .map_err(EngineError::Staging)?,
        );

        let fingerprint = fingerprint_file(staged.path())
            .await
            .map_err(EngineError::Fingerprint)?;

        let keys = labels
            .iter()
            .map(|label| RenditionKey::new(&fingerprint, &extension, label))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        // Orientation metadata only matters when something will actually be
        // transformed; on a guaranteed cache hit the work is skipped.
        let params = if kind.is_image_like() && !self.store.exists(&keys[0]).await {
            inspect_orientation(&data)
        } else {
            TransformParameters::default()
        };

        tracing::info!(
            fingerprint = %fingerprint,
            kind = ?kind,
            variants = labels.len(),
            rotation = params.rotation.degrees(),
            "producing renditions"
        );

        let mut produced = Vec::with_capacity(keys.len());
        for key in keys {
            let label = key.label().to_string();
            if self.store.exists(&key).await {
                tracing::debug!(key = %key, "cache hit");
                produced.push(StoredRendition {
                    label,
                    path: self.store.path_for(&key),
                    key,
                });
                continue;
            }

            match self.transform_variant(&key, staged.clone(), &params).await {
                FlightOutcome::Completed => {
                    produced.push(StoredRendition {
                        label,
                        path: self.store.path_for(&key),
                        key,
                    });
                }
                FlightOutcome::Failed(reason) => {
                    tracing::warn!(label = %label, reason = %reason, "variant transformation failed");
                    return Err(EngineError::Transform { label, reason });
                }
            }
        }

        Ok(produced)
    }

    /// Run the external transformation for one key through the
    /// single-flight map, publishing the result on success. The work is
    /// detached from this request's task: a disconnected caller leaves the
    /// transformation running to completion (and the cache populated),
    /// while concurrent requests for the same key join it instead of
    /// launching a second process.
    async fn transform_variant(
        &self,
        key: &RenditionKey,
        staged: Arc<StagedAsset>,
        params: &TransformParameters,
    ) -> FlightOutcome {
        let store = self.store.clone();
        let transformer = self.transformer.clone();
        let style = self.config.style_for(key.label());
        let filter = DrawtextFilter::new(
            &self.config.font_path,
            &self.config.watermark_text,
            &style,
            params.rotation,
        );
        let scratch = self.staging.scratch_path(key.extension());
        let key = key.clone();

        self.flights
            .run(&key.to_string(), move || async move {
                // A flight that lost the initial existence race can find the
                // entry already published; nothing to do then.
                if store.exists(&key).await {
                    return Ok(());
                }

                let outcome = transformer
                    .transform(staged.path(), &scratch, &filter)
                    .await
                    .map_err(|e| e.to_string())?;

                if !outcome.success() {
                    let _ = tokio::fs::remove_file(&scratch).await;
                    return Err(outcome.failure_reason());
                }

                tracing::info!(
                    key = %key,
                    duration_ms = outcome.elapsed.as_secs_f64() * 1000.0,
                    "variant transformed"
                );

                store
                    .publish_file(&key, &scratch)
                    .await
                    .map_err(|e| e.to_string())?;
                let _ = tokio::fs::remove_file(&scratch).await;
                Ok(())
            })
            .await
    }
}
