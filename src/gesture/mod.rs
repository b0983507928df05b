//! Gesture recognition: classifier model, display names and the running
//! sequence.

pub mod classifier;
pub mod mapping;
pub mod sequence;
pub mod training;

use tracing::info;

use crate::config::GestureConfig;
use crate::error::Result;
use classifier::GestureModel;
use mapping::SignMapping;

/// Gesture identifier produced by a classifier
pub type GestureId = u32;

/// Train on the built-in recordings and write both files
pub fn train_and_save(config: &GestureConfig) -> Result<(GestureModel, SignMapping)> {
    let model = GestureModel::train(&training::builtin_samples())?;
    let mapping = SignMapping::builtin();

    model.save(&config.model_path)?;
    mapping.save(&config.mapping_path)?;
    info!(
        "Trained gesture model on {} samples, saved to {} and {}",
        model.len(),
        config.model_path.display(),
        config.mapping_path.display()
    );

    Ok((model, mapping))
}

/// Load the model and mapping, training them first if either file is missing
pub fn load_or_train(config: &GestureConfig) -> Result<(GestureModel, SignMapping)> {
    if !config.model_path.exists() || !config.mapping_path.exists() {
        info!("Gesture model or mapping not found, training from built-in samples");
        return train_and_save(config);
    }

    let model = GestureModel::load(&config.model_path)?;
    let mapping = SignMapping::load(&config.mapping_path)?;
    info!(
        "Loaded gesture model ({} points) and {} gesture names",
        model.len(),
        mapping.len()
    );

    Ok((model, mapping))
}
