use konami_k053246::SpriteError;
use konami_k055555::MixerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("sprite pass: {0}")]
    Sprite(#[from] SpriteError),

    #[error("mixer pass: {0}")]
    Mixer(#[from] MixerError),

    #[error("no tile source supplied")]
    MissingTileSource,

    #[error("no colour wiring supplied")]
    MissingColorWiring,

    #[error("invalid video config: {0}")]
    Config(#[from] serde_json::Error),
}
