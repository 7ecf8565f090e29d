use mozi_core::store::EmbeddedStore;
use rust_embed::Embed;

/// Bundled command (`commands/*.md`) and rule (`rules/*.mdc`) templates.
#[derive(Embed)]
#[folder = "assets/"]
pub struct Templates;

pub fn store() -> EmbeddedStore<Templates> {
    EmbeddedStore::new()
}
