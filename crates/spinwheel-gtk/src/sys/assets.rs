use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use spinwheel::AssetUrl;
use spinwheel::error::AssetError;
use spinwheel::render::assets::{AssetFetcher, resolve_path};

/// Hands asset requests from the GTK thread to the background runtime.
pub struct ChannelFetcher {
    tx: Sender<AssetUrl>,
}

impl ChannelFetcher {
    pub fn new(tx: Sender<AssetUrl>) -> Self {
        Self { tx }
    }
}

impl AssetFetcher for ChannelFetcher {
    fn fetch(&self, url: &AssetUrl) {
        if let Err(e) = self.tx.try_send(url.clone()) {
            log::error!("Failed to queue asset '{}': {}", url, e);
        }
    }
}

pub async fn load(url: &AssetUrl) -> Result<Vec<u8>, AssetError> {
    let path = resolve_path(url)?;
    Ok(tokio::fs::read(&path).await?)
}

pub async fn run_asset_loader(rx: Receiver<AssetUrl>, tx: Sender<AppEvent>) {
    while let Ok(url) = rx.recv().await {
        let tx = tx.clone();
        tokio::spawn(async move {
            log::debug!("Loading asset '{}'", url);
            let result = load(&url).await;
            let _ = tx.send(AppEvent::AssetLoaded { url, result }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_reads_local_file() {
        let path = std::env::temp_dir().join(format!("spinwheel-asset-{}.bin", std::process::id()));
        fs_err::write(&path, b"not really a png").unwrap();

        let url = AssetUrl::new(format!("file://{}", path.display()));
        assert_eq!(load(&url).await.unwrap(), b"not really a png".to_vec());

        let _ = fs_err::remove_file(&path);
    }

    #[tokio::test]
    async fn test_load_rejects_remote_urls() {
        let url = AssetUrl::new("https://example.com/pointer.png");
        assert!(matches!(
            load(&url).await,
            Err(AssetError::UnsupportedScheme(_))
        ));
    }

    #[tokio::test]
    async fn test_loader_reports_back_on_channel() {
        let (fetch_tx, fetch_rx) = async_channel::unbounded();
        let (tx, rx) = async_channel::unbounded();
        tokio::spawn(run_asset_loader(fetch_rx, tx));

        ChannelFetcher::new(fetch_tx).fetch(&AssetUrl::new("/definitely/missing.png"));
        match rx.recv().await.unwrap() {
            AppEvent::AssetLoaded { url, result } => {
                assert_eq!(url.as_str(), "/definitely/missing.png");
                assert!(matches!(result, Err(AssetError::Io(_))));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
