use spinwheel::AssetUrl;
use spinwheel::error::AssetError;

#[derive(Debug)]
pub enum AppEvent {
    Spin,
    AssetLoaded {
        url: AssetUrl,
        result: Result<Vec<u8>, AssetError>,
    },
    ConfigReload,
}
