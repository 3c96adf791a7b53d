use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    reflect::TypePath,
};

use super::MotionProfile;
use crate::errors::AssetLoaderError;

/// Loads `*.motion.ron` files. Profiles that fail validation are rejected.
#[derive(Default, TypePath)]
pub struct MotionProfileLoader;

impl AssetLoader for MotionProfileLoader {
    type Asset = MotionProfile;
    type Settings = ();
    type Error = AssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes).await?;
        parse_profile(&bytes)
    }

    fn extensions(&self) -> &[&str] {
        &["motion.ron"]
    }
}

pub fn parse_profile(bytes: &[u8]) -> Result<MotionProfile, AssetLoaderError> {
    let profile: MotionProfile = ron::de::from_bytes(bytes)?;
    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_claims_motion_ron_files() {
        assert_eq!(MotionProfileLoader.extensions(), &["motion.ron"]);
        assert!(MotionProfileLoader::type_path().ends_with("MotionProfileLoader"));
    }

    #[test]
    fn parses_and_validates() {
        let profile = parse_profile(b"(look_at: (yaw_limit: 0.7))").unwrap();
        assert_eq!(profile.look_at.yaw_limit, 0.7);

        let rejected = parse_profile(b"(smoothing: (eyes: 2.0))");
        assert!(matches!(rejected, Err(AssetLoaderError::InvalidProfile(_))));

        let malformed = parse_profile(b"(smoothing: ");
        assert!(matches!(malformed, Err(AssetLoaderError::RonSpannedError(_))));
    }
}
