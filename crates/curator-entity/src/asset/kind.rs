//! Asset kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The media categories the library stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Still images (png, jpeg, webp, svg, ...).
    Image,
    /// Video files.
    Video,
    /// Rive interactive animations.
    Rive,
    /// 3D model files (glb/gltf).
    Model,
}

impl AssetKind {
    /// Best-effort kind inference from a MIME type.
    ///
    /// Registration requests may omit the kind; the `.riv` and model
    /// formats come through as octet-stream variants, so those are matched
    /// by their conventional types first.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let mime = mime_type.to_ascii_lowercase();
        if mime == "application/rive" || mime == "application/x-rive" {
            return Some(Self::Rive);
        }
        if mime.starts_with("model/") {
            return Some(Self::Model);
        }
        if mime.starts_with("image/") {
            return Some(Self::Image);
        }
        if mime.starts_with("video/") {
            return Some(Self::Video);
        }
        None
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Rive => "rive",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = curator_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "rive" => Ok(Self::Rive),
            "model" => Ok(Self::Model),
            _ => Err(curator_core::AppError::validation(format!(
                "Invalid asset kind: '{s}'. Expected one of: image, video, rive, model"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(AssetKind::from_mime("image/png"), Some(AssetKind::Image));
        assert_eq!(AssetKind::from_mime("video/mp4"), Some(AssetKind::Video));
        assert_eq!(
            AssetKind::from_mime("application/rive"),
            Some(AssetKind::Rive)
        );
        assert_eq!(
            AssetKind::from_mime("model/gltf-binary"),
            Some(AssetKind::Model)
        );
        assert_eq!(AssetKind::from_mime("text/plain"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("rive".parse::<AssetKind>().unwrap(), AssetKind::Rive);
        assert!("gif".parse::<AssetKind>().is_err());
    }
}
