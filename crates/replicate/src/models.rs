//! Known Replicate model versions

/// Image models usable for fashion model and mannequin generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageModel {
    /// FLUX 1.1 Pro Ultra, raw mode
    FluxUltra,
    FluxPro,
    Ideogram,
    /// SDXL fine-tune
    Juggernaut,
}

impl ImageModel {
    /// Generation order used when falling back between models
    pub const PRIORITY: [ImageModel; 3] =
        [ImageModel::FluxUltra, ImageModel::FluxPro, ImageModel::Juggernaut];

    pub fn version(&self) -> &'static str {
        match self {
            ImageModel::FluxUltra => {
                "c6e5086a542c99e7e523a83d3017654e8618fe64ef427c772a1def05bb599f0c"
            }
            ImageModel::FluxPro => {
                "1e237aa703bf3a8ab480d5b595563128807af649c50afc0b4f22a9174e90d1d6"
            }
            ImageModel::Ideogram => "recraft/recraft-v3",
            ImageModel::Juggernaut => {
                "6a52feace43ce1f6bbc2cdabfc68423cb2319d7444a1a1dae529c5e88b976382"
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageModel::FluxUltra => "flux-ultra",
            ImageModel::FluxPro => "flux-pro",
            ImageModel::Ideogram => "ideogram",
            ImageModel::Juggernaut => "juggernaut",
        }
    }

    /// Look up a model by name; unknown names (including "flux") get FLUX Ultra
    pub fn from_name(name: &str) -> Self {
        match name {
            "flux-pro" => ImageModel::FluxPro,
            "ideogram" => ImageModel::Ideogram,
            "juggernaut" => ImageModel::Juggernaut,
            _ => ImageModel::FluxUltra,
        }
    }

    pub fn is_flux(&self) -> bool {
        matches!(self, ImageModel::FluxUltra | ImageModel::FluxPro)
    }
}

impl std::fmt::Display for ImageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// IDM-VTON virtual try-on
pub const IDM_VTON_VERSION: &str =
    "c871bb9b046607b680449ecbae55fd8c6d945e0a1948644bf2361b3d021d3ff4";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_flux_ultra() {
        assert_eq!(ImageModel::from_name("flux-pro"), ImageModel::FluxPro);
        assert_eq!(ImageModel::from_name("juggernaut"), ImageModel::Juggernaut);
        assert_eq!(ImageModel::from_name("flux"), ImageModel::FluxUltra);
        assert_eq!(ImageModel::from_name("dall-e"), ImageModel::FluxUltra);
    }

    #[test]
    fn test_versions_are_distinct() {
        let versions: std::collections::HashSet<_> = [
            ImageModel::FluxUltra,
            ImageModel::FluxPro,
            ImageModel::Ideogram,
            ImageModel::Juggernaut,
        ]
        .iter()
        .map(|m| m.version())
        .collect();
        assert_eq!(versions.len(), 4);
        assert_ne!(ImageModel::FluxPro.version(), IDM_VTON_VERSION);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            ImageModel::PRIORITY.map(|m| m.name()),
            ["flux-ultra", "flux-pro", "juggernaut"]
        );
        assert!(ImageModel::FluxPro.is_flux());
        assert!(!ImageModel::Juggernaut.is_flux());
    }
}
