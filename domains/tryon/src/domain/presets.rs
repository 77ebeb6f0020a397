//! Preset choices offered by the try-on form

use serde::Serialize;

use crate::domain::options::BackgroundOptions;

/// Used for simulated video output
pub const SAMPLE_VIDEO_URL: &str =
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4";

/// Default background when neither a custom URL nor a known preset is given
pub const WHITE_STUDIO_URL: &str =
    "https://images.unsplash.com/photo-1565766736122-de5ccdb3b3bb?w=1200";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PresetOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPresets {
    pub ethnicities: &'static [PresetOption],
    pub body_types: &'static [PresetOption],
    pub ages: &'static [PresetOption],
    pub poses: &'static [PresetOption],
}

const fn opt(value: &'static str, label: &'static str) -> PresetOption {
    PresetOption { value, label }
}

pub const MODEL_PRESETS: ModelPresets = ModelPresets {
    ethnicities: &[
        opt("caucasian", "Caucasian"),
        opt("african", "African"),
        opt("asian", "Asian"),
        opt("hispanic", "Hispanic"),
        opt("middle-eastern", "Middle Eastern"),
        opt("mixed", "Mixed"),
    ],
    body_types: &[
        opt("slim", "Slim"),
        opt("athletic", "Athletic"),
        opt("average", "Average"),
        opt("curvy", "Curvy"),
        opt("plus-size", "Plus Size"),
    ],
    ages: &[
        opt("young", "18-25"),
        opt("middle-aged", "26-40"),
        opt("mature", "40+"),
    ],
    poses: &[
        opt("standing", "Standing"),
        opt("walking", "Walking"),
        opt("sitting", "Sitting"),
        opt("dynamic", "Dynamic"),
    ],
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BackgroundPreset {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: &'static str,
}

pub const BACKGROUND_PRESETS: &[BackgroundPreset] = &[
    BackgroundPreset {
        id: "studio-white",
        name: "White Studio",
        kind: "studio",
        url: WHITE_STUDIO_URL,
    },
    BackgroundPreset {
        id: "studio-gray",
        name: "Gray Studio",
        kind: "studio",
        url: "https://images.unsplash.com/photo-1599643477877-530eb83abc8e?w=1200",
    },
    BackgroundPreset {
        id: "outdoor-park",
        name: "City Park",
        kind: "outdoor",
        url: "https://images.unsplash.com/photo-1519331379826-f10be5486c6f?w=1200",
    },
    BackgroundPreset {
        id: "outdoor-beach",
        name: "Beach",
        kind: "outdoor",
        url: "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=1200",
    },
    BackgroundPreset {
        id: "urban-street",
        name: "Urban Street",
        kind: "urban",
        url: "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?w=1200",
    },
    BackgroundPreset {
        id: "lifestyle-cafe",
        name: "Coffee Shop",
        kind: "lifestyle",
        url: "https://images.unsplash.com/photo-1445116572660-236099ec97a0?w=1200",
    },
];

/// Sample garments for trying the flow without an upload
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoItem {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image_url: &'static str,
    pub thumbnail_url: &'static str,
}

pub const DEMO_ITEMS: &[DemoItem] = &[
    DemoItem {
        id: "demo-tshirt-1",
        name: "Classic White T-Shirt",
        kind: "tshirt",
        image_url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=800",
        thumbnail_url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=200",
    },
    DemoItem {
        id: "demo-dress-1",
        name: "Summer Floral Dress",
        kind: "dress",
        image_url: "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=800",
        thumbnail_url: "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=200",
    },
    DemoItem {
        id: "demo-hoodie-1",
        name: "Casual Hoodie",
        kind: "hoodie",
        image_url: "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=800",
        thumbnail_url: "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=200",
    },
];

/// Custom URL, then the named preset, then the white studio
pub fn background_url(options: &BackgroundOptions) -> String {
    if let Some(custom) = options.custom_url.as_deref().filter(|u| !u.is_empty()) {
        return custom.to_string();
    }

    options
        .preset
        .as_deref()
        .and_then(|id| BACKGROUND_PRESETS.iter().find(|p| p.id == id))
        .map(|p| p.url)
        .unwrap_or(WHITE_STUDIO_URL)
        .to_string()
}
