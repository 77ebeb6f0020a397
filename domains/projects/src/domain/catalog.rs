//! Placeholder assets, curated mannequin photos, and prompts
//!
//! Simulated runs draw everything from here. Live runs use the prompts
//! and fall back to the curated mannequins when generation fails.

use serde::Serialize;

use crate::domain::entities::Script;

/// Sample clip returned by simulated renders
pub const SAMPLE_VIDEO_URL: &str =
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4";

const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x600?text=Product";

/// Copywriter persona for script generation
pub const SCRIPT_SYSTEM_PROMPT: &str =
    "You are a professional marketing copywriter specializing in short, impactful product video scripts.";

fn normalize(product_type: &str) -> String {
    product_type.trim().to_lowercase()
}

/// Mannequin stand-in for a simulated run
pub fn placeholder_image(product_type: &str) -> String {
    let photo = match normalize(product_type).as_str() {
        "t-shirt" => "photo-1521572163474-6864f9cf17ab",
        "hoodie" => "photo-1556821840-3a63f95609a7",
        "tote bag" => "photo-1622560480654-d96214fdc887",
        "mug" => "photo-1577937217765-4ad6898c539d",
        "phone case" => "photo-1606041008023-472dfb5e530f",
        "poster" => "photo-1588345921523-c2dcdb7f1dcd",
        _ => return DEFAULT_PLACEHOLDER_IMAGE.to_string(),
    };
    format!("https://images.unsplash.com/{}?w=600&h=600&fit=crop", photo)
}

/// Canned marketing copy for a simulated run
pub fn placeholder_script(product_name: &str, product_type: &str) -> Script {
    let (headline, bullets, cta, palette): (Option<&str>, [&str; 3], &str, [&str; 3]) =
        match normalize(product_type).as_str() {
            "t-shirt" => (
                Some("Style Meets Comfort"),
                [
                    "Premium soft cotton fabric",
                    "Versatile design for any outfit",
                    "Durable & long-lasting quality",
                ],
                "Shop Now",
                ["#3B82F6", "#1E40AF", "#DBEAFE"],
            ),
            "hoodie" => (
                Some("Cozy Redefined"),
                [
                    "Ultra-soft inner lining",
                    "Perfect for all seasons",
                    "Spacious pockets & adjustable hood",
                ],
                "Stay Cozy",
                ["#6366F1", "#4338CA", "#E0E7FF"],
            ),
            "tote bag" => (
                Some("Carry With Confidence"),
                [
                    "Sturdy construction for heavy loads",
                    "Eco-friendly sustainable materials",
                    "Stylish design for any occasion",
                ],
                "Carry Better",
                ["#10B981", "#065F46", "#D1FAE5"],
            ),
            "mug" => (
                Some("Elevate Your Morning Ritual"),
                [
                    "Temperature-retention technology",
                    "Comfortable ergonomic handle",
                    "Dishwasher & microwave safe",
                ],
                "Elevate Your Day",
                ["#F59E0B", "#B45309", "#FEF3C7"],
            ),
            "phone case" => (
                Some("Protection With Style"),
                [
                    "Military-grade drop protection",
                    "Slim profile fits perfectly in hand",
                    "Premium materials that won't yellow",
                ],
                "Protect In Style",
                ["#8B5CF6", "#6D28D9", "#EDE9FE"],
            ),
            "poster" => (
                Some("Make A Statement"),
                [
                    "Museum-quality archival paper",
                    "Vibrant colors that won't fade",
                    "Makes a perfect statement piece",
                ],
                "Decorate Now",
                ["#EC4899", "#BE185D", "#FCE7F3"],
            ),
            _ => (
                None,
                [
                    "High-quality craftsmanship",
                    "Designed to impress",
                    "Perfect for everyday use",
                ],
                "Get Yours Today",
                ["#3B82F6", "#1E40AF", "#DBEAFE"],
            ),
        };

    Script {
        headline: headline
            .map(String::from)
            .unwrap_or_else(|| format!("Premium {}", product_name)),
        bullets: bullets.iter().map(|b| b.to_string()).collect(),
        cta: cta.to_string(),
        color_palette: palette.iter().map(|c| c.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MannequinGender {
    Male,
    Female,
    Neutral,
}

/// A curated stock mannequin photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannequinPhoto {
    pub id: &'static str,
    pub photo: &'static str,
    pub gender: MannequinGender,
    pub pose: &'static str,
    pub description: &'static str,
}

impl MannequinPhoto {
    pub fn url(&self) -> String {
        format!("https://images.unsplash.com/{}?w=800&h=1200&fit=crop", self.photo)
    }
}

const fn photo(
    id: &'static str,
    photo: &'static str,
    gender: MannequinGender,
    pose: &'static str,
    description: &'static str,
) -> MannequinPhoto {
    MannequinPhoto {
        id,
        photo,
        gender,
        pose,
        description,
    }
}

use MannequinGender::{Female, Male, Neutral};

const TSHIRT: &[MannequinPhoto] = &[
    photo("tshirt-male-1", "photo-1618886614638-80e3c103d2dc", Male, "front-facing", "Male mannequin torso, front view"),
    photo("tshirt-female-1", "photo-1554568218-0f1715e72254", Female, "front-facing", "Female mannequin torso, front view"),
    photo("tshirt-neutral-1", "photo-1583743814966-8936f5b7be1a", Neutral, "front-facing", "Gender-neutral mannequin torso, front view"),
];

const HOODIE: &[MannequinPhoto] = &[
    photo("hoodie-male-1", "photo-1556821840-3a63f95609a7", Male, "front-facing", "Male mannequin in hoodie pose"),
    photo("hoodie-female-1", "photo-1515886657613-9f3515b0c78f", Female, "front-facing", "Female mannequin in hoodie pose"),
];

const TOTE_BAG: &[MannequinPhoto] = &[
    photo("bag-display-1", "photo-1566150905458-1bf1fc113f0d", Neutral, "hanging", "Tote bag display stand"),
    photo("bag-model-1", "photo-1622560480605-d83c853bc5c3", Neutral, "shoulder-carry", "Model carrying tote bag over shoulder"),
];

const MUG: &[MannequinPhoto] = &[
    photo("mug-table-1", "photo-1514228742587-6b1558fcca3d", Neutral, "table-display", "Coffee mug on clean table setup"),
    photo("mug-hands-1", "photo-1571079977981-6e155c5559ca", Neutral, "hands-holding", "Hands holding coffee mug"),
];

const PHONE_CASE: &[MannequinPhoto] = &[
    photo("phone-display-1", "photo-1606041008023-472dfb5e530f", Neutral, "stand-display", "Phone case on display stand"),
    photo("phone-hands-1", "photo-1592899677977-9c10ca588bbd", Neutral, "hands-holding", "Hands holding phone with case"),
];

const POSTER: &[MannequinPhoto] = &[
    photo("poster-wall-1", "photo-1588345921523-c2dcdb7f1dcd", Neutral, "wall-mounted", "Poster frame on white wall"),
    photo("poster-easel-1", "photo-1569163139394-de4798aa9d7b", Neutral, "easel-display", "Poster on display easel"),
];

const FALLBACK: &[MannequinPhoto] = &[
    photo("generic-display-1", "photo-1558618666-fcd25c85cd64", Neutral, "table-display", "Generic product display setup"),
    photo("generic-mannequin-1", "photo-1531746020798-e6953c6e8e04", Neutral, "front-facing", "Generic mannequin for any product"),
];

/// Curated photos for a product type; unknown types get the generic set
pub fn mannequin_photos(product_type: &str) -> &'static [MannequinPhoto] {
    match normalize(product_type).as_str() {
        "t-shirt" => TSHIRT,
        "hoodie" => HOODIE,
        "tote bag" => TOTE_BAG,
        "mug" => MUG,
        "phone case" => PHONE_CASE,
        "poster" => POSTER,
        _ => FALLBACK,
    }
}

/// Requested gender, then neutral, then the first photo of the set
pub fn select_mannequin(product_type: &str, gender: MannequinGender) -> &'static MannequinPhoto {
    let photos = mannequin_photos(product_type);
    let selected = photos
        .iter()
        .find(|p| p.gender == gender)
        .or_else(|| photos.iter().find(|p| p.gender == Neutral))
        .unwrap_or(&photos[0]);
    tracing::debug!(
        product_type,
        photo_id = selected.id,
        description = selected.description,
        "Selected mannequin photo"
    );
    selected
}

/// Image prompt for a mannequin wearing the product
pub fn mannequin_prompt(product_type: &str, gender: MannequinGender) -> String {
    let gender_text = match gender {
        Male => "male",
        Female => "female",
        Neutral => "gender-neutral",
    };
    let pose = match normalize(product_type).as_str() {
        "t-shirt" | "hoodie" => "standing straight, arms slightly away from body, front view",
        "tote bag" => "standing straight, holding a tote bag over the shoulder, front view",
        "mug" => "sitting at a desk, holding a mug, front view",
        "phone case" => "holding a phone with the case visible, front view",
        "poster" => "standing next to a wall with a poster, front view",
        _ => "neutral pose, front view",
    };

    format!(
        "A studio photograph of a {} mannequin, {}, wearing a plain white {}. \
         High-quality professional lighting with soft shadows, clean minimal white background, \
         photorealistic, detailed, 4K.",
        gender_text, pose, product_type
    )
}

/// User message asking for the JSON video script
pub fn script_prompt(product_name: &str, product_type: &str, description: Option<&str>) -> String {
    let description = description
        .map(|d| format!("Product description: {}", d))
        .unwrap_or_default();

    format!(
        "Write a video script for a {product_type} product named \"{product_name}\".\n\
         {description}\n\
         \n\
         Format your response as JSON with these exact keys:\n\
         - headline: A catchy headline (max 30 chars)\n\
         - bullets: Array of 3 bullet points highlighting benefits (max 40 chars each)\n\
         - cta: A call-to-action (max 20 chars)\n\
         - colorPalette: Array of 3 hex color codes that would complement this product\n\
         \n\
         The response must be valid JSON without additional text."
    )
}
