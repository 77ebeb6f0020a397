//! Prompt text for fashion model generation

use crate::domain::options::{CameraAngle, ModelOptions};

/// Pose and framing that show off each garment
fn clothing_context(clothing_type: &str) -> &'static str {
    match clothing_type {
        "tshirt" => "casual confident pose, upper body focus, showing torso area clearly",
        "dress" => "elegant standing pose, full body, graceful posture, showing dress silhouette",
        "jacket" => "confident business pose, slight angle, showing jacket details",
        "hoodie" => "casual relaxed pose, showing hoodie fit and style",
        "pants" => "standing pose, full body, showing leg silhouette and fit",
        "jeans" => "casual standing pose, full body, showing denim fit",
        "skirt" => "elegant standing pose, showing skirt length and style",
        "shirt" => "professional pose, upper body focus, showing shirt details",
        "blouse" => "professional elegant pose, showing blouse style and fit",
        "shorts" => "casual standing pose, showing shorts fit and style",
        _ => "confident standing pose",
    }
}

fn angle_context(angle: CameraAngle) -> &'static str {
    match angle {
        CameraAngle::Front => "straight front view, facing camera directly",
        CameraAngle::Side => "clean side profile, showing garment silhouette",
        CameraAngle::FortyFiveDegree => "three-quarter angle view, dynamic professional pose",
        CameraAngle::Angle => "slight angle turn, showcasing garment details",
        CameraAngle::Back => "back view pose, showing rear garment details",
    }
}

/// Photorealistic catalog prompt for a model matching `options`.
///
/// Custom instructions, when not blank, are appended at the end.
pub fn build_model_prompt(
    options: &ModelOptions,
    clothing_type: &str,
    angle: CameraAngle,
    custom_instructions: Option<&str>,
) -> String {
    let base = format!(
        "photorealistic professional fashion model, {} {} person, {} years old, {} body type, \
         wearing business casual clothing, {}, {}, fully clothed, professional attire, \
         clean minimal white backdrop, commercial fashion photography, ecommerce product photography, \
         fashion catalog photo, high quality photo, detailed realistic skin, natural lighting, \
         professional model pose, shot with 85mm lens, soft studio lighting, fashion photography, \
         sharp focus, 8k resolution",
        options.gender,
        options.ethnicity,
        options.age,
        options.body_type,
        clothing_context(clothing_type),
        angle_context(angle),
    );

    match custom_instructions.map(str::trim) {
        Some(custom) if !custom.is_empty() => format!("{}, {}", base, custom),
        _ => base,
    }
}
