//! Replicate runs for fashion models and virtual try-on

use rand::Rng;
use serde_json::json;
use tokio::time::Instant;

use showreel_replicate::{
    generation_policy, run_prediction, tryon_policy, ImageModel, PredictionService,
    ReplicateError, IDM_VTON_VERSION,
};

const NEGATIVE_PROMPT: &str = "nude, naked, nsfw, revealing, underwear, lingerie, swimsuit, bikini, bare skin, exposed, inappropriate, cartoon, illustration, CGI, 3d render, painting, sketch, bad anatomy, bad hands, deformed";

/// Aspect ratio used when the caller gives none
pub const DEFAULT_ASPECT_RATIO: &str = "3:4";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelGenerationRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub model: ImageModel,
}

/// A finished Replicate run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub image_url: String,
    /// Whole seconds from creation to result
    pub processing_time: u64,
    pub attempts: u32,
    pub replicate_id: String,
    pub version: &'static str,
}

pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..1_000_000)
}

/// Model-specific prediction input
pub fn model_input(
    model: ImageModel,
    prompt: &str,
    aspect_ratio: &str,
    seed: u32,
) -> serde_json::Value {
    let aspect_ratio = if aspect_ratio.is_empty() {
        DEFAULT_ASPECT_RATIO
    } else {
        aspect_ratio
    };

    match model {
        // raw mode for realistic skin
        ImageModel::FluxUltra => json!({
            "prompt": prompt,
            "seed": seed,
            "raw": true,
            "aspect_ratio": aspect_ratio,
            "safety_tolerance": 3,
            "guidance": 3.5,
            "steps": 28,
        }),
        ImageModel::FluxPro => json!({
            "prompt": prompt,
            "seed": seed,
            "aspect_ratio": aspect_ratio,
            "guidance": 3,
            "steps": 25,
            "output_format": "jpg",
        }),
        ImageModel::Ideogram | ImageModel::Juggernaut => {
            let (width, height) = if aspect_ratio == "3:4" {
                (768, 1024)
            } else {
                (1024, 768)
            };
            json!({
                "prompt": prompt,
                "seed": seed,
                "negative_prompt": NEGATIVE_PROMPT,
                "width": width,
                "height": height,
                "num_outputs": 1,
                "num_inference_steps": 30,
                "guidance_scale": 7,
                "scheduler": "K_EULER_ANCESTRAL",
            })
        }
    }
}

/// Generate a fashion model image with one image model
pub async fn generate_model_image(
    replicate: &dyn PredictionService,
    request: &ModelGenerationRequest,
) -> Result<GeneratedImage, ReplicateError> {
    let version = request.model.version();
    let input = model_input(
        request.model,
        &request.prompt,
        &request.aspect_ratio,
        random_seed(),
    );

    tracing::info!(model = %request.model, "Starting AI model generation");
    let started = Instant::now();
    let run = run_prediction(replicate, version, input, &generation_policy()).await?;
    let processing_time = started.elapsed().as_secs_f64().round() as u64;
    tracing::info!(model = %request.model, processing_time, "AI model generation completed");

    Ok(GeneratedImage {
        image_url: run.output_url,
        processing_time,
        attempts: run.attempts,
        replicate_id: run.prediction_id,
        version,
    })
}

/// Dress the model in the garment with IDM-VTON
pub async fn virtual_try_on(
    replicate: &dyn PredictionService,
    clothing_image_url: &str,
    model_image_url: &str,
    clothing_type: &str,
) -> Result<GeneratedImage, ReplicateError> {
    let input = json!({
        "human_img": model_image_url,
        "garm_img": clothing_image_url,
        "garment_des": format!("A high-quality {} that fits perfectly on the model", clothing_type),
        "is_checked": true,
        "is_checked_crop": false,
        "denoise_steps": 20,
        "guidance_scale": 1.5,
        "seed": random_seed(),
    });

    tracing::info!(clothing_type, "Starting virtual try-on");
    let started = Instant::now();
    let run = run_prediction(replicate, IDM_VTON_VERSION, input, &tryon_policy()).await?;
    let processing_time = started.elapsed().as_secs_f64().round() as u64;
    tracing::info!(clothing_type, processing_time, "Virtual try-on completed");

    Ok(GeneratedImage {
        image_url: run.output_url,
        processing_time,
        attempts: run.attempts,
        replicate_id: run.prediction_id,
        version: IDM_VTON_VERSION,
    })
}
