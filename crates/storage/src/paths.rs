//! Storage path layout for pipeline assets

use showreel_common::clean_file_name;
use uuid::Uuid;

/// Stage of the video pipeline an asset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Original,
    Transparent,
    Mannequin,
    Video,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Original => "original",
            AssetKind::Transparent => "transparent",
            AssetKind::Mannequin => "mannequin",
            AssetKind::Video => "video",
        }
    }
}

/// Role of an image uploaded for a try-on generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryOnRole {
    Clothing,
    Template,
}

impl TryOnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnRole::Clothing => "clothing",
            TryOnRole::Template => "template",
        }
    }
}

/// `projects/{id}/{kind}/{file}`
pub fn project_asset_path(project_id: Uuid, kind: AssetKind, file_name: &str) -> String {
    format!(
        "projects/{}/{}/{}",
        project_id,
        kind.as_str(),
        clean_file_name(file_name)
    )
}

/// `uwear/{id}_{role}_{file}`
pub fn tryon_asset_path(project_id: Uuid, role: TryOnRole, file_name: &str) -> String {
    format!(
        "uwear/{}_{}_{}",
        project_id,
        role.as_str(),
        clean_file_name(file_name)
    )
}
