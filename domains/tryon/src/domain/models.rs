//! Curated fashion model photos
//!
//! Used when no template is uploaded and generation is simulated or every
//! image model failed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::options::{BodyType, CameraAngle, Ethnicity, Gender, ModelOptions};

/// Returned when nothing in the database matches
pub const DEFAULT_MODEL_PHOTO: &str =
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=1200&h=1600&fit=crop";

/// Pose buckets in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoPose {
    Front,
    Side,
    Angle,
}

impl PhotoPose {
    /// Back shots use side photos
    pub fn for_angle(angle: CameraAngle) -> Self {
        match angle {
            CameraAngle::Front => PhotoPose::Front,
            CameraAngle::Side | CameraAngle::Back => PhotoPose::Side,
            CameraAngle::FortyFiveDegree | CameraAngle::Angle => PhotoPose::Angle,
        }
    }
}

/// Photos of one gender/ethnicity/body type, by pose. Values are Unsplash photo ids.
#[derive(Debug)]
pub struct PhotoSet {
    pub gender: Gender,
    pub ethnicity: Ethnicity,
    pub body_type: BodyType,
    pub front: &'static [&'static str],
    pub side: &'static [&'static str],
    pub angle: &'static [&'static str],
}

impl PhotoSet {
    pub fn photos(&self, pose: PhotoPose) -> &'static [&'static str] {
        match pose {
            PhotoPose::Front => self.front,
            PhotoPose::Side => self.side,
            PhotoPose::Angle => self.angle,
        }
    }
}

const fn set(
    gender: Gender,
    ethnicity: Ethnicity,
    body_type: BodyType,
    front: &'static [&'static str],
    side: &'static [&'static str],
    angle: &'static [&'static str],
) -> PhotoSet {
    PhotoSet {
        gender,
        ethnicity,
        body_type,
        front,
        side,
        angle,
    }
}

use BodyType::{Athletic, Average, Curvy, Slim};
use Ethnicity::{African, Asian, Caucasian, Hispanic};
use Gender::{Female, Male};

/// Ordered; the first matching set wins the "first available" fallbacks
pub static MODEL_DATABASE: &[PhotoSet] = &[
    set(
        Female,
        Caucasian,
        Slim,
        &[
            "1487412720507-e7ab37603c6f",
            "1524504388940-b1c1722653e1",
            "1488716820095-cbe80883c496",
        ],
        &["1515886657613-9f3515b0c78f", "1521146764736-56c929d59c83"],
        &["1529626455594-4ff0802cfb7e", "1502823403499-6ccfcf4fb453"],
    ),
    set(
        Female,
        Caucasian,
        Average,
        &[
            "1494790108377-be9c29b29330",
            "1438761681033-6461ffad8d80",
            "1544717297-fa95b6ee9643",
        ],
        &["1499996860823-5214fcc65f8f", "1517841905240-472988babdf9"],
        &["1489424731084-a5d8b219a5bb", "1506863530036-1efeddceb993"],
    ),
    set(
        Female,
        Caucasian,
        Curvy,
        &["1580489944761-15a19d654956", "1551698618-1dfe5d97d256"],
        &["1596815064285-45ed8a9c0463"],
        &["1573496359142-b8d87734a5a2"],
    ),
    set(
        Female,
        African,
        Slim,
        &["1531123897727-8f129e1688ce", "1566492031773-4f4e44671d66"],
        &["1588516903720-8ceb67f9ef84"],
        &["1594824020047-3c480ad2a2ab"],
    ),
    set(
        Female,
        African,
        Average,
        &["1589156280159-27698a70f29e", "1557804506-669a67965ba0"],
        &["1598300042247-d088f8ab3a91"],
        &["1582750433449-648ed127bb54"],
    ),
    set(
        Female,
        African,
        Curvy,
        &["1616847535022-df3b2e76c4c0"],
        &["1604608672516-5ba60de8b391"],
        &[],
    ),
    set(
        Female,
        Asian,
        Slim,
        &["1544005313-94ddf0286df2", "1596913317062-82eb71e44878"],
        &["1609595361082-4bbe4d6c5e3c"],
        &["1611689342806-0863700ce1e4"],
    ),
    set(
        Female,
        Asian,
        Average,
        &["1534528741775-53994a69daeb", "1603569283847-aa295f0d016a"],
        &["1614644147798-f8c0fc9da7f6"],
        &["1606122017369-d782bbb78f32"],
    ),
    set(
        Female,
        Hispanic,
        Slim,
        &["1592124549776-a7f0cc973b24"],
        &["1616001618970-2bbbde2f3b13"],
        &[],
    ),
    set(
        Female,
        Hispanic,
        Average,
        &["1618835962148-cf177563c6c0", "1581403341630-a6e0b9d2d257"],
        &["1592334873219-42ca023e48ce"],
        &[],
    ),
    set(
        Male,
        Caucasian,
        Slim,
        &["1500648767791-00dcc994a43e", "1552058544-f2b08422138a"],
        &["1553267751-1c148a7280a1"],
        &["1567336273898-ebbf9eb3c3bf"],
    ),
    set(
        Male,
        Caucasian,
        Athletic,
        &["1519085360753-af0119f7cbe7", "1571019613454-1cb2f99b2d8b"],
        &["1551698618-1dfe5d97d256"],
        &["1560250097-0b93528c311a"],
    ),
    set(
        Male,
        Caucasian,
        Average,
        &["1472099645785-5658abf4ff4e", "1568602471122-7832951cc4c5"],
        &["1583394838336-acd977736f90"],
        &[],
    ),
    set(
        Male,
        African,
        Athletic,
        &["1506794778202-cad84cf45f1d", "1594824020047-3c480ad2a2ab"],
        &["1598300042247-d088f8ab3a91"],
        &["1566492031773-4f4e44671d66"],
    ),
    set(
        Male,
        African,
        Slim,
        &["1592334873219-42ca023e48ce"],
        &["1588516903720-8ceb67f9ef84"],
        &[],
    ),
    set(
        Male,
        Asian,
        Slim,
        &["1609595361082-4bbe4d6c5e3c"],
        &["1614644147798-f8c0fc9da7f6"],
        &[],
    ),
    set(
        Male,
        Asian,
        Average,
        &["1603569283847-aa295f0d016a", "1611689342806-0863700ce1e4"],
        &[],
        &["1606122017369-d782bbb78f32"],
    ),
    set(
        Male,
        Hispanic,
        Athletic,
        &["1581403341630-a6e0b9d2d257"],
        &["1616001618970-2bbbde2f3b13"],
        &[],
    ),
    set(
        Male,
        Hispanic,
        Average,
        &["1618835962148-cf177563c6c0"],
        &[],
        &[],
    ),
];

pub fn model_photo_url(photo_id: &str) -> String {
    format!(
        "https://images.unsplash.com/photo-{}?w=1200&h=1600&fit=crop",
        photo_id
    )
}

/// The photo set for `options`, falling back to female, then caucasian or
/// the first ethnicity, then average, slim, or the first body type.
pub fn find_photo_set(options: &ModelOptions) -> Option<&'static PhotoSet> {
    let gender = if MODEL_DATABASE.iter().any(|s| s.gender == options.gender) {
        options.gender
    } else {
        Gender::Female
    };
    let by_gender = || MODEL_DATABASE.iter().filter(move |s| s.gender == gender);

    let ethnicity = [options.ethnicity, Caucasian]
        .into_iter()
        .find(|e| by_gender().any(|s| s.ethnicity == *e))
        .or_else(|| by_gender().next().map(|s| s.ethnicity))?;
    let by_ethnicity = || by_gender().filter(move |s| s.ethnicity == ethnicity);

    [options.body_type, Average, Slim]
        .into_iter()
        .find_map(|b| by_ethnicity().find(|s| s.body_type == b))
        .or_else(|| by_ethnicity().next())
}

/// Pick a random curated photo for the options and camera angle.
///
/// A missing pose falls back through front, angle, and side; with no
/// photos at all the default photo is returned.
pub fn select_model_photo<R>(options: &ModelOptions, angle: CameraAngle, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let Some(set) = find_photo_set(options) else {
        return DEFAULT_MODEL_PHOTO.to_string();
    };

    let target = PhotoPose::for_angle(angle);
    let photos = [target, PhotoPose::Front, PhotoPose::Angle, PhotoPose::Side]
        .into_iter()
        .map(|pose| set.photos(pose))
        .find(|photos| !photos.is_empty());

    match photos.and_then(|photos| photos.choose(rng)) {
        Some(photo_id) => {
            tracing::info!(
                gender = %options.gender,
                ethnicity = %options.ethnicity,
                body_type = %options.body_type,
                ?target,
                "Selected curated model photo"
            );
            model_photo_url(photo_id)
        }
        None => DEFAULT_MODEL_PHOTO.to_string(),
    }
}
