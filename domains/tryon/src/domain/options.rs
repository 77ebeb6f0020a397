//! Model, background, and camera options chosen for a generation
//!
//! Wire values are the kebab-case strings the try-on form submits.

use serde::{Deserialize, Serialize};

macro_rules! define_option_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_option_enum! {
    Ethnicity {
        Caucasian = "caucasian",
        African = "african",
        Asian = "asian",
        Hispanic = "hispanic",
        MiddleEastern = "middle-eastern",
        Mixed = "mixed",
    }
}

define_option_enum! {
    BodyType {
        Slim = "slim",
        Athletic = "athletic",
        Average = "average",
        Curvy = "curvy",
        PlusSize = "plus-size",
    }
}

define_option_enum! {
    AgeRange {
        Young = "young",
        MiddleAged = "middle-aged",
        Mature = "mature",
    }
}

define_option_enum! {
    Gender {
        Female = "female",
        Male = "male",
    }
}

define_option_enum! {
    HairColor {
        Blonde = "blonde",
        Brunette = "brunette",
        Black = "black",
        Red = "red",
        Gray = "gray",
    }
}

define_option_enum! {
    /// How the model stands
    ModelPose {
        Standing = "standing",
        Walking = "walking",
        Sitting = "sitting",
        Dynamic = "dynamic",
    }
}

define_option_enum! {
    BackgroundType {
        Studio = "studio",
        Outdoor = "outdoor",
        Urban = "urban",
        Lifestyle = "lifestyle",
        Custom = "custom",
    }
}

define_option_enum! {
    CameraAngle {
        Front = "front",
        Side = "side",
        Back = "back",
        FortyFiveDegree = "45-degree",
        Angle = "angle",
    }
}

define_option_enum! {
    Zoom {
        FullBody = "full-body",
        HalfBody = "half-body",
        CloseUp = "close-up",
        ThreeQuarter = "three-quarter",
    }
}

define_option_enum! {
    /// Pose hint attached to the camera setup
    CameraPose {
        Standing = "standing",
        Walking = "walking",
        Casual = "casual",
        Professional = "professional",
    }
}

define_option_enum! {
    ClothingType {
        Tshirt = "tshirt",
        Dress = "dress",
        Pants = "pants",
        Jacket = "jacket",
        Skirt = "skirt",
        Hoodie = "hoodie",
        Shirt = "shirt",
        Other = "other",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    pub ethnicity: Ethnicity,
    pub body_type: BodyType,
    pub age: AgeRange,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<HairColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<ModelPose>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundOptions {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    /// Id from the background presets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraOptions {
    pub angle: CameraAngle,
    pub zoom: Zoom,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<CameraPose>,
}

impl CameraOptions {
    /// Full-body shots are portrait, everything else square
    pub fn aspect_ratio(&self) -> &'static str {
        match self.zoom {
            Zoom::FullBody => "3:4",
            _ => "1:1",
        }
    }
}
