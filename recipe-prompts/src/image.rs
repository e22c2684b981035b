//! Image prompt for a dish, rendered straight into a Pollinations URL.
//!
//! The transformation is a fixed table lookup, so it runs locally and never
//! reaches a model backend.

use tracing::debug;

/// Base URL the encoded phrase is appended to.
pub const IMAGE_BASE_URL: &str = "https://image.pollinations.ai/prompt/";

/// Style appended to every subject.
pub const IMAGE_STYLE_SUFFIX: &str = "fotografía de comida realista, primer plano";

/// Animals that, given on their own, describe the meat rather than the animal.
const MEAT_ANIMALS: &[&str] = &[
    "buey",
    "cabra",
    "cabrito",
    "cerdo",
    "ciervo",
    "cochinillo",
    "codorniz",
    "conejo",
    "cordero",
    "jabalí",
    "pato",
    "pavo",
    "pollo",
    "res",
    "ternera",
    "vaca",
    "venado",
];

/// Turns a bare animal name into `carne de <animal>`; anything else is kept.
#[must_use]
pub fn image_subject(recipe_name: &str) -> String {
    let subject = recipe_name.trim();
    let lowered = subject.to_lowercase();
    if MEAT_ANIMALS.contains(&lowered.as_str()) {
        format!("carne de {lowered}")
    } else {
        subject.to_owned()
    }
}

/// Full, unencoded description sent to the image service.
#[must_use]
pub fn image_phrase(recipe_name: &str) -> String {
    format!("{} {IMAGE_STYLE_SUFFIX}", image_subject(recipe_name))
}

/// Absolute image URL for the dish.
#[must_use]
pub fn image_url(recipe_name: &str) -> String {
    let phrase = image_phrase(recipe_name);
    debug!(phrase = %phrase, "rendering image url");
    format!("{IMAGE_BASE_URL}{}", urlencoding::encode(&phrase))
}
