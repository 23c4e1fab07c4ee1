//! Applicant profiles.
//!
//! Each applicant role submits a differently shaped profile once, after
//! registering. [`Profile`] is the tagged union over both shapes; the form
//! types hold the raw text an applicant typed and validate it into a profile.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Errors that can occur when validating a profile form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// A required field is empty or only whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The NGO capacity is not a positive whole number of plates.
    #[error("capacity must be a positive whole number of plates per day, got {0:?}")]
    InvalidCapacity(String),
}

/// Profile of a food-receiving NGO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NgoProfile {
    pub foundation_name: String,
    pub area: String,
    pub chairperson_name: String,
    pub contact_number: String,
    pub address: String,
    /// Plates per day the NGO can take.
    pub capacity: u32,
    /// Reference to the uploaded registration certificate.
    pub certificate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_link: Option<String>,
}

/// Profile of a restaurant donating surplus food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantProfile {
    pub restaurant_name: String,
    pub owner_name: String,
    pub contact_number: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_link: Option<String>,
}

/// A submitted profile, discriminated by the applicant's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Profile {
    Ngo(NgoProfile),
    Restaurant(RestaurantProfile),
}

impl Profile {
    /// The role this profile belongs to.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Ngo(_) => Role::Ngo,
            Self::Restaurant(_) => Role::Restaurant,
        }
    }

    /// Organization name shown to reviewers.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ngo(p) => &p.foundation_name,
            Self::Restaurant(p) => &p.restaurant_name,
        }
    }
}

impl From<NgoProfile> for Profile {
    fn from(profile: NgoProfile) -> Self {
        Self::Ngo(profile)
    }
}

impl From<RestaurantProfile> for Profile {
    fn from(profile: RestaurantProfile) -> Self {
        Self::Restaurant(profile)
    }
}

/// Raw NGO profile form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NgoProfileForm {
    pub foundation_name: String,
    pub area: String,
    pub chairperson_name: String,
    pub contact_number: String,
    pub address: String,
    pub capacity: String,
    pub certificate: String,
    pub instagram_link: String,
    pub youtube_link: String,
}

impl NgoProfileForm {
    /// Validate the form into an [`NgoProfile`].
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::MissingField` for the first blank required field,
    /// or `ProfileError::InvalidCapacity` if capacity is not a positive integer.
    pub fn validate(&self) -> Result<NgoProfile, ProfileError> {
        let foundation_name = required(&self.foundation_name, "foundation name")?;
        let area = required(&self.area, "area")?;
        let chairperson_name = required(&self.chairperson_name, "chairperson name")?;
        let contact_number = required(&self.contact_number, "contact number")?;
        let address = required(&self.address, "address")?;
        let capacity = parse_capacity(&self.capacity)?;
        let certificate = required(&self.certificate, "certificate")?;

        Ok(NgoProfile {
            foundation_name,
            area,
            chairperson_name,
            contact_number,
            address,
            capacity,
            certificate,
            instagram_link: optional(&self.instagram_link),
            youtube_link: optional(&self.youtube_link),
        })
    }
}

/// Raw restaurant profile form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantProfileForm {
    pub restaurant_name: String,
    pub owner_name: String,
    pub contact_number: String,
    pub location: String,
    pub instagram_link: String,
}

impl RestaurantProfileForm {
    /// Validate the form into a [`RestaurantProfile`].
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::MissingField` for the first blank required field.
    pub fn validate(&self) -> Result<RestaurantProfile, ProfileError> {
        Ok(RestaurantProfile {
            restaurant_name: required(&self.restaurant_name, "restaurant name")?,
            owner_name: required(&self.owner_name, "owner name")?,
            contact_number: required(&self.contact_number, "contact number")?,
            location: required(&self.location, "location")?,
            instagram_link: optional(&self.instagram_link),
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ProfileError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProfileError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse_capacity(value: &str) -> Result<u32, ProfileError> {
    match value.trim().parse::<u32>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ProfileError::InvalidCapacity(value.to_owned())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hope_foundation() -> NgoProfileForm {
        NgoProfileForm {
            foundation_name: "Hope Foundation".into(),
            area: "Downtown".into(),
            chairperson_name: "John Smith".into(),
            contact_number: "+1234567890".into(),
            address: "12 Relief Road".into(),
            capacity: "500".into(),
            certificate: "certificate1.pdf".into(),
            instagram_link: String::new(),
            youtube_link: " https://youtube.com/@hope ".into(),
        }
    }

    #[test]
    fn test_ngo_form_validates() {
        let profile = hope_foundation().validate().unwrap();
        assert_eq!(profile.capacity, 500);
        assert_eq!(profile.instagram_link, None);
        assert_eq!(
            profile.youtube_link.as_deref(),
            Some("https://youtube.com/@hope")
        );
    }

    #[test]
    fn test_ngo_form_rejects_bad_capacity() {
        for capacity in ["", "lots", "-5", "0", "2.5"] {
            let form = NgoProfileForm {
                capacity: capacity.into(),
                ..hope_foundation()
            };
            assert_eq!(
                form.validate(),
                Err(ProfileError::InvalidCapacity(capacity.into()))
            );
        }
    }

    #[test]
    fn test_ngo_form_requires_certificate() {
        let form = NgoProfileForm {
            certificate: "  ".into(),
            ..hope_foundation()
        };
        assert_eq!(
            form.validate(),
            Err(ProfileError::MissingField("certificate"))
        );
    }

    #[test]
    fn test_restaurant_form_requires_name() {
        let form = RestaurantProfileForm {
            owner_name: "Mike Johnson".into(),
            contact_number: "+1122334455".into(),
            location: "Main Street".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Err(ProfileError::MissingField("restaurant name"))
        );
    }

    #[test]
    fn test_profile_is_tagged_by_role() {
        let profile = Profile::from(hope_foundation().validate().unwrap());
        assert_eq!(profile.role(), Role::Ngo);
        assert_eq!(profile.display_name(), "Hope Foundation");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "ngo");
        assert_eq!(json["foundationName"], "Hope Foundation");
        assert_eq!(json["capacity"], 500);
        assert!(json.get("instagramLink").is_none());
    }

    #[test]
    fn test_profile_rejects_unknown_tag() {
        let parsed: Result<Profile, _> =
            serde_json::from_str(r#"{"role":"admin","restaurantName":"x"}"#);
        assert!(parsed.is_err());
    }
}
