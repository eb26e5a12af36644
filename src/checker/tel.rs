// src/checker/tel.rs
// =============================================================================
// Validation for telephone numbers (tel: links and plain phone fields).
//
// Numbers are parsed with the `phonenumber` crate, a port of Google's
// libphonenumber. Numbers written without a "+country" prefix are read in
// the region implied by the site's language code ("de" -> DE, "en-gb" -> GB).
//
// Two levels of checking:
// - possible: the number parses and its length is one its region allows
// - valid:    the number matches an assigned range in the numbering plan
//
// We never dial anything, "verify exists" just means the stricter check.
// =============================================================================

use async_trait::async_trait;
use phonenumber::metadata::{Metadata, DATABASE};
use phonenumber::{country, PhoneNumber};

use super::parts::UrlParts;
use super::router::SchemeValidator;

/// Infers the default phone region from a language code.
///
/// "en-us" and "en_US" use the region subtag; a bare "de" is read as the
/// region DE. Returns `None` when no region can be inferred ("en" is not a
/// country), in which case only international numbers parse.
pub fn region_for_language(language_code: &str) -> Option<country::Id> {
    let tag = language_code.trim();
    let region = tag.split(['-', '_']).nth(1).unwrap_or(tag);
    region.to_ascii_uppercase().parse::<country::Id>().ok()
}

/// Returns true if `number` is a possible phone number, or with
/// `verify_exists` a valid (assigned) one.
pub fn validate_tel(number: &str, region: Option<country::Id>, verify_exists: bool) -> bool {
    let parsed = match phonenumber::parse(region, number) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if verify_exists {
        phonenumber::is_valid(&parsed)
    } else {
        is_possible(&parsed)
    }
}

// Compares the national number's length (leading zeros included) with the
// full and local-only lengths of its region's numbering plan
fn is_possible(number: &PhoneNumber) -> bool {
    let Some(meta) = region_metadata(number) else {
        return false;
    };

    let Ok(digits) = u16::try_from(number.national().to_string().len()) else {
        return false;
    };

    let general = meta.descriptors().general();
    general.possible_length().contains(&digits) || general.possible_local_length().contains(&digits)
}

// Numbers outside every assigned range of a shared country code (+1) match
// no region; those fall back to the first region sharing the code
fn region_metadata(number: &PhoneNumber) -> Option<&'static Metadata> {
    number
        .metadata(&DATABASE)
        .or_else(|| DATABASE.by_code(&number.code().value())?.into_iter().next())
}

/// Validator registered for the `tel` scheme.
#[derive(Debug, Clone, Copy)]
pub struct TelValidator {
    region: Option<country::Id>,
}

impl TelValidator {
    pub fn new(region: Option<country::Id>) -> Self {
        Self { region }
    }
}

#[async_trait]
impl SchemeValidator for TelValidator {
    async fn validate(&self, parts: &UrlParts, verify_exists: bool) -> bool {
        // tel:+1-201-555-0123;ext=7 -> "+1-201-555-0123"
        validate_tel(&parts.path, self.region, verify_exists)
    }
}
