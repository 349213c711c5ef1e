//! Synthetic identity records.
//!
//! Pure value source for the mock endpoint: every field is filled with a
//! plausible random value from fixed pools, except `registerKey` which
//! echoes the request's subject-register id. Records are generated fresh per
//! request and never persisted.

use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

const GIVEN_NAMES: &[&str] = &[
    "Anna", "Erik", "Maria", "Jonas", "Lena", "Tomas", "Ingrid", "Oskar", "Sofia", "Viktor",
];
const FAMILY_NAMES: &[&str] = &[
    "Lindberg", "Johansson", "Virtanen", "Novak", "Keller", "Andersen", "Kovacs", "Petrov",
];
const CITIES: &[&str] = &[
    "Stockholm", "Helsinki", "Copenhagen", "Vienna", "Prague", "Riga", "Tallinn", "Oslo",
];
const COUNTRIES: &[&str] = &[
    "Sweden", "Finland", "Denmark", "Austria", "Czechia", "Latvia", "Estonia", "Norway",
];
const GENDERS: &[&str] = &["Male", "Female"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub given_names: String,
    pub middle_names: String,
    pub family_name: String,
    pub name_in_dispute: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNameTransliterated {
    pub given_names_transliterated: String,
    pub family_name_transliterated: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDate {
    pub date_verified: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub entry_number: u32,
    pub entry_timestamp: String,
    pub register_key: String,
    pub person_name: PersonName,
    pub person_name_transliterated: PersonNameTransliterated,
    pub gender: String,
    pub gender_in_dispute: bool,
    pub date_of_birth: String,
    pub date_of_birth_in_dispute: bool,
    pub place_of_birth: String,
    pub place_of_birth_in_dispute: bool,
    pub place_of_birth_transliterated: String,
    pub country_of_birth: String,
    pub country_of_birth_in_dispute: bool,
    pub identity_status: String,
    pub legacy_id: String,
    pub verification_date: VerificationDate,
}

fn pick(rng: &mut impl Rng, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Build a fresh record for `register_key` (the path's subject-register id).
pub fn identity_record(register_key: &str) -> IdentityRecord {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();

    // subject is 18-80 years old
    let date_of_birth = today - Duration::days(rng.gen_range(18 * 365..=80 * 365));
    let date_verified = today - Duration::days(rng.gen_range(0..=3650));
    let expiry_date = today + Duration::days(rng.gen_range(365..=3650));

    let legacy_id = format!(
        "LEG-{}-{}{}",
        date_verified.format("%Y"),
        rng.gen_range(b'A'..=b'Z') as char,
        rng.gen_range(b'A'..=b'Z') as char,
    );

    IdentityRecord {
        entry_number: rng.gen_range(100_000..=999_999),
        entry_timestamp: Utc::now().format("%H:%M:%S:%3f").to_string(),
        register_key: register_key.to_string(),
        person_name: PersonName {
            given_names: pick(&mut rng, GIVEN_NAMES),
            middle_names: pick(&mut rng, GIVEN_NAMES),
            family_name: pick(&mut rng, FAMILY_NAMES),
            name_in_dispute: rng.gen(),
        },
        person_name_transliterated: PersonNameTransliterated {
            given_names_transliterated: pick(&mut rng, GIVEN_NAMES),
            family_name_transliterated: pick(&mut rng, FAMILY_NAMES),
        },
        gender: pick(&mut rng, GENDERS),
        gender_in_dispute: rng.gen(),
        date_of_birth: iso_date(date_of_birth),
        date_of_birth_in_dispute: rng.gen(),
        place_of_birth: pick(&mut rng, CITIES),
        place_of_birth_in_dispute: rng.gen(),
        place_of_birth_transliterated: pick(&mut rng, CITIES),
        country_of_birth: pick(&mut rng, COUNTRIES),
        country_of_birth_in_dispute: rng.gen(),
        identity_status: "Verified".to_string(),
        legacy_id,
        verification_date: VerificationDate {
            date_verified: iso_date(date_verified),
            expiry_date: iso_date(expiry_date),
        },
    }
}
