//! Authority code lookup
//!
//! Maps `urn:adv:crs:<code>` identifiers to EPSG codes. The table is built
//! once on first use and never changes afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Result, StoreError};

/// URN prefix handled by this table
pub const ADV_AUTHORITY: &str = "urn:adv:crs";

/// Authority the mapped codes belong to
pub const EPSG_AUTHORITY: &str = "EPSG";

static ADV_TO_EPSG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn table() -> &'static HashMap<&'static str, &'static str> {
    ADV_TO_EPSG.get_or_init(|| {
        HashMap::from([
            ("ETRS89_UTM31", "25831"),
            ("ETRS89_UTM32", "25832"),
            ("ETRS89_UTM33", "25833"),
        ])
    })
}

/// Resolve an ADV URN to its EPSG code
///
/// The prefix is matched case-insensitively; the code after the separator
/// is matched exactly.
pub fn epsg_code(urn: &str) -> Result<&'static str> {
    let trimmed = urn.trim();
    let unknown = || StoreError::UnknownAuthorityCode(urn.to_string());

    let prefix = trimmed.get(..ADV_AUTHORITY.len()).ok_or_else(unknown)?;
    if !prefix.eq_ignore_ascii_case(ADV_AUTHORITY) {
        return Err(unknown());
    }

    let code = trimmed.get(ADV_AUTHORITY.len() + 1..).ok_or_else(unknown)?;
    table().get(code).copied().ok_or_else(unknown)
}

/// Whether `urn` is in the ADV namespace at all
pub fn is_adv_urn(urn: &str) -> bool {
    urn.trim()
        .get(..ADV_AUTHORITY.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(ADV_AUTHORITY))
}
