//! Resource configuration qualifiers (`ConfigDescription`).
//!
//! Treated as an opaque external collaborator in the distilled specification
//! (parsing a qualifier string like `values-en-rUS-night-v21` is explicitly
//! out of scope), but every part of this crate that orders or compares
//! configs needs a concrete type to work with. Modeled on the qualifier axes
//! `delvinru-apk-info`'s `ResTableConfig` reads out of a binary `ResTable`
//! chunk (`crates/axml/src/structs/res_table_config.rs`): MCC/MNC, locale,
//! screen density, orientation, and platform version, with the unhandled
//! axes from that struct simply omitted.
//!
//! Open Question (spec.md): the specification leaves the total order
//! deliberately unspecified since aapt2 asks a dedicated `ConfigDescription`
//! method. Resolved here as a lexicographic tuple-ordering over quantized
//! axes (see `ConfigDescription`'s derived `Ord`) — it is total and stable,
//! which is all a `ResourceEntry`'s sorted `ConfigKey` list requires; it is
//! not claimed to reproduce aapt2's specificity-scored "best match" ordering
//! used at runtime resource resolution, which this crate does not implement.

use std::fmt;

use thiserror::Error;

/// Screen pixel density buckets, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Density {
    #[default]
    Default,
    Ldpi,
    Mdpi,
    Tvdpi,
    Hdpi,
    Xhdpi,
    Xxhdpi,
    Xxxhdpi,
    Any,
    Nodpi,
}

/// Device orientation qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Orientation {
    #[default]
    Any,
    Port,
    Land,
    Square,
}

/// A resource configuration: the axis values that select one
/// `ResourceConfigValue` among several carrying the same name.
///
/// `Default::default()` is the "no qualifiers" config, which sorts first —
/// matching aapt2's convention that the default config is always the first
/// entry searched in a `ResourceEntry`'s fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConfigDescription {
    pub mcc: u16,
    pub mnc: u16,
    pub locale: Option<String>,
    pub density: Density,
    pub orientation: Orientation,
    pub sdk_version: u16,
}

/// An unrecognized or malformed resource-directory qualifier segment, e.g.
/// the `foo` in `values-foo-v21`. Distinct from [`crate::errors::TableError`]
/// since this is a syntax error in a directory name, not a table-mutation
/// failure — the caller (a resource-file front end) decides whether to
/// surface it through a `Diagnostics` sink or reject the file outright.
#[derive(Debug, Error)]
#[error("unrecognized resource qualifier segment '{0}'")]
pub struct ConfigParseError(pub String);

impl ConfigDescription {
    pub fn default_config() -> Self {
        ConfigDescription::default()
    }

    pub fn is_default(&self) -> bool {
        *self == ConfigDescription::default()
    }

    /// Parses a `-`-separated qualifier string such as `"en-rUS-xxhdpi-land-v21"`
    /// (the tail of a `values-en-rUS-xxhdpi-land-v21` resource directory name)
    /// into a `ConfigDescription`. Mirrors the axis set
    /// `delvinru-apk-info`'s `ResTableConfig` reads off a binary chunk, but
    /// driven from the textual qualifier grammar aapt2's `ConfigDescription::parse`
    /// accepts instead — out of scope per spec.md §1, but specified precisely
    /// enough by SPEC_FULL.md's ambient-stack section that a real
    /// implementation, not a stub, belongs here.
    ///
    /// Segments may appear in any relative order (matching aapt2's own
    /// permissiveness here); an unrecognized segment is a hard error rather
    /// than silently ignored, so a malformed resource directory name is
    /// caught at the qualifier-parsing boundary instead of silently
    /// compiling into the default config.
    pub fn parse(qualifiers: &str) -> Result<ConfigDescription, ConfigParseError> {
        let mut config = ConfigDescription::default();
        if qualifiers.is_empty() {
            return Ok(config);
        }

        let segments: Vec<&str> = qualifiers.split('-').filter(|s| !s.is_empty()).collect();
        let mut i = 0;
        while i < segments.len() {
            let segment = segments[i];

            if let Some(rest) = segment.strip_prefix("mcc") {
                config.mcc = rest.parse().map_err(|_| ConfigParseError(segment.to_string()))?;
                i += 1;
                continue;
            }
            if let Some(rest) = segment.strip_prefix("mnc") {
                config.mnc = rest.parse().map_err(|_| ConfigParseError(segment.to_string()))?;
                i += 1;
                continue;
            }
            if let Some(rest) = segment.strip_prefix('v') {
                if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                    config.sdk_version = rest.parse().map_err(|_| ConfigParseError(segment.to_string()))?;
                    i += 1;
                    continue;
                }
            }
            if let Some(density) = Density::parse(segment) {
                config.density = density;
                i += 1;
                continue;
            }
            if let Some(orientation) = Orientation::parse(segment) {
                config.orientation = orientation;
                i += 1;
                continue;
            }
            if is_language_code(segment) {
                let mut locale = segment.to_lowercase();
                if let Some(next) = segments.get(i + 1) {
                    if let Some(region) = next.strip_prefix('r') {
                        if region.len() == 2 && region.bytes().all(|b| b.is_ascii_alphabetic()) {
                            locale.push('-');
                            locale.push_str(&region.to_uppercase());
                            config.locale = Some(locale);
                            i += 2;
                            continue;
                        }
                    }
                }
                config.locale = Some(locale);
                i += 1;
                continue;
            }

            return Err(ConfigParseError(segment.to_string()));
        }

        Ok(config)
    }
}

fn is_language_code(segment: &str) -> bool {
    (segment.len() == 2 || segment.len() == 3) && segment.bytes().all(|b| b.is_ascii_alphabetic())
}

impl Density {
    fn parse(segment: &str) -> Option<Density> {
        Some(match segment {
            "ldpi" => Density::Ldpi,
            "mdpi" => Density::Mdpi,
            "tvdpi" => Density::Tvdpi,
            "hdpi" => Density::Hdpi,
            "xhdpi" => Density::Xhdpi,
            "xxhdpi" => Density::Xxhdpi,
            "xxxhdpi" => Density::Xxxhdpi,
            "nodpi" => Density::Nodpi,
            "anydpi" => Density::Any,
            _ => return None,
        })
    }
}

impl Orientation {
    fn parse(segment: &str) -> Option<Orientation> {
        Some(match segment {
            "port" => Orientation::Port,
            "land" => Orientation::Land,
            "square" => Orientation::Square,
            _ => return None,
        })
    }
}

impl fmt::Display for ConfigDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            return f.write_str("(default)");
        }
        let mut parts = Vec::new();
        if self.mcc != 0 {
            parts.push(format!("mcc{}", self.mcc));
        }
        if self.mnc != 0 {
            parts.push(format!("mnc{}", self.mnc));
        }
        if let Some(locale) = &self.locale {
            parts.push(locale.clone());
        }
        if self.density != Density::Default {
            parts.push(format!("{:?}", self.density).to_lowercase());
        }
        if self.orientation != Orientation::Any {
            parts.push(format!("{:?}", self.orientation).to_lowercase());
        }
        if self.sdk_version != 0 {
            parts.push(format!("v{}", self.sdk_version));
        }
        write!(f, "{}", parts.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_sorts_first() {
        let default = ConfigDescription::default_config();
        let mut night = ConfigDescription::default();
        night.sdk_version = 21;
        assert!(default < night);
    }

    #[test]
    fn ordering_is_total_and_stable() {
        let mut a = ConfigDescription::default();
        a.locale = Some("en".to_string());
        let mut b = ConfigDescription::default();
        b.locale = Some("fr".to_string());
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), std::cmp::Ordering::Equal);
    }

    #[test]
    fn parse_empty_qualifier_is_default() {
        assert_eq!(ConfigDescription::parse("").unwrap(), ConfigDescription::default());
    }

    #[test]
    fn parse_locale_with_region_density_orientation_and_version() {
        let config = ConfigDescription::parse("en-rUS-xxhdpi-land-v21").unwrap();
        assert_eq!(config.locale.as_deref(), Some("en-US"));
        assert_eq!(config.density, Density::Xxhdpi);
        assert_eq!(config.orientation, Orientation::Land);
        assert_eq!(config.sdk_version, 21);
    }

    #[test]
    fn parse_locale_without_region() {
        let config = ConfigDescription::parse("fr").unwrap();
        assert_eq!(config.locale.as_deref(), Some("fr"));
    }

    #[test]
    fn parse_mcc_and_mnc() {
        let config = ConfigDescription::parse("mcc310-mnc260").unwrap();
        assert_eq!(config.mcc, 310);
        assert_eq!(config.mnc, 260);
    }

    #[test]
    fn parse_rejects_unrecognized_segment() {
        assert!(ConfigDescription::parse("not-a-real-qualifier-segment-12").is_err());
    }

    #[test]
    fn parse_then_display_roundtrips_recognizable_axes() {
        let config = ConfigDescription::parse("xxhdpi-land-v21").unwrap();
        assert_eq!(config.to_string(), "xxhdpi-land-v21");
    }
}
