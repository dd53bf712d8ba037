use std::fs;
use std::path::Path;

use anyhow::Result;

use super::report::parse_report;
use super::{
    DoviProfile, L1Policy, Level1, Level6, MetadataSummary, NormalizerConfig, ProfilePolicy,
    SceneRecord,
};


pub fn _read_report(name: &str) -> Result<String> {
    let path = Path::new("./assets/tests").join(name);
    Ok(fs::read_to_string(path)?)
}

pub fn _parse_file(name: &str) -> Result<Vec<SceneRecord>> {
    let raw = _read_report(name)?;
    Ok(parse_report(&raw)?)
}

pub fn _summarize(name: &str, l1_policy: L1Policy) -> Result<MetadataSummary> {
    let records = _parse_file(name)?;
    let config = NormalizerConfig {
        profile_policy: ProfilePolicy::First,
        l1_policy,
    };

    Ok(MetadataSummary::from_records(&records, &config)?)
}

pub fn _record(
    profile: &str,
    fel_present: bool,
    l1: Option<(f64, f64, Option<f64>)>,
    l6: Option<(u16, u16)>,
) -> SceneRecord {
    SceneRecord {
        profile: profile.parse().unwrap(),
        fel_present,
        l1: l1.map(|(min, max, avg)| Level1 { min, max, avg }),
        l6: l6.map(|(max_cll, max_fall)| Level6 { max_cll, max_fall }),
        content_light_level: None,
    }
}

#[test]
fn profile_from_str() -> Result<()> {
    assert_eq!("8".parse::<DoviProfile>()?, DoviProfile::new(8, None));
    assert_eq!("7.6".parse::<DoviProfile>()?, DoviProfile::new(7, Some(6)));
    assert_eq!(" 8.1 ".parse::<DoviProfile>()?, DoviProfile::new(8, Some(1)));

    assert!("seven".parse::<DoviProfile>().is_err());
    assert!("8.".parse::<DoviProfile>().is_err());
    assert!("".parse::<DoviProfile>().is_err());

    Ok(())
}

#[test]
fn profile_display() {
    assert_eq!(DoviProfile::new(8, None).to_string(), "8");
    assert_eq!(DoviProfile::new(8, Some(1)).to_string(), "8.1");
}

#[test]
fn level6_max() {
    let a = Level6 {
        max_cll: 1000,
        max_fall: 200,
    };
    let b = Level6 {
        max_cll: 600,
        max_fall: 450,
    };

    assert_eq!(
        a.max(b),
        Level6 {
            max_cll: 1000,
            max_fall: 450
        }
    );
}
