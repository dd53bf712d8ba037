use itertools::Itertools;
use log::{debug, warn};

use super::{DoviProfile, FelDataError, Level1, Level6, SceneRecord};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ProfilePolicy {
    #[default]
    First,
    Consensus,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum L1Policy {
    First,
    Max,
    Average,
}

#[derive(Debug, Copy, Clone)]
pub struct NormalizerConfig {
    pub profile_policy: ProfilePolicy,
    pub l1_policy: L1Policy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSummary {
    pub profile: DoviProfile,
    pub fel_present: bool,
    pub l1: Option<Level1>,
    pub l6: Option<Level6>,
    pub content_light_level: Option<Level6>,
    pub scene_count: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LightLevelSource {
    L6,
    Container,
    L1,
}

impl MetadataSummary {
    pub fn from_records(
        records: &[SceneRecord],
        config: &NormalizerConfig,
    ) -> Result<Self, FelDataError> {
        let first = records.first().ok_or_else(|| {
            FelDataError::EmptyReport(String::from(
                "the report contains no scenes, the RPU is probably empty or not Dolby Vision",
            ))
        })?;

        let profile = first.profile;

        if let Some((index, record)) = records.iter().find_position(|r| r.profile != profile) {
            match config.profile_policy {
                ProfilePolicy::First => {
                    warn!(
                        "Scene {index} reports profile {} while scene 0 reports {profile}, using {profile}",
                        record.profile
                    );
                }
                ProfilePolicy::Consensus => {
                    return Err(FelDataError::InconsistentProfile {
                        first: profile,
                        found: record.profile,
                        index,
                    });
                }
            }
        }

        let fel_present = records.iter().any(|r| r.fel_present);

        let l6 = records
            .iter()
            .filter_map(|r| r.l6)
            .reduce(Level6::max);

        let content_light_level = records
            .iter()
            .filter_map(|r| r.content_light_level)
            .reduce(Level6::max);

        let l1 = aggregate_l1(records.iter().filter_map(|r| r.l1), config.l1_policy);

        debug!(
            "Normalized {} scene(s): profile {profile}, FEL {fel_present}, L1 {l1:?}, L6 {l6:?}",
            records.len()
        );

        Ok(Self {
            profile,
            fel_present,
            l1,
            l6,
            content_light_level,
            scene_count: records.len(),
        })
    }

    /// L6 metadata first, then the container's values, then the L1 content light level
    pub fn light_level(&self, container: Option<Level6>) -> Option<(Level6, LightLevelSource)> {
        self.l6
            .map(|l6| (l6, LightLevelSource::L6))
            .or_else(|| container.map(|cll| (cll, LightLevelSource::Container)))
            .or_else(|| {
                self.content_light_level
                    .map(|cll| (cll, LightLevelSource::L1))
            })
    }
}

fn aggregate_l1<I>(mut values: I, policy: L1Policy) -> Option<Level1>
where
    I: Iterator<Item = Level1>,
{
    match policy {
        L1Policy::First => values.next(),
        L1Policy::Max => values.reduce(|acc, l1| Level1 {
            min: acc.min.max(l1.min),
            max: acc.max.max(l1.max),
            avg: max_opt(acc.avg, l1.avg),
        }),
        L1Policy::Average => {
            let values = values.collect_vec();
            if values.is_empty() {
                return None;
            }

            let count = values.len() as f64;
            let avgs = values.iter().filter_map(|l1| l1.avg).collect_vec();

            Some(Level1 {
                min: values.iter().map(|l1| l1.min).sum::<f64>() / count,
                max: values.iter().map(|l1| l1.max).sum::<f64>() / count,
                avg: (!avgs.is_empty()).then(|| avgs.iter().sum::<f64>() / avgs.len() as f64),
            })
        }
    }
}

fn max_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}
