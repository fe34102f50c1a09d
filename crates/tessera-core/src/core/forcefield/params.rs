use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PotentialKind {
    Harmonic,
    Fene,
    Tether,
    AreaConservation,
}

static POTENTIAL_KINDS: Map<&'static str, PotentialKind> = phf_map! {
    "harmonic" => PotentialKind::Harmonic,
    "fene" => PotentialKind::Fene,
    "fenewca" => PotentialKind::Fene,
    "fene-wca" => PotentialKind::Fene,
    "tether" => PotentialKind::Tether,
    "area-conservation" => PotentialKind::AreaConservation,
    "area_conservation" => PotentialKind::AreaConservation,
    "areaconservation" => PotentialKind::AreaConservation,
};

impl PotentialKind {
    pub const ALL: [PotentialKind; 4] = [
        PotentialKind::Harmonic,
        PotentialKind::Fene,
        PotentialKind::Tether,
        PotentialKind::AreaConservation,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Harmonic => "harmonic",
            Self::Fene => "fene",
            Self::Tether => "tether",
            Self::AreaConservation => "area-conservation",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown mesh potential '{0}'")]
pub struct ParsePotentialKindError(pub String);

impl FromStr for PotentialKind {
    type Err = ParsePotentialKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POTENTIAL_KINDS
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| ParsePotentialKindError(s.to_string()))
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid {potential} parameter '{field}' = {value}: must be {constraint}")]
pub struct ParamError {
    pub potential: &'static str,
    pub field: &'static str,
    pub value: f64,
    pub constraint: &'static str,
}

/// A validated per-type parameter record of one mesh potential.
pub trait ParamRecord: Copy + fmt::Debug + Send + Sync + 'static + Into<AnyParams> {
    const KIND: PotentialKind;

    fn validate(&self) -> Result<(), ParamError>;
}

fn require(
    kind: PotentialKind,
    field: &'static str,
    value: f64,
    holds: bool,
    constraint: &'static str,
) -> Result<(), ParamError> {
    if value.is_finite() && holds {
        Ok(())
    } else {
        Err(ParamError {
            potential: kind.as_str(),
            field,
            value,
            constraint,
        })
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HarmonicParams {
    pub k: f64,
    pub r0: f64,
}

impl ParamRecord for HarmonicParams {
    const KIND: PotentialKind = PotentialKind::Harmonic;

    fn validate(&self) -> Result<(), ParamError> {
        require(Self::KIND, "k", self.k, self.k > 0.0, "positive")?;
        require(Self::KIND, "r0", self.r0, self.r0 >= 0.0, "non-negative")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeneParams {
    pub k: f64,
    pub r0: f64,
    pub epsilon: f64,
    pub sigma: f64,
}

impl ParamRecord for FeneParams {
    const KIND: PotentialKind = PotentialKind::Fene;

    fn validate(&self) -> Result<(), ParamError> {
        require(Self::KIND, "k", self.k, self.k > 0.0, "positive")?;
        require(Self::KIND, "r0", self.r0, self.r0 > 0.0, "positive")?;
        require(
            Self::KIND,
            "epsilon",
            self.epsilon,
            self.epsilon >= 0.0,
            "non-negative",
        )?;
        require(Self::KIND, "sigma", self.sigma, self.sigma > 0.0, "positive")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TetherParams {
    pub k_b: f64,
    pub l_min: f64,
    pub l_c1: f64,
    pub l_c0: f64,
    pub l_max: f64,
}

impl ParamRecord for TetherParams {
    const KIND: PotentialKind = PotentialKind::Tether;

    fn validate(&self) -> Result<(), ParamError> {
        require(Self::KIND, "k_b", self.k_b, self.k_b > 0.0, "positive")?;
        require(Self::KIND, "l_min", self.l_min, self.l_min > 0.0, "positive")?;
        require(
            Self::KIND,
            "l_c1",
            self.l_c1,
            self.l_c1 > self.l_min,
            "greater than l_min",
        )?;
        require(
            Self::KIND,
            "l_c0",
            self.l_c0,
            self.l_c0 >= self.l_c1,
            "at least l_c1",
        )?;
        require(
            Self::KIND,
            "l_max",
            self.l_max,
            self.l_max > self.l_c0,
            "greater than l_c0",
        )
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AreaConservationParams {
    pub k: f64,
    #[serde(rename = "A0", alias = "a0")]
    pub a0: f64,
}

impl ParamRecord for AreaConservationParams {
    const KIND: PotentialKind = PotentialKind::AreaConservation;

    fn validate(&self) -> Result<(), ParamError> {
        require(Self::KIND, "k", self.k, self.k > 0.0, "positive")?;
        require(Self::KIND, "A0", self.a0, self.a0 > 0.0, "positive")
    }
}

/// Any parameter record, tagged by its potential.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyParams {
    Harmonic(HarmonicParams),
    Fene(FeneParams),
    Tether(TetherParams),
    AreaConservation(AreaConservationParams),
}

impl AnyParams {
    pub fn kind(&self) -> PotentialKind {
        match self {
            Self::Harmonic(_) => PotentialKind::Harmonic,
            Self::Fene(_) => PotentialKind::Fene,
            Self::Tether(_) => PotentialKind::Tether,
            Self::AreaConservation(_) => PotentialKind::AreaConservation,
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        match self {
            Self::Harmonic(p) => p.validate(),
            Self::Fene(p) => p.validate(),
            Self::Tether(p) => p.validate(),
            Self::AreaConservation(p) => p.validate(),
        }
    }
}

impl fmt::Display for AnyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Harmonic(p) => write!(f, "{{ k = {}, r0 = {} }}", p.k, p.r0),
            Self::Fene(p) => write!(
                f,
                "{{ k = {}, r0 = {}, epsilon = {}, sigma = {} }}",
                p.k, p.r0, p.epsilon, p.sigma
            ),
            Self::Tether(p) => write!(
                f,
                "{{ k_b = {}, l_min = {}, l_c1 = {}, l_c0 = {}, l_max = {} }}",
                p.k_b, p.l_min, p.l_c1, p.l_c0, p.l_max
            ),
            Self::AreaConservation(p) => write!(f, "{{ k = {}, A0 = {} }}", p.k, p.a0),
        }
    }
}

impl From<HarmonicParams> for AnyParams {
    fn from(p: HarmonicParams) -> Self {
        Self::Harmonic(p)
    }
}

impl From<FeneParams> for AnyParams {
    fn from(p: FeneParams) -> Self {
        Self::Fene(p)
    }
}

impl From<TetherParams> for AnyParams {
    fn from(p: TetherParams) -> Self {
        Self::Tether(p)
    }
}

impl From<AreaConservationParams> for AnyParams {
    fn from(p: AreaConservationParams) -> Self {
        Self::AreaConservation(p)
    }
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameters for mesh type '{mesh_type}' in '{path}': {source}")]
    Invalid {
        path: String,
        mesh_type: String,
        source: ParamError,
    },
}

/// Per-type parameters for every mesh potential, as read from TOML.
///
/// ```toml
/// [harmonic.mesh]
/// k = 30.0
/// r0 = 1.6
///
/// [area-conservation.mesh]
/// k = 1.0
/// A0 = 10.392
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ParameterFile {
    #[serde(default)]
    pub harmonic: BTreeMap<String, HarmonicParams>,
    #[serde(default)]
    pub fene: BTreeMap<String, FeneParams>,
    #[serde(default)]
    pub tether: BTreeMap<String, TetherParams>,
    #[serde(default)]
    pub area_conservation: BTreeMap<String, AreaConservationParams>,
}

impl ParameterFile {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let file: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path_str.clone(),
            source: e,
        })?;
        file.validate()
            .map_err(|(mesh_type, source)| ParamLoadError::Invalid {
                path: path_str,
                mesh_type,
                source,
            })?;
        Ok(file)
    }

    /// Validates every record, reporting the first offending mesh type.
    pub fn validate(&self) -> Result<(), (String, ParamError)> {
        fn check<P: ParamRecord>(
            table: &BTreeMap<String, P>,
        ) -> Result<(), (String, ParamError)> {
            for (name, record) in table {
                record.validate().map_err(|e| (name.clone(), e))?;
            }
            Ok(())
        }
        check(&self.harmonic)?;
        check(&self.fene)?;
        check(&self.tether)?;
        check(&self.area_conservation)
    }

    /// Potentials with at least one record, in declaration order.
    pub fn kinds(&self) -> Vec<PotentialKind> {
        PotentialKind::ALL
            .into_iter()
            .filter(|kind| !self.records(*kind).is_empty())
            .collect()
    }

    /// All records of one potential, keyed by mesh type name.
    pub fn records(&self, kind: PotentialKind) -> Vec<(&str, AnyParams)> {
        fn collect<P: ParamRecord>(table: &BTreeMap<String, P>) -> Vec<(&str, AnyParams)> {
            table
                .iter()
                .map(|(name, p)| (name.as_str(), (*p).into()))
                .collect()
        }
        match kind {
            PotentialKind::Harmonic => collect(&self.harmonic),
            PotentialKind::Fene => collect(&self.fene),
            PotentialKind::Tether => collect(&self.tether),
            PotentialKind::AreaConservation => collect(&self.area_conservation),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_params(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.toml");
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        (dir, path)
    }

    #[test]
    fn potential_kind_parses_aliases_case_insensitively() {
        assert_eq!("Harmonic".parse(), Ok(PotentialKind::Harmonic));
        assert_eq!("FENE-WCA".parse(), Ok(PotentialKind::Fene));
        assert_eq!(
            "area_conservation".parse(),
            Ok(PotentialKind::AreaConservation)
        );
        assert!("helfrich".parse::<PotentialKind>().is_err());
    }

    #[test]
    fn potential_kind_display_round_trips_through_from_str() {
        for kind in PotentialKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }

    #[test]
    fn harmonic_validation_rejects_non_positive_stiffness() {
        let err = HarmonicParams { k: 0.0, r0: 1.0 }.validate().unwrap_err();
        assert_eq!(err.field, "k");
        assert!(HarmonicParams { k: 1.0, r0: 0.0 }.validate().is_ok());
        assert!(HarmonicParams { k: 1.0, r0: f64::NAN }.validate().is_err());
    }

    #[test]
    fn fene_validation_allows_zero_epsilon() {
        let params = FeneParams {
            k: 30.0,
            r0: 1.5,
            epsilon: 0.0,
            sigma: 1.0,
        };
        assert!(params.validate().is_ok());
        let bad = FeneParams { r0: 0.0, ..params };
        assert_eq!(bad.validate().unwrap_err().field, "r0");
    }

    #[test]
    fn tether_validation_requires_ordered_lengths() {
        let params = TetherParams {
            k_b: 5.0,
            l_min: 0.7,
            l_c1: 0.9,
            l_c0: 1.1,
            l_max: 1.3,
        };
        assert!(params.validate().is_ok());
        let touching = TetherParams {
            l_min: 0.0,
            ..params
        };
        let err = touching.validate().unwrap_err();
        assert_eq!(err.field, "l_min");
        assert_eq!(err.constraint, "positive");
        let crossed = TetherParams {
            l_c0: 0.8,
            ..params
        };
        assert_eq!(crossed.validate().unwrap_err().field, "l_c0");
        let capped = TetherParams {
            l_max: 1.1,
            ..params
        };
        assert_eq!(capped.validate().unwrap_err().field, "l_max");
    }

    #[test]
    fn area_conservation_validation_rejects_zero_target_area() {
        let err = AreaConservationParams { k: 1.0, a0: 0.0 }
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "A0");
        assert_eq!(err.potential, "area-conservation");
    }

    #[test]
    fn any_params_display_lists_all_fields() {
        let params: AnyParams = HarmonicParams { k: 30.0, r0: 1.6 }.into();
        assert_eq!(params.to_string(), "{ k = 30, r0 = 1.6 }");
        assert_eq!(params.kind(), PotentialKind::Harmonic);
    }

    #[test]
    fn load_reads_every_potential_table() {
        let (_dir, path) = write_params(
            r#"
            [harmonic.mesh]
            k = 30.0
            r0 = 1.6

            [fene.mesh]
            k = 30.0
            r0 = 1.6
            epsilon = 0.9
            sigma = 1.1

            [tether.mesh]
            k_b = 5.0
            l_min = 0.7
            l_c1 = 0.9
            l_c0 = 1.1
            l_max = 1.3

            [area-conservation.mesh]
            k = 1.0
            A0 = 10.0
            "#,
        );

        let file = ParameterFile::load(&path).unwrap();
        assert_eq!(file.harmonic["mesh"], HarmonicParams { k: 30.0, r0: 1.6 });
        assert_eq!(file.area_conservation["mesh"].a0, 10.0);
        assert_eq!(file.kinds(), PotentialKind::ALL.to_vec());
    }

    #[test]
    fn load_accepts_lowercase_area_alias() {
        let (_dir, path) = write_params("[area-conservation.outer]\nk = 2.0\na0 = 3.0\n");
        let file = ParameterFile::load(&path).unwrap();
        assert_eq!(file.kinds(), vec![PotentialKind::AreaConservation]);
        let records = file.records(PotentialKind::AreaConservation);
        assert_eq!(records[0].0, "outer");
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let (_dir, path) = write_params("[harmonic.mesh]\nk = 1.0\nr0 = 1.0\nkappa = 2.0\n");
        assert!(matches!(
            ParameterFile::load(&path),
            Err(ParamLoadError::Toml { .. })
        ));
    }

    #[test]
    fn load_reports_invalid_record_with_mesh_type() {
        let (_dir, path) = write_params("[harmonic.membrane]\nk = -1.0\nr0 = 1.0\n");
        match ParameterFile::load(&path) {
            Err(ParamLoadError::Invalid {
                mesh_type, source, ..
            }) => {
                assert_eq!(mesh_type, "membrane");
                assert_eq!(source.field, "k");
            }
            other => panic!("expected invalid parameter error, got {:?}", other),
        }
    }

    #[test]
    fn load_fails_for_missing_file() {
        let result = ParameterFile::load(Path::new("/nonexistent/params.toml"));
        assert!(matches!(result, Err(ParamLoadError::Io { .. })));
    }

    #[test]
    fn empty_file_has_no_kinds() {
        let (_dir, path) = write_params("");
        assert!(ParameterFile::load(&path).unwrap().is_empty());
    }
}
