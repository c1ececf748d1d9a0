use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One of the twelve calendar-derived zodiac signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Capitalised English name, also the value stored in the `zodiac` column
    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Position in the tropical year starting from Aries (0..=11)
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|sign| sign == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown zodiac sign: {0}")]
pub struct UnknownSign(pub String);

impl FromStr for ZodiacSign {
    type Err = UnknownSign;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sign| sign.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSign(s.to_string()))
    }
}

/// Display name and contact handles of a submitter. Opaque, never validated
/// beyond shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub phone: String,
    pub insta: String,
}

/// Raw questionnaire fields as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub month: u8,
    pub day: u8,
    pub sex: String,
    pub sexorient: String,
    pub degree: String,
    pub sociability: String,
    pub acqmark: String,
}

impl Answers {
    /// Attach the classified sign, producing the scoring model's input
    pub fn with_zodiac(&self, zodiac: ZodiacSign) -> Questionnaire {
        Questionnaire {
            zodiac,
            sex: self.sex.clone(),
            sexorient: self.sexorient.clone(),
            degree: self.degree.clone(),
            sociability: self.sociability.clone(),
            acqmark: self.acqmark.clone(),
        }
    }
}

/// Input handed to a scoring model: the answer fields plus the derived sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Questionnaire {
    pub zodiac: ZodiacSign,
    pub sex: String,
    pub sexorient: String,
    pub degree: String,
    pub sociability: String,
    pub acqmark: String,
}

impl Questionnaire {
    /// Field-name to value mapping, keyed the way the model expects
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("zodiac", self.zodiac.name().to_string()),
            ("sex", self.sex.clone()),
            ("sexorient", self.sexorient.clone()),
            ("degree", self.degree.clone()),
            ("sociability", self.sociability.clone()),
            ("acqmark", self.acqmark.clone()),
        ])
    }
}

/// ALQ affinity score. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AffinityScore(f64);

impl AffinityScore {
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A submission before it is persisted. Derived fields stay `None` until the
/// pipeline computes them.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    pub identity: Identity,
    pub answers: Answers,
    pub zodiac_sign: Option<ZodiacSign>,
    pub affinity_score: Option<AffinityScore>,
}

impl SubmissionDraft {
    pub fn new(identity: Identity, answers: Answers) -> Self {
        Self {
            identity,
            answers,
            zodiac_sign: None,
            affinity_score: None,
        }
    }
}

/// One persisted row of the record store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: i64,
    pub identity: Identity,
    pub answers: Answers,
    pub zodiac_sign: ZodiacSign,
    pub affinity_score: AffinityScore,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Identity-bearing projection of a matched submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "name")]
    pub matched_identity: String,
    #[serde(rename = "phone")]
    pub matched_phone: String,
    #[serde(rename = "insta")]
    pub matched_handle: String,
    #[serde(rename = "zodiac")]
    pub matched_zodiac_sign: ZodiacSign,
}

impl From<&Submission> for MatchResult {
    fn from(submission: &Submission) -> Self {
        Self {
            matched_identity: submission.identity.name.clone(),
            matched_phone: submission.identity.phone.clone(),
            matched_handle: submission.identity.insta.clone(),
            matched_zodiac_sign: submission.zodiac_sign,
        }
    }
}

/// Opaque token handed back to a submitter to reveal their match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Whether the submitter's own row takes part in the nearest-neighbour scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfMatchPolicy {
    /// The new row is an ordinary candidate (distance to itself is zero)
    #[default]
    Include,
    /// The new row is only returned when it is the sole row in the store
    FallbackOnly,
}

/// Weights of the built-in linear scoring model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub zodiac: f64,
    pub sex: f64,
    pub orientation: f64,
    pub degree: f64,
    pub sociability: f64,
    pub acquaintance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            zodiac: 0.15,
            sex: 0.10,
            orientation: 0.15,
            degree: 0.25,
            sociability: 0.25,
            acquaintance: 0.10,
        }
    }
}
