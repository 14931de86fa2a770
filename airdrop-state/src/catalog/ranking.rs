//! Ranking records and their display order
//!
//! Display order: pinned records first, then ascending rank, where an
//! unranked record (`rank == 0`) sorts as rank [`UNRANKED_SORT_RANK`].
//! Ties keep insertion order because the sort is stable.

use std::cmp::{Ordering, Reverse};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

use super::lookup::{CatalogEntry, CatalogLookup};

/// Rank used for sorting when none is set
pub const UNRANKED_SORT_RANK: u32 = 999;

/// Placeholder name and category for a ranking whose subject is not in the catalog
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// A 1..=5 star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TrackerError::InvalidInput(format!(
                "Rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Rating {
    type Error = TrackerError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotentialValue {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl PotentialValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for PotentialValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranking of one catalog subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRecord {
    pub id: String,
    #[serde(rename = "airdropId")]
    pub subject_ref: String,
    pub funding_rating: Rating,
    pub popularity_rating: Rating,
    pub potential_value: PotentialValue,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "telegramLink", default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    /// 0 means unranked
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub is_pinned: bool,
}

impl RankingRecord {
    pub fn effective_rank(&self) -> u32 {
        if self.rank == 0 {
            UNRANKED_SORT_RANK
        } else {
            self.rank
        }
    }

    /// `#3`, or `-` when unranked
    pub fn rank_label(&self) -> String {
        if self.rank == 0 {
            "-".to_string()
        } else {
            format!("#{}", self.rank)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.subject_ref.trim().is_empty() {
            return Err(TrackerError::InvalidInput("Please select an airdrop".into()));
        }
        Ok(())
    }
}

/// Form values for a new ranking; the id is assigned on insert
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingDraft {
    pub subject_ref: String,
    pub funding_rating: Rating,
    pub popularity_rating: Rating,
    pub potential_value: Option<PotentialValue>,
    pub notes: String,
    pub external_link: Option<String>,
    pub rank: u32,
    pub is_pinned: bool,
}

impl RankingDraft {
    pub fn new(subject_ref: impl Into<String>, potential_value: PotentialValue) -> Self {
        Self {
            subject_ref: subject_ref.into(),
            potential_value: Some(potential_value),
            ..Self::default()
        }
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = rank;
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    pub fn into_record(self, id: String) -> Result<RankingRecord> {
        let potential_value = self
            .potential_value
            .ok_or_else(|| TrackerError::InvalidInput("Please enter a potential value".into()))?;
        let record = RankingRecord {
            id,
            subject_ref: self.subject_ref,
            funding_rating: self.funding_rating,
            popularity_rating: self.popularity_rating,
            potential_value,
            notes: self.notes,
            external_link: self.external_link.filter(|l| !l.is_empty()),
            rank: self.rank,
            is_pinned: self.is_pinned,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Display comparator
pub fn display_cmp(a: &RankingRecord, b: &RankingRecord) -> Ordering {
    (Reverse(a.is_pinned), a.effective_rank()).cmp(&(Reverse(b.is_pinned), b.effective_rank()))
}

/// Records in display order
pub fn display_order(records: &[RankingRecord]) -> Vec<RankingRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(display_cmp);
    sorted
}

/// A ranking joined with its catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSubject {
    #[serde(flatten)]
    pub ranking: RankingRecord,
    pub subject_name: String,
    pub subject_logo: String,
    pub subject_category: String,
}

impl RankedSubject {
    fn join(ranking: RankingRecord, entry: Option<CatalogEntry>) -> Self {
        match entry {
            Some(e) => Self {
                ranking,
                subject_name: e.name,
                subject_logo: e.logo,
                subject_category: e.category,
            },
            None => Self {
                ranking,
                subject_name: UNKNOWN_SUBJECT.to_string(),
                subject_logo: String::new(),
                subject_category: UNKNOWN_SUBJECT.to_string(),
            },
        }
    }
}

/// Display-ordered rankings with catalog details; missing subjects get placeholders
pub fn enrich(records: &[RankingRecord], catalog: &dyn CatalogLookup) -> Vec<RankedSubject> {
    display_order(records)
        .into_iter()
        .map(|r| {
            let entry = catalog.get_by_ref(&r.subject_ref);
            RankedSubject::join(r, entry)
        })
        .collect()
}

/// Catalog entries no ranking refers to yet
pub fn unranked_subjects(records: &[RankingRecord], catalog: &dyn CatalogLookup) -> Vec<CatalogEntry> {
    catalog
        .entries()
        .into_iter()
        .filter(|e| !records.iter().any(|r| r.subject_ref == e.id))
        .collect()
}
