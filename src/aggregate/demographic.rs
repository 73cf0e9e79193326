use serde::Serialize;

use crate::stats::{percentage, FrequencyCounter, FrequencyTable};
use crate::types::{AgeBracket, Dataset, Field, FEMALE_LABEL, MALE_LABEL, NOT_INFORMED};

/// Participation by sex, against the full row count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SexShares {
    pub total: u64,
    pub male: u64,
    pub male_percent: f64,
    pub female: u64,
    pub female_percent: f64,
    pub not_informed: u64,
}

/// Frequency tables for the respondent profile.
///
/// Every table counts nulls under the not-informed label, so each sums to the
/// dataset's row count. `education` and `marital_status` hold every category;
/// truncation to the displayed top-K happens when series are built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicProfile {
    pub sex: FrequencyTable,
    /// The seven brackets plus not-informed, in canonical order
    pub age_brackets: FrequencyTable,
    pub education: FrequencyTable,
    pub marital_status: FrequencyTable,
    pub shares: SexShares,
    /// Most frequent bracket label, not-informed included
    pub predominant_age_bracket: Option<String>,
}

pub fn aggregate_demographics(dataset: &Dataset) -> DemographicProfile {
    let sex = count_field(dataset, Field::Sex).ranked();

    let ages = count_field(dataset, Field::AgeBracket);
    let age_brackets = ages.reindexed(&AgeBracket::display_order());
    let predominant_age_bracket = ages.ranked().first().map(|e| e.label.clone());

    let total = dataset.row_count() as u64;
    let male = sex.get(MALE_LABEL);
    let female = sex.get(FEMALE_LABEL);
    let shares = SexShares {
        total,
        male,
        male_percent: percentage(male, total),
        female,
        female_percent: percentage(female, total),
        not_informed: sex.get(NOT_INFORMED),
    };

    DemographicProfile {
        sex,
        age_brackets,
        education: count_field(dataset, Field::Education).ranked(),
        marital_status: count_field(dataset, Field::MaritalStatus).ranked(),
        shares,
        predominant_age_bracket,
    }
}

fn count_field(dataset: &Dataset, field: Field) -> FrequencyCounter {
    dataset.records().iter().map(|r| r.category(field)).collect()
}
