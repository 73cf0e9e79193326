use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label substituted for a null categorical value
pub const NOT_INFORMED: &str = "NÃO INFORMADO";

/// SEXO values counted towards the participation shares
pub const MALE_LABEL: &str = "MASCULINO";
pub const FEMALE_LABEL: &str = "FEMININO";

/// Loader defaults
pub const DEFAULT_INPUT: &str = "dados_constituinte.csv";
pub const DEFAULT_DELIMITER: u8 = b';';
pub const DEFAULT_ENCODING: &str = "latin-1";

/// Display limits
pub const DEFAULT_EDUCATION_TOP: usize = 8;
pub const DEFAULT_MARITAL_TOP: usize = 6;
pub const DEFAULT_REGION_CHART_TOP: usize = 10;
pub const DEFAULT_REGION_HIGHLIGHT_TOP: usize = 5;
pub const DEFAULT_WORD_CHART_TOP: usize = 15;
pub const DEFAULT_WORD_LIST_TOP: usize = 10;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// The typed columns every input table must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sex,
    AgeBracket,
    Education,
    MaritalStatus,
    Region,
    Date,
    Text,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Sex,
        Field::AgeBracket,
        Field::Education,
        Field::MaritalStatus,
        Field::Region,
        Field::Date,
        Field::Text,
    ];

    /// Header name of the column in the source table
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Sex => "SEXO",
            Field::AgeBracket => "FAIXA ETÁRIA",
            Field::Education => "INSTRUCAO",
            Field::MaritalStatus => "ESTADO CIVIL",
            Field::Region => "UF",
            Field::Date => "DATA",
            Field::Text => "SUGESTAO.TEXTO",
        }
    }
}

/// Canonical age ranges, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    From15To19,
    From20To24,
    From25To29,
    From30To39,
    From40To49,
    From50To59,
    Over59,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 7] = [
        AgeBracket::From15To19,
        AgeBracket::From20To24,
        AgeBracket::From25To29,
        AgeBracket::From30To39,
        AgeBracket::From40To49,
        AgeBracket::From50To59,
        AgeBracket::Over59,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::From15To19 => "15 A 19 ANOS",
            AgeBracket::From20To24 => "20 A 24 ANOS",
            AgeBracket::From25To29 => "25 A 29 ANOS",
            AgeBracket::From30To39 => "30 A 39 ANOS",
            AgeBracket::From40To49 => "40 A 49 ANOS",
            AgeBracket::From50To59 => "50 A 59 ANOS",
            AgeBracket::Over59 => "ACIMA DE 59 ANOS",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(wanted))
    }

    /// The seven bracket labels followed by the not-informed label
    pub fn display_order() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .map(|b| b.label())
            .chain(std::iter::once(NOT_INFORMED))
            .collect()
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One submitted suggestion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub sex: Option<String>,
    pub age_bracket: Option<AgeBracket>,
    pub education: Option<String>,
    pub marital_status: Option<String>,
    pub region: Option<String>,
    pub date: Option<NaiveDate>,
    pub text: Option<String>,
    /// Untyped columns, in the order of `Dataset::columns` entries with `ColumnSource::Extra`
    pub extra: Vec<Option<String>>,
}

impl Record {
    pub fn is_null(&self, field: Field) -> bool {
        match field {
            Field::Sex => self.sex.is_none(),
            Field::AgeBracket => self.age_bracket.is_none(),
            Field::Education => self.education.is_none(),
            Field::MaritalStatus => self.marital_status.is_none(),
            Field::Region => self.region.is_none(),
            Field::Date => self.date.is_none(),
            Field::Text => self.text.is_none(),
        }
    }

    /// Categorical value with nulls mapped to the not-informed label
    pub fn category(&self, field: Field) -> &str {
        let value = match field {
            Field::Sex => self.sex.as_deref(),
            Field::AgeBracket => self.age_bracket.map(AgeBracket::label),
            Field::Education => self.education.as_deref(),
            Field::MaritalStatus => self.marital_status.as_deref(),
            Field::Region => self.region.as_deref(),
            Field::Date | Field::Text => None,
        };
        value.unwrap_or(NOT_INFORMED)
    }

    /// Value rendered for the row preview
    pub fn display(&self, field: Field) -> Option<String> {
        match field {
            Field::Date => self.date.map(|d| d.format("%d/%m/%Y").to_string()),
            Field::Text => self.text.clone(),
            _ if self.is_null(field) => None,
            _ => Some(self.category(field).to_string()),
        }
    }
}

/// Where a column's values live inside a `Record`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Field(Field),
    Extra(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub source: ColumnSource,
}

/// The loaded table. Immutable once built; aggregators only read it.
#[derive(Debug, Clone)]
pub struct Dataset {
    source_name: String,
    columns: Vec<Column>,
    records: Vec<Record>,
    parse_failures: BTreeMap<Field, u64>,
}

impl Dataset {
    pub fn new(
        source_name: String,
        columns: Vec<Column>,
        records: Vec<Record>,
        parse_failures: BTreeMap<Field, u64>,
    ) -> Self {
        Self {
            source_name,
            columns,
            records,
            parse_failures,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Values that were present but could not be converted, per field
    pub fn parse_failures(&self) -> &BTreeMap<Field, u64> {
        &self.parse_failures
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<String> {
        let record = self.records.get(row)?;
        match self.columns.get(column)?.source {
            ColumnSource::Field(field) => record.display(field),
            ColumnSource::Extra(idx) => record.extra.get(idx).cloned().flatten(),
        }
    }
}

/// Display limits applied by the aggregators and the reporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub education_top: usize,
    pub marital_top: usize,
    pub region_chart_top: usize,
    pub region_highlight_top: usize,
    pub word_chart_top: usize,
    pub word_list_top: usize,
    pub preview_rows: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            education_top: DEFAULT_EDUCATION_TOP,
            marital_top: DEFAULT_MARITAL_TOP,
            region_chart_top: DEFAULT_REGION_CHART_TOP,
            region_highlight_top: DEFAULT_REGION_HIGHLIGHT_TOP,
            word_chart_top: DEFAULT_WORD_CHART_TOP,
            word_list_top: DEFAULT_WORD_LIST_TOP,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bracket_from_label() {
        assert_eq!(
            AgeBracket::from_label("30 A 39 ANOS"),
            Some(AgeBracket::From30To39)
        );
        assert_eq!(
            AgeBracket::from_label(" acima de 59 anos "),
            Some(AgeBracket::Over59)
        );
        assert_eq!(AgeBracket::from_label("10 A 14 ANOS"), None);
    }

    #[test]
    fn test_display_order_has_eight_entries() {
        let order = AgeBracket::display_order();
        assert_eq!(order.len(), 8);
        assert_eq!(order[0], "15 A 19 ANOS");
        assert_eq!(order[7], NOT_INFORMED);
    }

    #[test]
    fn test_record_category_maps_null() {
        let record = Record {
            sex: Some("FEMININO".to_string()),
            ..Record::default()
        };
        assert_eq!(record.category(Field::Sex), "FEMININO");
        assert_eq!(record.category(Field::Region), NOT_INFORMED);
        assert_eq!(record.category(Field::AgeBracket), NOT_INFORMED);
    }

    #[test]
    fn test_dataset_cell_lookup() {
        let columns = vec![
            Column {
                name: "SEXO".to_string(),
                source: ColumnSource::Field(Field::Sex),
            },
            Column {
                name: "CIDADE".to_string(),
                source: ColumnSource::Extra(0),
            },
            Column {
                name: "DATA".to_string(),
                source: ColumnSource::Field(Field::Date),
            },
        ];
        let record = Record {
            sex: Some("MASCULINO".to_string()),
            date: NaiveDate::from_ymd_opt(1986, 4, 2),
            extra: vec![None],
            ..Record::default()
        };
        let dataset = Dataset::new("t.csv".to_string(), columns, vec![record], BTreeMap::new());

        assert_eq!(dataset.cell(0, 0).as_deref(), Some("MASCULINO"));
        assert!(dataset.cell(0, 1).is_none());
        assert_eq!(dataset.cell(0, 2).as_deref(), Some("02/04/1986"));
        assert!(dataset.cell(1, 0).is_none());
    }
}
