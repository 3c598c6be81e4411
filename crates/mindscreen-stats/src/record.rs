//! Typed student records and the raw cells they are parsed from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// How a known column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Row identifier, excluded from feature counts.
    Identifier,
    /// Numeric measurement.
    Numeric,
    /// Free-text or categorical answer.
    Categorical,
    /// The binary outcome column.
    Outcome,
}

/// The known column set of the student dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Row identifier.
    Id,
    /// Self-reported gender.
    Gender,
    /// Age in years.
    Age,
    /// City of residence.
    City,
    /// Occupation, usually `Student`.
    Profession,
    /// Academic pressure, 0 to 5.
    AcademicPressure,
    /// Work pressure, 0 to 5.
    WorkPressure,
    /// Cumulative grade point average, 0 to 10.
    Cgpa,
    /// Study satisfaction, 0 to 5.
    StudySatisfaction,
    /// Job satisfaction, 0 to 5.
    JobSatisfaction,
    /// Sleep duration band, e.g. `'5-6 hours'`.
    SleepDuration,
    /// Dietary habits.
    DietaryHabits,
    /// Degree programme.
    Degree,
    /// Whether suicidal thoughts were ever reported.
    SuicidalThoughts,
    /// Daily work or study hours.
    WorkStudyHours,
    /// Financial stress, 1 to 5.
    FinancialStress,
    /// Family history of mental illness.
    FamilyHistory,
    /// The outcome, `0` or `1`.
    Depression,
}

impl Column {
    /// Every known column, in dataset order.
    pub const ALL: [Column; 18] = [
        Column::Id,
        Column::Gender,
        Column::Age,
        Column::City,
        Column::Profession,
        Column::AcademicPressure,
        Column::WorkPressure,
        Column::Cgpa,
        Column::StudySatisfaction,
        Column::JobSatisfaction,
        Column::SleepDuration,
        Column::DietaryHabits,
        Column::Degree,
        Column::SuicidalThoughts,
        Column::WorkStudyHours,
        Column::FinancialStress,
        Column::FamilyHistory,
        Column::Depression,
    ];

    /// Header text as it appears in the CSV file.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Gender => "Gender",
            Column::Age => "Age",
            Column::City => "City",
            Column::Profession => "Profession",
            Column::AcademicPressure => "Academic Pressure",
            Column::WorkPressure => "Work Pressure",
            Column::Cgpa => "CGPA",
            Column::StudySatisfaction => "Study Satisfaction",
            Column::JobSatisfaction => "Job Satisfaction",
            Column::SleepDuration => "Sleep Duration",
            Column::DietaryHabits => "Dietary Habits",
            Column::Degree => "Degree",
            Column::SuicidalThoughts => "Have you ever had suicidal thoughts ?",
            Column::WorkStudyHours => "Work/Study Hours",
            Column::FinancialStress => "Financial Stress",
            Column::FamilyHistory => "Family History of Mental Illness",
            Column::Depression => "Depression",
        }
    }

    /// Resolve a CSV header (trimmed) to a known column.
    ///
    /// `Family History` is accepted as a short alias.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        if header == "Family History" {
            return Some(Column::FamilyHistory);
        }
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Return how this column is interpreted.
    #[must_use]
    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Id => ColumnKind::Identifier,
            Column::Age
            | Column::AcademicPressure
            | Column::WorkPressure
            | Column::Cgpa
            | Column::StudySatisfaction
            | Column::JobSatisfaction
            | Column::WorkStudyHours
            | Column::FinancialStress => ColumnKind::Numeric,
            Column::Depression => ColumnKind::Outcome,
            Column::Gender
            | Column::City
            | Column::Profession
            | Column::SleepDuration
            | Column::DietaryHabits
            | Column::Degree
            | Column::SuicidalThoughts
            | Column::FamilyHistory => ColumnKind::Categorical,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.header())
    }
}

/// A raw CSV field: numeric if it parses cleanly as a finite float.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A finite number.
    Number(f64),
    /// Any other non-empty text.
    Text(String),
    /// An empty field or a field absent from a short row.
    Missing,
}

impl Cell {
    /// Classify a raw field.
    #[must_use]
    pub fn parse(raw: &str) -> Cell {
        let raw = raw.trim();
        if raw.is_empty() {
            return Cell::Missing;
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    fn text(&self) -> Option<String> {
        match self {
            Cell::Number(v) => Some(format!("{v}")),
            Cell::Text(s) => Some(s.clone()),
            Cell::Missing => None,
        }
    }

    fn outcome(&self) -> Option<bool> {
        match self.number() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        }
    }
}

/// One parsed CSV row before typing: header → cell.
///
/// Exists only at the parsing boundary; convert with
/// [`StudentRecord::from_raw`] straight away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: BTreeMap<String, Cell>,
}

impl RawRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell for `header`.
    pub fn insert(&mut self, header: impl Into<String>, cell: Cell) {
        self.cells.insert(header.into(), cell);
    }

    /// Iterate over `(header, cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(h, c)| (h.as_str(), c))
    }
}

/// A borrowed view of one field of a [`StudentRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// A numeric field with a value.
    Number(f64),
    /// A categorical field with a value.
    Text(&'a str),
    /// No usable value.
    Missing,
}

impl Value<'_> {
    /// Return `true` if the field had no usable value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

/// One dataset row over the known column set.
///
/// Numeric columns hold `None` when the field was empty or non-numeric
/// (the public dataset uses `?` for unknown stress values). Categorical
/// columns keep the trimmed text, with numbers rendered back to text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentRecord {
    /// See [`Column::Id`].
    pub id: Option<f64>,
    /// See [`Column::Gender`].
    pub gender: Option<String>,
    /// See [`Column::Age`].
    pub age: Option<f64>,
    /// See [`Column::City`].
    pub city: Option<String>,
    /// See [`Column::Profession`].
    pub profession: Option<String>,
    /// See [`Column::AcademicPressure`].
    pub academic_pressure: Option<f64>,
    /// See [`Column::WorkPressure`].
    pub work_pressure: Option<f64>,
    /// See [`Column::Cgpa`].
    pub cgpa: Option<f64>,
    /// See [`Column::StudySatisfaction`].
    pub study_satisfaction: Option<f64>,
    /// See [`Column::JobSatisfaction`].
    pub job_satisfaction: Option<f64>,
    /// See [`Column::SleepDuration`].
    pub sleep_duration: Option<String>,
    /// See [`Column::DietaryHabits`].
    pub dietary_habits: Option<String>,
    /// See [`Column::Degree`].
    pub degree: Option<String>,
    /// See [`Column::SuicidalThoughts`].
    pub suicidal_thoughts: Option<String>,
    /// See [`Column::WorkStudyHours`].
    pub work_study_hours: Option<f64>,
    /// See [`Column::FinancialStress`].
    pub financial_stress: Option<f64>,
    /// See [`Column::FamilyHistory`].
    pub family_history: Option<String>,
    /// `Some(true)` for outcome `1`, `Some(false)` for `0`, `None` otherwise.
    pub depression: Option<bool>,
}

impl StudentRecord {
    /// Type a raw row. Unknown headers are ignored.
    #[must_use]
    pub fn from_raw(raw: &RawRow) -> Self {
        let mut record = Self::default();
        for (header, cell) in raw.iter() {
            if let Some(column) = Column::from_header(header) {
                record.set(column, cell);
            }
        }
        record
    }

    fn set(&mut self, column: Column, cell: &Cell) {
        match column {
            Column::Id => self.id = cell.number(),
            Column::Gender => self.gender = cell.text(),
            Column::Age => self.age = cell.number(),
            Column::City => self.city = cell.text(),
            Column::Profession => self.profession = cell.text(),
            Column::AcademicPressure => self.academic_pressure = cell.number(),
            Column::WorkPressure => self.work_pressure = cell.number(),
            Column::Cgpa => self.cgpa = cell.number(),
            Column::StudySatisfaction => self.study_satisfaction = cell.number(),
            Column::JobSatisfaction => self.job_satisfaction = cell.number(),
            Column::SleepDuration => self.sleep_duration = cell.text(),
            Column::DietaryHabits => self.dietary_habits = cell.text(),
            Column::Degree => self.degree = cell.text(),
            Column::SuicidalThoughts => self.suicidal_thoughts = cell.text(),
            Column::WorkStudyHours => self.work_study_hours = cell.number(),
            Column::FinancialStress => self.financial_stress = cell.number(),
            Column::FamilyHistory => self.family_history = cell.text(),
            Column::Depression => self.depression = cell.outcome(),
        }
    }

    /// Return the field for `column`.
    ///
    /// The outcome column reads as `Number(1.0)` / `Number(0.0)`.
    #[must_use]
    pub fn value(&self, column: Column) -> Value<'_> {
        fn num<'a>(v: Option<f64>) -> Value<'a> {
            v.map_or(Value::Missing, Value::Number)
        }
        fn text(v: &Option<String>) -> Value<'_> {
            v.as_deref().map_or(Value::Missing, Value::Text)
        }
        match column {
            Column::Id => num(self.id),
            Column::Gender => text(&self.gender),
            Column::Age => num(self.age),
            Column::City => text(&self.city),
            Column::Profession => text(&self.profession),
            Column::AcademicPressure => num(self.academic_pressure),
            Column::WorkPressure => num(self.work_pressure),
            Column::Cgpa => num(self.cgpa),
            Column::StudySatisfaction => num(self.study_satisfaction),
            Column::JobSatisfaction => num(self.job_satisfaction),
            Column::SleepDuration => text(&self.sleep_duration),
            Column::DietaryHabits => text(&self.dietary_habits),
            Column::Degree => text(&self.degree),
            Column::SuicidalThoughts => text(&self.suicidal_thoughts),
            Column::WorkStudyHours => num(self.work_study_hours),
            Column::FinancialStress => num(self.financial_stress),
            Column::FamilyHistory => text(&self.family_history),
            Column::Depression => num(self.depression.map(|d| if d { 1.0 } else { 0.0 })),
        }
    }

    /// Return the numeric value of `column`, if it is numeric and present.
    #[must_use]
    pub fn number(&self, column: Column) -> Option<f64> {
        match self.value(column) {
            Value::Number(v) => Some(v),
            Value::Text(_) | Value::Missing => None,
        }
    }

    /// Return the text value of `column`, if it is categorical and present.
    #[must_use]
    pub fn text(&self, column: Column) -> Option<&str> {
        match self.value(column) {
            Value::Text(s) => Some(s),
            Value::Number(_) | Value::Missing => None,
        }
    }
}
