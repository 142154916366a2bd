//! Free-text search and scoping predicates.
//!
//! Predicates are rendered as SQL fragments with `?` placeholders plus the
//! ordered list of values to bind, so callers can splice them into any
//! statement and bind in order.

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Real(f64),
    Text(String),
    Null,
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Real(value)
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(BindValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl Predicate {
    /// `expr = ?`, or `expr IS NULL` for a null value.
    pub fn eq(expr: &str, value: BindValue) -> Self {
        match value {
            BindValue::Null => Self {
                sql: format!("{} IS NULL", expr),
                binds: Vec::new(),
            },
            value => Self {
                sql: format!("{} = ?", expr),
                binds: vec![value],
            },
        }
    }

    /// Inclusive range, `expr BETWEEN ? AND ?`.
    pub fn between(expr: &str, low: BindValue, high: BindValue) -> Self {
        Self {
            sql: format!("{} BETWEEN ? AND ?", expr),
            binds: vec![low, high],
        }
    }

    /// Conjunction of all predicates. `None` when the list is empty.
    pub fn all(predicates: Vec<Predicate>) -> Option<Self> {
        Self::join(predicates, " AND ")
    }

    /// Disjunction of all predicates. `None` when the list is empty.
    pub fn any(predicates: Vec<Predicate>) -> Option<Self> {
        Self::join(predicates, " OR ")
    }

    fn join(predicates: Vec<Predicate>, separator: &str) -> Option<Self> {
        if predicates.is_empty() {
            return None;
        }

        let mut parts = Vec::with_capacity(predicates.len());
        let mut binds = Vec::new();
        for predicate in predicates {
            parts.push(format!("({})", predicate.sql));
            binds.extend(predicate.binds);
        }

        Some(Self {
            sql: parts.join(separator),
            binds,
        })
    }
}

/// A searchable column: the dotted path callers know it by and the SQL
/// expression it resolves to inside the joined SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchColumn {
    pub path: String,
    pub expr: String,
}

/// Matches a free-text token as a case-insensitive substring of any of its
/// columns.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    columns: Vec<SearchColumn>,
}

impl SearchFilter {
    pub fn new(columns: Vec<SearchColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[SearchColumn] {
        &self.columns
    }

    /// Builds the OR-combined LIKE predicate for `parameter`.
    ///
    /// Both sides go through the same case folding (see [`fold_case`]).
    /// Absent or blank parameters produce no predicate. Columns coming from
    /// a LEFT JOIN miss are NULL, and `NULL LIKE ?` never matches.
    pub fn predicate(&self, parameter: Option<&str>) -> Option<Predicate> {
        let token = parameter.map(str::trim).filter(|t| !t.is_empty())?;
        let pattern = format!("%{}%", escape_like(&fold_case(token)));

        let predicates = self
            .columns
            .iter()
            .map(|column| Predicate {
                sql: format!(
                    "{} LIKE ? ESCAPE '\\'",
                    fold_case_sql(&format!("CAST({} AS TEXT)", column.expr))
                ),
                binds: vec![BindValue::Text(pattern.clone())],
            })
            .collect();

        Predicate::any(predicates)
    }
}

/// Upper-case letters of the Latin-1 block and their lower-case forms.
///
/// SQLite's `LOWER()` only folds ASCII, so these are folded explicitly on
/// the column side with `REPLACE`.
const LATIN1_CASE_PAIRS: &[(char, char)] = &[
    ('À', 'à'),
    ('Á', 'á'),
    ('Â', 'â'),
    ('Ã', 'ã'),
    ('Ä', 'ä'),
    ('Å', 'å'),
    ('Æ', 'æ'),
    ('Ç', 'ç'),
    ('È', 'è'),
    ('É', 'é'),
    ('Ê', 'ê'),
    ('Ë', 'ë'),
    ('Ì', 'ì'),
    ('Í', 'í'),
    ('Î', 'î'),
    ('Ï', 'ï'),
    ('Ð', 'ð'),
    ('Ñ', 'ñ'),
    ('Ò', 'ò'),
    ('Ó', 'ó'),
    ('Ô', 'ô'),
    ('Õ', 'õ'),
    ('Ö', 'ö'),
    ('Ø', 'ø'),
    ('Ù', 'ù'),
    ('Ú', 'ú'),
    ('Û', 'û'),
    ('Ü', 'ü'),
    ('Ý', 'ý'),
    ('Þ', 'þ'),
];

/// Lower-cases ASCII and Latin-1 letters and leaves every other character
/// alone, exactly as [`fold_case_sql`] does inside SQLite.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            LATIN1_CASE_PAIRS
                .iter()
                .find(|(upper, _)| *upper == c)
                .map(|(_, lower)| *lower)
                .unwrap_or_else(|| c.to_ascii_lowercase())
        })
        .collect()
}

/// SQL expression applying [`fold_case`] to `expr`.
pub fn fold_case_sql(expr: &str) -> String {
    let folded = LATIN1_CASE_PAIRS
        .iter()
        .fold(expr.to_string(), |inner, (upper, lower)| {
            format!("REPLACE({}, '{}', '{}')", inner, upper, lower)
        });
    format!("LOWER({})", folded)
}

/// Escapes LIKE wildcards so the token only ever matches literally.
pub fn escape_like(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
