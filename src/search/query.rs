use crate::SweepError;
use chrono::NaiveDate;
use url::form_urlencoded::byte_serialize;

/// Date format the engine's custom-range filter expects
pub const ENGINE_DATE_FORMAT: &str = "%m/%d/%Y";

/// An inclusive date range, `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// Creates a window, rejecting ranges that end before they start
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, SweepError> {
        if from > to {
            return Err(SweepError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// A window covering exactly one day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Every day of the window in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }

    /// Number of days in the window
    pub fn len_days(&self) -> u64 {
        (self.to - self.from).num_days() as u64 + 1
    }
}

/// One day's search: quoted required keywords, bare optional keywords and
/// a date filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    required_keywords: Vec<String>,
    optional_keywords: Vec<String>,
    window: DateWindow,
}

impl SearchQuery {
    pub fn new(
        required_keywords: Vec<String>,
        optional_keywords: Vec<String>,
        window: DateWindow,
    ) -> Self {
        Self {
            required_keywords,
            optional_keywords,
            window,
        }
    }

    pub fn required_keywords(&self) -> &[String] {
        &self.required_keywords
    }

    pub fn optional_keywords(&self) -> &[String] {
        &self.optional_keywords
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// The `q` parameter value: `"a"+"b"+opt1+opt2`, form-urlencoded
    pub fn keyword_clause(&self) -> String {
        let required = self
            .required_keywords
            .iter()
            .map(|k| encode(&format!("\"{}\"", k)))
            .collect::<Vec<_>>()
            .join("+");

        if self.optional_keywords.is_empty() {
            return required;
        }

        let optional = self
            .optional_keywords
            .iter()
            .map(|k| encode(k))
            .collect::<Vec<_>>()
            .join("+");

        format!("{}+{}", required, optional)
    }

    /// Builds the full search URL against the engine at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use news_sweep::search::{DateWindow, SearchQuery};
    ///
    /// let day = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
    /// let query = SearchQuery::new(
    ///     vec!["fortaleza".into()],
    ///     vec!["enchente".into()],
    ///     DateWindow::single_day(day),
    /// );
    /// assert_eq!(
    ///     query.to_url("https://www.google.com/search"),
    ///     "https://www.google.com/search?q=%22fortaleza%22+enchente&tbs=cdr:1,cd_min:12/31/2021,cd_max:12/31/2021"
    /// );
    /// ```
    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}?q={}&tbs=cdr:1,cd_min:{},cd_max:{}",
            base_url,
            self.keyword_clause(),
            self.window.from.format(ENGINE_DATE_FORMAT),
            self.window.to.format(ENGINE_DATE_FORMAT),
        )
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
