use crate::catalog::{Course, CourseId};
use crate::error::EngineError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex");
    static ref URL: Regex = Regex::new(r"(?i)https?://[\w\-.~:/?#\[\]@!$&'()*+,;=%]+").expect("valid regex");
    static ref PHONE: Regex = Regex::new(r"\+?[0-9][0-9()\-\s]{6,}").expect("valid regex");
    static ref PRICE: Regex = Regex::new(r"\$\d+(?:\.\d{2})?").expect("valid regex");
    static ref DATE: Regex = Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").expect("valid regex");
    static ref VALID_URL: Regex = Regex::new(r"^https?://\S+$").expect("valid regex");
    static ref VALID_PRICE: Regex = Regex::new(r"^\$?\d+(\.\d{2})?$").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Email,
    Url,
    Phone,
    Price,
    Date,
}

impl PatternKind {
    fn regex(self) -> &'static Regex {
        match self {
            PatternKind::Email => &*EMAIL,
            PatternKind::Url => &*URL,
            PatternKind::Phone => &*PHONE,
            PatternKind::Price => &*PRICE,
            PatternKind::Date => &*DATE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Email => "email",
            PatternKind::Url => "url",
            PatternKind::Phone => "phone",
            PatternKind::Price => "price",
            PatternKind::Date => "date",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(PatternKind::Email),
            "url" => Ok(PatternKind::Url),
            "phone" => Ok(PatternKind::Phone),
            "price" => Ok(PatternKind::Price),
            "date" => Ok(PatternKind::Date),
            other => Err(EngineError::InvalidInput(format!("unknown pattern type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub course_id: CourseId,
    pub title: String,
    pub platform: String,
    pub matches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub results: Vec<PatternMatch>,
    pub total_count: usize,
    /// Pattern name -> total number of matches.
    pub stats: BTreeMap<String, usize>,
}

fn scan_text(course: &Course) -> String {
    format!(
        "{} {} {} {}",
        course.title,
        course.url.as_deref().unwrap_or(""),
        course.platform,
        course.price.as_deref().unwrap_or("")
    )
    .to_lowercase()
}

/// Scan title, url, platform and price of every course for `kind`.
pub fn find_patterns(courses: &[Course], kind: PatternKind) -> PatternReport {
    let re = kind.regex();
    let mut results = Vec::new();
    let mut total_matches = 0;
    for course in courses {
        let text = scan_text(course);
        let matches: Vec<String> = re.find_iter(&text).map(|m| m.as_str().trim().to_string()).collect();
        if matches.is_empty() {
            continue;
        }
        total_matches += matches.len();
        results.push(PatternMatch {
            course_id: course.id,
            title: course.title.clone(),
            platform: course.platform.clone(),
            matches,
        });
    }
    let mut stats = BTreeMap::new();
    if total_matches > 0 {
        stats.insert(kind.to_string(), total_matches);
    }
    PatternReport { total_count: results.len(), results, stats }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub valid_urls: usize,
    pub invalid_urls: usize,
    pub valid_emails: usize,
    pub invalid_emails: usize,
    pub valid_prices: usize,
    pub invalid_prices: usize,
    pub total_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidEntry {
    pub course_id: CourseId,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub stats: ValidationStats,
    pub invalid_entries: Vec<InvalidEntry>,
}

fn is_valid_price(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("free") || VALID_PRICE.is_match(raw)
}

/// Check url shape, email presence and price shape of every course.
pub fn validation_stats(courses: &[Course]) -> ValidationReport {
    let mut stats = ValidationStats { total_records: courses.len(), ..Default::default() };
    let mut invalid_entries = Vec::new();
    let mut reject = |course: &Course, kind: &str, value: &str, reason: &str| {
        invalid_entries.push(InvalidEntry {
            course_id: course.id,
            kind: kind.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
    };

    for course in courses {
        let url = course.url.as_deref().unwrap_or("");
        if VALID_URL.is_match(url) {
            stats.valid_urls += 1;
        } else {
            stats.invalid_urls += 1;
            reject(course, "URL", url, "Invalid URL");
        }

        if EMAIL.is_match(&format!("{} {}", course.title, url)) {
            stats.valid_emails += 1;
        } else {
            stats.invalid_emails += 1;
            reject(course, "Email", &course.title, "No email found");
        }

        let price = course.price.as_deref().unwrap_or("");
        if is_valid_price(price) {
            stats.valid_prices += 1;
        } else {
            stats.invalid_prices += 1;
            reject(course, "Price", price, "Invalid price");
        }
    }
    ValidationReport { stats, invalid_entries }
}
