use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use std::time::Duration;

use crate::core::checker::DealChecker;
use crate::domain::model::{Place, Platform, VerificationResult};
use crate::domain::ports::{PageFetcher, ResultExtractor};
use crate::utils::error::{CheckError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CheckError::InvalidConfigValueError {
                field: "batch.output_format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, json".to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSettings {
    /// Used for rows whose city column is blank.
    pub default_city: String,
    pub max_places: usize,
    /// Pause between two places, to stay polite to the search provider.
    pub pause: Duration,
    pub output_format: OutputFormat,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            default_city: String::new(),
            max_places: 100,
            pause: Duration::from_millis(120),
            output_format: OutputFormat::Csv,
        }
    }
}

/// A verification plus when it was made.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedPlace {
    #[serde(flatten)]
    pub result: VerificationResult,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct PlaceRow {
    name: String,
    #[serde(default)]
    city: Option<String>,
}

/// Reads `name,city` rows. Rows without a name are skipped.
pub fn read_places<R: Read>(reader: R, default_city: &str) -> Result<Vec<Place>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut places = Vec::new();
    for (index, row) in csv_reader.deserialize::<PlaceRow>().enumerate() {
        let row = row?;
        if row.name.is_empty() {
            tracing::warn!("Skipping row {}: empty name", index + 1);
            continue;
        }
        let city = row
            .city
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_city.to_string());
        places.push(Place::new(row.name, city));
    }
    Ok(places)
}

pub struct BatchRunner<'a, F: PageFetcher, E: ResultExtractor> {
    checker: &'a DealChecker<F, E>,
    settings: BatchSettings,
}

impl<'a, F: PageFetcher, E: ResultExtractor> BatchRunner<'a, F, E> {
    pub fn new(checker: &'a DealChecker<F, E>, settings: BatchSettings) -> Self {
        Self { checker, settings }
    }

    /// Verifies places one after another, at most `max_places` of them.
    pub async fn run(&self, places: &[Place]) -> Vec<CheckedPlace> {
        if places.len() > self.settings.max_places {
            tracing::warn!(
                "{} places given, only the first {} will be checked",
                places.len(),
                self.settings.max_places
            );
        }

        let mut checked = Vec::new();
        for (index, place) in places.iter().take(self.settings.max_places).enumerate() {
            if index > 0 && !self.settings.pause.is_zero() {
                tokio::time::sleep(self.settings.pause).await;
            }
            let result = self.checker.verify_all(place).await;
            checked.push(CheckedPlace {
                result,
                checked_at: Utc::now(),
            });
        }
        checked
    }
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    name: &'a str,
    city: &'a str,
    platform: &'a str,
    status: String,
    confidence: String,
    title: &'a str,
    url: &'a str,
    link: String,
    error: &'a str,
    checked_at: String,
}

/// One row per place and platform.
pub fn write_csv<W: Write>(writer: W, checked: &[CheckedPlace], platforms: &[Platform]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for entry in checked {
        let place = &entry.result.place;
        let checked_at = entry.checked_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        for (key, verdict) in &entry.result.platforms {
            let platform = platforms
                .iter()
                .find(|p| &p.key == key)
                .cloned()
                .unwrap_or_else(|| Platform::new(key.as_str(), key.as_str()));
            let sample = verdict.sample.as_ref().map(|s| &s.candidate);

            csv_writer.serialize(OutputRow {
                name: &place.name,
                city: &place.city,
                platform: key,
                status: verdict.status.to_string(),
                confidence: format!("{:.3}", verdict.confidence),
                title: sample.map(|c| c.title.as_str()).unwrap_or(""),
                url: sample.map(|c| c.url.as_str()).unwrap_or(""),
                link: platform.deep_link(place, verdict),
                error: verdict.error.as_deref().unwrap_or(""),
                checked_at: checked_at.clone(),
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(writer: W, checked: &[CheckedPlace]) -> Result<()> {
    serde_json::to_writer_pretty(writer, checked)?;
    Ok(())
}

pub fn write_results<W: Write>(
    writer: W,
    format: OutputFormat,
    checked: &[CheckedPlace],
    platforms: &[Platform],
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, checked, platforms),
        OutputFormat::Json => write_json(writer, checked),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PlatformVerdict, ScoredCandidate, SearchCandidate, VerificationStatus};
    use chrono::TimeZone;

    fn checked_place() -> CheckedPlace {
        let mut result = VerificationResult::all_unknown(
            Place::new("Fresh Mart", "Mississauga"),
            &Platform::defaults(),
        );
        result.platforms.insert(
            "toogoodtogo".to_string(),
            PlatformVerdict {
                status: VerificationStatus::Sure,
                confidence: 0.6875,
                sample: Some(ScoredCandidate {
                    candidate: SearchCandidate::new(
                        "Fresh Mart Mississauga - Too Good To Go",
                        "https://toogoodtogo.com/item/123",
                    ),
                    similarity: 0.375,
                    domain_match: true,
                    score: 0.6875,
                }),
                error: None,
            },
        );
        result
            .platforms
            .insert("flashfood".to_string(), PlatformVerdict::failed("HTTP 503"));

        CheckedPlace {
            result,
            checked_at: Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_read_places() {
        let input = "name,city\nFresh Mart, Mississauga\nCorner Bakery,\n ,Toronto\nNo Frills\n";
        let places = read_places(input.as_bytes(), "Brampton").unwrap();

        assert_eq!(
            places,
            vec![
                Place::new("Fresh Mart", "Mississauga"),
                Place::new("Corner Bakery", "Brampton"),
                Place::new("No Frills", "Brampton"),
            ]
        );
    }

    #[test]
    fn test_read_places_requires_name_column() {
        let input = "title,city\nFresh Mart,Mississauga\n";
        assert!(matches!(
            read_places(input.as_bytes(), ""),
            Err(CheckError::CsvError(_))
        ));
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &[checked_place()], &Platform::defaults()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "name,city,platform,status,confidence,title,url,link,error,checked_at"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Fresh Mart,Mississauga,flashfood,unknown,0.000,,,"));
        assert!(lines[1].contains("HTTP 503"));
        assert!(lines[2].starts_with("Fresh Mart,Mississauga,foodhero,unknown"));
        assert!(lines[2].contains("FoodHero+Fresh+Mart+Mississauga"));
        assert!(lines[3].contains("toogoodtogo,sure,0.688"));
        assert!(lines[3].contains(",https://toogoodtogo.com/item/123,https://toogoodtogo.com/item/123,"));
        assert!(lines[3].ends_with("2026-10-18T12:00:00Z"));
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_results(&mut out, OutputFormat::Json, &[checked_place()], &[]).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json[0]["place"]["name"], "Fresh Mart");
        assert_eq!(json[0]["platforms"]["toogoodtogo"]["status"], "sure");
        assert_eq!(json[0]["platforms"]["flashfood"]["error"], "HTTP 503");
        assert!(json[0]["checkedAt"].is_string());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(" json ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
