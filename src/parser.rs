use crate::ir::{Date, Event, FamilyTree, Person};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?$").unwrap());
static DMY_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d{1,2})/)?(\d{1,2})/(\d{4})$").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSON5: {0}")]
    Json5(#[from] json5::Error),
    #[error("sosa numbers start at 1")]
    InvalidSosa,
    #[error("sosa {0} appears more than once")]
    DuplicateSosa(u32),
    #[error("sosa {sosa}: unrecognised date '{value}'")]
    InvalidDate { sosa: u32, value: String },
    #[error("sosa {0}: marriages are recorded on the husband (even sosa)")]
    MarriageOnOddSosa(u32),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeFile {
    #[serde(default)]
    people: Vec<PersonEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonEntry {
    sosa: u32,
    name: String,
    birth: Option<EventEntry>,
    death: Option<EventEntry>,
    marriage: Option<EventEntry>,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    date: Option<String>,
    place: Option<String>,
}

/// Parses a family tree from JSON, falling back to JSON5 (comments,
/// unquoted keys, trailing commas) when the input is not strict JSON.
///
/// ```json
/// { "people": [
///     { "sosa": 1, "name": "Evelyne", "birth": { "date": "19/07/1956" } },
///     { "sosa": 2, "name": "Louis", "marriage": { "date": "1950", "place": "Lyon" } }
/// ] }
/// ```
pub fn parse_family_tree(input: &str) -> Result<FamilyTree, ParseError> {
    let file: TreeFile = match serde_json::from_str(input) {
        Ok(file) => file,
        Err(json_err) => match json5::from_str(input) {
            Ok(file) => {
                tracing::debug!("family tree is not strict JSON, read as JSON5");
                file
            }
            Err(_) => return Err(ParseError::Json(json_err)),
        },
    };
    build_tree(file)
}

pub fn parse_family_tree_json5(input: &str) -> Result<FamilyTree, ParseError> {
    let file: TreeFile = json5::from_str(input)?;
    build_tree(file)
}

fn build_tree(file: TreeFile) -> Result<FamilyTree, ParseError> {
    let mut tree = FamilyTree::new();
    for entry in file.people {
        let sosa = entry.sosa;
        if sosa == 0 {
            return Err(ParseError::InvalidSosa);
        }
        if let Some(marriage) = entry.marriage {
            if sosa % 2 == 1 {
                return Err(ParseError::MarriageOnOddSosa(sosa));
            }
            tree.marriages.insert(sosa, convert_event(sosa, marriage)?);
        }
        let person = Person {
            sosa,
            name: entry.name.trim().to_string(),
            birth: entry.birth.map(|e| convert_event(sosa, e)).transpose()?,
            death: entry.death.map(|e| convert_event(sosa, e)).transpose()?,
        };
        if tree.insert(person).is_some() {
            return Err(ParseError::DuplicateSosa(sosa));
        }
    }
    tracing::debug!(
        people = tree.people.len(),
        marriages = tree.marriages.len(),
        "parsed family tree"
    );
    Ok(tree)
}

fn convert_event(sosa: u32, entry: EventEntry) -> Result<Event, ParseError> {
    let date = match entry.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_date(raw).ok_or_else(|| ParseError::InvalidDate {
            sosa,
            value: raw.to_string(),
        })?),
    };
    let place = entry
        .place
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    Ok(Event { date, place })
}

/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `MM/YYYY` and `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<Date> {
    let (year, month, day) = if let Some(caps) = ISO_DATE_RE.captures(raw) {
        (
            caps.get(1)?.as_str().parse::<i32>().ok()?,
            caps.get(2).map(|m| m.as_str().parse::<u8>()).transpose().ok()?,
            caps.get(3).map(|m| m.as_str().parse::<u8>()).transpose().ok()?,
        )
    } else if let Some(caps) = DMY_DATE_RE.captures(raw) {
        (
            caps.get(3)?.as_str().parse::<i32>().ok()?,
            Some(caps.get(2)?.as_str().parse::<u8>().ok()?),
            caps.get(1).map(|m| m.as_str().parse::<u8>()).transpose().ok()?,
        )
    } else {
        return None;
    };
    if month.is_some_and(|m| !(1..=12).contains(&m))
        || day.is_some_and(|d| !(1..=31).contains(&d))
    {
        return None;
    }
    Some(Date { year, month, day })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_formats() {
        assert_eq!(parse_date("1956-07-19"), Some(Date::ymd(1956, 7, 19)));
        assert_eq!(parse_date("19/07/1956"), Some(Date::ymd(1956, 7, 19)));
        assert_eq!(parse_date("1956"), Some(Date::year(1956)));
        assert_eq!(
            parse_date("07/1956"),
            Some(Date {
                year: 1956,
                month: Some(7),
                day: None,
            })
        );
        assert_eq!(parse_date("1956-13-01"), None);
        assert_eq!(parse_date("around 1900"), None);
    }

    #[test]
    fn parses_people_and_marriages() {
        let tree = parse_family_tree(
            r#"{
                "people": [
                    { "sosa": 1, "name": " Evelyne ", "birth": { "date": "19/07/1956", "place": "Saint-Laurent" } },
                    { "sosa": 2, "name": "Louis", "marriage": { "date": "1950" } },
                    { "sosa": 3, "name": "Marie", "death": { "date": "2001-02-03" } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(tree.root().map(|p| p.name.as_str()), Some("Evelyne"));
        assert_eq!(tree.people.len(), 3);
        assert_eq!(
            tree.marriage_of_parents(1).and_then(|e| e.date),
            Some(Date::year(1950))
        );
        assert_eq!(tree.max_generation(), 1);
    }

    #[test]
    fn rejects_duplicates_and_bad_dates() {
        let dup = parse_family_tree(
            r#"{"people": [{"sosa": 2, "name": "A"}, {"sosa": 2, "name": "B"}]}"#,
        );
        assert!(matches!(dup, Err(ParseError::DuplicateSosa(2))));

        let bad = parse_family_tree(
            r#"{"people": [{"sosa": 4, "name": "A", "birth": {"date": "yesterday"}}]}"#,
        );
        assert!(matches!(bad, Err(ParseError::InvalidDate { sosa: 4, .. })));

        let zero = parse_family_tree(r#"{"people": [{"sosa": 0, "name": "A"}]}"#);
        assert!(matches!(zero, Err(ParseError::InvalidSosa)));

        let odd = parse_family_tree(
            r#"{"people": [{"sosa": 3, "name": "A", "marriage": {"place": "Paris"}}]}"#,
        );
        assert!(matches!(odd, Err(ParseError::MarriageOnOddSosa(3))));
    }

    #[test]
    fn json5_input() {
        let tree = parse_family_tree_json5("{ people: [ { sosa: 1, name: 'Root', }, ], }").unwrap();
        assert_eq!(tree.people.len(), 1);
    }

    #[test]
    fn json_entry_point_accepts_json5() {
        let tree = parse_family_tree("{ people: [ { sosa: 1, name: 'Root' } ] }").unwrap();
        assert_eq!(tree.root().map(|p| p.name.as_str()), Some("Root"));

        let commented = parse_family_tree(
            "{\n  // paternal side only\n  people: [{ sosa: 2, name: 'Louis', },],\n}",
        )
        .unwrap();
        assert!(commented.person(2).is_some());

        // neither JSON nor JSON5: the JSON error is reported
        assert!(matches!(
            parse_family_tree("{ people: [ oops"),
            Err(ParseError::Json(_))
        ));
    }
}
