use std::collections::BTreeMap;
use std::fmt;

/// Calendar date; month and day are optional for partial dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl Date {
    pub fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Whole years from `self` to `later`, counting a year only once its
    /// anniversary has passed. Unknown month/day count as the start of the
    /// year so partial dates do not overstate an age.
    pub fn years_until(&self, later: &Date) -> i32 {
        let mut years = later.year - self.year;
        let from = (self.month.unwrap_or(1), self.day.unwrap_or(1));
        let to = (later.month.unwrap_or(1), later.day.unwrap_or(1));
        if to < from {
            years -= 1;
        }
        years
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(month), Some(day)) => write!(f, "{day:02}/{month:02}/{}", self.year),
            (Some(month), None) => write!(f, "{month:02}/{}", self.year),
            _ => write!(f, "{}", self.year),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub date: Option<Date>,
    pub place: Option<String>,
}

impl Event {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.place.is_none()
    }

    /// Single marriage line, `None` when nothing is known.
    pub fn marriage_label(&self) -> Option<String> {
        self.describe("∞ ")
    }

    fn describe(&self, prefix: &str) -> Option<String> {
        match (&self.date, &self.place) {
            (Some(date), Some(place)) => Some(format!("{prefix}{date} {place}")),
            (Some(date), None) => Some(format!("{prefix}{date}")),
            (None, Some(place)) => Some(format!("{prefix}{place}")),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Ahnentafel number: 1 is the root, `2k` / `2k + 1` the parents of `k`.
    pub sosa: u32,
    pub name: String,
    pub birth: Option<Event>,
    pub death: Option<Event>,
}

impl Person {
    pub fn generation(&self) -> usize {
        generation_of(self.sosa)
    }

    pub fn age_at_death(&self) -> Option<i32> {
        let birth = self.birth.as_ref()?.date?;
        let death = self.death.as_ref()?.date?;
        Some(birth.years_until(&death))
    }

    /// Name followed by birth and death lines, skipping unknown events.
    pub fn label_lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if let Some(line) = self.birth.as_ref().and_then(|e| e.describe("° ")) {
            lines.push(line);
        }
        if let Some(line) = self.death.as_ref().and_then(|e| e.describe("† ")) {
            match self.age_at_death() {
                Some(age) => lines.push(format!("{line} ({age})")),
                None => lines.push(line),
            }
        }
        lines
    }
}

/// Generation of a Sosa number: `floor(log2(sosa))`.
pub fn generation_of(sosa: u32) -> usize {
    debug_assert!(sosa >= 1);
    (u32::BITS - 1 - sosa.leading_zeros()) as usize
}

/// Sosa number of `slot` within `generation` (slot 0 is the paternal end).
pub fn sosa_at(generation: usize, slot: usize) -> u32 {
    ((1usize << generation) + slot) as u32
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyTree {
    pub people: BTreeMap<u32, Person>,
    /// Marriage events keyed by the husband's (even) Sosa number.
    pub marriages: BTreeMap<u32, Event>,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Person> {
        self.people.get(&1)
    }

    pub fn person(&self, sosa: u32) -> Option<&Person> {
        self.people.get(&sosa)
    }

    /// Marriage of the parents of `child` (Sosa `2 * child` and `2 * child + 1`).
    pub fn marriage_of_parents(&self, child: u32) -> Option<&Event> {
        self.marriages.get(&(child * 2))
    }

    pub fn max_generation(&self) -> usize {
        self.people
            .keys()
            .next_back()
            .map(|sosa| generation_of(*sosa))
            .unwrap_or(0)
    }

    pub fn insert(&mut self, person: Person) -> Option<Person> {
        self.people.insert(person.sosa, person)
    }
}
